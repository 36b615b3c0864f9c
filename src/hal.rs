use crate::sid::SystemInfo;
use crate::ClockResult;

/// The interfaces which the surrounding firmware must implement.
pub trait SystemIdentity {
    /// Returns the identity of the running system. The answer describes fixed
    /// silicon and must not change for the lifetime of the firmware.
    fn system_info(&self) -> ClockResult<SystemInfo>;

    /// Configuration number of the detected variant.
    fn config_number(&self) -> ClockResult<u32> {
        self.system_info().map(|info| info.config_number)
    }
}
