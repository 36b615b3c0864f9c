mod fmw_memory;
mod platform_common;
mod platform_sgm776;

pub use fmw_memory::{FirmwareMemoryLayout, MemRegion, MemoryMode};
pub use platform_common::{
    coreclk_regs, CoreClkRegisters, PikClusterRegisters, PikGpuRegisters, PikPlatform,
    PikSystemRegisters, PIK_CLUSTER_CORE_NUM_MAX,
};
pub use platform_sgm776::Sgm776Platform;
