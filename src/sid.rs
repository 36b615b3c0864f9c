//! System Identification (SID) peripheral.
//!
//! The SID block reports the part number, revision and configuration number
//! of the system. The configuration number selects the core partition.

use core::ptr::NonNull;

use arrayvec::ArrayString;
use tock_registers::interfaces::Readable;
use tock_registers::registers::ReadOnly;
use tock_registers::{register_bitfields, register_structs};

use crate::hal::SystemIdentity;
use crate::{ClockError, ClockResult};

pub const SYSTEM_NAME_MAX_LEN: usize = 16;

register_bitfields! [
    u32,
    SYSTEM_ID [
        PART_NUMBER OFFSET(0) NUMBITS(12) [],
        DESIGNER_ID OFFSET(12) NUMBITS(8) [],
        MINOR_REVISION OFFSET(20) NUMBITS(4) [],
        MAJOR_REVISION OFFSET(24) NUMBITS(4) []
    ],
    NODE_ID [
        NODE_NUMBER OFFSET(0) NUMBITS(8) [],
        MULTI_CHIP_MODE OFFSET(8) NUMBITS(1) []
    ],
    SYSTEM_CFG [
        CONFIG_NUMBER OFFSET(0) NUMBITS(8) []
    ]
];

register_structs! {
    pub SidRegisters {
        (0x000 => _reserved0),
        (0x040 => system_id: ReadOnly<u32, SYSTEM_ID::Register>),
        (0x044 => _reserved1),
        (0x050 => soc_id: ReadOnly<u32>),
        (0x054 => _reserved2),
        (0x060 => node_id: ReadOnly<u32, NODE_ID::Register>),
        (0x064 => _reserved3),
        (0x070 => system_cfg: ReadOnly<u32, SYSTEM_CFG::Register>),
        (0x074 => _reserved4),
        (0x1000 => @END),
    }
}

/// A subsystem the firmware was built for, matched by part number.
#[derive(Clone, Copy, Debug)]
pub struct Subsystem {
    pub part_number: u32,
    pub name: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemInfo {
    pub system_major_revision: u32,
    pub system_minor_revision: u32,
    pub system_part_number: u32,
    pub node_number: u32,
    pub config_number: u32,
    pub multi_chip_mode: bool,
    pub name: ArrayString<SYSTEM_NAME_MAX_LEN>,
}

pub struct Sid {
    base: NonNull<SidRegisters>,
    subsystems: &'static [Subsystem],
}

unsafe impl Send for Sid {}
unsafe impl Sync for Sid {}

impl Sid {
    /// # Safety
    ///
    /// `base` must be the address of a mapped SID register block.
    pub const unsafe fn new(base: usize, subsystems: &'static [Subsystem]) -> Self {
        Self {
            base: NonNull::new_unchecked(base as *mut SidRegisters),
            subsystems,
        }
    }

    const fn regs(&self) -> &SidRegisters {
        unsafe { self.base.as_ref() }
    }

    pub fn soc_id(&self) -> u32 {
        self.regs().soc_id.get()
    }
}

impl SystemIdentity for Sid {
    fn system_info(&self) -> ClockResult<SystemInfo> {
        let regs = self.regs();
        let part_number = regs.system_id.read(SYSTEM_ID::PART_NUMBER);

        let subsystem = match self
            .subsystems
            .iter()
            .find(|s| s.part_number == part_number)
        {
            Some(subsystem) => subsystem,
            None => {
                error!("SID: unknown system part number {:#x}", part_number);
                return Err(ClockError::IdentityQueryFailed);
            }
        };
        let name =
            ArrayString::from(subsystem.name).map_err(|_| ClockError::IdentityQueryFailed)?;

        let info = SystemInfo {
            system_major_revision: regs.system_id.read(SYSTEM_ID::MAJOR_REVISION),
            system_minor_revision: regs.system_id.read(SYSTEM_ID::MINOR_REVISION),
            system_part_number: part_number,
            node_number: regs.node_id.read(NODE_ID::NODE_NUMBER),
            config_number: regs.system_cfg.read(SYSTEM_CFG::CONFIG_NUMBER),
            multi_chip_mode: regs.node_id.is_set(NODE_ID::MULTI_CHIP_MODE),
            name,
        };
        debug!(
            "SID: {} r{}p{} config {}",
            info.name, info.system_major_revision, info.system_minor_revision, info.config_number
        );
        Ok(info)
    }
}
