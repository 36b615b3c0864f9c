use core::mem::size_of;

use memoffset::offset_of;
use tock_registers::register_structs;
use tock_registers::registers::ReadWrite;

use super::fmw_memory::FirmwareMemoryLayout;
use crate::node::RegisterAddr;
use crate::rate::ClockSource;
use crate::resolver::ClusterRateTables;
use crate::sid::{Sid, Subsystem};
use crate::topology::ElementTable;
use crate::ClockResult;

pub const PIK_CLUSTER_CORE_NUM_MAX: usize = 8;

register_structs! {
    /// PIK registers of the system clock domain.
    pub PikSystemRegisters {
        (0x000 => _reserved0),
        (0x800 => pub nocmemclk_ctrl: ReadWrite<u32>),
        (0x804 => pub nocmemclk_div1: ReadWrite<u32>),
        (0x808 => _reserved1),
        (0x810 => pub fcmclk_ctrl: ReadWrite<u32>),
        (0x814 => pub fcmclk_div1: ReadWrite<u32>),
        (0x818 => _reserved2),
        (0x820 => pub gicclk_ctrl: ReadWrite<u32>),
        (0x824 => pub gicclk_div1: ReadWrite<u32>),
        (0x828 => _reserved3),
        (0x830 => pub pclkscp_ctrl: ReadWrite<u32>),
        (0x834 => pub pclkscp_div1: ReadWrite<u32>),
        (0x838 => _reserved4),
        (0x840 => pub sysperclk_ctrl: ReadWrite<u32>),
        (0x844 => pub sysperclk_div1: ReadWrite<u32>),
        (0x848 => _reserved5),
        (0x1000 => @END),
    },

    /// Clock control of a single cluster core.
    pub CoreClkRegisters {
        (0x000 => pub ctrl: ReadWrite<u32>),
        (0x004 => pub div: ReadWrite<u32>),
        (0x008 => pub modulator: ReadWrite<u32>),
        (0x00C => _reserved0),
        (0x010 => @END),
    },

    /// PIK registers of a CPU cluster.
    pub PikClusterRegisters {
        (0x000 => _reserved0),
        (0x800 => pub coreclk: [CoreClkRegisters; PIK_CLUSTER_CORE_NUM_MAX]),
        (0x880 => _reserved1),
        (0x1000 => @END),
    },

    /// PIK registers of the GPU.
    pub PikGpuRegisters {
        (0x000 => _reserved0),
        (0x820 => pub gpuclk_ctrl: ReadWrite<u32>),
        (0x824 => pub gpuclk_div1: ReadWrite<u32>),
        (0x828 => pub gpuclk_div2: ReadWrite<u32>),
        (0x82C => _reserved1),
        (0x1000 => @END),
    }
}

/// Control, external divider and modulator registers of cluster core `core`.
pub fn coreclk_regs(cluster_base: usize, core: usize) -> (RegisterAddr, RegisterAddr, RegisterAddr) {
    let coreclk = cluster_base
        + offset_of!(PikClusterRegisters, coreclk)
        + core * size_of::<CoreClkRegisters>();
    (
        coreclk + offset_of!(CoreClkRegisters, ctrl),
        coreclk + offset_of!(CoreClkRegisters, div),
        coreclk + offset_of!(CoreClkRegisters, modulator),
    )
}

/// Platform description consumed by the clock topology builder.
pub trait PikPlatform {
    const PIK_SYSTEM_BASE: usize;
    const PIK_CLUS0_BASE: usize;
    const PIK_GPU_BASE: usize;
    const SID_BASE: usize;

    /// Build-time memory layout of the firmware image.
    const FIRMWARE_MEMORY: FirmwareMemoryLayout;

    /// Subsystems the SID peripheral may report on this platform.
    const SUBSYSTEMS: &'static [Subsystem];

    /// SID peripheral of the platform.
    ///
    /// # Safety
    ///
    /// The SID register block must be mapped at `SID_BASE`.
    unsafe fn sid() -> Sid {
        Sid::new(Self::SID_BASE, Self::SUBSYSTEMS)
    }

    /// Nominal output rate of a clock source, if the platform provides it.
    fn reference_rate(source: ClockSource) -> Option<u64>;

    /// Per-core rate tables for the little and big cores.
    fn cluster_rate_tables() -> ClusterRateTables;

    /// The unresolved topology. Cluster cores carry no rate table yet.
    fn element_template() -> ClockResult<ElementTable>;
}
