use memoffset::offset_of;

use super::fmw_memory::{FirmwareMemoryLayout, MemRegion, MemoryMode};
use super::platform_common::{coreclk_regs, PikGpuRegisters, PikPlatform, PikSystemRegisters};
use crate::node::{ClockNode, ClockRole};
use crate::rate::{ClockRate, ClockSource, DividerReg, MHZ};
use crate::resolver::ClusterRateTables;
use crate::sid::Subsystem;
use crate::topology::ElementTable;
use crate::ClockResult;

pub const CLOCK_RATE_REFCLK: u64 = 100 * MHZ;
pub const CLOCK_RATE_SYSPLLCLK: u64 = 3600 * MHZ;
pub const CLOCK_RATE_PRIVPLLCLK: u64 = 800 * MHZ;
pub const CLOCK_RATE_CLUSPLL0: u64 = 2200 * MHZ;
pub const CLOCK_RATE_CLUSPLL1: u64 = 2700 * MHZ;

const fn sys_rate(rate: u64) -> ClockRate {
    ClockRate::derived(
        rate,
        CLOCK_RATE_SYSPLLCLK,
        ClockSource::SysPllClk,
        DividerReg::DivSys,
    )
}

static RATE_TABLE_SYS_NOCMEMCLK: [ClockRate; 1] = [sys_rate(720 * MHZ)];
static RATE_TABLE_SYS_FCMCLK: [ClockRate; 1] = [sys_rate(1800 * MHZ)];
static RATE_TABLE_SYS_GICCLK: [ClockRate; 1] = [sys_rate(600 * MHZ)];
static RATE_TABLE_SYS_PCLKSCP: [ClockRate; 1] = [sys_rate(225 * MHZ)];
static RATE_TABLE_SYS_SYSPERCLK: [ClockRate; 1] = [sys_rate(225 * MHZ)];

// Core and GPU rates are adjusted through their PLLs, the divider stays at 1.
static RATE_TABLE_CPU_A55: [ClockRate; 1] = [ClockRate::new(
    2200 * MHZ,
    ClockSource::Pll0,
    DividerReg::DivExt,
    1,
)];
static RATE_TABLE_CPU_A75: [ClockRate; 1] = [ClockRate::new(
    2700 * MHZ,
    ClockSource::Pll1,
    DividerReg::DivExt,
    1,
)];
static RATE_TABLE_GPU: [ClockRate; 1] = [ClockRate::new(
    800 * MHZ,
    ClockSource::PrivPllClk,
    DividerReg::DivExt,
    1,
)];

pub struct Sgm776Platform;

impl Sgm776Platform {
    fn system_reg(offset: usize) -> usize {
        Self::PIK_SYSTEM_BASE + offset
    }

    fn gpu_reg(offset: usize) -> usize {
        Self::PIK_GPU_BASE + offset
    }

    fn system_clock(
        name: &'static str,
        control: usize,
        divsys: usize,
        rate_table: &'static [ClockRate],
        initial_rate: u64,
    ) -> ClockNode {
        ClockNode::multi_source(
            name,
            ClockRole::SystemBus,
            Self::system_reg(control),
            Self::system_reg(divsys),
            None,
            rate_table,
            initial_rate,
        )
        .deferred()
    }

    fn cluster0_core(name: &'static str, core: u8) -> ClockNode {
        let (control, divext, modulator) = coreclk_regs(Self::PIK_CLUS0_BASE, core as usize);
        ClockNode::cluster_core(name, 0, core, control, divext, modulator).deferred()
    }
}

impl PikPlatform for Sgm776Platform {
    const PIK_SYSTEM_BASE: usize = 0x5004_0000;
    const PIK_CLUS0_BASE: usize = 0x6001_0000;
    const PIK_GPU_BASE: usize = 0x5006_0000;
    const SID_BASE: usize = 0x2A4A_0000;

    const FIRMWARE_MEMORY: FirmwareMemoryLayout = FirmwareMemoryLayout {
        mode: MemoryMode::DualRegionRelocation,
        mem0: MemRegion {
            base: 0x0080_0000,
            size: 256 * 1024,
        },
        mem1: MemRegion {
            base: 0x2000_0000,
            size: 256 * 1024,
        },
    };

    const SUBSYSTEMS: &'static [Subsystem] = &[Subsystem {
        part_number: 0x790,
        name: "SGM-776",
    }];

    fn reference_rate(source: ClockSource) -> Option<u64> {
        match source {
            ClockSource::Gated => None,
            ClockSource::SysRefClk => Some(CLOCK_RATE_REFCLK),
            ClockSource::SysPllClk => Some(CLOCK_RATE_SYSPLLCLK),
            ClockSource::PrivPllClk => Some(CLOCK_RATE_PRIVPLLCLK),
            ClockSource::Pll0 => Some(CLOCK_RATE_CLUSPLL0),
            ClockSource::Pll1 => Some(CLOCK_RATE_CLUSPLL1),
        }
    }

    fn cluster_rate_tables() -> ClusterRateTables {
        ClusterRateTables {
            little: &RATE_TABLE_CPU_A55,
            big: &RATE_TABLE_CPU_A75,
        }
    }

    fn element_template() -> ClockResult<ElementTable> {
        ElementTable::from_nodes(&[
            // System clocks
            Self::system_clock(
                "SYS_NOCMEMCLK",
                offset_of!(PikSystemRegisters, nocmemclk_ctrl),
                offset_of!(PikSystemRegisters, nocmemclk_div1),
                &RATE_TABLE_SYS_NOCMEMCLK,
                720 * MHZ,
            ),
            Self::system_clock(
                "SYS_FCMCLK",
                offset_of!(PikSystemRegisters, fcmclk_ctrl),
                offset_of!(PikSystemRegisters, fcmclk_div1),
                &RATE_TABLE_SYS_FCMCLK,
                1800 * MHZ,
            ),
            Self::system_clock(
                "SYS_GICCLK",
                offset_of!(PikSystemRegisters, gicclk_ctrl),
                offset_of!(PikSystemRegisters, gicclk_div1),
                &RATE_TABLE_SYS_GICCLK,
                600 * MHZ,
            ),
            Self::system_clock(
                "SYS_PCLKSCP",
                offset_of!(PikSystemRegisters, pclkscp_ctrl),
                offset_of!(PikSystemRegisters, pclkscp_div1),
                &RATE_TABLE_SYS_PCLKSCP,
                225 * MHZ,
            ),
            Self::system_clock(
                "SYS_SYSPERCLK",
                offset_of!(PikSystemRegisters, sysperclk_ctrl),
                offset_of!(PikSystemRegisters, sysperclk_div1),
                &RATE_TABLE_SYS_SYSPERCLK,
                225 * MHZ,
            ),
            // Cluster 0 CPUs
            Self::cluster0_core("CLUS0_CPU0", 0),
            Self::cluster0_core("CLUS0_CPU1", 1),
            Self::cluster0_core("CLUS0_CPU2", 2),
            Self::cluster0_core("CLUS0_CPU3", 3),
            Self::cluster0_core("CLUS0_CPU4", 4),
            Self::cluster0_core("CLUS0_CPU5", 5),
            Self::cluster0_core("CLUS0_CPU6", 6),
            Self::cluster0_core("CLUS0_CPU7", 7),
            // GPU
            ClockNode::multi_source(
                "GPU",
                ClockRole::Gpu,
                Self::gpu_reg(offset_of!(PikGpuRegisters, gpuclk_ctrl)),
                Self::gpu_reg(offset_of!(PikGpuRegisters, gpuclk_div1)),
                Some(Self::gpu_reg(offset_of!(PikGpuRegisters, gpuclk_div2))),
                &RATE_TABLE_GPU,
                800 * MHZ,
            )
            .group_member(true)
            .deferred(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{ClockKind, RegisterBindings};
    use crate::rate::check_rate_table;

    #[test]
    fn rate_tables_match_references() {
        for table in [
            &RATE_TABLE_SYS_NOCMEMCLK[..],
            &RATE_TABLE_SYS_FCMCLK[..],
            &RATE_TABLE_SYS_GICCLK[..],
            &RATE_TABLE_SYS_PCLKSCP[..],
            &RATE_TABLE_SYS_SYSPERCLK[..],
            &RATE_TABLE_CPU_A55[..],
            &RATE_TABLE_CPU_A75[..],
            &RATE_TABLE_GPU[..],
        ] {
            assert_eq!(check_rate_table(table, Sgm776Platform::reference_rate), Ok(()));
            for entry in table {
                let reference = Sgm776Platform::reference_rate(entry.source).unwrap();
                assert_eq!(reference % entry.rate, 0);
                assert_eq!(entry.rate * entry.divider as u64, reference);
            }
        }
        assert_eq!(RATE_TABLE_SYS_NOCMEMCLK[0].divider, 5);
        assert_eq!(RATE_TABLE_SYS_PCLKSCP[0].divider, 16);
    }

    #[test]
    fn template_shape() {
        let template = Sgm776Platform::element_template().unwrap();
        assert_eq!(template.len(), 14);
        assert_eq!(template.cluster_cores().count(), 8);
        assert!(template.iter().all(|node| node.defer_initialization));
        assert!(template
            .cluster_cores()
            .all(|node| node.rate_table.is_none() && node.is_group_member));

        let nocmem = template.find("SYS_NOCMEMCLK").unwrap();
        assert_eq!(nocmem.kind(), ClockKind::MultiSource);
        assert!(!nocmem.is_group_member);
        assert_eq!(
            nocmem.bindings,
            RegisterBindings::MultiSource {
                control: 0x5004_0800,
                divsys: 0x5004_0804,
                divext: None,
            }
        );

        let cpu5 = template.find("CLUS0_CPU5").unwrap();
        assert_eq!(
            cpu5.bindings,
            RegisterBindings::Cluster {
                control: 0x6001_0850,
                divext: 0x6001_0854,
                modulator: 0x6001_0858,
            }
        );

        let gpu = template.find("GPU").unwrap();
        assert!(gpu.is_group_member);
        assert_eq!(gpu.role, ClockRole::Gpu);
        assert!(matches!(
            gpu.bindings,
            RegisterBindings::MultiSource {
                divext: Some(0x5006_0828),
                ..
            }
        ));
    }

    #[test]
    fn firmware_memory() {
        assert!(Sgm776Platform::FIRMWARE_MEMORY.is_valid());
        assert_eq!(
            Sgm776Platform::FIRMWARE_MEMORY.mode,
            MemoryMode::DualRegionRelocation
        );
    }
}
