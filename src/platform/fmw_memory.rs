//! Firmware memory layout handed to the link step.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryMode {
    /// Code and data share one region.
    SingleRegion,
    /// Code in MEM0, data loaded into MEM0 and relocated to MEM1 at boot.
    DualRegionRelocation,
    /// Code in MEM0, data placed directly in MEM1.
    DualRegionNoRelocation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemRegion {
    pub base: usize,
    pub size: usize,
}

impl MemRegion {
    pub const fn end(&self) -> usize {
        self.base + self.size
    }

    pub const fn overlaps(&self, other: &MemRegion) -> bool {
        self.base < other.end() && other.base < self.end()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FirmwareMemoryLayout {
    pub mode: MemoryMode,
    /// Instruction memory.
    pub mem0: MemRegion,
    /// Data memory. Unused in single region mode.
    pub mem1: MemRegion,
}

impl FirmwareMemoryLayout {
    pub const fn is_valid(&self) -> bool {
        match self.mode {
            MemoryMode::SingleRegion => self.mem0.size != 0,
            MemoryMode::DualRegionRelocation | MemoryMode::DualRegionNoRelocation => {
                self.mem0.size != 0 && self.mem1.size != 0 && !self.mem0.overlaps(&self.mem1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_region_must_not_overlap() {
        let mut layout = FirmwareMemoryLayout {
            mode: MemoryMode::DualRegionRelocation,
            mem0: MemRegion { base: 0x0, size: 0x4_0000 },
            mem1: MemRegion { base: 0x2000_0000, size: 0x4_0000 },
        };
        assert!(layout.is_valid());

        layout.mem1.base = 0x2_0000;
        assert!(!layout.is_valid());

        layout.mode = MemoryMode::SingleRegion;
        assert!(layout.is_valid());
    }
}
