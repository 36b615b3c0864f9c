use crate::rate::ClockRate;
use crate::{ClockError, ClockResult};

/// Address of a memory-mapped clock register.
pub type RegisterAddr = usize;

/// How a node derives its frequency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockKind {
    /// Selectable source followed by a system divider, optionally an external one.
    MultiSource,
    /// Cluster PLL output followed by an external divider and a modulator.
    Cluster,
}

/// What a node clocks. The resolver selects cluster cores by role, never by
/// position in the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockRole {
    SystemBus,
    ClusterCore { cluster: u8, core: u8 },
    Gpu,
}

/// Registers a node is programmed through. The variant fixes which
/// registers must be present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterBindings {
    MultiSource {
        control: RegisterAddr,
        divsys: RegisterAddr,
        divext: Option<RegisterAddr>,
    },
    Cluster {
        control: RegisterAddr,
        divext: RegisterAddr,
        modulator: RegisterAddr,
    },
}

impl RegisterBindings {
    pub const fn kind(&self) -> ClockKind {
        match self {
            RegisterBindings::MultiSource { .. } => ClockKind::MultiSource,
            RegisterBindings::Cluster { .. } => ClockKind::Cluster,
        }
    }

    pub const fn control(&self) -> RegisterAddr {
        match *self {
            RegisterBindings::MultiSource { control, .. }
            | RegisterBindings::Cluster { control, .. } => control,
        }
    }
}

/// One element of the clock topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockNode {
    pub name: &'static str,
    pub role: ClockRole,
    pub bindings: RegisterBindings,
    /// Unbound for cluster cores until the variant resolver runs.
    pub rate_table: Option<&'static [ClockRate]>,
    /// Explicit initial rate. When `None` the first entry of the bound table is used.
    pub initial_rate: Option<u64>,
    /// Left alone during early bring-up; programmed on explicit request only.
    pub defer_initialization: bool,
    pub is_group_member: bool,
}

impl ClockNode {
    /// Declares a multi-source node.
    pub const fn multi_source(
        name: &'static str,
        role: ClockRole,
        control: RegisterAddr,
        divsys: RegisterAddr,
        divext: Option<RegisterAddr>,
        rate_table: &'static [ClockRate],
        initial_rate: u64,
    ) -> Self {
        Self {
            name,
            role,
            bindings: RegisterBindings::MultiSource {
                control,
                divsys,
                divext,
            },
            rate_table: Some(rate_table),
            initial_rate: Some(initial_rate),
            defer_initialization: false,
            is_group_member: false,
        }
    }

    /// Declares a cluster core node. Its rate table is bound later by the
    /// variant resolver, since the core type depends on the chip variant.
    pub const fn cluster_core(
        name: &'static str,
        cluster: u8,
        core: u8,
        control: RegisterAddr,
        divext: RegisterAddr,
        modulator: RegisterAddr,
    ) -> Self {
        Self {
            name,
            role: ClockRole::ClusterCore { cluster, core },
            bindings: RegisterBindings::Cluster {
                control,
                divext,
                modulator,
            },
            rate_table: None,
            initial_rate: None,
            defer_initialization: false,
            is_group_member: true,
        }
    }

    pub const fn deferred(mut self) -> Self {
        self.defer_initialization = true;
        self
    }

    pub const fn group_member(mut self, is_group_member: bool) -> Self {
        self.is_group_member = is_group_member;
        self
    }

    pub const fn kind(&self) -> ClockKind {
        self.bindings.kind()
    }

    /// Core ordinal within its cluster, for cluster core nodes.
    pub const fn core_ordinal(&self) -> Option<u8> {
        match self.role {
            ClockRole::ClusterCore { core, .. } => Some(core),
            _ => None,
        }
    }

    /// Replaces the rate table binding as a whole. The slice carries its own
    /// length, so reference and count can never disagree.
    pub(crate) fn bind_rate_table(&mut self, table: &'static [ClockRate]) {
        self.rate_table = Some(table);
    }

    /// Finds the table entry for `rate`.
    pub fn rate_entry(&self, rate: u64) -> ClockResult<&'static ClockRate> {
        self.rate_table
            .ok_or(ClockError::UnboundCluster)?
            .iter()
            .find(|entry| entry.rate == rate)
            .ok_or(ClockError::RateNotFound)
    }

    /// Rate to program at initialization.
    pub fn initial_rate(&self) -> ClockResult<u64> {
        match self.initial_rate {
            Some(rate) => self.rate_entry(rate).map(|entry| entry.rate),
            None => self
                .rate_table
                .ok_or(ClockError::UnboundCluster)?
                .first()
                .map(|entry| entry.rate)
                .ok_or(ClockError::MalformedRateTable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::{ClockSource, DividerReg, MHZ};

    static BUS_RATES: [ClockRate; 2] = [
        ClockRate::new(600 * MHZ, ClockSource::SysPllClk, DividerReg::DivSys, 6),
        ClockRate::new(400 * MHZ, ClockSource::SysPllClk, DividerReg::DivSys, 9),
    ];

    static CORE_RATES: [ClockRate; 1] =
        [ClockRate::new(2200 * MHZ, ClockSource::Pll0, DividerReg::DivExt, 1)];

    #[test]
    fn constructors_fix_kind() {
        let bus = ClockNode::multi_source(
            "BUS",
            ClockRole::SystemBus,
            0x1000,
            0x1004,
            None,
            &BUS_RATES,
            600 * MHZ,
        );
        assert_eq!(bus.kind(), ClockKind::MultiSource);
        assert_eq!(bus.bindings.control(), 0x1000);
        assert!(!bus.is_group_member);
        assert_eq!(bus.core_ordinal(), None);

        let core = ClockNode::cluster_core("CPU3", 0, 3, 0x2000, 0x2004, 0x2008).deferred();
        assert_eq!(core.kind(), ClockKind::Cluster);
        assert_eq!(core.core_ordinal(), Some(3));
        assert!(core.defer_initialization);
        assert!(core.is_group_member);
    }

    #[test]
    fn initial_rate_lookup() {
        let bus = ClockNode::multi_source(
            "BUS",
            ClockRole::SystemBus,
            0x1000,
            0x1004,
            None,
            &BUS_RATES,
            400 * MHZ,
        );
        assert_eq!(bus.initial_rate(), Ok(400 * MHZ));
        assert_eq!(bus.rate_entry(400 * MHZ).map(|e| e.divider), Ok(9));
        assert_eq!(bus.rate_entry(500 * MHZ), Err(ClockError::RateNotFound));

        let mut missing = bus;
        missing.initial_rate = Some(123);
        assert_eq!(missing.initial_rate(), Err(ClockError::RateNotFound));
    }

    #[test]
    fn cluster_core_binding() {
        let mut core = ClockNode::cluster_core("CPU0", 0, 0, 0x2000, 0x2004, 0x2008);
        assert_eq!(core.initial_rate(), Err(ClockError::UnboundCluster));

        core.bind_rate_table(&CORE_RATES);
        assert_eq!(core.initial_rate(), Ok(2200 * MHZ));
        assert_eq!(core.rate_table.map(|t| t.len()), Some(1));
    }
}
