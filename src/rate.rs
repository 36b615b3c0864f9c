use crate::{ClockError, ClockResult};

pub const MHZ: u64 = 1_000_000;

/// Largest value a PIK divider field can hold.
pub const DIVIDER_MAX: u32 = 32;

/// Clock source selector, as written to the source field of a clock control register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockSource {
    Gated,
    SysRefClk,
    SysPllClk,
    PrivPllClk,
    /// Cluster PLL 0 (little cores).
    Pll0,
    /// Cluster PLL 1 (big cores).
    Pll1,
}

impl ClockSource {
    /// Raw selector value for the control register.
    pub const fn selector(self) -> u32 {
        match self {
            ClockSource::Gated => 0,
            ClockSource::SysRefClk => 1,
            ClockSource::SysPllClk | ClockSource::Pll0 => 2,
            ClockSource::PrivPllClk | ClockSource::Pll1 => 4,
        }
    }

    /// Whether the source can drive a cluster core clock.
    pub const fn is_cluster_source(self) -> bool {
        matches!(
            self,
            ClockSource::Gated | ClockSource::SysRefClk | ClockSource::Pll0 | ClockSource::Pll1
        )
    }

    /// Whether the source can drive a multi-source clock.
    pub const fn is_multi_source(self) -> bool {
        matches!(
            self,
            ClockSource::Gated
                | ClockSource::SysRefClk
                | ClockSource::SysPllClk
                | ClockSource::PrivPllClk
        )
    }
}

/// Divider field the precomputed divider is written to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DividerReg {
    DivSys,
    DivExt,
}

/// One operating point of a clock node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockRate {
    pub rate: u64,
    pub source: ClockSource,
    pub divider_reg: DividerReg,
    pub divider: u32,
}

impl ClockRate {
    pub const fn new(rate: u64, source: ClockSource, divider_reg: DividerReg, divider: u32) -> Self {
        Self {
            rate,
            source,
            divider_reg,
            divider,
        }
    }

    /// Builds the entry for `rate` derived from a `reference` clock, with the
    /// divider computed as `reference / rate`.
    ///
    /// Fractional dividers are left truncated here and rejected by
    /// [`ClockRate::check`].
    pub const fn derived(
        rate: u64,
        reference: u64,
        source: ClockSource,
        divider_reg: DividerReg,
    ) -> Self {
        Self::new(rate, source, divider_reg, (reference / rate) as u32)
    }

    /// Checks the entry against the nominal rate of its source.
    pub fn check(&self, reference: u64) -> ClockResult {
        if self.rate == 0 || self.divider == 0 || self.divider > DIVIDER_MAX {
            return Err(ClockError::MalformedRateTable);
        }
        match self.rate.checked_mul(self.divider as u64) {
            Some(product) if product == reference => Ok(()),
            _ => {
                warn!(
                    "rate {} Hz with divider {} does not match reference {} Hz",
                    self.rate, self.divider, reference
                );
                Err(ClockError::MalformedRateTable)
            }
        }
    }
}

/// Checks every entry of a rate table. `reference_rate` maps each source to
/// its nominal rate; sources without one are rejected.
pub fn check_rate_table<F>(table: &[ClockRate], reference_rate: F) -> ClockResult
where
    F: Fn(ClockSource) -> Option<u64>,
{
    if table.is_empty() {
        return Err(ClockError::MalformedRateTable);
    }
    for entry in table {
        let reference = reference_rate(entry.source).ok_or(ClockError::MalformedRateTable)?;
        entry.check(reference)?;
    }
    Ok(())
}
