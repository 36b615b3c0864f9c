#![cfg_attr(not(test), no_std)]
#![allow(clippy::upper_case_acronyms, dead_code)]

//! Clock topology descriptors for the PIK clock driver.
//!
//! The topology is declared once per platform as an immutable template. On
//! first request the variant resolver queries the system identity, binds the
//! per-core rate tables matching the detected core partition and hands the
//! resulting element table to the module framework.

#[macro_use]
extern crate log;

mod hal;
mod node;
mod rate;
mod resolver;
mod sid;
mod topology;

pub mod platform;

pub type ClockResult<T = ()> = Result<T, ClockError>;

pub use hal::SystemIdentity;
pub use node::{ClockKind, ClockNode, ClockRole, RegisterAddr, RegisterBindings};
pub use rate::{check_rate_table, ClockRate, ClockSource, DividerReg, DIVIDER_MAX, MHZ};
pub use resolver::{partition_for, resolve, ClusterRateTables, CorePartition};
pub use sid::{Sid, Subsystem, SystemInfo, SYSTEM_NAME_MAX_LEN};
pub use topology::{pik_clock_get_element_table, ElementTable, PikClockConfig, MAX_CLOCK_NODES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// The system identity could not be read.
    IdentityQueryFailed,
    /// The configuration number does not map to a known core partition.
    UnsupportedVariant(u32),
    /// A rate entry whose divider does not reproduce its rate from the source.
    MalformedRateTable,
    DuplicateName,
    /// A cluster core left without a rate table after resolution.
    UnboundCluster,
    /// A cluster core ordinal beyond the partition's core count.
    CoreOutsidePartition,
    RateNotFound,
    TableFull,
}
