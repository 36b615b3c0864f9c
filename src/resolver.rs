//! Binds per-core rate tables according to the detected chip variant.
//!
//! One topology is shared by every variant of the chip. Variants differ in
//! how many of the eight cluster cores are little and how many are big, so
//! the cluster core rate tables can only be bound once the configuration
//! number is known.

use crate::rate::ClockRate;
use crate::topology::ElementTable;
use crate::{ClockError, ClockResult};

/// Split of a cluster into little and big cores. Little cores come first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorePartition {
    pub little: u8,
    pub big: u8,
}

impl CorePartition {
    pub const fn cores(&self) -> u8 {
        self.little + self.big
    }

    pub const fn is_little(&self, ordinal: u8) -> bool {
        ordinal < self.little
    }
}

const PARTITION_6_LITTLE_2_BIG: CorePartition = CorePartition { little: 6, big: 2 };
const PARTITION_4_LITTLE_4_BIG: CorePartition = CorePartition { little: 4, big: 4 };

/// Rate tables for the two core types of a cluster.
#[derive(Clone, Copy, Debug)]
pub struct ClusterRateTables {
    pub little: &'static [ClockRate],
    pub big: &'static [ClockRate],
}

/// Maps a configuration number to its core partition.
pub const fn partition_for(config_number: u32) -> ClockResult<CorePartition> {
    match config_number {
        1 | 5 | 7 | 8 => Ok(PARTITION_6_LITTLE_2_BIG),
        2 | 3 | 4 | 6 => Ok(PARTITION_4_LITTLE_4_BIG),
        _ => Err(ClockError::UnsupportedVariant(config_number)),
    }
}

/// Produces the bound table for `config_number` from the unresolved `template`.
///
/// Only cluster core nodes are touched. The template itself is never
/// modified, so a failed resolution leaves nothing half bound.
pub fn resolve(
    template: &ElementTable,
    tables: &ClusterRateTables,
    config_number: u32,
) -> ClockResult<ElementTable> {
    let partition = partition_for(config_number).map_err(|err| {
        error!("pik_clock: unsupported system configuration {}", config_number);
        err
    })?;
    info!(
        "pik_clock: configuration {}, {} little + {} big cores",
        config_number, partition.little, partition.big
    );

    let mut table = template.clone();
    for node in table.iter_mut() {
        let ordinal = match node.core_ordinal() {
            Some(ordinal) => ordinal,
            None => continue,
        };
        if ordinal >= partition.cores() {
            error!(
                "pik_clock: {} is core {}, partition has {} cores",
                node.name,
                ordinal,
                partition.cores()
            );
            return Err(ClockError::CoreOutsidePartition);
        }
        let rates = if partition.is_little(ordinal) {
            tables.little
        } else {
            tables.big
        };
        node.bind_rate_table(rates);
        debug!("pik_clock: {} bound to {} rate(s)", node.name, rates.len());
    }
    Ok(table)
}
