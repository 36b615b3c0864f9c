use core::marker::PhantomData;
use core::slice::{Iter, IterMut};

use arrayvec::ArrayVec;
use spin::Once;

use crate::hal::SystemIdentity;
use crate::node::{ClockKind, ClockNode, RegisterBindings};
use crate::platform::{PikPlatform, Sgm776Platform};
use crate::rate::{check_rate_table, ClockSource, DividerReg};
use crate::resolver::resolve;
use crate::{ClockError, ClockResult};

/// Maximum number of clock nodes in one topology.
pub const MAX_CLOCK_NODES: usize = 16;

/// Ordered clock nodes of one platform, as handed to the module framework.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementTable {
    nodes: ArrayVec<ClockNode, MAX_CLOCK_NODES>,
}

impl ElementTable {
    pub const fn new() -> Self {
        Self {
            nodes: ArrayVec::new_const(),
        }
    }

    pub fn from_nodes(nodes: &[ClockNode]) -> ClockResult<Self> {
        let mut table = Self::new();
        for node in nodes {
            table.push(*node)?;
        }
        Ok(table)
    }

    pub fn push(&mut self, node: ClockNode) -> ClockResult {
        self.nodes
            .try_push(node)
            .map_err(|_| ClockError::TableFull)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn as_slice(&self) -> &[ClockNode] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<&ClockNode> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> Iter<'_, ClockNode> {
        self.nodes.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, ClockNode> {
        self.nodes.iter_mut()
    }

    /// Element index of the node called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.name == name)
    }

    pub fn find(&self, name: &str) -> Option<&ClockNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn cluster_cores(&self) -> impl Iterator<Item = &ClockNode> {
        self.nodes.iter().filter(|node| node.core_ordinal().is_some())
    }

    /// Nodes to program during early bring-up.
    pub fn early_nodes(&self) -> impl Iterator<Item = &ClockNode> {
        self.nodes.iter().filter(|node| !node.defer_initialization)
    }

    /// Checks a bound table: unique names, bound and well formed rate tables,
    /// initial rates present in their tables.
    pub fn validate<F>(&self, reference_rate: F) -> ClockResult
    where
        F: Fn(ClockSource) -> Option<u64>,
    {
        for (index, node) in self.nodes.iter().enumerate() {
            if node.name.is_empty() || self.nodes[..index].iter().any(|n| n.name == node.name) {
                error!("pik_clock: duplicate clock name {:?}", node.name);
                return Err(ClockError::DuplicateName);
            }
            check_node(node, &reference_rate).map_err(|err| {
                error!("pik_clock: {} is invalid: {:?}", node.name, err);
                err
            })?;
        }
        Ok(())
    }
}

fn check_node<F>(node: &ClockNode, reference_rate: &F) -> ClockResult
where
    F: Fn(ClockSource) -> Option<u64>,
{
    let table = match (node.kind(), node.rate_table) {
        (_, Some(table)) => table,
        (ClockKind::Cluster, None) => return Err(ClockError::UnboundCluster),
        (ClockKind::MultiSource, None) => return Err(ClockError::MalformedRateTable),
    };
    let has_divext = match node.bindings {
        RegisterBindings::MultiSource { divext, .. } => divext.is_some(),
        RegisterBindings::Cluster { .. } => true,
    };
    for entry in table {
        let source_fits = match node.kind() {
            ClockKind::Cluster => {
                entry.source.is_cluster_source() && entry.divider_reg == DividerReg::DivExt
            }
            ClockKind::MultiSource => entry.source.is_multi_source(),
        };
        if !source_fits || (entry.divider_reg == DividerReg::DivExt && !has_divext) {
            return Err(ClockError::MalformedRateTable);
        }
    }
    check_rate_table(table, reference_rate)?;
    node.initial_rate().map(|_| ())
}

fn build_element_table<P: PikPlatform, I: SystemIdentity>(identity: &I) -> ClockResult<ElementTable> {
    let template = P::element_template()?;
    let config_number = identity.config_number().map_err(|err| {
        error!("pik_clock: system identity unavailable: {:?}", err);
        ClockError::IdentityQueryFailed
    })?;
    let table = resolve(&template, &P::cluster_rate_tables(), config_number)?;
    table.validate(P::reference_rate)?;
    info!("pik_clock: {} clock elements", table.len());
    Ok(table)
}

/// Module configuration of the PIK clock driver.
///
/// The element table is resolved on the first request only; the identity is
/// not queried again and later requests see the same table or the same
/// failure.
pub struct PikClockConfig<'a, P: PikPlatform, I: SystemIdentity> {
    identity: &'a I,
    table: Once<ClockResult<ElementTable>>,
    marker: PhantomData<P>,
}

impl<'a, P: PikPlatform, I: SystemIdentity> PikClockConfig<'a, P, I> {
    pub const fn new(identity: &'a I) -> Self {
        Self {
            identity,
            table: Once::new(),
            marker: PhantomData,
        }
    }

    pub fn get_element_table(&self) -> ClockResult<&ElementTable> {
        self.table
            .call_once(|| build_element_table::<P, I>(self.identity))
            .as_ref()
            .map_err(|err| *err)
    }

    pub fn is_resolved(&self) -> bool {
        self.table.is_completed()
    }
}

static PIK_CLOCK_ELEMENT_TABLE: Once<ClockResult<ElementTable>> = Once::new();

/// Element table of the SGM-776 for the module framework.
pub fn pik_clock_get_element_table<I: SystemIdentity>(
    identity: &I,
) -> ClockResult<&'static ElementTable> {
    PIK_CLOCK_ELEMENT_TABLE
        .call_once(|| build_element_table::<Sgm776Platform, I>(identity))
        .as_ref()
        .map_err(|err| *err)
}
