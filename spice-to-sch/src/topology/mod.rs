//! Topology Classifier
//!
//! Partitions a subcircuit's transistors into structural groups by analysing
//! which channel nodes they share. Three passes run over one pool, each
//! claiming the transistors it groups before the next pass sees them:
//!
//! 1. inverter pairs (PMOS to supply + NMOS to ground on a common node)
//! 2. parallel groups (same polarity, same source, same drain)
//! 3. series chains (same polarity, connected through source/drain nodes)
//!
//! Whatever is left is split into PMOS and NMOS leftovers.

pub mod inverter;
pub mod parallel;
pub mod pool;
pub mod series;

use serde::{Deserialize, Serialize};

use crate::config::SupplyNets;
use crate::parser::schema::{Polarity, Transistor, TransistorId};

pub use inverter::find_inverters;
pub use parallel::find_parallel;
pub use pool::TransistorPool;
pub use series::{external_nodes, find_series};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Inverter,
    Parallel,
    Series,
}

/// Transistors the classifier found to be structurally related.
///
/// Member order is significant for series chains (physical connection order).
/// For inverter pairs the PMOS/NMOS roles are looked up by polarity, never by
/// position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransistorGroup {
    pub kind: GroupKind,
    pub members: Vec<TransistorId>,
    /// Series chain whose ordering needed the no-direct-link fallback
    pub approximate: bool,
}

impl TransistorGroup {
    pub fn new(kind: GroupKind, members: Vec<TransistorId>) -> Self {
        Self {
            kind,
            members,
            approximate: false,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// First member of the given polarity
    pub fn find<'a>(&self, arena: &'a [Transistor], polarity: Polarity) -> Option<&'a Transistor> {
        self.members
            .iter()
            .map(|&id| &arena[id])
            .find(|t| t.polarity == polarity)
    }
}

/// Result of running all grouping passes over one subcircuit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub inverters: Vec<TransistorGroup>,
    pub parallel: Vec<TransistorGroup>,
    pub series: Vec<TransistorGroup>,
    pub leftover_pmos: Vec<TransistorId>,
    pub leftover_nmos: Vec<TransistorId>,
}

impl Classification {
    /// Every classified transistor id, in bucket order.
    pub fn all_ids(&self) -> Vec<TransistorId> {
        self.inverters
            .iter()
            .chain(&self.parallel)
            .chain(&self.series)
            .flat_map(|g| g.members.iter().copied())
            .chain(self.leftover_pmos.iter().copied())
            .chain(self.leftover_nmos.iter().copied())
            .collect()
    }

    pub fn group_count(&self) -> usize {
        self.inverters.len() + self.parallel.len() + self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group_count() == 0 && self.leftover_pmos.is_empty() && self.leftover_nmos.is_empty()
    }
}

/// Runs the grouping passes in their fixed order.
pub struct TopologyClassifier;

impl TopologyClassifier {
    /// Classify every transistor of `arena`.
    pub fn classify(arena: &[Transistor], nets: &SupplyNets) -> Classification {
        let mut pool = TransistorPool::new(arena);
        Self::classify_pool(&mut pool, nets)
    }

    /// Run the passes over whatever is still unclaimed in `pool` and report
    /// the rest as leftovers. Leftovers stay unclaimed, so running this again
    /// on the same pool finds no new groups and the same leftovers.
    pub fn classify_pool(pool: &mut TransistorPool<'_>, nets: &SupplyNets) -> Classification {
        let inverters = find_inverters(pool, nets);
        let parallel = find_parallel(pool);
        let series = find_series(pool);

        let mut leftover_pmos = Vec::new();
        let mut leftover_nmos = Vec::new();
        for id in pool.remaining() {
            if pool.get(id).is_pmos() {
                leftover_pmos.push(id);
            } else {
                leftover_nmos.push(id);
            }
        }

        tracing::debug!(
            "Classified: {} inverters, {} parallel, {} series, {} PMOS + {} NMOS leftovers",
            inverters.len(),
            parallel.len(),
            series.len(),
            leftover_pmos.len(),
            leftover_nmos.len()
        );

        Classification {
            inverters,
            parallel,
            series,
            leftover_pmos,
            leftover_nmos,
        }
    }
}
