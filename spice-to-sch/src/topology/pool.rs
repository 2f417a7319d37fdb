//! Pool of not-yet-grouped transistors.
//!
//! The arena never changes; the pool is a gate-sorted order of arena ids plus
//! a claimed mask. Grouping passes claim ids instead of removing list entries,
//! so positions stay valid for the whole classification.

use crate::parser::schema::{Transistor, TransistorId};

pub struct TransistorPool<'a> {
    arena: &'a [Transistor],
    order: Vec<TransistorId>,
    claimed: Vec<bool>,
}

impl<'a> TransistorPool<'a> {
    /// Build a pool over `arena`, ordered by case-insensitive gate name.
    ///
    /// The sort is stable, so devices sharing a gate keep netlist order.
    pub fn new(arena: &'a [Transistor]) -> Self {
        let mut order: Vec<TransistorId> = (0..arena.len()).collect();
        order.sort_by_cached_key(|&id| arena[id].gate.to_lowercase());
        Self {
            arena,
            order,
            claimed: vec![false; arena.len()],
        }
    }

    pub fn get(&self, id: TransistorId) -> &'a Transistor {
        &self.arena[id]
    }

    pub fn is_claimed(&self, id: TransistorId) -> bool {
        self.claimed[id]
    }

    /// Mark `id` as owned by a group.
    pub fn claim(&mut self, id: TransistorId) {
        debug_assert!(!self.claimed[id], "transistor {id} claimed twice");
        self.claimed[id] = true;
    }

    pub fn claim_all(&mut self, ids: &[TransistorId]) {
        for &id in ids {
            self.claim(id);
        }
    }

    /// Unclaimed ids in pool order.
    pub fn remaining(&self) -> Vec<TransistorId> {
        self.order
            .iter()
            .copied()
            .filter(|&id| !self.claimed[id])
            .collect()
    }

    pub fn remaining_count(&self) -> usize {
        self.claimed.iter().filter(|c| !**c).count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_count() == 0
    }
}
