use std::collections::HashMap;

use crate::base_types::{BlockIdx, Cost, Meter};

/// Relocation cost parameters of a single machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MobilisationParams {
    pub walk_cost_per_metre: Cost,
    pub move_cost_flat: Cost,
    pub walk_threshold: Meter,
    pub setup_cost: Cost,
}

impl MobilisationParams {
    /// Cost of relocating over the given distance between two distinct blocks.
    /// Short hops are walked (per metre), anything beyond the threshold is a flat-rate move.
    pub fn transition_cost(&self, distance: Meter) -> Cost {
        if distance <= self.walk_threshold {
            self.setup_cost + self.walk_cost_per_metre * distance
        } else {
            self.setup_cost + self.move_cost_flat
        }
    }
}

/// Symmetric block-to-block distances. Unknown pairs are treated as 0 m.
#[derive(Debug, Clone, Default)]
pub struct DistanceLookup {
    distances: HashMap<(BlockIdx, BlockIdx), Meter>,
}

impl DistanceLookup {
    pub fn new() -> DistanceLookup {
        DistanceLookup::default()
    }

    pub fn insert(&mut self, a: BlockIdx, b: BlockIdx, distance: Meter) {
        self.distances.insert(DistanceLookup::key(a, b), distance);
    }

    pub fn get(&self, a: BlockIdx, b: BlockIdx) -> Meter {
        if a == b {
            return 0.0;
        }
        self.distances
            .get(&DistanceLookup::key(a, b))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    fn key(a: BlockIdx, b: BlockIdx) -> (BlockIdx, BlockIdx) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}
