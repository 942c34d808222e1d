use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::stable_graph::NodeIndex;

use super::context::RoutingContext;
use super::dominance::DominanceFunction;
use super::state::{State, StateArena, StateId};

/// Non-dominated states per vertex.
///
/// States that lose their place after being queued are marked as pruned
/// instead of being removed from the queue; the search skips them on pop.
#[derive(Debug)]
pub struct ShortestPathTree {
    dominance: DominanceFunction,
    states: HashMap<NodeIndex, Vec<StateId>>,
    pruned: FixedBitSet,
}

impl ShortestPathTree {
    pub fn new(dominance: DominanceFunction) -> Self {
        Self {
            dominance,
            states: HashMap::new(),
            pruned: FixedBitSet::new(),
        }
    }

    /// Stores `state` in the arena unless a comparable state at the same
    /// vertex dominates it. Existing states dominated by the newcomer are
    /// dropped and marked as pruned.
    pub fn add(
        &mut self,
        ctx: &RoutingContext,
        arena: &mut StateArena,
        state: State,
    ) -> Option<StateId> {
        let existing = self
            .states
            .get(&state.vertex)
            .map(Vec::as_slice)
            .unwrap_or_default();

        if existing.iter().any(|&id| {
            self.dominance
                .better_or_equal_and_comparable(ctx, arena, &arena[id], &state)
        }) {
            return None;
        }

        let dominated: Vec<StateId> = existing
            .iter()
            .copied()
            .filter(|&id| {
                self.dominance
                    .better_or_equal_and_comparable(ctx, arena, &state, &arena[id])
            })
            .collect();

        let vertex = state.vertex;
        let id = arena.push(state);
        self.pruned.grow(arena.len());
        for pruned in &dominated {
            self.pruned.insert(pruned.index());
        }

        let states = self.states.entry(vertex).or_default();
        states.retain(|s| !dominated.contains(s));
        states.push(id);
        Some(id)
    }

    pub fn is_pruned(&self, id: StateId) -> bool {
        self.pruned.contains(id.index())
    }

    /// Number of vertices reached
    pub fn vertex_count(&self) -> usize {
        self.states.len()
    }
}
