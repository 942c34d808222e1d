//! Best-first search over the multimodal graph

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, trace, warn};
use petgraph::visit::EdgeRef;

use super::context::RoutingContext;
use super::path::GraphPath;
use super::spt::ShortestPathTree;
use super::state::{State, StateArena, StateId};
use super::traversal::traverse;
use super::visitor::TraverseVisitor;
use crate::Error;

#[derive(Copy, Clone, PartialEq)]
struct QueueEntry {
    priority: f64,
    state: StateId,
}

impl Eq for QueueEntry {}

// Implement Ord for QueueEntry to use in BinaryHeap
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by priority, older states first on ties
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.state.cmp(&self.state))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Runs a search for the request of `ctx` and returns one path per final
/// state, best first.
///
/// Stops once `num_itineraries` final states were reached, the queue runs
/// dry or `max_search_steps` states were expanded.
pub fn search<V: TraverseVisitor>(
    ctx: &RoutingContext,
    visitor: &mut V,
) -> Result<Vec<GraphPath>, Error> {
    let graph = ctx.graph();
    let request = &ctx.request;
    let mut arena = StateArena::new();
    let mut spt = ShortestPathTree::new(request.dominance);
    let mut queue = BinaryHeap::new();

    let origin = spt
        .add(ctx, &mut arena, State::initial(ctx.origin))
        .ok_or(Error::UnrecoverableError("origin state was rejected"))?;
    queue.push(QueueEntry {
        priority: ctx.remaining_weight(ctx.origin),
        state: origin,
    });

    let mut finals: Vec<StateId> = Vec::new();
    let mut steps = 0usize;

    while let Some(QueueEntry { state: id, .. }) = queue.pop() {
        // Skip states dominated after they were queued
        if spt.is_pruned(id) {
            continue;
        }

        steps += 1;
        if steps > request.max_search_steps {
            warn!("Search aborted after {} steps", request.max_search_steps);
            break;
        }

        let state = &arena[id];
        visitor.visit_vertex(state);

        if ctx.is_final(state) {
            trace!("Final state at {:?} with weight {:.1}", state.vertex, state.weight);
            finals.push(id);
            if finals.len() >= request.num_itineraries {
                break;
            }
            continue;
        }

        let successors: Vec<State> = graph
            .outgoing(state.vertex)
            .filter_map(|edge| {
                let next = traverse(ctx, &arena, id, edge)?;
                visitor.visit_edge(edge.id(), &next);
                Some(next)
            })
            .collect();

        for next in successors {
            let priority = next.weight + ctx.remaining_weight(next.vertex);
            if let Some(next_id) = spt.add(ctx, &mut arena, next) {
                visitor.visit_enqueue(&arena[next_id]);
                queue.push(QueueEntry {
                    priority,
                    state: next_id,
                });
            }
        }
    }

    debug!(
        "Search finished after {steps} steps with {} states on {} vertices, {} final",
        arena.len(),
        spt.vertex_count(),
        finals.len()
    );

    if finals.is_empty() {
        return Err(Error::PathNotFound);
    }
    Ok(finals
        .into_iter()
        .map(|id| GraphPath::new(ctx, &arena, id))
        .collect())
}
