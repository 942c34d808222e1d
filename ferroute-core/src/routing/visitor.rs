use std::fmt;

use petgraph::stable_graph::EdgeIndex;

use super::state::State;

/// Hooks called by the search as it expands states
pub trait TraverseVisitor {
    /// A successor state was produced by following `edge`
    fn visit_edge(&mut self, _edge: EdgeIndex, _state: &State) {}

    /// A state was taken off the queue
    fn visit_vertex(&mut self, _state: &State) {}

    /// A state survived dominance and was queued
    fn visit_enqueue(&mut self, _state: &State) {}
}

impl TraverseVisitor for () {}

/// Counts the work done by a search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountingTraverseVisitor {
    pub vertices_visited: usize,
    pub edges_traversed: usize,
    pub states_enqueued: usize,
}

impl TraverseVisitor for CountingTraverseVisitor {
    fn visit_edge(&mut self, _edge: EdgeIndex, _state: &State) {
        self.edges_traversed += 1;
    }

    fn visit_vertex(&mut self, _state: &State) {
        self.vertices_visited += 1;
    }

    fn visit_enqueue(&mut self, _state: &State) {
        self.states_enqueued += 1;
    }
}

impl fmt::Display for CountingTraverseVisitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices visited, {} edges traversed, {} states enqueued",
            self.vertices_visited, self.edges_traversed, self.states_enqueued
        )
    }
}
