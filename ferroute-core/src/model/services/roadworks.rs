use hashbrown::HashSet;

use crate::model::edge::{Edge, EdgeId};

/// Dynamic blocklist of streets closed for roadworks.
///
/// Edges are matched by the OSM way they belong to, or by synthetic edge id
/// for closures resolved from geometries at runtime.
#[derive(Debug, Clone, Default)]
pub struct RoadworksSource {
    blocked_way_ids: HashSet<i64>,
    blocked_edge_ids: HashSet<EdgeId>,
}

impl RoadworksSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_way_ids(way_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            blocked_way_ids: way_ids.into_iter().collect(),
            blocked_edge_ids: HashSet::new(),
        }
    }

    pub fn block_edges(&mut self, edges: impl IntoIterator<Item = EdgeId>) {
        self.blocked_edge_ids.extend(edges);
    }

    pub fn is_blocked(&self, edge: &Edge) -> bool {
        if self.blocked_edge_ids.contains(&edge.id()) {
            return true;
        }
        edge.as_street()
            .is_some_and(|street| self.blocked_way_ids.contains(&street.way_id))
    }

    pub fn blocked_way_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.blocked_way_ids.iter().copied()
    }

    /// Number of blocked ways and edges
    pub fn len(&self) -> usize {
        self.blocked_way_ids.len() + self.blocked_edge_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked_way_ids.is_empty() && self.blocked_edge_ids.is_empty()
    }
}
