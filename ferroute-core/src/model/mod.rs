//! Data model of the multimodal network
//!
//! Contains the graph arena, its vertices and edges, turn restrictions and
//! the services real-time updaters register into the graph.

pub mod edge;
pub mod graph;
pub mod mode;
pub mod services;
pub mod turn_restriction;
pub mod vertex;

pub use edge::{Edge, EdgeClass, EdgeId, EdgeKind, StreetEdge};
pub use graph::Graph;
pub use mode::{TraverseMode, TraverseModeSet};
pub use turn_restriction::{TurnRestriction, TurnRestrictionKind};
pub use vertex::{Vertex, VertexKind};

pub use petgraph::stable_graph::{EdgeIndex, NodeIndex};
