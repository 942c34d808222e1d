//! Multi-criteria multimodal trip planning core.
//!
//! The crate holds the shared network graph, the state dominance model,
//! the best-first search built on top of it, the park-and-ride comparing
//! search and the coordinator that serializes real-time graph updates.

pub mod error;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod updater;

pub use error::Error;

/// Vertex identifier of the graph arena
pub type VertexId = model::NodeIndex;

