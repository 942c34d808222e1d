//! Multi-criteria search
//!
//! States carry a [`state::Plane`] and are compared through a
//! [`dominance::DominanceFunction`]; the best-first search in [`astar`]
//! keeps the non-dominated ones per vertex in a [`spt::ShortestPathTree`].

pub mod astar;
pub mod context;
pub mod dominance;
pub mod intersection;
pub mod path;
pub mod path_finder;
pub mod request;
pub mod spt;
pub mod state;
pub mod traversal;
pub mod visitor;

pub use context::RoutingContext;
pub use dominance::DominanceFunction;
pub use path::{GraphPath, PathAlert};
pub use path_finder::{ComparingGraphPathFinder, GraphPathFinder, PathFinder, filter_out};
pub use request::{
    Location, OptimizeType, RemainingWeightHeuristic, RoutingRequest, TriangleFactors,
};
pub use state::{Plane, State, StateArena, StateId};
pub use visitor::{CountingTraverseVisitor, TraverseVisitor};
