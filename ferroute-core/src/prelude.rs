pub use crate::Error;
pub use crate::VertexId;

// Graph model
pub use crate::model::services::{
    BikeRentalStation, BikeRentalStationService, CarPark, CarParkService, GraphServices,
    RentalType, RoadworksSource,
};
pub use crate::model::{
    Edge, EdgeId, EdgeIndex, EdgeKind, Graph, NodeIndex, StreetEdge, TraverseMode,
    TraverseModeSet, TurnRestriction, TurnRestrictionKind, Vertex, VertexKind,
};

// Search
pub use crate::routing::{
    ComparingGraphPathFinder, DominanceFunction, GraphPath, GraphPathFinder, Location,
    OptimizeType, PathAlert, PathFinder, RemainingWeightHeuristic, RoutingRequest,
    TriangleFactors,
};

// Real-time updates
pub use crate::updater::{
    BikeRentalDataSource, BikeRentalUpdater, CarParkDataSource, CarParkUpdater, GraphHandle,
    GraphUpdaterManager, GraphWriter, GraphWriterRunnable, PollingGraphUpdater,
    RoadworksDataSource, RoadworksUpdater,
};
