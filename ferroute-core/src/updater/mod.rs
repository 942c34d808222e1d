//! Real-time graph updates
//!
//! Feeds run on their own threads and submit [`GraphWriterRunnable`]s to
//! the [`GraphUpdaterManager`], whose single writer thread applies them and
//! publishes new graph snapshots.

pub mod bike_rental;
pub mod car_park;
pub mod manager;
pub mod polling;
pub mod roadworks;

use geo::{Distance, Haversine};
use petgraph::stable_graph::NodeIndex;

pub use bike_rental::{BikeRentalDataSource, BikeRentalUpdater};
pub use car_park::{CarParkDataSource, CarParkUpdater};
pub use manager::{GraphHandle, GraphUpdaterManager, GraphWriter, GraphWriterRunnable};
pub use polling::PollingGraphUpdater;
pub use roadworks::{RoadworksDataSource, RoadworksUpdater};

use crate::model::{EdgeKind, Graph};

/// Real-time vertices further away from any street stay unlinked
const MAX_LINK_DISTANCE_M: f64 = 1000.0;

/// Connects a real-time vertex to the nearest street vertex in both
/// directions. Returns whether a link was made.
pub(crate) fn link_to_streets(graph: &mut Graph, vertex: NodeIndex) -> bool {
    let Some(point) = graph.vertex(vertex).map(|v| v.coordinate) else {
        return false;
    };
    let Some((street, street_point)) = graph
        .nearest_street_vertex(point)
        .and_then(|street| graph.vertex(street).map(|v| (street, v.coordinate)))
    else {
        return false;
    };

    let length_m = Haversine.distance(point, street_point);
    if length_m > MAX_LINK_DISTANCE_M {
        return false;
    }
    graph
        .add_edge(vertex, street, EdgeKind::Link { length_m })
        .and_then(|_| graph.add_edge(street, vertex, EdgeKind::Link { length_m }))
        .is_ok()
}
