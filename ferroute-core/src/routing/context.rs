use std::sync::Arc;

use geo::{Distance, Euclidean, Haversine, Point};
use log::debug;
use petgraph::stable_graph::NodeIndex;

use super::request::{OptimizeType, RemainingWeightHeuristic, RoutingRequest};
use super::state::State;
use super::traversal::bicycle_weight_factor;
use crate::Error;
use crate::model::Graph;

/// Planar coordinate distance (in degrees) around the origin and destination
/// inside which vehicle states are allowed to loop
pub const MAX_LOOP_EUCLIDEAN_DISTANCE: f64 = 0.005;

/// Upper bound of vehicle speeds used by the remaining weight estimate (m/s)
const MAX_VEHICLE_SPEED: f64 = 40.0;

/// Scoped resources of a single search: the request, the graph snapshot it
/// runs against and the resolved origin and destination vertices.
///
/// The snapshot is released when the context is dropped.
#[derive(Debug)]
pub struct RoutingContext {
    pub request: RoutingRequest,
    graph: Arc<Graph>,
    pub origin: NodeIndex,
    pub target: NodeIndex,
    from: Point<f64>,
    to: Point<f64>,
    max_speed: f64,
    min_weight_per_second: f64,
}

impl RoutingContext {
    pub fn new(mut request: RoutingRequest, graph: Arc<Graph>) -> Result<Self, Error> {
        request.validate()?;
        if request.optimize == OptimizeType::Triangle {
            request.triangle = request.triangle.normalized();
        }
        let (Some(from), Some(to)) = (request.from, request.to) else {
            return Err(Error::InvalidRequest(
                "origin and destination are required".into(),
            ));
        };
        let (from, to) = (from.point(), to.point());

        let origin = graph
            .nearest_street_vertex(from)
            .ok_or_else(|| Error::VertexNotFound(format!("{from:?}")))?;
        let target = graph
            .nearest_street_vertex(to)
            .ok_or_else(|| Error::VertexNotFound(format!("{to:?}")))?;

        let vehicle_speed = MAX_VEHICLE_SPEED
            .max(graph.max_car_speed())
            .max(graph.max_transit_speed());
        let max_speed = if request.modes.car() || request.modes.transit() {
            vehicle_speed
        } else if request.modes.bicycle() || request.allow_bike_rental {
            request.bike_speed.max(request.walk_speed)
        } else {
            request.walk_speed
        };
        let min_weight_per_second = min_weight_per_second(&request, &graph);

        debug!(
            "Routing context on graph version {} from {origin:?} to {target:?}",
            graph.version()
        );

        Ok(Self {
            request,
            graph,
            origin,
            target,
            from,
            to,
            max_speed,
            min_weight_per_second,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Whether `vertex` lies within the loop tolerance of the request origin
    /// or destination. Compares raw coordinates, not metres.
    pub fn is_close_to_start_or_end(&self, vertex: NodeIndex) -> bool {
        self.graph.vertex(vertex).is_some_and(|v| {
            Euclidean.distance(&v.coordinate, &self.from) < MAX_LOOP_EUCLIDEAN_DISTANCE
                || Euclidean.distance(&v.coordinate, &self.to) < MAX_LOOP_EUCLIDEAN_DISTANCE
        })
    }

    /// Whether a search may stop at `state`: it has reached the destination
    /// with the car or own bike parked when the request asks for it, and any
    /// rented bike may be left there.
    pub fn is_final(&self, state: &State) -> bool {
        if state.vertex != self.target {
            return false;
        }
        if self.request.park_and_ride && !state.plane.car_parked {
            return false;
        }
        if self.request.bike_and_ride && !state.plane.bike_parked {
            return false;
        }
        match &state.plane.bike_rental {
            Some(networks) => self
                .graph
                .services()
                .bike_rental()
                .is_some_and(|service| service.networks_allow_free_floating_drop_off(networks)),
            None => true,
        }
    }

    /// Lower bound of the weight still needed to reach the destination
    pub fn remaining_weight(&self, vertex: NodeIndex) -> f64 {
        match self.request.heuristic {
            RemainingWeightHeuristic::Trivial => 0.0,
            RemainingWeightHeuristic::Euclidean => {
                let (Some(here), Some(target)) =
                    (self.graph.vertex(vertex), self.graph.vertex(self.target))
                else {
                    return 0.0;
                };
                Haversine.distance(here.coordinate, target.coordinate) / self.max_speed
                    * self.min_weight_per_second
            }
        }
    }
}

/// Lowest weight any move of the request can cost per second of travel
fn min_weight_per_second(request: &RoutingRequest, graph: &Graph) -> f64 {
    let mut factor = request.walk_reluctance.min(1.0);
    if request.modes.bicycle() || request.allow_bike_rental {
        factor = factor.min(bicycle_weight_factor(
            request.optimize,
            request.triangle,
            graph.min_bicycle_safety(),
        ));
    }
    factor.max(0.0)
}

impl Drop for RoutingContext {
    fn drop(&mut self) {
        debug!(
            "Releasing routing context on graph version {}",
            self.graph.version()
        );
    }
}
