//! Finished paths handed to itinerary rendering

use chrono::NaiveDateTime;
use petgraph::stable_graph::{EdgeIndex, NodeIndex};
use serde::Serialize;

use super::context::RoutingContext;
use super::state::{State, StateArena, StateId};
use crate::model::edge::{Edge, EdgeKind};
use crate::model::mode::TraverseMode;
use crate::model::vertex::VertexKind;

/// Warnings attached to a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PathAlert {
    /// The car is parked at a car park that is almost full
    CarParkFewSpaces { car_park_id: String },
    /// The rented bike is left outside a station and the rental continues
    FreeFloatingDropOff,
}

/// States of one itinerary from origin to destination
#[derive(Debug, Clone)]
pub struct GraphPath {
    pub states: Vec<State>,
    /// Edges between consecutive states
    pub edges: Vec<EdgeIndex>,
    /// Metres of street driven by car
    pub street_meters: f64,
    pub alerts: Vec<PathAlert>,
    pub start_time: Option<NaiveDateTime>,
}

impl GraphPath {
    pub fn new(ctx: &RoutingContext, arena: &StateArena, last: StateId) -> Self {
        let graph = ctx.graph();
        let states: Vec<State> = arena
            .path_to(last)
            .into_iter()
            .map(|id| arena[id].clone())
            .collect();
        let edges: Vec<EdgeIndex> = states
            .iter()
            .filter_map(|s| s.back_edge.map(|back| back.index))
            .collect();

        let street_meters = states
            .iter()
            .filter(|s| s.back_mode == Some(TraverseMode::Car))
            .filter_map(|s| s.back_edge)
            .filter_map(|back| graph.edge(back.index))
            .filter_map(Edge::as_street)
            .map(|street| street.length_m)
            .sum();

        let mut alerts = Vec::new();
        for state in &states {
            let parked_here = state
                .back_edge
                .and_then(|back| graph.edge(back.index))
                .is_some_and(|edge| matches!(edge.kind, EdgeKind::ParkAndRide));
            if !parked_here {
                continue;
            }
            let Some(VertexKind::ParkAndRide { car_park_id }) =
                graph.vertex(state.vertex).map(|v| &v.kind)
            else {
                continue;
            };
            let few_spaces = graph
                .services()
                .car_parks()
                .and_then(|service| service.car_park(car_park_id))
                .is_some_and(|car_park| car_park.has_few_spaces_available());
            if few_spaces {
                alerts.push(PathAlert::CarParkFewSpaces {
                    car_park_id: car_park_id.clone(),
                });
            }
        }

        if let Some(networks) = states.last().and_then(|s| s.plane.bike_rental.as_ref()) {
            if graph
                .services()
                .bike_rental()
                .is_some_and(|service| service.should_add_free_floating_alert(networks))
            {
                alerts.push(PathAlert::FreeFloatingDropOff);
            }
        }

        Self {
            states,
            edges,
            street_meters,
            alerts,
            start_time: ctx.request.date_time,
        }
    }

    /// Path with nothing but a driving distance, for reconciliation tests
    #[cfg(test)]
    pub(crate) fn with_street_meters(street_meters: f64) -> Self {
        Self {
            states: Vec::new(),
            edges: Vec::new(),
            street_meters,
            alerts: Vec::new(),
            start_time: None,
        }
    }

    /// Seconds from departure to arrival
    pub fn duration(&self) -> f64 {
        self.states.last().map_or(0.0, |s| s.elapsed_time)
    }

    pub fn weight(&self) -> f64 {
        self.states.last().map_or(0.0, |s| s.weight)
    }

    pub fn walk_distance(&self) -> f64 {
        self.states.last().map_or(0.0, |s| s.walk_distance)
    }

    pub fn vertices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.states.iter().map(|s| s.vertex)
    }

    /// Whether the car is left at a park-and-ride area on the way
    pub fn is_park_and_ride(&self) -> bool {
        self.states.last().is_some_and(|s| s.plane.car_parked)
    }
}
