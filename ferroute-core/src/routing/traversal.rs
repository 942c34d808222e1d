//! Expansion of a search state over a single edge

use std::sync::Arc;

use petgraph::stable_graph::{EdgeIndex, EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;

use super::context::RoutingContext;
use super::intersection::IntersectionTraversalCostModel;
use super::request::{OptimizeType, RoutingRequest, TriangleFactors};
use super::state::{BackEdge, State, StateArena, StateId};
use crate::model::edge::{DEFAULT_CAR_SPEED, Edge, EdgeClass, EdgeKind, StreetEdge};
use crate::model::mode::TraverseMode;
use crate::model::services::NetworkSet;
use crate::model::vertex::VertexKind;
use crate::model::Graph;

const CAR_PARK_TIME: f64 = 60.0;
const CAR_PARK_COST: f64 = 120.0;
const BIKE_PARK_TIME: f64 = 60.0;
const BIKE_PARK_COST: f64 = 120.0;
const BIKE_RENTAL_PICKUP_TIME: f64 = 60.0;
const BIKE_RENTAL_PICKUP_COST: f64 = 120.0;
const BIKE_RENTAL_DROPOFF_TIME: f64 = 30.0;
const BIKE_RENTAL_DROPOFF_COST: f64 = 30.0;
const BOARD_COST: f64 = 600.0;
/// Safety factor at or below which a street counts as a greenway
const GREENWAY_SAFETY_FACTOR: f32 = 0.1;
const GREENWAY_BONUS: f64 = 0.66;

/// Follows `edge` from the state `id`.
///
/// Returns `None` when the edge is closed for roadworks, forbidden by a turn
/// restriction or not usable in the state's situation. Reads the graph
/// snapshot, its services and the request only.
pub fn traverse(
    ctx: &RoutingContext,
    arena: &StateArena,
    id: StateId,
    edge: EdgeReference<'_, Edge>,
) -> Option<State> {
    let graph = ctx.graph();
    let request = &ctx.request;
    let state = &arena[id];
    let weight = edge.weight();

    if graph
        .services()
        .roadworks()
        .is_some_and(|roadworks| roadworks.is_blocked(weight))
    {
        return None;
    }

    let back = BackEdge {
        index: edge.id(),
        class: weight.class(),
    };
    let mode = state.non_transit_mode(request);
    let mut next = state.successor(id, back, edge.target());

    match &weight.kind {
        EdgeKind::Street(street) => {
            return traverse_street(ctx, state, next, edge.id(), street);
        }
        EdgeKind::Link { length_m } => {
            if mode.is_driving()
                && !is_park_and_ride(graph, edge.source())
                && !is_park_and_ride(graph, edge.target())
            {
                return None;
            }
            let speed = match mode {
                TraverseMode::Car => f64::from(DEFAULT_CAR_SPEED),
                _ => mode_speed(request, mode),
            };
            move_along(&mut next, request, mode, *length_m, speed);
        }
        EdgeKind::ParkAndRide => {
            if !request.park_and_ride || !mode.is_driving() {
                return None;
            }
            if request.use_car_park_availability_information
                && car_park_is_full(graph, edge.source())
            {
                return None;
            }
            next.plane.car_parked = true;
            next.back_mode = Some(TraverseMode::Walk);
            wait(&mut next, CAR_PARK_TIME, CAR_PARK_COST);
        }
        EdgeKind::RentBike => {
            if !request.allow_bike_rental
                || state.plane.is_bike_renting()
                || mode != TraverseMode::Walk
            {
                return None;
            }
            let station_networks = station_networks(graph, edge.source())?;
            let compatible: NetworkSet = if request.allowed_bike_rental_networks.is_empty() {
                station_networks.clone()
            } else {
                station_networks
                    .intersection(&request.allowed_bike_rental_networks)
                    .cloned()
                    .collect()
            };
            if compatible.is_empty() {
                return None;
            }
            next.plane.bike_rental = Some(Arc::new(compatible));
            next.back_mode = Some(TraverseMode::Bicycle);
            wait(&mut next, BIKE_RENTAL_PICKUP_TIME, BIKE_RENTAL_PICKUP_COST);
        }
        EdgeKind::DropOffBike => {
            let renting = state.plane.bike_rental.as_ref()?;
            let station_networks = station_networks(graph, edge.source())?;
            if renting.is_disjoint(station_networks) {
                return None;
            }
            next.plane.bike_rental = None;
            next.back_mode = Some(TraverseMode::Walk);
            wait(&mut next, BIKE_RENTAL_DROPOFF_TIME, BIKE_RENTAL_DROPOFF_COST);
        }
        EdgeKind::BikePark => {
            if !request.bike_and_ride || state.plane.bike_parked || !mode.is_cycling() {
                return None;
            }
            next.plane.bike_parked = true;
            next.back_mode = Some(TraverseMode::Walk);
            wait(&mut next, BIKE_PARK_TIME, BIKE_PARK_COST);
        }
        EdgeKind::TransitBoard { wait_seconds } => {
            if !request.modes.transit() || mode != TraverseMode::Walk {
                return None;
            }
            next.plane.ever_boarded = true;
            next.back_mode = Some(TraverseMode::Transit);
            wait(&mut next, *wait_seconds, wait_seconds + BOARD_COST);
        }
        EdgeKind::TransitHop {
            duration_seconds, ..
        } => {
            if !state.plane.ever_boarded {
                return None;
            }
            next.back_mode = Some(TraverseMode::Transit);
            wait(&mut next, *duration_seconds, *duration_seconds);
        }
        EdgeKind::TransitAlight => {
            next.back_mode = Some(TraverseMode::Walk);
        }
        EdgeKind::SimpleTransfer { distance_m } => {
            if state.arrived_via(EdgeClass::SimpleTransfer) || mode != TraverseMode::Walk {
                return None;
            }
            move_along(&mut next, request, mode, *distance_m, request.walk_speed);
        }
        EdgeKind::TimedTransfer => {}
    }
    Some(next)
}

fn traverse_street(
    ctx: &RoutingContext,
    state: &State,
    mut next: State,
    edge: EdgeIndex,
    street: &StreetEdge,
) -> Option<State> {
    let graph = ctx.graph();
    let request = &ctx.request;

    let mut mode = state.non_transit_mode(request);
    if !street.permission.contains(mode) {
        // cyclists may push their bike where walking is allowed
        if mode.is_cycling() && street.permission.walk() {
            mode = TraverseMode::Walk;
        } else {
            return None;
        }
    }

    let from_street = state
        .back_edge
        .filter(|back| back.class == EdgeClass::Street)
        .map(|back| back.index);
    if let Some(from) = from_street {
        if graph
            .turn_restrictions(from)
            .iter()
            .any(|restriction| restriction.forbids(edge, mode))
        {
            return None;
        }
    }

    let speed = match mode {
        TraverseMode::Car => f64::from(street.car_speed),
        _ => mode_speed(request, mode),
    };
    let time = street.length_m / speed;
    let weight = match mode {
        TraverseMode::Walk => time * request.walk_reluctance,
        TraverseMode::Bicycle => bicycle_weight(request, street, time),
        TraverseMode::Car | TraverseMode::Transit => time,
    };

    let turn_cost = from_street
        .and_then(|from| graph.edge(from))
        .and_then(Edge::as_street)
        .map_or(0.0, |from| {
            IntersectionTraversalCostModel::new(request.drive_on_right).traversal_cost(
                graph,
                state.vertex,
                from,
                street,
                mode,
                speed,
            )
        });

    next.elapsed_time += time + turn_cost.ceil();
    next.weight += weight + turn_cost;
    if mode == TraverseMode::Walk {
        next.walk_distance += street.length_m;
    }
    next.back_mode = Some(mode);
    Some(next)
}

fn bicycle_weight(request: &RoutingRequest, street: &StreetEdge, time: f64) -> f64 {
    let safety = f64::from(street.bicycle_safety_factor);
    time * bicycle_weight_factor(request.optimize, request.triangle, safety)
}

/// Weight per second of cycling on a street with the given safety factor
pub(crate) fn bicycle_weight_factor(
    optimize: OptimizeType,
    triangle: TriangleFactors,
    safety: f64,
) -> f64 {
    match optimize {
        OptimizeType::Quick => 1.0,
        OptimizeType::Safe => safety,
        OptimizeType::Greenways => {
            if safety <= f64::from(GREENWAY_SAFETY_FACTOR) {
                safety * GREENWAY_BONUS
            } else {
                safety
            }
        }
        // no elevation data, so the slope share is plain travel time
        OptimizeType::Triangle => triangle.time + safety * triangle.safety + triangle.slope,
    }
}

fn mode_speed(request: &RoutingRequest, mode: TraverseMode) -> f64 {
    match mode {
        TraverseMode::Bicycle => request.bike_speed,
        _ => request.walk_speed,
    }
}

fn move_along(
    next: &mut State,
    request: &RoutingRequest,
    mode: TraverseMode,
    length_m: f64,
    speed: f64,
) {
    let time = length_m / speed;
    next.elapsed_time += time;
    if mode == TraverseMode::Walk {
        next.weight += time * request.walk_reluctance;
        next.walk_distance += length_m;
    } else {
        next.weight += time;
    }
    next.back_mode = Some(mode);
}

fn wait(next: &mut State, seconds: f64, cost: f64) {
    next.elapsed_time += seconds;
    next.weight += cost;
}

fn is_park_and_ride(graph: &Graph, vertex: NodeIndex) -> bool {
    graph
        .vertex(vertex)
        .is_some_and(|v| matches!(v.kind, VertexKind::ParkAndRide { .. }))
}

fn car_park_is_full(graph: &Graph, vertex: NodeIndex) -> bool {
    let Some(VertexKind::ParkAndRide { car_park_id }) = graph.vertex(vertex).map(|v| &v.kind) else {
        return false;
    };
    graph
        .services()
        .car_parks()
        .and_then(|service| service.car_park(car_park_id))
        .is_some_and(|car_park| car_park.is_full())
}

fn station_networks(graph: &Graph, vertex: NodeIndex) -> Option<&NetworkSet> {
    let Some(VertexKind::BikeRentalStation { station_id }) = graph.vertex(vertex).map(|v| &v.kind)
    else {
        return None;
    };
    graph
        .services()
        .bike_rental()?
        .station(station_id)
        .map(|station| &station.networks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(optimize: OptimizeType, safety: f64) -> f64 {
        bicycle_weight_factor(optimize, TriangleFactors::default(), safety)
    }

    #[test]
    fn quick_cycling_ignores_safety() {
        assert!((factor(OptimizeType::Quick, 0.1) - 1.0).abs() < 1e-9);
        assert!((factor(OptimizeType::Quick, 3.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn safe_cycling_scales_with_safety() {
        assert!((factor(OptimizeType::Safe, 0.5) - 0.5).abs() < 1e-9);
        assert!((factor(OptimizeType::Safe, 2.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn greenways_get_a_bonus() {
        assert!((factor(OptimizeType::Greenways, 0.1) - 0.066).abs() < 1e-9);
        assert!((factor(OptimizeType::Greenways, 0.05) - 0.033).abs() < 1e-9);
        // just above the greenway cutoff there is no bonus
        assert!((factor(OptimizeType::Greenways, 0.2) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn triangle_mixes_time_and_safety() {
        let triangle = TriangleFactors::new(0.5, 0.5, 0.0);
        let mixed = bicycle_weight_factor(OptimizeType::Triangle, triangle, 0.2);
        assert!((mixed - 0.6).abs() < 1e-9);

        let time_only = TriangleFactors::new(1.0, 0.0, 0.0);
        let plain = bicycle_weight_factor(OptimizeType::Triangle, time_only, 0.2);
        assert!((plain - 1.0).abs() < 1e-9);

        // slope counts like time without elevation data
        let slope_only = TriangleFactors::new(0.0, 0.0, 1.0);
        let flat = bicycle_weight_factor(OptimizeType::Triangle, slope_only, 0.2);
        assert!((flat - 1.0).abs() < 1e-9);
    }
}
