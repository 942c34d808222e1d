mod common;

use common::{at, beside, link, street_line};
use ferroute_core::prelude::*;

/// Ten street segments from s0 to s10. One car park near s1 next to a
/// transit stop with a line to s10, another car park near s9.
fn network(start_spaces: u32) -> Graph {
    let mut graph = Graph::new();
    let streets = street_line(&mut graph, 10);

    add_car_park(&mut graph, "p-start", 1, streets[1], start_spaces);
    add_car_park(&mut graph, "p-end", 9, streets[9], 100);

    let a = graph.add_vertex(Vertex::new("A", beside(1), VertexKind::TransitStop));
    let b = graph.add_vertex(Vertex::new("B", beside(10), VertexKind::TransitStop));
    link(&mut graph, a, streets[1], 50.0);
    link(&mut graph, b, streets[10], 50.0);

    let on_a = graph.add_vertex(Vertex::new("A onboard", beside(1), VertexKind::TransitOnboard));
    let on_b = graph.add_vertex(Vertex::new("B onboard", beside(10), VertexKind::TransitOnboard));
    graph
        .add_edge(a, on_a, EdgeKind::TransitBoard { wait_seconds: 60.0 })
        .unwrap();
    graph
        .add_edge(
            on_a,
            on_b,
            EdgeKind::TransitHop {
                duration_seconds: 300.0,
                length_m: 6700.0,
            },
        )
        .unwrap();
    graph.add_edge(on_b, b, EdgeKind::TransitAlight).unwrap();
    graph
}

fn add_car_park(graph: &mut Graph, id: &str, i: usize, street: NodeIndex, spaces: u32) {
    let position = beside(i);
    let vertex = graph.add_vertex(Vertex::new(
        id,
        position,
        VertexKind::ParkAndRide {
            car_park_id: id.to_string(),
        },
    ));
    graph
        .add_edge(vertex, vertex, EdgeKind::ParkAndRide)
        .unwrap();
    link(graph, vertex, street, 50.0);
    graph.services_mut().car_parks_mut().add_car_park(
        CarPark::new(id, id, position.x(), position.y()).with_capacity(100, spaces),
    );
}

fn request() -> RoutingRequest {
    RoutingRequest::new(
        at(0),
        at(10),
        TraverseModeSet::new(&[TraverseMode::Walk, TraverseMode::Transit]),
    )
    .with_park_and_ride()
}

#[test]
fn park_and_ride_search_ends_with_car_parked() {
    common::init_logger();
    let manager = GraphUpdaterManager::new(network(100)).unwrap();
    let paths = GraphPathFinder::new(manager.handle())
        .find_paths(&request())
        .unwrap();

    // transit from the first car park, or walking from the second one
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(GraphPath::is_park_and_ride));
    let via_transit = paths
        .iter()
        .find(|p| p.states.last().is_some_and(|s| s.plane.ever_boarded))
        .unwrap();
    assert!((via_transit.street_meters - 744.0).abs() < 5.0);
}

#[test]
fn long_park_and_ride_drives_are_replaced_by_driving() {
    common::init_logger();
    let manager = GraphUpdaterManager::new(network(100)).unwrap();
    let paths = ComparingGraphPathFinder::new(manager.handle())
        .find_paths(&request())
        .unwrap();

    assert_eq!(paths.len(), 2);
    let (park_and_ride, car_only): (Vec<&GraphPath>, Vec<&GraphPath>) =
        paths.iter().partition(|p| p.is_park_and_ride());
    assert_eq!(park_and_ride.len(), 1);
    assert_eq!(car_only.len(), 1);
    assert!(park_and_ride[0].street_meters < car_only[0].street_meters / 2.0);
    assert!((car_only[0].street_meters - 7440.0).abs() < 20.0);
    assert!(car_only[0].walk_distance().abs() < f64::EPSILON);
}

#[test]
fn requests_without_park_and_ride_run_once() {
    let manager = GraphUpdaterManager::new(network(100)).unwrap();
    let request = RoutingRequest::new(at(0), at(10), TraverseModeSet::from(TraverseMode::Car));
    let paths = ComparingGraphPathFinder::new(manager.handle())
        .find_paths(&request)
        .unwrap();
    assert_eq!(paths.len(), 1);
    assert!(!paths[0].is_park_and_ride());
}

#[test]
fn full_car_parks_are_skipped_with_availability_information() {
    let manager = GraphUpdaterManager::new(network(0)).unwrap();
    let finder = ComparingGraphPathFinder::new(manager.handle());

    let without = finder.find_paths(&request()).unwrap();
    assert!(without.iter().any(GraphPath::is_park_and_ride));

    let mut request = request();
    request.use_car_park_availability_information = true;
    let with = finder.find_paths(&request).unwrap();
    // only the car park near the destination is left, and it drives too far
    assert_eq!(with.len(), 1);
    assert!(!with[0].is_park_and_ride());
}

#[test]
fn nearly_full_car_parks_raise_an_alert() {
    let manager = GraphUpdaterManager::new(network(5)).unwrap();
    let paths = GraphPathFinder::new(manager.handle())
        .find_paths(&request())
        .unwrap();

    let via_transit = paths
        .iter()
        .find(|p| p.states.last().is_some_and(|s| s.plane.ever_boarded))
        .unwrap();
    assert_eq!(
        via_transit.alerts,
        vec![PathAlert::CarParkFewSpaces {
            car_park_id: "p-start".into()
        }]
    );
    let walking = paths
        .iter()
        .find(|p| p.states.last().is_some_and(|s| !s.plane.ever_boarded))
        .unwrap();
    assert!(walking.alerts.is_empty());
}

#[test]
fn unreachable_destination_is_not_found() {
    let mut graph = network(100);
    let island = graph.add_vertex(Vertex::intersection("island", geo::Point::new(1.0, 1.0)));
    let manager = GraphUpdaterManager::new(graph).unwrap();

    let mut request = request();
    request.to = Some(Location::new(1.0, 1.0));
    let result = ComparingGraphPathFinder::new(manager.handle()).find_paths(&request);
    assert!(matches!(result, Err(Error::PathNotFound)));
    assert!(manager.handle().snapshot().vertex(island).is_some());
}
