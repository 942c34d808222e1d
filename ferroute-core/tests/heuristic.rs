mod common;

use common::LAT;
use ferroute_core::prelude::*;
use geo::Point;

/// Direct street s -> t of neutral safety, and a longer but much safer
/// cycleway s -> d -> t
fn detour() -> (Graph, NodeIndex) {
    let mut graph = Graph::new();
    let s = graph.add_vertex(Vertex::intersection("s", Point::new(0.0, LAT)));
    let t = graph.add_vertex(Vertex::intersection("t", Point::new(0.01, LAT)));
    let d = graph.add_vertex(Vertex::intersection("d", Point::new(0.005, LAT + 0.003)));

    let bike = TraverseModeSet::from(TraverseMode::Bicycle);
    graph.add_street_edge(s, t, 1, bike).unwrap();
    for (from, to, way) in [(s, d, 2), (d, t, 3)] {
        let cycleway = graph
            .straight_street_edge(from, to, way, bike)
            .unwrap()
            .with_bicycle_safety(0.1);
        graph.add_edge(from, to, EdgeKind::Street(cycleway)).unwrap();
    }
    (graph, d)
}

fn safest_path(handle: &GraphHandle, heuristic: RemainingWeightHeuristic) -> GraphPath {
    let mut request = RoutingRequest::new(
        Point::new(0.0, LAT),
        Point::new(0.01, LAT),
        TraverseModeSet::from(TraverseMode::Bicycle),
    );
    request.optimize = OptimizeType::Safe;
    request.num_itineraries = 1;
    request.heuristic = heuristic;
    GraphPathFinder::new(handle.clone())
        .find_paths(&request)
        .unwrap()
        .remove(0)
}

#[test]
fn distance_estimate_keeps_the_safest_path() {
    let (graph, d) = detour();
    let manager = GraphUpdaterManager::new(graph).unwrap();
    let handle = manager.handle();

    let exhaustive = safest_path(&handle, RemainingWeightHeuristic::Trivial);
    let directed = safest_path(&handle, RemainingWeightHeuristic::Euclidean);

    assert!(exhaustive.vertices().any(|v| v == d));
    assert!(directed.vertices().any(|v| v == d));
    assert!((exhaustive.weight() - directed.weight()).abs() < 1e-6);
    // the direct street takes about 149 s at neutral safety
    assert!(directed.weight() < 100.0);
}

#[test]
fn low_walk_reluctance_keeps_the_shortest_path() {
    // a winding 1.5 km street from a to b, or two short straight ones via c
    let mut graph = Graph::new();
    let a = graph.add_vertex(Vertex::intersection("a", Point::new(0.0, LAT)));
    let b = graph.add_vertex(Vertex::intersection("b", Point::new(0.01, LAT)));
    let c = graph.add_vertex(Vertex::intersection("c", Point::new(0.005, LAT + 0.001)));
    let walk = TraverseModeSet::pedestrian();
    graph
        .add_edge(a, b, EdgeKind::Street(StreetEdge::new(1, 1500.0, walk)))
        .unwrap();
    graph.add_street_edge(a, c, 2, walk).unwrap();
    graph.add_street_edge(c, b, 3, walk).unwrap();
    let manager = GraphUpdaterManager::new(graph).unwrap();

    for heuristic in [
        RemainingWeightHeuristic::Trivial,
        RemainingWeightHeuristic::Euclidean,
    ] {
        let mut request = RoutingRequest::new(
            Point::new(0.0, LAT),
            Point::new(0.01, LAT),
            TraverseModeSet::pedestrian(),
        );
        request.walk_reluctance = 0.2;
        request.num_itineraries = 1;
        request.heuristic = heuristic;
        let path = GraphPathFinder::new(manager.handle())
            .find_paths(&request)
            .unwrap()
            .remove(0);
        assert_eq!(path.vertices().collect::<Vec<_>>(), vec![a, c, b]);
    }
}
