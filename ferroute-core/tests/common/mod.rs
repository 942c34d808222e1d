#![allow(dead_code)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ferroute_core::prelude::*;
use geo::Point;

pub const LAT: f64 = 48.0;
/// Roughly 744 m of longitude at [`LAT`]
pub const STEP: f64 = 0.01;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Position of the i-th street vertex
pub fn at(i: usize) -> Point<f64> {
    Point::new(i as f64 * STEP, LAT)
}

/// A point just north of the i-th street vertex, for stops and car parks
pub fn beside(i: usize) -> Point<f64> {
    Point::new(i as f64 * STEP, LAT + 0.0004)
}

/// Two-way street s0 ..= s`segments` along [`LAT`]; segment i belongs to way
/// i + 1
pub fn street_line(graph: &mut Graph, segments: usize) -> Vec<NodeIndex> {
    let vertices: Vec<NodeIndex> = (0..=segments)
        .map(|i| graph.add_vertex(Vertex::intersection(format!("s{i}"), at(i))))
        .collect();
    let all = TraverseModeSet::all_street();
    for (i, pair) in vertices.windows(2).enumerate() {
        let way = i as i64 + 1;
        graph.add_street_edge(pair[0], pair[1], way, all).unwrap();
        graph.add_street_edge(pair[1], pair[0], way, all).unwrap();
    }
    vertices
}

/// Two-way link between an off-street vertex and a street vertex
pub fn link(graph: &mut Graph, vertex: NodeIndex, street: NodeIndex, length_m: f64) {
    graph
        .add_edge(vertex, street, EdgeKind::Link { length_m })
        .unwrap();
    graph
        .add_edge(street, vertex, EdgeKind::Link { length_m })
        .unwrap();
}

/// Way ids of the street edges a path uses
pub fn ways(graph: &Graph, path: &GraphPath) -> Vec<i64> {
    path.edges
        .iter()
        .filter_map(|e| graph.edge(*e))
        .filter_map(Edge::as_street)
        .map(|street| street.way_id)
        .collect()
}

/// Waits until the published graph satisfies `predicate`
pub fn wait_until(handle: &GraphHandle, predicate: impl Fn(&Graph) -> bool) -> Arc<Graph> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let snapshot = handle.snapshot();
        if predicate(&snapshot) {
            return snapshot;
        }
        assert!(Instant::now() < deadline, "graph never reached the expected state");
        thread::sleep(Duration::from_millis(5));
    }
}
