use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use ferroute_core::prelude::*;
use geo::Point;

const SIZE: usize = 30;
const STEP: f64 = 0.002;

/// Square street grid of `SIZE` x `SIZE` intersections, two-way everywhere
fn grid() -> Graph {
    let mut graph = Graph::new();
    let mut ids = Vec::with_capacity(SIZE * SIZE);
    for row in 0..SIZE {
        for col in 0..SIZE {
            let point = Point::new(col as f64 * STEP, 48.0 + row as f64 * STEP);
            ids.push(graph.add_vertex(Vertex::intersection(format!("{row}:{col}"), point)));
        }
    }

    let all = TraverseModeSet::all_street();
    let mut way = 0;
    for row in 0..SIZE {
        for col in 0..SIZE {
            let here = ids[row * SIZE + col];
            let neighbours = [
                (col + 1 < SIZE).then(|| ids[row * SIZE + col + 1]),
                (row + 1 < SIZE).then(|| ids[(row + 1) * SIZE + col]),
            ];
            for there in neighbours.into_iter().flatten() {
                way += 1;
                graph.add_street_edge(here, there, way, all).unwrap();
                graph.add_street_edge(there, here, way, all).unwrap();
            }
        }
    }
    graph
}

fn corner_to_corner(modes: TraverseModeSet) -> RoutingRequest {
    let far = (SIZE - 1) as f64 * STEP;
    RoutingRequest::new(Point::new(0.0, 48.0), Point::new(far, 48.0 + far), modes)
}

fn search_benchmark(c: &mut Criterion) {
    let manager = GraphUpdaterManager::new(grid()).unwrap();
    let finder = GraphPathFinder::new(manager.handle());

    let mut group = c.benchmark_group("search");
    group.sample_size(20);

    let walk = corner_to_corner(TraverseModeSet::pedestrian());
    group.bench_function("walk", |b| {
        b.iter(|| finder.find_paths(black_box(&walk)).unwrap());
    });

    let car = corner_to_corner(TraverseModeSet::from(TraverseMode::Car));
    group.bench_function("car", |b| {
        b.iter(|| finder.find_paths(black_box(&car)).unwrap());
    });

    let mut pareto = corner_to_corner(TraverseModeSet::pedestrian());
    pareto.dominance = DominanceFunction::MinimumWeight;
    group.bench_function("walk_minimum_weight", |b| {
        b.iter(|| finder.find_paths(black_box(&pareto)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, search_benchmark);
criterion_main!(benches);
