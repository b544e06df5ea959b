use criterion::{criterion_group, criterion_main, Criterion};
use campusnav_lib::{
    build_graph, load_snapshot, plan_route, plan_route_on_graph, Graph, MapSnapshot,
    RouteAlgorithm, RouteRequest,
};
use once_cell::sync::Lazy;
use std::hint::black_box;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/sample_campus.json")
}

static SNAPSHOT: Lazy<MapSnapshot> =
    Lazy::new(|| load_snapshot(&fixture_path()).expect("fixture loads"));
static GRAPH: Lazy<Graph> = Lazy::new(|| build_graph(&SNAPSHOT).expect("fixture builds"));
static ASTAR_REQUEST: Lazy<RouteRequest> = Lazy::new(|| RouteRequest::between_rooms(201, 150));
static DIJKSTRA_REQUEST: Lazy<RouteRequest> = Lazy::new(|| {
    RouteRequest::between_rooms(201, 150).with_algorithm(RouteAlgorithm::Dijkstra)
});

fn benchmark_pathfinding(c: &mut Criterion) {
    let snapshot = &*SNAPSHOT;

    c.bench_function("build_graph_sample_campus", |b| {
        b.iter(|| {
            let graph = build_graph(snapshot).expect("fixture builds");
            black_box(graph.edge_count())
        });
    });

    c.bench_function("astar_201_150", |b| {
        let request = &*ASTAR_REQUEST;
        b.iter(|| {
            let plan = plan_route(snapshot, request).expect("plan");
            black_box(plan.point_count())
        });
    });

    c.bench_function("dijkstra_201_150", |b| {
        let request = &*DIJKSTRA_REQUEST;
        b.iter(|| {
            let plan = plan_route(snapshot, request).expect("plan");
            black_box(plan.point_count())
        });
    });

    c.bench_function("astar_201_150_prebuilt", |b| {
        let graph = &*GRAPH;
        let request = &*ASTAR_REQUEST;
        b.iter(|| {
            let plan = plan_route_on_graph(graph, request).expect("plan");
            black_box(plan.instructions.len())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
