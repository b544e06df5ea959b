use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;
use tracing::debug;

use crate::graph::{Graph, Vertex, VertexId, VertexKind};

/// Scale applied to the floor difference inside the search heuristic.
pub const FLOOR_PENALTY: f64 = 50.0;

/// Ordered vertex sequence and its total cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub vertices: Vec<VertexId>,
    pub cost: f64,
}

impl Route {
    /// The "no route" outcome: no vertices, infinite cost.
    pub fn not_found() -> Self {
        Self {
            vertices: Vec::new(),
            cost: f64::INFINITY,
        }
    }

    pub fn is_found(&self) -> bool {
        !self.vertices.is_empty()
    }

    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

/// Straight-line distance where each floor of separation counts as
/// [`FLOOR_PENALTY`] planar units.
pub fn floor_weighted_distance(from: &Vertex, to: &Vertex) -> f64 {
    let dx = from.position.x - to.position.x;
    let dy = from.position.y - to.position.y;
    let dfloor = FLOOR_PENALTY * f64::from(from.floor - to.floor);
    (dx * dx + dy * dy + dfloor * dfloor).sqrt()
}

/// Find a route between `start` and `goal` using A* search.
pub fn find_route(graph: &Graph, start: VertexId, goal: VertexId) -> Route {
    find_route_a_star(graph, start, goal)
}

/// Run A* guided by [`floor_weighted_distance`].
///
/// Settled vertices are never reopened. The heuristic overestimates when a
/// stair costs less than its floor penalty, so across floors the result can
/// be costlier than [`find_route_dijkstra`] reports.
pub fn find_route_a_star(graph: &Graph, start: VertexId, goal: VertexId) -> Route {
    search(graph, start, goal, floor_weighted_distance)
}

/// Run Dijkstra's algorithm (the same search with a zero heuristic).
pub fn find_route_dijkstra(graph: &Graph, start: VertexId, goal: VertexId) -> Route {
    search(graph, start, goal, |_, _| 0.0)
}

fn search<H>(graph: &Graph, start: VertexId, goal: VertexId, heuristic: H) -> Route
where
    H: Fn(&Vertex, &Vertex) -> f64,
{
    let (Some(start_vertex), Some(goal_vertex)) = (graph.vertex(start), graph.vertex(goal)) else {
        return Route::not_found();
    };
    if start == goal {
        return Route {
            vertices: vec![start],
            cost: 0.0,
        };
    }

    let mut g_score = vec![f64::INFINITY; graph.len()];
    let mut parents: Vec<Option<VertexId>> = vec![None; graph.len()];
    let mut settled = vec![false; graph.len()];
    let mut queue = BinaryHeap::new();
    let mut sequence = 0u64;

    g_score[start] = 0.0;
    queue.push(SearchEntry::new(
        start,
        heuristic(start_vertex, goal_vertex),
        sequence,
    ));

    let mut expanded = 0usize;
    while let Some(entry) = queue.pop() {
        if settled[entry.node] {
            continue;
        }
        settled[entry.node] = true;

        if entry.node == goal {
            let raw = reconstruct_path(&parents, start, goal);
            debug!(expanded, hops = raw.len() - 1, cost = g_score[goal], "route found");
            return Route {
                vertices: tidy_path(graph, raw),
                cost: g_score[goal],
            };
        }
        expanded += 1;

        let current_score = g_score[entry.node];
        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            if settled[next] {
                continue;
            }

            let tentative_g = current_score + edge.weight;
            if tentative_g < g_score[next] {
                g_score[next] = tentative_g;
                parents[next] = Some(entry.node);
                let estimate = graph
                    .vertex(next)
                    .map(|vertex| heuristic(vertex, goal_vertex))
                    .unwrap_or(0.0);
                sequence += 1;
                queue.push(SearchEntry::new(next, tentative_g + estimate, sequence));
            }
        }
    }

    debug!(expanded, "search exhausted without reaching goal");
    Route::not_found()
}

fn reconstruct_path(
    parents: &[Option<VertexId>],
    start: VertexId,
    goal: VertexId,
) -> Vec<VertexId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents[node];
    }
    path.reverse();
    path
}

/// Drop repeated vertices and stair round trips (`X, Y, X` over one stairway).
fn tidy_path(graph: &Graph, raw: Vec<VertexId>) -> Vec<VertexId> {
    let mut tidy: Vec<VertexId> = Vec::with_capacity(raw.len());
    for node in raw {
        if tidy.last() == Some(&node) {
            continue;
        }
        if let [.., before, last] = tidy.as_slice() {
            if *before == node && same_stairway(graph, *last, node) {
                tidy.pop();
                continue;
            }
        }
        tidy.push(node);
    }
    tidy
}

fn same_stairway(graph: &Graph, from: VertexId, to: VertexId) -> bool {
    let (Some(a), Some(b)) = (graph.vertex(from), graph.vertex(to)) else {
        return false;
    };
    match (&a.kind, &b.kind) {
        (
            VertexKind::StairLanding { segment: first, .. },
            VertexKind::StairLanding { segment: second, .. },
        ) => first == second,
        _ => false,
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct SearchEntry {
    node: VertexId,
    estimate: FloatOrd,
    sequence: u64,
}

impl SearchEntry {
    fn new(node: VertexId, estimate: f64, sequence: u64) -> Self {
        Self {
            node,
            estimate: FloatOrd(estimate),
            sequence,
        }
    }
}

impl Ord for SearchEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap pops the lowest estimate, oldest first.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for SearchEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
