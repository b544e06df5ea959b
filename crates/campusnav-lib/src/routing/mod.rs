//! Route planning module: graph build, search, and narration in one call.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported search algorithms (A*, Dijkstra)
//! - [`RouteRequest`] - Start/goal vertices plus algorithm choice
//! - [`RoutePlan`] - Floor-grouped points, total weight and instructions
//! - [`plan_route`] - Main entry point for computing routes
//!
//! # Strategy Pattern
//!
//! Each search algorithm sits behind the [`RoutePlanner`] trait so the
//! orchestration below never branches on the algorithm itself.
//!
//! # Example
//!
//! ```no_run
//! use campusnav_lib::{load_snapshot, plan_route, RouteRequest};
//!
//! let snapshot = load_snapshot(std::path::Path::new("campus.json"))?;
//! let plan = plan_route(&snapshot, &RouteRequest::between_rooms(101, 205))?;
//! println!("{} instructions", plan.instructions.len());
//! # Ok::<(), campusnav_lib::Error>(())
//! ```

mod planner;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{build_graph, Graph, VertexKind};
use crate::model::{MapSnapshot, RoomId};
use crate::narrate::{narrate, FloorGroup};

/// Supported routing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// A* search guided by the floor-weighted distance.
    #[default]
    #[serde(rename = "a-star")]
    AStar,
    /// Dijkstra's algorithm; slower, used to cross-check A*.
    Dijkstra,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::AStar => "a-star",
            RouteAlgorithm::Dijkstra => "dijkstra",
        };
        f.write_str(value)
    }
}

impl FromStr for RouteAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a-star" | "astar" | "a_star" => Ok(RouteAlgorithm::AStar),
            "dijkstra" => Ok(RouteAlgorithm::Dijkstra),
            other => Err(format!(
                "unknown algorithm '{other}'; expected 'a-star' or 'dijkstra'"
            )),
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub start: VertexKind,
    pub goal: VertexKind,
    pub algorithm: RouteAlgorithm,
}

impl RouteRequest {
    pub fn new(start: VertexKind, goal: VertexKind) -> Self {
        Self {
            start,
            goal,
            algorithm: RouteAlgorithm::default(),
        }
    }

    /// Convenience constructor for the common room-to-room query.
    pub fn between_rooms(start: RoomId, goal: RoomId) -> Self {
        Self::new(VertexKind::Room(start), VertexKind::Room(goal))
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

/// Planned route returned by the library.
///
/// An empty `path` with infinite `weight` means no route exists; the weight
/// is left out of the serialised form in that case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub path: Vec<FloorGroup>,
    #[serde(skip_serializing_if = "is_unreachable")]
    pub weight: f64,
    pub instructions: Vec<String>,
}

fn is_unreachable(weight: &f64) -> bool {
    !weight.is_finite()
}

impl RoutePlan {
    /// The plan reported when no route exists.
    pub fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            weight: f64::INFINITY,
            instructions: Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Total number of points across all floor groups.
    pub fn point_count(&self) -> usize {
        self.path.iter().map(|group| group.points.len()).sum()
    }

    /// Turn the "no route" outcome into [`Error::NoPathFound`].
    pub fn ensure_found(&self, request: &RouteRequest) -> Result<()> {
        if self.is_found() {
            Ok(())
        } else {
            Err(Error::NoPathFound {
                start: request.start.to_string(),
                goal: request.goal.to_string(),
            })
        }
    }
}

/// Compute a route for `request` over a freshly built graph.
///
/// 1. Builds the graph from the snapshot
/// 2. Resolves the start and goal vertices
/// 3. Runs the selected planner
/// 4. Narrates the resulting path
pub fn plan_route(snapshot: &MapSnapshot, request: &RouteRequest) -> Result<RoutePlan> {
    let graph = build_graph(snapshot)?;
    plan_route_on_graph(&graph, request)
}

/// Same as [`plan_route`] for a graph that has already been built.
pub fn plan_route_on_graph(graph: &Graph, request: &RouteRequest) -> Result<RoutePlan> {
    let endpoints = graph
        .require(&request.start)
        .and_then(|start| Ok((start, graph.require(&request.goal)?)));
    let (start, goal) = match endpoints {
        Ok(ids) => ids,
        Err(err) => {
            debug!(error = %err, "route endpoint missing from graph");
            return Ok(RoutePlan::unreachable());
        }
    };

    let planner = select_planner(request);
    let route = planner.find_path(graph, start, goal);
    if !route.is_found() {
        debug!(
            start = %request.start,
            goal = %request.goal,
            algorithm = %planner.algorithm(),
            "no route between endpoints"
        );
        return Ok(RoutePlan::unreachable());
    }

    let narration = narrate(graph, &route.vertices)?;
    Ok(RoutePlan {
        path: narration.floors,
        weight: route.cost,
        instructions: narration.instructions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_parses_cli_spellings() {
        assert_eq!("a-star".parse::<RouteAlgorithm>(), Ok(RouteAlgorithm::AStar));
        assert_eq!("AStar".parse::<RouteAlgorithm>(), Ok(RouteAlgorithm::AStar));
        assert_eq!(
            "dijkstra".parse::<RouteAlgorithm>(),
            Ok(RouteAlgorithm::Dijkstra)
        );
        assert!("bfs".parse::<RouteAlgorithm>().is_err());
    }

    #[test]
    fn unreachable_plan_omits_weight() {
        let plan = RoutePlan::unreachable();
        assert!(!plan.is_found());
        let json = serde_json::to_value(&plan).expect("serialises");
        assert_eq!(json, serde_json::json!({ "path": [], "instructions": [] }));
    }

    #[test]
    fn ensure_found_names_endpoints() {
        let request = RouteRequest::between_rooms(1, 2);
        let err = RoutePlan::unreachable()
            .ensure_found(&request)
            .expect_err("empty plan");
        assert_eq!(err.to_string(), "no route found between room_1 and room_2");
    }

    #[test]
    fn missing_endpoint_yields_unreachable_plan() {
        let plan = plan_route_on_graph(&Graph::new(), &RouteRequest::between_rooms(1, 2))
            .expect("missing vertices are not an error");
        assert_eq!(plan, RoutePlan::unreachable());
    }
}
