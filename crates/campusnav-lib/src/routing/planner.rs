//! Route planning strategies implementing the Strategy pattern.
//!
//! This module provides the `RoutePlanner` trait and one implementation per
//! search algorithm. Both planners search the same graph; only the heuristic
//! differs.

use crate::graph::{Graph, VertexId};
use crate::path::{find_route_a_star, find_route_dijkstra, Route};

use super::{RouteAlgorithm, RouteRequest};

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// The algorithm identifier for this planner.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Execute the search on the given graph.
    ///
    /// Returns [`Route::not_found`] when the goal cannot be reached.
    fn find_path(&self, graph: &Graph, start: VertexId, goal: VertexId) -> Route;
}

/// A* planner using the floor-weighted straight-line heuristic.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner;

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(&self, graph: &Graph, start: VertexId, goal: VertexId) -> Route {
        find_route_a_star(graph, start, goal)
    }
}

/// Dijkstra planner; always returns the cheapest route.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(&self, graph: &Graph, start: VertexId, goal: VertexId) -> Route {
        find_route_dijkstra(graph, start, goal)
    }
}

/// Select the appropriate planner for a given request.
pub fn select_planner(request: &RouteRequest) -> Box<dyn RoutePlanner> {
    match request.algorithm {
        RouteAlgorithm::AStar => Box::new(AStarPlanner),
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_planner_chooses_correct_type() {
        let request = RouteRequest::between_rooms(1, 2);
        assert_eq!(select_planner(&request).algorithm(), RouteAlgorithm::AStar);

        let request = request.with_algorithm(RouteAlgorithm::Dijkstra);
        assert_eq!(
            select_planner(&request).algorithm(),
            RouteAlgorithm::Dijkstra
        );
    }
}
