//! Campus navigation library entry points.
//!
//! This crate turns a snapshot of rooms, corridors, stairways and outdoor
//! paths into a request-scoped spatial graph, searches it with A*, and
//! narrates the result as floor-grouped points plus walking instructions.
//! Higher-level consumers (the CLI, an HTTP layer) should only depend on the
//! functions exported here instead of reimplementing behavior.

pub mod error;
pub mod geometry;
pub mod graph;
pub mod model;
pub mod narrate;
pub mod output;
pub mod path;
pub mod routing;

pub use error::{Error, Result};
pub use geometry::{project_onto_segment, Position, Projection};
pub use graph::{
    build_graph, Edge, EdgeKind, Graph, GraphBuilder, Side, Vertex, VertexId, VertexKind,
};
pub use model::{
    load_snapshot, Connection, Endpoint, MapSnapshot, Point, PointKind, Room, SegmentEnds,
};
pub use narrate::{classify_turn, narrate, turn_angle, FloorGroup, Narration, RoutePoint, Turn};
pub use path::{find_route, find_route_a_star, find_route_dijkstra, Route};
pub use routing::{plan_route, plan_route_on_graph, RouteAlgorithm, RoutePlan, RouteRequest};
