//! Request-scoped spatial graph.
//!
//! Vertices live in an arena addressed by [`VertexId`]; the typed
//! [`VertexKind`] says what each vertex stands for. Every connection is stored
//! in both directions with the same weight and tag.

mod builder;

pub use builder::{build_graph, GraphBuilder, MIN_TRANSITION_WEIGHT};

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geometry::Position;
use crate::model::{BuildingId, OutdoorId, RoomId, SegmentId};

/// Index of a vertex inside a [`Graph`].
pub type VertexId = usize;

/// Which end of a segment a phantom vertex was materialised at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Start,
    End,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Start => Side::End,
            Side::End => Side::Start,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Side::Start => "start",
            Side::End => "end",
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "start" => Ok(Side::Start),
            "end" => Ok(Side::End),
            other => Err(format!("unknown segment side '{other}'")),
        }
    }
}

/// What a graph vertex represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexKind {
    /// A stored room.
    Room(RoomId),
    /// A named junction point (corridor bend, entrance, outdoor waypoint).
    Point(String),
    /// Synthetic landing at one end of a stairway segment.
    StairLanding { segment: SegmentId, side: Side },
    /// Synthetic tap where something joins a corridor segment.
    Tap { segment: SegmentId, index: usize },
    /// Synthetic far endpoint or door point of an outdoor segment used by a
    /// building transition.
    OutdoorEndpoint { outdoor: OutdoorId, side: Side },
}

impl VertexKind {
    /// Whether the vertex was synthesised by the builder.
    pub fn is_phantom(&self) -> bool {
        !matches!(self, VertexKind::Room(_) | VertexKind::Point(_))
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexKind::Room(id) => write!(f, "room_{id}"),
            VertexKind::Point(key) => f.write_str(key),
            VertexKind::StairLanding { segment, side } => {
                write!(f, "phantom_stair_{segment}_{}", side.as_str())
            }
            VertexKind::Tap { segment, index } => write!(f, "phantom_tap_{segment}_{index}"),
            VertexKind::OutdoorEndpoint { outdoor, side } => {
                write!(f, "outdoor_{outdoor}_{}", side.as_str())
            }
        }
    }
}

impl FromStr for VertexKind {
    type Err = String;

    /// Parse a vertex key as produced by `Display`. Keys that match none of the
    /// synthetic shapes are treated as junction point keys.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("vertex key must not be empty".to_string());
        }

        let parsed = if let Some(rest) = s.strip_prefix("room_") {
            rest.parse().ok().map(VertexKind::Room)
        } else if let Some(rest) = s.strip_prefix("phantom_stair_") {
            rest.rsplit_once('_').and_then(|(segment, side)| {
                Some(VertexKind::StairLanding {
                    segment: segment.parse().ok()?,
                    side: side.parse().ok()?,
                })
            })
        } else if let Some(rest) = s.strip_prefix("phantom_tap_") {
            rest.rsplit_once('_').and_then(|(segment, index)| {
                Some(VertexKind::Tap {
                    segment: segment.parse().ok()?,
                    index: index.parse().ok()?,
                })
            })
        } else if let Some(rest) = s.strip_prefix("outdoor_") {
            rest.rsplit_once('_').and_then(|(outdoor, side)| {
                Some(VertexKind::OutdoorEndpoint {
                    outdoor: outdoor.parse().ok()?,
                    side: side.parse().ok()?,
                })
            })
        } else {
            None
        };

        Ok(parsed.unwrap_or_else(|| VertexKind::Point(s.to_string())))
    }
}

/// A vertex with its planar position and floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub kind: VertexKind,
    pub position: Position,
    pub floor: i32,
    pub building_id: Option<BuildingId>,
    /// Whether the vertex lies outside any building.
    pub outdoor: bool,
}

impl Vertex {
    pub fn new(kind: VertexKind, position: Position, floor: i32) -> Self {
        let outdoor = matches!(kind, VertexKind::OutdoorEndpoint { .. });
        Self {
            kind,
            position,
            floor,
            building_id: None,
            outdoor,
        }
    }

    pub fn in_building(mut self, building_id: Option<BuildingId>) -> Self {
        self.building_id = building_id;
        self
    }

    pub fn outdoors(mut self) -> Self {
        self.outdoor = true;
        self
    }
}

/// Descriptive tag carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Segment,
    Stairs,
    Outdoor,
    Phantom,
    Transition,
    Room,
    Building,
}

impl EdgeKind {
    /// Edges that cross a building boundary.
    pub fn is_door(self) -> bool {
        matches!(self, EdgeKind::Transition | EdgeKind::Building)
    }
}

/// Directed adjacency entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: VertexId,
    pub kind: EdgeKind,
    pub weight: f64,
}

/// Graph structure shared by the search and the narrator.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Vec<Vertex>,
    index: HashMap<VertexKind, VertexId>,
    adjacency: Vec<Vec<Edge>>,
    cliques: BTreeMap<SegmentId, Vec<VertexId>>,
    arrivals: HashMap<OutdoorId, VertexId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of directed adjacency entries (twice the logical edge count).
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices.iter().enumerate()
    }

    pub fn vertex_id(&self, kind: &VertexKind) -> Option<VertexId> {
        self.index.get(kind).copied()
    }

    /// Like [`Graph::vertex_id`] but reports a missing vertex as an error.
    pub fn require(&self, kind: &VertexKind) -> Result<VertexId> {
        self.vertex_id(kind).ok_or_else(|| Error::VertexNotFound {
            key: kind.to_string(),
        })
    }

    /// Return the neighbours for a given vertex.
    pub fn neighbours(&self, id: VertexId) -> &[Edge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cheapest edge from `from` to `to`, if the two are adjacent.
    ///
    /// On equal weight a stairs or door edge wins over a plain one.
    pub fn edge_between(&self, from: VertexId, to: VertexId) -> Option<&Edge> {
        let plain = |edge: &Edge| !(edge.kind == EdgeKind::Stairs || edge.kind.is_door());
        self.neighbours(from)
            .iter()
            .filter(|edge| edge.target == to)
            .min_by(|a, b| {
                a.weight
                    .total_cmp(&b.weight)
                    .then_with(|| plain(a).cmp(&plain(b)))
            })
    }

    /// Phantom vertices registered on a segment.
    pub fn clique(&self, segment: SegmentId) -> &[VertexId] {
        self.cliques
            .get(&segment)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Real arrival point of an outdoor segment that feeds a building transition.
    pub fn outdoor_arrival(&self, outdoor: OutdoorId) -> Option<VertexId> {
        self.arrivals.get(&outdoor).copied()
    }

    /// Insert a vertex, or return the existing id when its kind is already present.
    pub fn insert_vertex(&mut self, vertex: Vertex) -> VertexId {
        if let Some(&id) = self.index.get(&vertex.kind) {
            return id;
        }
        let id = self.vertices.len();
        self.index.insert(vertex.kind.clone(), id);
        self.vertices.push(vertex);
        self.adjacency.push(Vec::new());
        id
    }

    /// Connect two existing vertices in both directions.
    ///
    /// Reconnecting a pair with the same tag keeps the cheaper weight; negative
    /// weights are clamped to zero. Unknown ids and self-loops are ignored.
    pub fn connect(&mut self, a: VertexId, b: VertexId, kind: EdgeKind, weight: f64) {
        if a == b || a >= self.vertices.len() || b >= self.vertices.len() {
            return;
        }
        let weight = weight.max(0.0);
        self.upsert_edge(a, b, kind, weight);
        self.upsert_edge(b, a, kind, weight);
    }

    fn upsert_edge(&mut self, from: VertexId, to: VertexId, kind: EdgeKind, weight: f64) {
        let edges = &mut self.adjacency[from];
        if let Some(existing) = edges
            .iter_mut()
            .find(|edge| edge.target == to && edge.kind == kind)
        {
            if weight < existing.weight {
                existing.weight = weight;
            }
            return;
        }
        edges.push(Edge {
            target: to,
            kind,
            weight,
        });
    }

    pub(crate) fn clique_mut(&mut self, segment: SegmentId) -> &mut Vec<VertexId> {
        self.cliques.entry(segment).or_default()
    }

    pub(crate) fn set_outdoor_arrival(&mut self, outdoor: OutdoorId, vertex: VertexId) {
        self.arrivals.insert(outdoor, vertex);
    }
}
