//! Entity snapshots handed to the navigation core.
//!
//! The storage layer owns campuses, buildings, floors and their geometry; the
//! core only ever sees the already-validated snapshot defined here. All
//! collections are ordered maps so that building a graph from the same
//! snapshot always inserts vertices and edges in the same order.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::geometry::Position;

pub type RoomId = i64;
pub type SegmentId = i64;
pub type OutdoorId = i64;
pub type ConnectionId = i64;
pub type BuildingId = i64;

/// A room as stored by the map editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub x: f64,
    pub y: f64,
    pub floor: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<BuildingId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Room {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Role of a named junction point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    #[default]
    Corridor,
    Stair,
    Entrance,
    Outdoor,
}

/// Junction point referenced by segment ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub floor: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<BuildingId>,
    #[serde(default)]
    pub kind: PointKind,
}

impl Point {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// Reference from a segment end to the entity it starts or stops at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Room(RoomId),
    Point(String),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Room(id) => write!(f, "room {id}"),
            Endpoint::Point(key) => write!(f, "point {key}"),
        }
    }
}

/// Two ends of an indoor or outdoor segment. Outdoor segments are walked
/// from `start` (far side) to `end` (arrival side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentEnds {
    pub start: Endpoint,
    pub end: Endpoint,
}

/// Link record tying a room, stairway or outdoor segment to a corridor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<SegmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outdoor_id: Option<OutdoorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_segment_id: Option<SegmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// The shape a connection record takes once its optional fields are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    RoomTap { room: RoomId, segment: SegmentId },
    Transition { outdoor: OutdoorId, segment: SegmentId },
    LandingLink { from: SegmentId, segment: SegmentId },
}

impl Connection {
    /// Classify the record; `None` when it names no usable pair.
    pub fn kind(&self) -> Option<ConnectionKind> {
        let segment = self.to_segment_id?;
        if let Some(room) = self.room_id {
            return Some(ConnectionKind::RoomTap { room, segment });
        }
        if let Some(outdoor) = self.outdoor_id {
            return Some(ConnectionKind::Transition { outdoor, segment });
        }
        self.segment_id
            .map(|from| ConnectionKind::LandingLink { from, segment })
    }
}

/// Everything the graph builder needs for one routing request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    #[serde(default)]
    pub rooms: BTreeMap<RoomId, Room>,
    #[serde(default)]
    pub points: BTreeMap<String, Point>,
    #[serde(default)]
    pub segments: BTreeMap<SegmentId, SegmentEnds>,
    #[serde(default)]
    pub outdoor_segments: BTreeMap<OutdoorId, SegmentEnds>,
    #[serde(default)]
    pub connections: BTreeMap<ConnectionId, Connection>,
}

impl MapSnapshot {
    /// Decode a snapshot from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether every entity collection that connections can point at is empty.
    pub fn has_no_entities(&self) -> bool {
        self.rooms.is_empty() && self.segments.is_empty() && self.outdoor_segments.is_empty()
    }
}

/// Load a snapshot from a JSON file on disk.
pub fn load_snapshot(path: &Path) -> Result<MapSnapshot> {
    let contents = std::fs::read_to_string(path)?;
    let snapshot = MapSnapshot::from_json_str(&contents)?;
    debug!(
        path = %path.display(),
        rooms = snapshot.rooms.len(),
        points = snapshot.points.len(),
        segments = snapshot.segments.len(),
        outdoor_segments = snapshot.outdoor_segments.len(),
        connections = snapshot.connections.len(),
        "loaded map snapshot"
    );
    Ok(snapshot)
}
