#![allow(dead_code)]

use std::path::PathBuf;

use campusnav_lib::{
    load_snapshot, Connection, Endpoint, MapSnapshot, Point, PointKind, Room, SegmentEnds,
};

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/sample_campus.json")
}

pub fn load_fixture() -> MapSnapshot {
    load_snapshot(&fixture_path()).expect("fixture snapshot loads")
}

/// One straight corridor (segment 1) from (0, 0) to (10, 0) on floor 1.
pub fn corridor() -> MapSnapshot {
    let mut snapshot = MapSnapshot::default();
    snapshot
        .points
        .insert("west".to_string(), corridor_point(0.0, 0.0, 1));
    snapshot
        .points
        .insert("east".to_string(), corridor_point(10.0, 0.0, 1));
    snapshot.segments.insert(
        1,
        SegmentEnds {
            start: Endpoint::Point("west".to_string()),
            end: Endpoint::Point("east".to_string()),
        },
    );
    snapshot
}

pub fn corridor_point(x: f64, y: f64, floor: i32) -> Point {
    Point {
        x,
        y,
        floor,
        building_id: Some(1),
        kind: PointKind::Corridor,
    }
}

/// Add a room on floor 1 and tap it onto `segment`, using the room id as the
/// connection id.
pub fn tap_room(snapshot: &mut MapSnapshot, id: i64, x: f64, y: f64, segment: i64) {
    snapshot.rooms.insert(
        id,
        Room {
            x,
            y,
            floor: 1,
            building_id: Some(1),
            name: None,
        },
    );
    snapshot.connections.insert(
        id,
        Connection {
            room_id: Some(id),
            to_segment_id: Some(segment),
            ..Connection::default()
        },
    );
}
