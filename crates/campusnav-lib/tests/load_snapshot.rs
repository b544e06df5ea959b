mod common;

use std::io::Write;

use campusnav_lib::{load_snapshot, Endpoint, Error, PointKind};
use tempfile::NamedTempFile;

#[test]
fn fixture_snapshot_loads() {
    let snapshot = common::load_fixture();
    assert_eq!(snapshot.rooms.len(), 5);
    assert_eq!(snapshot.segments.len(), 5);
    assert_eq!(snapshot.outdoor_segments.len(), 2);
    assert_eq!(snapshot.points["b1-stair-f1"].kind, PointKind::Stair);
    assert_eq!(snapshot.points["b1-f1-west"].kind, PointKind::Corridor);
    assert_eq!(
        snapshot.segments[&30].start,
        Endpoint::Point("b1-stair-f1".to_string())
    );
}

#[test]
fn snapshot_from_temp_file() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{ "rooms": {{ "7": {{ "x": 1.5, "y": 2.0, "floor": 3 }} }} }}"#
    )
    .expect("write snapshot");

    let snapshot = load_snapshot(file.path()).expect("snapshot loads");
    assert_eq!(snapshot.rooms[&7].floor, 3);
    assert!(snapshot.connections.is_empty());
}

#[test]
fn malformed_snapshot_is_a_json_error() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(file, "{{ not json").expect("write snapshot");

    let err = load_snapshot(file.path()).expect_err("malformed");
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn missing_snapshot_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_snapshot(&dir.path().join("absent.json")).expect_err("missing");
    assert!(matches!(err, Error::Io(_)));
}
