//! Inspect command handler: summarise a snapshot and the graph built from it.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use campusnav_lib::{build_graph, MapSnapshot};

use crate::commands::open_snapshot;
use crate::output::{OutputFormat, SnapshotSummary};

/// Build the graph for `snapshot` and count what went into it.
pub fn summarize(snapshot: &MapSnapshot) -> Result<SnapshotSummary> {
    let graph = build_graph(snapshot).context("failed to build navigation graph")?;
    let phantom_vertices = graph
        .vertices()
        .filter(|(_, vertex)| vertex.kind.is_phantom())
        .count();

    Ok(SnapshotSummary {
        rooms: snapshot.rooms.len(),
        points: snapshot.points.len(),
        segments: snapshot.segments.len(),
        outdoor_segments: snapshot.outdoor_segments.len(),
        connections: snapshot.connections.len(),
        vertices: graph.len(),
        phantom_vertices,
        edges: graph.edge_count() / 2,
    })
}

/// Handle the inspect subcommand.
pub fn handle_inspect_command<W: Write>(
    snapshot_path: &Path,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    let snapshot = open_snapshot(snapshot_path)?;
    let summary = summarize(&snapshot)?;
    format
        .write_summary(out, &summary)
        .context("failed to write snapshot summary")
}
