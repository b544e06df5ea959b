//! Output formatting for route plans and snapshot summaries.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use campusnav_lib::RoutePlan;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Floor-by-floor listing followed by numbered instructions.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Counts reported by the `inspect` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    pub rooms: usize,
    pub points: usize,
    pub segments: usize,
    pub outdoor_segments: usize,
    pub connections: usize,
    pub vertices: usize,
    pub phantom_vertices: usize,
    pub edges: usize,
}

impl OutputFormat {
    /// Write a route plan to `out` in this format.
    pub fn write_plan<W: Write>(self, out: &mut W, plan: &RoutePlan) -> io::Result<()> {
        match self {
            OutputFormat::Text => out.write_all(plan.render_text().as_bytes()),
            OutputFormat::Json => write_json(out, plan),
        }
    }

    /// Write snapshot counts to `out` in this format.
    pub fn write_summary<W: Write>(self, out: &mut W, summary: &SnapshotSummary) -> io::Result<()> {
        match self {
            OutputFormat::Text => {
                writeln!(out, "Rooms:            {}", summary.rooms)?;
                writeln!(out, "Points:           {}", summary.points)?;
                writeln!(out, "Segments:         {}", summary.segments)?;
                writeln!(out, "Outdoor segments: {}", summary.outdoor_segments)?;
                writeln!(out, "Connections:      {}", summary.connections)?;
                writeln!(
                    out,
                    "Graph: {} vertices ({} phantom), {} edges",
                    summary.vertices, summary.phantom_vertices, summary.edges
                )
            }
            OutputFormat::Json => write_json(out, summary),
        }
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}
