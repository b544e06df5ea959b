//! Route command handler for computing walks between two vertices.

use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use campusnav_lib::{plan_route, RouteAlgorithm, RouteRequest, VertexKind};

use crate::commands::open_snapshot;
use crate::output::OutputFormat;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting vertex key, or a bare room id.
    pub from: String,
    /// Destination vertex key, or a bare room id.
    pub to: String,
    /// Algorithm to use when planning the route.
    pub algorithm: RouteAlgorithm,
}

impl RouteCommandArgs {
    /// Convert CLI args to a library RouteRequest.
    pub fn to_request(&self) -> Result<RouteRequest> {
        let start = parse_vertex(&self.from)?;
        let goal = parse_vertex(&self.to)?;
        Ok(RouteRequest::new(start, goal).with_algorithm(self.algorithm))
    }
}

/// Accept `101` as shorthand for `room_101`; anything else is a vertex key.
pub fn parse_vertex(value: &str) -> Result<VertexKind> {
    let value = value.trim();
    if let Ok(room) = value.parse::<i64>() {
        return Ok(VertexKind::Room(room));
    }
    value
        .parse::<VertexKind>()
        .map_err(|err| anyhow!(err))
        .with_context(|| format!("invalid vertex key '{value}'"))
}

/// Handle the route subcommand.
///
/// The plan is always written, even when empty. A missing route is then
/// reported as [`campusnav_lib::Error::NoPathFound`] so the caller can pick
/// an exit code.
pub fn handle_route_command<W: Write>(
    snapshot_path: &Path,
    format: OutputFormat,
    args: &RouteCommandArgs,
    out: &mut W,
) -> Result<()> {
    let snapshot = open_snapshot(snapshot_path)?;
    let request = args.to_request()?;

    let plan = plan_route(&snapshot, &request).with_context(|| {
        format!(
            "failed to plan route from {} to {}",
            request.start, request.goal
        )
    })?;
    info!(
        start = %request.start,
        goal = %request.goal,
        algorithm = %request.algorithm,
        points = plan.point_count(),
        "route planned"
    );

    format
        .write_plan(out, &plan)
        .context("failed to write route plan")?;
    plan.ensure_found(&request)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_numbers_are_rooms() {
        assert_eq!(parse_vertex("101").expect("room"), VertexKind::Room(101));
        assert_eq!(parse_vertex("room_7").expect("room"), VertexKind::Room(7));
        assert_eq!(
            parse_vertex("gate").expect("point"),
            VertexKind::Point("gate".to_string())
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = parse_vertex("  ").expect_err("empty");
        assert!(format!("{err:#}").contains("invalid vertex key"));
    }

    #[test]
    fn request_carries_algorithm() {
        let args = RouteCommandArgs {
            from: "101".to_string(),
            to: "phantom_stair_30_end".to_string(),
            algorithm: RouteAlgorithm::Dijkstra,
        };
        let request = args.to_request().expect("request");
        assert_eq!(request.algorithm, RouteAlgorithm::Dijkstra);
        assert_eq!(request.goal.to_string(), "phantom_stair_30_end");
    }
}
