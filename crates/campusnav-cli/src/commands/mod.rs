// Module exports for CLI subcommands.
//
// Each module handles one subcommand; main.rs only parses arguments and
// dispatches here.

pub mod inspect;
pub mod route;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use campusnav_lib::{load_snapshot, MapSnapshot};

/// Environment variable consulted when `--snapshot` is not given.
pub const SNAPSHOT_ENV: &str = "CAMPUSNAV_SNAPSHOT";

/// Resolve the snapshot path from the CLI flag, then the environment.
pub fn resolve_snapshot_path(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }

    match std::env::var_os(SNAPSHOT_ENV) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => bail!("no snapshot given; pass --snapshot or set {SNAPSHOT_ENV}"),
    }
}

/// Load the snapshot, attaching the path to any failure.
pub fn open_snapshot(path: &Path) -> Result<MapSnapshot> {
    load_snapshot(path).with_context(|| format!("failed to load snapshot from {}", path.display()))
}
