pub mod simulate;
pub mod terrain;

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use hb_core::{CubeType, NoopListener, Terrain};

/// How a command prints its report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Load a `[x][y][z]` JSON array of cube codes, or build the demo terrain.
fn load_terrain(path: Option<&Path>) -> Result<Terrain, String> {
    let Some(path) = path else {
        return demo_terrain();
    };
    let text =
        fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let codes: Vec<Vec<Vec<i32>>> = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not a terrain array: {e}", path.display()))?;
    Terrain::new(&codes, NoopListener).map_err(|e| format!("invalid terrain: {e}"))
}

/// A 16x16x8 valley: rock floor, a ridge along one side, a few trees and a
/// workshop in the middle.
fn demo_terrain() -> Result<Terrain, String> {
    Terrain::from_fn(16, 16, 8, |c| match (c.x, c.y, c.z) {
        (_, _, 0) => CubeType::Rock,
        (0..=2, _, 1..=3) => CubeType::Rock,
        (3, _, 1) => CubeType::Rock,
        (x, y, 1..=2) if (x, y) == (6, 4) || (x, y) == (10, 11) || (x, y) == (12, 5) => {
            CubeType::Tree
        }
        (8, 8, 1) => CubeType::Workshop,
        _ => CubeType::Air,
    })
    .map_err(|e| format!("invalid demo terrain: {e}"))
}
