use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Collect the board descriptions, sorted so the output is stable.
fn layouts(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("Reading {}", dir.display()))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.retain(|path| path.extension().map_or(false, |ext| ext == "json"));
    paths.sort();
    Ok(paths)
}

fn main() -> Result<()> {
    let manifest = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out = PathBuf::from(env::var("OUT_DIR")?);

    let dir = manifest.join("layouts");
    println!("cargo:rerun-if-changed={}", dir.display());
    let paths = layouts(&dir)?;
    for path in &paths {
        println!("cargo:rerun-if-changed={}", path.display());
    }

    kinesis_layout::write_boards(&paths, &out.join("boards.rs"))
        .context("While generating board modules")?;

    Ok(())
}
