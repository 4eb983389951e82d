//! Core utilities shared by the on-disk areas

use anyhow::Context;
use fake::rand;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `data` so readers only ever observe the old or the new content
///
/// The data goes to a sibling temp file first, which is then renamed over `path`.
pub fn write_atomically(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("Invalid file path {}", path.display()))?;
    let temp_path = dir.join(generate_temp_name());

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .with_context(|| format!("Unable to open temp file {}", temp_path.display()))?;

    let written = file
        .write_all(data)
        .and_then(|_| file.sync_all())
        .with_context(|| format!("Unable to write temp file {}", temp_path.display()));
    if let Err(error) = written {
        let _ = std::fs::remove_file(&temp_path);
        return Err(error);
    }

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Unable to rename temp file to {}", path.display()))
}

fn generate_temp_name() -> String {
    format!("tmp-{}", rand::random::<u32>())
}
