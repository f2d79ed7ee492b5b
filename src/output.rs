//! Writing generated documents into the output directory.
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))
}

/// Write `text` to `out_dir/file_name`, creating the directory on demand.
pub fn write_text(out_dir: &Path, file_name: &str, text: &str) -> Result<PathBuf> {
    ensure_dir(out_dir)?;
    let path = out_dir.join(file_name);
    fs::write(&path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
