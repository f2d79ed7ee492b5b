//! Candidate manifest discovery under user-supplied paths.
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const ACTION_FILE_NAMES: &[&str] = &["action.yml", "action.yaml"];
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// `action.yml`/`action.yaml` files at or under `root`.
pub fn find_action_files(root: &Path) -> Result<Vec<PathBuf>> {
    find_matching(root, is_action_file)
}

/// Every `.yml`/`.yaml` file at or under `root`; content decides later
/// whether it is a workflow.
pub fn find_workflow_files(root: &Path) -> Result<Vec<PathBuf>> {
    find_matching(root, is_yaml_file)
}

/// Expand CLI path arguments: files are taken as given, directories (and `.`)
/// are searched. Missing paths are reported and skipped.
pub fn expand_paths(
    args: &[PathBuf],
    find: fn(&Path) -> Result<Vec<PathBuf>>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for arg in args {
        if arg.is_dir() {
            files.extend(find(arg)?);
        } else if arg.is_file() {
            files.push(arg.clone());
        } else {
            tracing::warn!(path = %arg.display(), "path does not exist");
        }
    }
    Ok(files)
}

pub fn is_action_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| ACTION_FILE_NAMES.contains(&name))
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
}

fn find_matching(root: &Path, keep: fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(if keep(root) {
            vec![root.to_path_buf()]
        } else {
            Vec::new()
        });
    }
    let mut files = collect_files_recursive(root)?;
    files.retain(|path| keep(path.as_path()));
    Ok(files)
}

fn collect_files_recursive(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !root.exists() {
        return Ok(files);
    }
    for entry in fs::read_dir(root).with_context(|| format!("read {}", root.display()))? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed; a link cycle would never end.
        if entry.file_type()?.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| SKIPPED_DIRS.contains(&name));
            if !skipped {
                files.extend(collect_files_recursive(&path)?);
            }
        } else if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
