//! Step `copy_assets`: copy the image tree into the working directory.
//!
//! Chapters reference images by paths relative to the Markdown source tree
//! (`photos/logo.png`); copying the subdirectory under the same name into the
//! working directory keeps those paths valid for the compiler. The copy is
//! wholesale: any existing destination tree is removed first so deleted
//! images do not survive from a previous run.
//!
//! A missing source assets directory is not an error — plenty of documents
//! have no images at all.

use crate::config::BuildConfig;
use crate::error::StepError;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Copy `markdown_dir/<assets_subdir>` to `work_dir/<assets_subdir>`.
pub fn run(config: &BuildConfig) -> Result<(), StepError> {
    let source = config.markdown_dir.join(&config.assets_subdir);
    let target = config.work_dir.join(&config.assets_subdir);

    if !source.is_dir() {
        warn!("No assets directory at {}, skipping", source.display());
        return Ok(());
    }

    if target.exists() {
        fs::remove_dir_all(&target).map_err(|e| StepError::RemoveFailed {
            path: target.clone(),
            source: e,
        })?;
    }

    let copied = copy_dir_recursive(&source, &target)?;
    info!(
        "Copied {} asset files from {} to {}",
        copied,
        source.display(),
        target.display()
    );
    Ok(())
}

/// Recursively copy `from` into `to` (created fresh), returning the number of
/// files copied. Relative layout is preserved; symlinks are followed like
/// regular files.
fn copy_dir_recursive(from: &Path, to: &Path) -> Result<usize, StepError> {
    fs::create_dir_all(to).map_err(|e| StepError::CreateDirFailed {
        path: to.to_path_buf(),
        source: e,
    })?;

    let entries = fs::read_dir(from).map_err(|e| StepError::ReadFailed {
        path: from.to_path_buf(),
        source: e,
    })?;

    let mut copied = 0usize;
    for entry in entries {
        let entry = entry.map_err(|e| StepError::ReadFailed {
            path: from.to_path_buf(),
            source: e,
        })?;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        if src.is_dir() {
            copied += copy_dir_recursive(&src, &dst)?;
        } else {
            fs::copy(&src, &dst).map_err(|e| StepError::CopyFailed {
                from: src.clone(),
                to: dst.clone(),
                source: e,
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(root: &TempDir) -> BuildConfig {
        BuildConfig::builder()
            .markdown_dir(root.path().join("markdown"))
            .work_dir(root.path().join("latex"))
            .build()
            .unwrap()
    }

    #[test]
    fn missing_assets_dir_is_not_an_error() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        std::fs::create_dir_all(&config.markdown_dir).unwrap();

        run(&config).unwrap();
        assert!(!config.work_dir.join("photos").exists());
    }

    #[test]
    fn copies_nested_tree_preserving_layout() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        let src = config.markdown_dir.join("photos");
        std::fs::create_dir_all(src.join("ch01")).unwrap();
        std::fs::write(src.join("logo.png"), b"\x89PNG").unwrap();
        std::fs::write(src.join("ch01/map.png"), b"\x89PNG").unwrap();

        run(&config).unwrap();

        let dst = config.work_dir.join("photos");
        assert!(dst.join("logo.png").is_file());
        assert!(dst.join("ch01/map.png").is_file());
    }

    #[test]
    fn stale_destination_is_replaced() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        let src = config.markdown_dir.join("photos");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("logo.png"), b"new").unwrap();

        let dst = config.work_dir.join("photos");
        std::fs::create_dir_all(&dst).unwrap();
        std::fs::write(dst.join("deleted.png"), b"old").unwrap();

        run(&config).unwrap();

        assert!(dst.join("logo.png").is_file());
        assert!(!dst.join("deleted.png").exists());
    }
}
