//! Step `copy_theme`: copy template files into the working directory.
//!
//! The themes directory holds static LaTeX fragments owned outside this
//! pipeline — the preamble, the cover page, and the converter template. They
//! are copied verbatim (top-level regular files only) so the composite entry
//! document can `\input` them by bare filename from inside the working
//! directory. Existing copies are overwritten; the themes directory itself
//! must exist.

use crate::config::BuildConfig;
use crate::error::StepError;
use std::fs;
use tracing::{debug, info};

/// Copy every regular file in `themes_dir` into `work_dir`.
pub fn run(config: &BuildConfig) -> Result<(), StepError> {
    if !config.themes_dir.is_dir() {
        return Err(StepError::MissingDirectory {
            path: config.themes_dir.clone(),
        });
    }
    fs::create_dir_all(&config.work_dir).map_err(|e| StepError::CreateDirFailed {
        path: config.work_dir.clone(),
        source: e,
    })?;

    let entries = fs::read_dir(&config.themes_dir).map_err(|e| StepError::ReadFailed {
        path: config.themes_dir.clone(),
        source: e,
    })?;

    let mut copied = 0usize;
    for entry in entries {
        let entry = entry.map_err(|e| StepError::ReadFailed {
            path: config.themes_dir.clone(),
            source: e,
        })?;
        let src = entry.path();
        if !src.is_file() {
            continue;
        }
        let dst = config.work_dir.join(entry.file_name());
        fs::copy(&src, &dst).map_err(|e| StepError::CopyFailed {
            from: src.clone(),
            to: dst.clone(),
            source: e,
        })?;
        debug!("Copied theme file {}", dst.display());
        copied += 1;
    }

    info!("Copied {} theme files into {}", copied, config.work_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(root: &TempDir) -> BuildConfig {
        BuildConfig::builder()
            .themes_dir(root.path().join("themes"))
            .work_dir(root.path().join("latex"))
            .build()
            .unwrap()
    }

    #[test]
    fn missing_themes_dir_is_an_error() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);

        let err = run(&config).unwrap_err();
        assert!(matches!(err, StepError::MissingDirectory { .. }), "got: {err}");
    }

    #[test]
    fn copies_files_and_overwrites_existing() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        std::fs::create_dir_all(&config.themes_dir).unwrap();
        std::fs::create_dir_all(&config.work_dir).unwrap();
        std::fs::write(config.themes_dir.join("preamble.tex"), "new preamble").unwrap();
        std::fs::write(config.themes_dir.join("cover.tex"), "cover").unwrap();
        std::fs::write(config.work_dir.join("preamble.tex"), "old preamble").unwrap();

        run(&config).unwrap();

        let preamble = std::fs::read_to_string(config.work_dir.join("preamble.tex")).unwrap();
        assert_eq!(preamble, "new preamble");
        assert!(config.work_dir.join("cover.tex").is_file());
    }

    #[test]
    fn subdirectories_are_not_copied() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        std::fs::create_dir_all(config.themes_dir.join("fonts")).unwrap();
        std::fs::write(config.themes_dir.join("fonts/serif.otf"), "font").unwrap();
        std::fs::write(config.themes_dir.join("cover.tex"), "cover").unwrap();

        run(&config).unwrap();

        assert!(config.work_dir.join("cover.tex").is_file());
        assert!(!config.work_dir.join("fonts").exists());
    }
}
