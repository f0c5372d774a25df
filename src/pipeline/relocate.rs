//! Step `relocate`: move compiler by-products out of the output directory.
//!
//! A LaTeX run leaves `.log`, `.aux`, `.toc` and friends next to the PDF.
//! Publishing automation uploads whatever sits at the top level of `out/`,
//! so everything that is not a PDF is moved into `out/temp/` — kept, not
//! deleted, because the log is the first thing to read when a build looks
//! wrong. Subdirectories (including a `temp/` from a previous run) are left
//! in place.

use crate::config::BuildConfig;
use crate::error::StepError;
use std::fs;
use tracing::{debug, info};

/// Move every non-PDF regular file in `output_dir` into `output_dir/temp/`.
pub fn run(config: &BuildConfig) -> Result<(), StepError> {
    if !config.output_dir.is_dir() {
        debug!("No output directory at {}, nothing to relocate", config.output_dir.display());
        return Ok(());
    }

    let temp_dir = config.temp_dir();
    let entries = fs::read_dir(&config.output_dir).map_err(|e| StepError::ReadFailed {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let mut moved = 0usize;
    for entry in entries {
        let entry = entry.map_err(|e| StepError::ReadFailed {
            path: config.output_dir.clone(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() || is_pdf(&path) {
            continue;
        }

        // Created lazily so a PDF-only output directory stays as-is.
        fs::create_dir_all(&temp_dir).map_err(|e| StepError::CreateDirFailed {
            path: temp_dir.clone(),
            source: e,
        })?;

        let target = temp_dir.join(entry.file_name());
        fs::rename(&path, &target).map_err(|e| StepError::MoveFailed {
            from: path.clone(),
            to: target.clone(),
            source: e,
        })?;
        debug!("Relocated {} → {}", path.display(), target.display());
        moved += 1;
    }

    info!("Relocated {} auxiliary files into {}", moved, temp_dir.display());
    Ok(())
}

fn is_pdf(path: &std::path::Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(root: &TempDir) -> BuildConfig {
        BuildConfig::builder()
            .output_dir(root.path().join("out"))
            .build()
            .unwrap()
    }

    #[test]
    fn moves_aux_files_and_keeps_pdf() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        std::fs::create_dir_all(&config.output_dir).unwrap();
        for name in ["main.pdf", "main.log", "main.aux", "main.toc"] {
            std::fs::write(config.output_dir.join(name), "x").unwrap();
        }

        run(&config).unwrap();

        assert!(config.output_dir.join("main.pdf").is_file());
        assert!(!config.output_dir.join("main.log").exists());
        let temp = config.temp_dir();
        assert!(temp.join("main.log").is_file());
        assert!(temp.join("main.aux").is_file());
        assert!(temp.join("main.toc").is_file());
    }

    #[test]
    fn pdf_extension_match_is_case_insensitive() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        std::fs::create_dir_all(&config.output_dir).unwrap();
        std::fs::write(config.output_dir.join("MAIN.PDF"), "x").unwrap();

        run(&config).unwrap();
        assert!(config.output_dir.join("MAIN.PDF").is_file());
    }

    #[test]
    fn missing_output_dir_is_a_noop() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        run(&config).unwrap();
        assert!(!config.temp_dir().exists());
    }

    #[test]
    fn repeated_runs_overwrite_previous_temp_files() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        std::fs::create_dir_all(&config.output_dir).unwrap();
        std::fs::write(config.output_dir.join("main.log"), "first").unwrap();
        run(&config).unwrap();

        std::fs::write(config.output_dir.join("main.log"), "second").unwrap();
        run(&config).unwrap();

        let log = std::fs::read_to_string(config.temp_dir().join("main.log")).unwrap();
        assert_eq!(log, "second");
    }
}
