//! Step `clean`: empty the LaTeX working directory.
//!
//! The working directory is fully derived, so the safe way to guarantee that
//! stale chapters from a previous run never end up in the composite document
//! is to wipe it before converting. The step is idempotent: an absent or
//! already-empty directory is not an error, it is the desired end state.

use crate::config::BuildConfig;
use crate::error::StepError;
use std::fs;
use tracing::{debug, info};

/// Remove every entry inside `work_dir` (creating it when absent), then
/// recreate the empty `chapters/` subdirectory.
pub fn run(config: &BuildConfig) -> Result<(), StepError> {
    let work_dir = &config.work_dir;

    if work_dir.exists() {
        let entries = fs::read_dir(work_dir).map_err(|e| StepError::ReadFailed {
            path: work_dir.clone(),
            source: e,
        })?;
        let mut removed = 0usize;
        for entry in entries {
            let entry = entry.map_err(|e| StepError::ReadFailed {
                path: work_dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            result.map_err(|e| StepError::RemoveFailed {
                path: path.clone(),
                source: e,
            })?;
            debug!("Removed {}", path.display());
            removed += 1;
        }
        info!("Cleaned {} ({} entries removed)", work_dir.display(), removed);
    } else {
        fs::create_dir_all(work_dir).map_err(|e| StepError::CreateDirFailed {
            path: work_dir.clone(),
            source: e,
        })?;
        info!("Created {}", work_dir.display());
    }

    let chapters = config.chapters_dir();
    fs::create_dir_all(&chapters).map_err(|e| StepError::CreateDirFailed {
        path: chapters,
        source: e,
    })?;

    Ok(())
}
