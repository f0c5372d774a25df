//! Step `convert`: Markdown chapters → LaTeX chapter files.
//!
//! One external converter invocation per chapter, in sorted filename order so
//! a run is deterministic regardless of directory enumeration order. The
//! converter itself (pandoc by default) is an opaque collaborator: this step
//! only builds its command line, waits for it, and maps a non-zero exit to a
//! [`StepError::ConverterFailed`] naming the offending chapter.

use crate::config::BuildConfig;
use crate::error::StepError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Pandoc template filename looked up under the themes directory.
///
/// Passed via `--template` only when the file exists, so a minimal book
/// without a custom template still converts with pandoc's built-in one.
const CONVERTER_TEMPLATE: &str = "article.tex";

/// Default figure width handed to the converter.
///
/// Keeps pandoc-emitted `\includegraphics` within the text block instead of
/// rendering photos at native resolution.
const GRAPHICS_WIDTH: &str = "0.8\\textwidth";

/// Convert every `*.md` chapter under `markdown_dir` into
/// `work_dir/chapters/<stem>.tex`.
pub fn run(config: &BuildConfig) -> Result<(), StepError> {
    if !config.markdown_dir.is_dir() {
        return Err(StepError::MissingDirectory {
            path: config.markdown_dir.clone(),
        });
    }

    let chapters_dir = config.chapters_dir();
    fs::create_dir_all(&chapters_dir).map_err(|e| StepError::CreateDirFailed {
        path: chapters_dir.clone(),
        source: e,
    })?;

    let chapters = list_chapters(config)?;
    if chapters.is_empty() {
        info!("No Markdown chapters in {}", config.markdown_dir.display());
        return Ok(());
    }

    for source in &chapters {
        // list_chapters only yields files with a stem-bearing `.md` name
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target = chapters_dir.join(format!("{stem}.tex"));
        debug!("Converting {} → {}", source.display(), target.display());
        convert_chapter(config, source, &target)?;
    }

    info!(
        "Converted {} chapters into {}",
        chapters.len(),
        chapters_dir.display()
    );
    Ok(())
}

/// Markdown chapter files under `markdown_dir`, sorted by filename.
pub fn list_chapters(config: &BuildConfig) -> Result<Vec<PathBuf>, StepError> {
    let entries = fs::read_dir(&config.markdown_dir).map_err(|e| StepError::ReadFailed {
        path: config.markdown_dir.clone(),
        source: e,
    })?;

    let mut chapters: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StepError::ReadFailed {
            path: config.markdown_dir.clone(),
            source: e,
        })?;
        let path = entry.path();
        let is_md = path.extension().is_some_and(|ext| ext == "md");
        if path.is_file() && is_md {
            chapters.push(path);
        }
    }
    chapters.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(chapters)
}

/// Run the converter for a single chapter.
fn convert_chapter(config: &BuildConfig, source: &Path, target: &Path) -> Result<(), StepError> {
    let mut cmd = Command::new(&config.converter);
    cmd.arg("--from")
        .arg("markdown")
        .arg("--to")
        .arg("latex")
        .arg("--standalone");

    let template = config.themes_dir.join(CONVERTER_TEMPLATE);
    if template.is_file() {
        cmd.arg(format!("--template={}", template.display()));
    } else {
        debug!(
            "No converter template at {}, using built-in",
            template.display()
        );
    }

    cmd.arg("--variable")
        .arg(format!("graphics-width={GRAPHICS_WIDTH}"))
        .arg("-o")
        .arg(target)
        .arg(source);

    let output = cmd.output().map_err(|e| StepError::ConverterLaunch {
        program: config.converter.clone(),
        source: e,
    })?;

    if !output.status.success() {
        return Err(StepError::ConverterFailed {
            chapter: source.to_path_buf(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(root: &TempDir) -> BuildConfig {
        BuildConfig::builder()
            .markdown_dir(root.path().join("markdown"))
            .themes_dir(root.path().join("themes"))
            .work_dir(root.path().join("latex"))
            .build()
            .unwrap()
    }

    #[test]
    fn missing_source_dir_is_an_error() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);

        let err = run(&config).unwrap_err();
        assert!(matches!(err, StepError::MissingDirectory { .. }), "got: {err}");
    }

    #[test]
    fn zero_chapters_succeeds_trivially() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        std::fs::create_dir_all(&config.markdown_dir).unwrap();

        run(&config).unwrap();
        assert!(config.chapters_dir().is_dir());
    }

    #[test]
    fn chapters_listed_in_sorted_order() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root);
        std::fs::create_dir_all(&config.markdown_dir).unwrap();
        for name in ["02-rules.md", "01-intro.md", "10-closing.md", "notes.txt"] {
            std::fs::write(config.markdown_dir.join(name), "# x").unwrap();
        }

        let names: Vec<String> = list_chapters(&config)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["01-intro.md", "02-rules.md", "10-closing.md"]);
    }

    #[cfg(unix)]
    #[test]
    fn converter_failure_names_the_chapter() {
        let root = TempDir::new().unwrap();
        let config = BuildConfig::builder()
            .markdown_dir(root.path().join("markdown"))
            .themes_dir(root.path().join("themes"))
            .work_dir(root.path().join("latex"))
            .converter("false")
            .build()
            .unwrap();
        std::fs::create_dir_all(&config.markdown_dir).unwrap();
        std::fs::write(config.markdown_dir.join("01-intro.md"), "# Intro").unwrap();

        let err = run(&config).unwrap_err();
        match err {
            StepError::ConverterFailed { chapter, .. } => {
                assert!(chapter.ends_with("01-intro.md"), "got: {}", chapter.display());
            }
            other => panic!("expected ConverterFailed, got: {other}"),
        }
    }

    #[test]
    fn unknown_converter_is_a_launch_error() {
        let root = TempDir::new().unwrap();
        let config = BuildConfig::builder()
            .markdown_dir(root.path().join("markdown"))
            .themes_dir(root.path().join("themes"))
            .work_dir(root.path().join("latex"))
            .converter("bookforge-no-such-tool")
            .build()
            .unwrap();
        std::fs::create_dir_all(&config.markdown_dir).unwrap();
        std::fs::write(config.markdown_dir.join("01-intro.md"), "# Intro").unwrap();

        let err = run(&config).unwrap_err();
        assert!(matches!(err, StepError::ConverterLaunch { .. }), "got: {err}");
    }
}
