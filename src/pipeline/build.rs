//! Step `build_pdf`: two-pass batch compile of the entry document.
//!
//! The compiler runs with the working directory as CWD so relative
//! `\input{chapters/…}` and image paths resolve, while `-output-directory`
//! redirects the PDF and auxiliary files into the output directory. The
//! output directory is passed as an absolute path because relative paths
//! would be interpreted against the compiler's CWD, not ours.
//!
//! Two passes are a fixed heuristic: the first pass writes the table of
//! contents and cross-reference data, the second typesets with them in
//! place. There is no convergence check — two passes match what the book's
//! layout actually needs, and a deterministic pass count keeps CI timing
//! predictable.

use crate::config::BuildConfig;
use crate::error::StepError;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, info};

/// How many trailing lines of compiler output to keep in an error message.
/// LaTeX prints the actual failure at the end of a very chatty transcript.
const OUTPUT_TAIL_LINES: usize = 25;

/// Run the compiler `config.passes` times on the entry document.
pub fn run(config: &BuildConfig) -> Result<(), StepError> {
    let entry = config.entry_path();
    if !entry.is_file() {
        return Err(StepError::MissingEntryDocument { path: entry });
    }

    fs::create_dir_all(&config.output_dir).map_err(|e| StepError::CreateDirFailed {
        path: config.output_dir.clone(),
        source: e,
    })?;
    let output_dir = absolute_output_dir(config)?;

    for pass in 1..=config.passes {
        info!("Compiler pass {}/{}", pass, config.passes);
        let output = Command::new(&config.compiler)
            .arg("-interaction=nonstopmode")
            .arg("-output-directory")
            .arg(&output_dir)
            .arg(&config.entry_name)
            .current_dir(&config.work_dir)
            .output()
            .map_err(|e| StepError::CompilerLaunch {
                program: config.compiler.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(StepError::CompilerFailed {
                pass,
                passes: config.passes,
                status: output.status,
                output: output_tail(&output.stdout, &output.stderr),
            });
        }
        debug!("Pass {} complete", pass);
    }

    info!("PDF written to {}", config.pdf_path().display());
    Ok(())
}

/// Canonicalised output directory (it exists by now, so this cannot dangle).
fn absolute_output_dir(config: &BuildConfig) -> Result<PathBuf, StepError> {
    fs::canonicalize(&config.output_dir).map_err(|e| StepError::ReadFailed {
        path: config.output_dir.clone(),
        source: e,
    })
}

/// Last [`OUTPUT_TAIL_LINES`] lines of the combined tool output.
fn output_tail(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    let err = String::from_utf8_lossy(stderr);
    if !err.trim().is_empty() {
        combined.push('\n');
        combined.push_str(&err);
    }
    let lines: Vec<&str> = combined.lines().collect();
    let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(root: &TempDir, compiler: &str) -> BuildConfig {
        BuildConfig::builder()
            .work_dir(root.path().join("latex"))
            .output_dir(root.path().join("out"))
            .compiler(compiler)
            .build()
            .unwrap()
    }

    #[test]
    fn missing_entry_fails_before_launching_compiler() {
        let root = TempDir::new().unwrap();
        // A nonexistent compiler would fail at launch; the entry-document
        // check must fire first.
        let config = config_in(&root, "bookforge-no-such-tool");
        std::fs::create_dir_all(&config.work_dir).unwrap();

        let err = run(&config).unwrap_err();
        match err {
            StepError::MissingEntryDocument { path } => {
                assert!(path.ends_with("main.tex"), "got: {}", path.display());
            }
            other => panic!("expected MissingEntryDocument, got: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn failing_pass_reports_pass_number() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root, "false");
        std::fs::create_dir_all(&config.work_dir).unwrap();
        std::fs::write(config.entry_path(), "\\end{document}\n").unwrap();

        let err = run(&config).unwrap_err();
        match err {
            StepError::CompilerFailed { pass, passes, .. } => {
                assert_eq!(pass, 1);
                assert_eq!(passes, 2);
            }
            other => panic!("expected CompilerFailed, got: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_compile_runs_all_passes() {
        let root = TempDir::new().unwrap();
        let config = config_in(&root, "true");
        std::fs::create_dir_all(&config.work_dir).unwrap();
        std::fs::write(config.entry_path(), "\\end{document}\n").unwrap();

        run(&config).unwrap();
        assert!(config.output_dir.is_dir());
    }

    #[test]
    fn output_tail_keeps_last_lines_only() {
        let stdout: String = (0..100).map(|i| format!("line {i}\n")).collect();
        let tail = output_tail(stdout.as_bytes(), b"! Undefined control sequence.");
        assert!(tail.contains("line 99"));
        assert!(!tail.contains("line 10\n"));
        assert!(tail.contains("Undefined control sequence"));
    }
}
