//! Error types for the bookforge library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BuildError`] — **Driver-level**: the pipeline as a whole could not run
//!   or was aborted. Either the caller asked for a step that does not exist,
//!   or a step failed and the remaining sequence was cancelled. Returned from
//!   [`crate::driver::run_pipeline`] and [`crate::driver::run_only`].
//!
//! * [`StepError`] — **Step-level**: the concrete cause inside a single step
//!   (missing directory, converter exit status, copy failure, …). Every
//!   pipeline submodule returns `Result<(), StepError>`; the driver wraps it
//!   into [`BuildError::StepFailed`] so the surfaced message always names
//!   both the step and the underlying cause.
//!
//! Nothing is retried and nothing is swallowed: the first `StepError` aborts
//! the run, which is exactly what a CI release job needs to fail visibly
//! instead of publishing a broken PDF.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Driver-level errors returned by the pipeline entry points.
#[derive(Debug, Error)]
pub enum BuildError {
    /// `--only-step` named a step that is not in the table.
    #[error("Unknown step '{name}'. Valid steps: {valid}")]
    UnknownStep { name: String, valid: String },

    /// A step failed; the remaining sequence was not run.
    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        step: &'static str,
        #[source]
        source: StepError,
    },
}

impl BuildError {
    /// The step that failed, if this error originated inside a step.
    pub fn step(&self) -> Option<&'static str> {
        match self {
            BuildError::StepFailed { step, .. } => Some(step),
            BuildError::UnknownStep { .. } => None,
        }
    }
}

/// The concrete cause of a single step failure.
#[derive(Debug, Error)]
pub enum StepError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// A directory the step requires does not exist.
    #[error("Required directory not found: '{path}'\nCheck the path exists, or point the pipeline elsewhere with the corresponding --*-dir flag.")]
    MissingDirectory { path: PathBuf },

    /// The composite entry document is missing — `compose` has not run.
    #[error("Entry document not found: '{path}'\nRun the convert and compose steps first (or a full pipeline run).")]
    MissingEntryDocument { path: PathBuf },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The converter could not be launched at all (not installed, not on PATH).
    #[error("Failed to launch converter '{program}': {source}\nIs pandoc installed and on your PATH?")]
    ConverterLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter exited non-zero for a specific chapter.
    #[error("Converter failed on chapter '{chapter}' ({status}):\n{stderr}")]
    ConverterFailed {
        chapter: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    // ── Build errors ──────────────────────────────────────────────────────
    /// The compiler could not be launched at all.
    #[error("Failed to launch compiler '{program}': {source}\nIs a TeX distribution with xelatex installed?")]
    CompilerLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The compiler exited non-zero on one of its passes.
    ///
    /// Carries the tail of the captured tool output, which is where LaTeX
    /// prints the actual error.
    #[error("Compiler failed on pass {pass}/{passes} ({status}). Output tail:\n{output}")]
    CompilerFailed {
        pass: u32,
        passes: u32,
        status: ExitStatus,
        output: String,
    },

    // ── Filesystem errors ─────────────────────────────────────────────────
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy '{from}' to '{to}': {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move '{from}' to '{to}': {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove '{path}': {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
