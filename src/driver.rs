//! The pipeline driver: an ordered table of named steps and the loop that
//! runs them.
//!
//! The whole control surface is a plain `const` table of
//! `(name, function, skip flag)` entries — no registry, no dynamic dispatch,
//! no state machine beyond "current step". Skip flags are declared on the
//! table entry rather than checked ad hoc inside the loop, so the planned
//! sequence can be computed (and shown, for `--dry-run`) without executing
//! anything.
//!
//! Failure semantics: the first failing step aborts the sequence. The step's
//! [`StepError`] is wrapped into [`BuildError::StepFailed`] carrying the step
//! name, so the caller (and the CI log) always sees *which* step died and
//! why. Nothing is retried.

use crate::config::BuildConfig;
use crate::error::{BuildError, StepError};
use crate::pipeline::{assets, build, clean, compose, convert, relocate, substitute, theme};
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Which CLI skip flag disables a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipFlag {
    /// Disabled by `--skip-md`.
    Convert,
    /// Disabled by `--skip-pdf`.
    Pdf,
}

/// One named, independently invocable pipeline step.
pub struct Step {
    /// CLI-visible name, accepted by `--only-step`.
    pub name: &'static str,
    /// One-line description for `--dry-run` and help output.
    pub description: &'static str,
    run: fn(&BuildConfig) -> Result<(), StepError>,
    /// Skip flag honoured in full-sequence runs (`--only-step` ignores it).
    pub skip: Option<SkipFlag>,
}

impl Step {
    /// Execute this step against the given configuration.
    pub fn execute(&self, config: &BuildConfig) -> Result<(), StepError> {
        (self.run)(config)
    }
}

/// The fixed pipeline, in execution order.
const STEPS: &[Step] = &[
    Step {
        name: "clean",
        description: "empty the LaTeX working directory",
        run: clean::run,
        skip: None,
    },
    Step {
        name: "convert",
        description: "convert Markdown chapters to LaTeX",
        run: convert::run,
        skip: Some(SkipFlag::Convert),
    },
    Step {
        name: "copy_assets",
        description: "copy the image tree into the working directory",
        run: assets::run,
        skip: None,
    },
    Step {
        name: "substitute",
        description: "apply literal rewrite rules to generated LaTeX",
        run: substitute::run,
        skip: None,
    },
    Step {
        name: "copy_theme",
        description: "copy template files into the working directory",
        run: theme::run,
        skip: None,
    },
    Step {
        name: "compose",
        description: "regenerate the composite entry document",
        run: compose::run,
        skip: None,
    },
    Step {
        name: "build_pdf",
        description: "compile the entry document (two passes)",
        run: build::run,
        skip: Some(SkipFlag::Pdf),
    },
    Step {
        name: "relocate",
        description: "move auxiliary compiler files into out/temp",
        run: relocate::run,
        skip: None,
    },
];

/// The full step table, in execution order.
pub fn steps() -> &'static [Step] {
    STEPS
}

/// Comma-separated list of valid step names, for error messages.
fn valid_names() -> String {
    STEPS
        .iter()
        .map(|s| s.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Skip flags for a full-sequence run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Omit the `convert` step (`--skip-md`).
    pub skip_convert: bool,
    /// Omit the `build_pdf` step (`--skip-pdf`).
    pub skip_pdf: bool,
}

impl RunOptions {
    fn skips(&self, step: &Step) -> bool {
        match step.skip {
            Some(SkipFlag::Convert) => self.skip_convert,
            Some(SkipFlag::Pdf) => self.skip_pdf,
            None => false,
        }
    }
}

/// Outcome of one executed (or skipped) step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub name: &'static str,
    pub skipped: bool,
    pub duration_ms: u64,
}

/// Summary of a pipeline run, returned on success.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub steps: Vec<StepReport>,
    pub total_duration_ms: u64,
}

/// The steps a full run would execute under the given options.
pub fn plan(options: &RunOptions) -> Vec<&'static Step> {
    STEPS.iter().filter(|s| !options.skips(s)).collect()
}

/// Run the full pipeline in fixed order, honouring skip flags.
///
/// Stops at the first failure; the error names the failed step.
pub fn run_pipeline(
    config: &BuildConfig,
    options: &RunOptions,
) -> Result<BuildReport, BuildError> {
    let total_start = Instant::now();
    let mut reports = Vec::with_capacity(STEPS.len());

    for step in STEPS {
        if options.skips(step) {
            info!("[skip] {}", step.name);
            reports.push(StepReport {
                name: step.name,
                skipped: true,
                duration_ms: 0,
            });
            continue;
        }
        reports.push(execute_step(step, config)?);
    }

    let report = BuildReport {
        steps: reports,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!("Pipeline complete in {}ms", report.total_duration_ms);
    Ok(report)
}

/// Run exactly one named step, bypassing ordering and skip flags.
///
/// An unknown name fails with [`BuildError::UnknownStep`] before anything
/// runs.
pub fn run_only(config: &BuildConfig, name: &str) -> Result<BuildReport, BuildError> {
    let step = STEPS
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| BuildError::UnknownStep {
            name: name.to_string(),
            valid: valid_names(),
        })?;

    let total_start = Instant::now();
    let report = execute_step(step, config)?;
    Ok(BuildReport {
        steps: vec![report],
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    })
}

fn execute_step(step: &'static Step, config: &BuildConfig) -> Result<StepReport, BuildError> {
    info!("[step] {} — {}", step.name, step.description);
    let start = Instant::now();
    step.execute(config).map_err(|source| BuildError::StepFailed {
        step: step.name,
        source,
    })?;
    Ok(StepReport {
        name: step.name,
        skipped: false,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}
