//! # bookforge
//!
//! Build a typeset PDF book from a directory of Markdown chapters.
//!
//! ## Why this crate?
//!
//! Small publications (here: a club survival guide) live as a pile of
//! Markdown chapter files plus a handful of LaTeX templates, and need to
//! become one PDF — locally while writing, and in a CI release job on tag.
//! The interesting work is done by external tools (pandoc converts, xelatex
//! typesets); what this crate provides is the glue: a deterministic,
//! skippable, fail-fast step pipeline around them.
//!
//! ## Pipeline Overview
//!
//! ```text
//! markdown/*.md
//!  │
//!  ├─ 1. clean        wipe the derived latex/ working directory
//!  ├─ 2. convert      pandoc per chapter → latex/chapters/*.tex
//!  ├─ 3. copy_assets  markdown/photos/ → latex/photos/ (verbatim)
//!  ├─ 4. substitute   literal rewrites (e.g. \begin{figure} → [H])
//!  ├─ 5. copy_theme   themes/*.tex → latex/ (preamble, cover, …)
//!  ├─ 6. compose      regenerate latex/main.tex (sorted \input list)
//!  ├─ 7. build_pdf    xelatex ×2 from latex/, output into out/
//!  └─ 8. relocate     out/*.{log,aux,toc,…} → out/temp/
//! ```
//!
//! Every step is independently invocable (`--only-step <name>`), steps 2 and
//! 7 are skippable (`--skip-md`, `--skip-pdf`), and the first failure aborts
//! the run with a non-zero exit naming the step — CI must fail loudly rather
//! than publish a half-built artifact.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bookforge::{run_pipeline, BuildConfig, RunOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BuildConfig::default(); // markdown/ themes/ latex/ out/
//!     let report = run_pipeline(&config, &RunOptions::default())?;
//!     println!("built in {}ms", report.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `bookforge` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! bookforge = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod driver;
pub mod error;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BuildConfig, BuildConfigBuilder, Substitution};
pub use driver::{plan, run_only, run_pipeline, BuildReport, RunOptions, SkipFlag, Step, StepReport};
pub use error::{BuildError, StepError};
