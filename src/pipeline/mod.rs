//! Pipeline steps for the Markdown-to-PDF build.
//!
//! Each submodule implements exactly one transformation step. Keeping steps
//! separate makes each independently testable and independently invocable
//! via `--only-step`, without the driver knowing anything about what a step
//! does internally.
//!
//! ## Data Flow
//!
//! ```text
//! markdown/ ──▶ clean ──▶ convert ──▶ copy_assets ──▶ substitute ──▶
//!               (wipe)    (pandoc)    (photos/)       (rewrite .tex)
//!
//!           ──▶ copy_theme ──▶ compose ──▶ build_pdf ──▶ relocate ──▶ out/
//!               (templates)    (main.tex)  (xelatex ×2)  (aux → temp/)
//! ```
//!
//! 1. [`clean`]      — empty the derived LaTeX working directory
//! 2. [`convert`]    — one converter invocation per chapter, sorted by name
//! 3. [`assets`]     — copy the image tree verbatim, preserving layout
//! 4. [`substitute`] — literal, ordered, idempotent find/replace on `.tex`
//! 5. [`theme`]      — copy static template files into the working directory
//! 6. [`compose`]    — regenerate the composite entry document
//! 7. [`build`]      — two-pass batch compile; second pass resolves xrefs
//! 8. [`relocate`]   — move non-PDF artifacts into `out/temp/`
//!
//! Every step takes the full [`crate::config::BuildConfig`] and returns
//! `Result<(), StepError>`; ordering and skip flags live in
//! [`crate::driver`], not here.

pub mod assets;
pub mod build;
pub mod clean;
pub mod compose;
pub mod convert;
pub mod relocate;
pub mod substitute;
pub mod theme;
