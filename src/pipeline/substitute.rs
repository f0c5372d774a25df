//! Step `substitute`: literal rewrite rules on generated LaTeX files.
//!
//! pandoc's LaTeX output is correct but not always what the layout needs —
//! the stock example being floating figures that drift pages away from the
//! paragraph referencing them. Rather than patching the converter template
//! for every such tweak, this step applies a declared, ordered list of
//! literal `(pattern, replacement)` rules to every `.tex` file under the
//! working directory and rewrites changed files in place.
//!
//! ## Idempotence
//!
//! A rule whose replacement embeds its own pattern (`\begin{figure}` →
//! `\begin{figure}[H]`) would stack suffixes on repeated runs with a naive
//! `replace`. [`apply_rule`] therefore normalises occurrences already in
//! target form back to the pattern before substituting, so applying the rule
//! set twice equals applying it once. Rules whose replacement does not embed
//! the pattern are applied directly.

use crate::config::{BuildConfig, Substitution};
use crate::error::StepError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Apply the configured rule list to every `.tex` file under `work_dir`.
pub fn run(config: &BuildConfig) -> Result<(), StepError> {
    if config.substitutions.is_empty() {
        info!("No substitution rules configured");
        return Ok(());
    }
    if !config.work_dir.is_dir() {
        return Err(StepError::MissingDirectory {
            path: config.work_dir.clone(),
        });
    }

    let mut files = Vec::new();
    collect_tex_files(&config.work_dir, &mut files)?;
    files.sort();

    let mut modified = 0usize;
    for path in &files {
        let text = fs::read_to_string(path).map_err(|e| StepError::ReadFailed {
            path: path.clone(),
            source: e,
        })?;
        let rewritten = apply_rules(&text, &config.substitutions);
        if rewritten != text {
            fs::write(path, rewritten).map_err(|e| StepError::WriteFailed {
                path: path.clone(),
                source: e,
            })?;
            debug!("Rewrote {}", path.display());
            modified += 1;
        }
    }

    info!(
        "Applied {} rules across {} files ({} modified)",
        config.substitutions.len(),
        files.len(),
        modified
    );
    Ok(())
}

/// Apply all rules in declaration order.
///
/// Later rules see earlier rules' output, which is the documented contract:
/// a rule list is a tiny sequential rewrite program, not a set.
pub fn apply_rules(text: &str, rules: &[Substitution]) -> String {
    let mut out = text.to_string();
    for rule in rules {
        out = apply_rule(&out, rule);
    }
    out
}

/// Apply one literal rule, idempotently.
fn apply_rule(text: &str, rule: &Substitution) -> String {
    if rule.replacement.contains(&rule.pattern) {
        // Normalise already-rewritten occurrences first so a second pass
        // cannot stack the replacement's suffix onto itself.
        text.replace(&rule.replacement, &rule.pattern)
            .replace(&rule.pattern, &rule.replacement)
    } else {
        text.replace(&rule.pattern, &rule.replacement)
    }
}

/// Collect every `.tex` file under `dir`, recursing into subdirectories.
fn collect_tex_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), StepError> {
    let entries = fs::read_dir(dir).map_err(|e| StepError::ReadFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| StepError::ReadFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            collect_tex_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "tex") {
            out.push(path);
        }
    }
    Ok(())
}
