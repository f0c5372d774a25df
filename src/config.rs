//! Configuration for a pipeline run.
//!
//! Every path, tool name, rewrite rule, and pass count lives in one explicit
//! [`BuildConfig`] that is passed into the driver and into each step. Steps
//! take the config as a plain `&BuildConfig` argument rather than reading
//! ambient/global state, which keeps each step independently testable against
//! a throwaway directory layout.
//!
//! # Design choice: builder over constructor
//! Most callers only want to move one or two directories; the builder lets
//! them set exactly that and rely on defaults (which match the conventional
//! `markdown/` / `themes/` / `latex/` / `out/` layout) for the rest.

use crate::error::StepError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One literal find/replace rule applied to generated LaTeX files.
///
/// Rules are applied in declaration order over the whole file, so a later
/// rule may act on an earlier rule's output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    /// Literal text to search for (no regex).
    pub pattern: String,
    /// Literal replacement text.
    pub replacement: String,
}

impl Substitution {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Configuration for a full pipeline run.
///
/// Built via [`BuildConfig::builder()`] or [`BuildConfig::default()`].
///
/// # Example
/// ```rust
/// use bookforge::BuildConfig;
///
/// let config = BuildConfig::builder()
///     .markdown_dir("content")
///     .output_dir("dist")
///     .passes(2)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory of Markdown chapter sources. Default: `./markdown`.
    pub markdown_dir: PathBuf,

    /// Image subdirectory name under `markdown_dir`. Default: `photos`.
    ///
    /// Copied verbatim under the same name into the working directory so
    /// relative image paths inside chapters keep resolving after conversion.
    pub assets_subdir: String,

    /// Directory of static templates (preamble, cover, pandoc template).
    /// Default: `./themes`.
    pub themes_dir: PathBuf,

    /// LaTeX working directory. Default: `./latex`.
    ///
    /// Fully derived and disposable: the `clean` step empties it at the start
    /// of a run so stale chapters from a previous run never linger.
    pub work_dir: PathBuf,

    /// Generated chapter subdirectory name under `work_dir`. Default: `chapters`.
    pub chapters_subdir: String,

    /// Output directory for the PDF and compiler artifacts. Default: `./out`.
    pub output_dir: PathBuf,

    /// Subdirectory name under `output_dir` receiving relocated auxiliary
    /// files (logs, aux tables, toc caches). Default: `temp`.
    pub temp_subdir: String,

    /// Markdown→LaTeX converter program. Default: `pandoc`.
    pub converter: String,

    /// LaTeX compiler program. Default: `xelatex`.
    pub compiler: String,

    /// Number of compiler passes. Default: 2.
    ///
    /// A single pass leaves cross-references (table of contents, page
    /// numbers) stale; the second pass resolves them. Exactly two passes is
    /// a fixed heuristic, not a convergence loop.
    pub passes: u32,

    /// Composite entry document filename. Default: `main.tex`.
    pub entry_name: String,

    /// Preamble template filename under `themes_dir`. Default: `preamble.tex`.
    pub preamble_name: String,

    /// Cover template filename under `themes_dir`. Default: `cover.tex`.
    pub cover_name: String,

    /// Ordered literal rewrite rules applied to every generated `.tex` file.
    ///
    /// Default: widen figure placement (`\begin{figure}` → `\begin{figure}[H]`)
    /// so pandoc's floating figures stay where the text puts them.
    pub substitutions: Vec<Substitution>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            markdown_dir: PathBuf::from("./markdown"),
            assets_subdir: "photos".to_string(),
            themes_dir: PathBuf::from("./themes"),
            work_dir: PathBuf::from("./latex"),
            chapters_subdir: "chapters".to_string(),
            output_dir: PathBuf::from("./out"),
            temp_subdir: "temp".to_string(),
            converter: "pandoc".to_string(),
            compiler: "xelatex".to_string(),
            passes: 2,
            entry_name: "main.tex".to_string(),
            preamble_name: "preamble.tex".to_string(),
            cover_name: "cover.tex".to_string(),
            substitutions: vec![Substitution::new("\\begin{figure}", "\\begin{figure}[H]")],
        }
    }
}

impl BuildConfig {
    /// Create a new builder for `BuildConfig`.
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder {
            config: Self::default(),
        }
    }

    /// Generated chapter directory: `work_dir/chapters_subdir`.
    pub fn chapters_dir(&self) -> PathBuf {
        self.work_dir.join(&self.chapters_subdir)
    }

    /// Relocation target for auxiliary files: `output_dir/temp_subdir`.
    pub fn temp_dir(&self) -> PathBuf {
        self.output_dir.join(&self.temp_subdir)
    }

    /// Path of the composite entry document: `work_dir/entry_name`.
    pub fn entry_path(&self) -> PathBuf {
        self.work_dir.join(&self.entry_name)
    }

    /// Path of the final PDF: `output_dir/<entry stem>.pdf`.
    pub fn pdf_path(&self) -> PathBuf {
        let stem = Path::new(&self.entry_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "main".to_string());
        self.output_dir.join(format!("{stem}.pdf"))
    }
}

/// Builder for [`BuildConfig`].
#[derive(Debug)]
pub struct BuildConfigBuilder {
    config: BuildConfig,
}

impl BuildConfigBuilder {
    pub fn markdown_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.markdown_dir = dir.into();
        self
    }

    pub fn assets_subdir(mut self, name: impl Into<String>) -> Self {
        self.config.assets_subdir = name.into();
        self
    }

    pub fn themes_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.themes_dir = dir.into();
        self
    }

    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.work_dir = dir.into();
        self
    }

    pub fn chapters_subdir(mut self, name: impl Into<String>) -> Self {
        self.config.chapters_subdir = name.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn temp_subdir(mut self, name: impl Into<String>) -> Self {
        self.config.temp_subdir = name.into();
        self
    }

    pub fn converter(mut self, program: impl Into<String>) -> Self {
        self.config.converter = program.into();
        self
    }

    pub fn compiler(mut self, program: impl Into<String>) -> Self {
        self.config.compiler = program.into();
        self
    }

    pub fn passes(mut self, n: u32) -> Self {
        self.config.passes = n;
        self
    }

    pub fn entry_name(mut self, name: impl Into<String>) -> Self {
        self.config.entry_name = name.into();
        self
    }

    pub fn preamble_name(mut self, name: impl Into<String>) -> Self {
        self.config.preamble_name = name.into();
        self
    }

    pub fn cover_name(mut self, name: impl Into<String>) -> Self {
        self.config.cover_name = name.into();
        self
    }

    /// Replace the whole rule list.
    pub fn substitutions(mut self, rules: Vec<Substitution>) -> Self {
        self.config.substitutions = rules;
        self
    }

    /// Append one rule after the defaults (or after previously added rules).
    pub fn substitution(mut self, rule: Substitution) -> Self {
        self.config.substitutions.push(rule);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BuildConfig, StepError> {
        let c = &self.config;
        if c.passes == 0 {
            return Err(StepError::InvalidConfig(
                "Compile passes must be ≥ 1".into(),
            ));
        }
        if c.converter.is_empty() {
            return Err(StepError::InvalidConfig("Converter program is empty".into()));
        }
        if c.compiler.is_empty() {
            return Err(StepError::InvalidConfig("Compiler program is empty".into()));
        }
        for rule in &c.substitutions {
            if rule.pattern.is_empty() {
                return Err(StepError::InvalidConfig(
                    "Substitution rule with empty pattern".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_paths() {
        let c = BuildConfig::default();
        assert_eq!(c.chapters_dir(), PathBuf::from("./latex/chapters"));
        assert_eq!(c.temp_dir(), PathBuf::from("./out/temp"));
        assert_eq!(c.entry_path(), PathBuf::from("./latex/main.tex"));
        assert_eq!(c.pdf_path(), PathBuf::from("./out/main.pdf"));
    }

    #[test]
    fn pdf_path_follows_entry_name() {
        let c = BuildConfig::builder()
            .entry_name("guide.tex")
            .build()
            .unwrap();
        assert_eq!(c.pdf_path(), PathBuf::from("./out/guide.pdf"));
    }

    #[test]
    fn zero_passes_rejected() {
        let err = BuildConfig::builder().passes(0).build().unwrap_err();
        assert!(err.to_string().contains("passes"), "got: {err}");
    }

    #[test]
    fn empty_pattern_rejected() {
        let err = BuildConfig::builder()
            .substitution(Substitution::new("", "x"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("empty pattern"), "got: {err}");
    }

    #[test]
    fn default_rule_is_figure_float() {
        let c = BuildConfig::default();
        assert_eq!(
            c.substitutions,
            vec![Substitution::new("\\begin{figure}", "\\begin{figure}[H]")]
        );
    }

    #[test]
    fn substitution_rules_roundtrip_json() {
        let rules = vec![
            Substitution::new("\\begin{figure}", "\\begin{figure}[H]"),
            Substitution::new("~", "\\textasciitilde{}"),
        ];
        let json = serde_json::to_string(&rules).unwrap();
        let back: Vec<Substitution> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rules);
    }
}
