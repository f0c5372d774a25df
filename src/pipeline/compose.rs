//! Step `compose`: regenerate the composite entry document.
//!
//! `main.tex` is the single file the compiler is pointed at. It is fully
//! regenerated on every run from the chapter listing, never edited by hand:
//! preamble inclusion, document begin, one `\input` per chapter in sorted
//! filename order, the cover, and the document end. Sorting by filename is
//! what makes two runs over the same sources byte-identical — chapter order
//! is an authoring decision encoded in filename prefixes (`01-intro`,
//! `02-rules`), not in directory enumeration order.
//!
//! Zero chapters is not an error: the generated document simply contains no
//! chapter inclusions, and whether that compiles is the compiler's business.

use crate::config::BuildConfig;
use crate::error::StepError;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Vertical gap inserted after each chapter so consecutive chapters do not
/// visually run into each other.
const CHAPTER_GAP: &str = "\\vspace*{1cm}";

/// Generate `work_dir/main.tex` from the converted chapter files.
pub fn run(config: &BuildConfig) -> Result<(), StepError> {
    fs::create_dir_all(&config.work_dir).map_err(|e| StepError::CreateDirFailed {
        path: config.work_dir.clone(),
        source: e,
    })?;

    let document = render(config)?;
    let entry = config.entry_path();
    fs::write(&entry, document).map_err(|e| StepError::WriteFailed {
        path: entry.clone(),
        source: e,
    })?;

    info!("Generated {}", entry.display());
    Ok(())
}

/// Render the entry document as a string.
pub fn render(config: &BuildConfig) -> Result<String, StepError> {
    let chapters = list_chapter_stems(config)?;
    debug!("Composing entry document with {} chapters", chapters.len());

    let mut doc = String::new();
    doc.push_str(&format!("\\input{{{}}}\n", stem_of(&config.preamble_name)));
    doc.push_str("\\begin{document}\n");
    for stem in &chapters {
        // Forward slashes regardless of host OS; TeX wants POSIX-style paths.
        doc.push_str(&format!(
            "\\input{{{}/{}}}\n{}\n",
            config.chapters_subdir, stem, CHAPTER_GAP
        ));
    }
    doc.push_str(&format!("\\input{{{}}}\n", stem_of(&config.cover_name)));
    doc.push_str("\\end{document}\n");
    Ok(doc)
}

/// Sorted stems of the converted chapter files.
///
/// An absent chapters directory counts as zero chapters: compose can run
/// standalone before any conversion has ever happened.
fn list_chapter_stems(config: &BuildConfig) -> Result<Vec<String>, StepError> {
    let chapters_dir = config.chapters_dir();
    if !chapters_dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(&chapters_dir).map_err(|e| StepError::ReadFailed {
        path: chapters_dir.clone(),
        source: e,
    })?;

    let mut stems: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StepError::ReadFailed {
            path: chapters_dir.clone(),
            source: e,
        })?;
        let path = entry.path();
        let is_tex = path.extension().is_some_and(|ext| ext == "tex");
        if path.is_file() && is_tex {
            if let Some(stem) = path.file_stem() {
                stems.push(stem.to_string_lossy().into_owned());
            }
        }
    }
    stems.sort();
    Ok(stems)
}

/// `preamble.tex` → `preamble`; `\input` resolves the extension itself.
fn stem_of(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}
