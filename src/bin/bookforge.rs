//! CLI binary for bookforge.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `BuildConfig` + `RunOptions` pair and prints per-step results.

use anyhow::{Context, Result};
use bookforge::{plan, run_only, run_pipeline, BuildConfig, BuildReport, RunOptions, Substitution};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Full build: convert, assemble, compile twice, tidy out/
  bookforge

  # Iterate on templates without re-running pandoc
  bookforge --skip-md

  # Everything except the (slow) compile
  bookforge --skip-pdf

  # Re-run a single step in isolation
  bookforge --only-step compose
  bookforge --only-step build_pdf

  # Show the planned step sequence without executing
  bookforge --dry-run

  # Custom layout
  bookforge --markdown-dir content --themes-dir style --output-dir dist

  # Extra rewrite rules from a JSON file: [{"pattern": "...", "replacement": "..."}]
  bookforge --rules rules.json

STEPS (in order):
  clean         empty the LaTeX working directory
  convert       convert Markdown chapters to LaTeX        (skip: --skip-md)
  copy_assets   copy the image tree into the working directory
  substitute    apply literal rewrite rules to generated LaTeX
  copy_theme    copy template files into the working directory
  compose       regenerate the composite entry document
  build_pdf     compile the entry document, two passes    (skip: --skip-pdf)
  relocate      move auxiliary compiler files into out/temp

EXTERNAL TOOLS:
  pandoc        Markdown → LaTeX conversion   (override: --converter)
  xelatex       two-pass PDF compilation      (override: --compiler)

EXIT CODE:
  0 on full success; non-zero when any step fails. The error message names
  the failed step and the underlying cause, so a CI release job fails
  visibly instead of publishing a broken PDF.
"#;

/// Build a typeset PDF book from Markdown chapters via LaTeX.
#[derive(Parser, Debug)]
#[command(
    name = "bookforge",
    version,
    about = "Build a typeset PDF book from Markdown chapters via LaTeX",
    long_about = "Runs the Markdown → LaTeX → PDF pipeline: converts each chapter with pandoc, \
copies images and theme files, assembles a composite main.tex, compiles it twice with xelatex \
(so the table of contents and page numbers resolve), and tidies the output directory.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Skip the Markdown → LaTeX conversion step.
    #[arg(long, env = "BOOKFORGE_SKIP_MD")]
    skip_md: bool,

    /// Skip the PDF compile step.
    #[arg(long, env = "BOOKFORGE_SKIP_PDF")]
    skip_pdf: bool,

    /// Run exactly one named step, ignoring ordering and skip flags.
    #[arg(long, value_name = "NAME")]
    only_step: Option<String>,

    /// Print the planned step sequence and exit without executing.
    #[arg(long)]
    dry_run: bool,

    /// Directory of Markdown chapter sources.
    #[arg(long, env = "BOOKFORGE_MARKDOWN_DIR", default_value = "./markdown")]
    markdown_dir: PathBuf,

    /// Directory of LaTeX templates (preamble, cover, pandoc template).
    #[arg(long, env = "BOOKFORGE_THEMES_DIR", default_value = "./themes")]
    themes_dir: PathBuf,

    /// LaTeX working directory (derived, wiped by the clean step).
    #[arg(long, env = "BOOKFORGE_WORK_DIR", default_value = "./latex")]
    work_dir: PathBuf,

    /// Output directory for the PDF and compiler artifacts.
    #[arg(long, env = "BOOKFORGE_OUTPUT_DIR", default_value = "./out")]
    output_dir: PathBuf,

    /// Markdown → LaTeX converter program.
    #[arg(long, env = "BOOKFORGE_CONVERTER", default_value = "pandoc")]
    converter: String,

    /// LaTeX compiler program.
    #[arg(long, env = "BOOKFORGE_COMPILER", default_value = "xelatex")]
    compiler: String,

    /// Number of compile passes (2 resolves cross-references).
    #[arg(long, env = "BOOKFORGE_PASSES", default_value_t = 2,
          value_parser = clap::value_parser!(u32).range(1..))]
    passes: u32,

    /// JSON file with extra substitution rules, appended after the defaults.
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Emit the build report as JSON on stdout instead of the summary lines.
    #[arg(long, env = "BOOKFORGE_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BOOKFORGE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BOOKFORGE_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = build_config(&cli)?;
    let options = RunOptions {
        skip_convert: cli.skip_md,
        skip_pdf: cli.skip_pdf,
    };

    // ── Dry run: print the plan, execute nothing ─────────────────────────
    if cli.dry_run {
        for (i, step) in plan(&options).iter().enumerate() {
            println!("{:02}. {:<12} {}", i + 1, step.name, dim(step.description));
        }
        return Ok(());
    }

    // ── Run ──────────────────────────────────────────────────────────────
    let result = match cli.only_step {
        Some(ref name) => run_only(&config, name),
        None => run_pipeline(&config, &options),
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {}", red("✘"), e);
            std::process::exit(1);
        }
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise build report")?
        );
    } else if !cli.quiet {
        print_summary(&config, &report);
    }

    Ok(())
}

/// Map CLI args to `BuildConfig`.
fn build_config(cli: &Cli) -> Result<BuildConfig> {
    let mut builder = BuildConfig::builder()
        .markdown_dir(cli.markdown_dir.clone())
        .themes_dir(cli.themes_dir.clone())
        .work_dir(cli.work_dir.clone())
        .output_dir(cli.output_dir.clone())
        .converter(cli.converter.clone())
        .compiler(cli.compiler.clone())
        .passes(cli.passes);

    if let Some(ref path) = cli.rules {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {:?}", path))?;
        let rules: Vec<Substitution> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid rules file {:?}", path))?;
        for rule in rules {
            builder = builder.substitution(rule);
        }
    }

    builder.build().context("Invalid configuration")
}

/// Per-step result lines plus a one-line total.
fn print_summary(config: &BuildConfig, report: &BuildReport) {
    for step in &report.steps {
        if step.skipped {
            eprintln!("  {} {:<12} {}", dim("−"), step.name, dim("skipped"));
        } else {
            eprintln!(
                "  {} {:<12} {}",
                green("✓"),
                step.name,
                dim(&format!("{}ms", step.duration_ms))
            );
        }
    }

    let executed = report.steps.iter().filter(|s| !s.skipped).count();
    eprintln!(
        "{} {} steps in {}ms",
        green("✔"),
        bold(&executed.to_string()),
        report.total_duration_ms
    );
    if report.steps.iter().any(|s| s.name == "build_pdf" && !s.skipped) {
        eprintln!("   {}", bold(&config.pdf_path().display().to_string()));
    }
}
