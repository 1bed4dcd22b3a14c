// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio — markdown to paginated PDF.
//
// Entry point. Parses arguments, initialises logging and dispatches to the
// render or transparency command.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_core::{PaperSize, RenderConfig, TransparencyConfig};
use folio_document::{BackgroundRemover, PdfWriter};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Typeset markdown into paginated PDF", long_about = None)]
struct Cli {
    /// Log layout decisions and page breaks
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a markdown file to PDF
    Render {
        /// Markdown source
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output PDF (defaults to INPUT with a .pdf extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// JSON render configuration
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Running header text (defaults to the input file name)
        #[arg(long)]
        title: Option<String>,

        /// Paper size: a4, a3, a5, letter, legal, tabloid or WIDTHxHEIGHT in mm
        #[arg(long)]
        paper: Option<PaperSize>,
    },

    /// Make image backgrounds transparent, overwriting each file as PNG
    Transparency {
        /// Images to process
        #[arg(value_name = "IMAGES", required = true)]
        images: Vec<PathBuf>,

        /// Per-channel distance below which a pixel counts as background
        #[arg(long, default_value_t = TransparencyConfig::default().tolerance)]
        tolerance: u8,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let outcome = match cli.command {
        Command::Render {
            input,
            output,
            config,
            title,
            paper,
        } => render(&input, output, config.as_deref(), title, paper).map(|()| true),
        Command::Transparency { images, tolerance } => Ok(transparency(&images, tolerance)),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

/// INPUT with its extension replaced by `.pdf`.
fn default_output(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

/// Configuration from the optional file, then command-line overrides.
fn build_config(
    input: &Path,
    config: Option<&Path>,
    title: Option<String>,
    paper: Option<PaperSize>,
) -> Result<RenderConfig> {
    let mut cfg = match config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(paper) = paper {
        cfg.paper_size = paper;
    }
    if let Some(title) = title {
        cfg.title = Some(title);
    } else if cfg.title.is_none() {
        cfg.title = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }
    cfg.validate()?;
    Ok(cfg)
}

fn render(
    input: &Path,
    output: Option<PathBuf>,
    config: Option<&Path>,
    title: Option<String>,
    paper: Option<PaperSize>,
) -> Result<()> {
    let cfg = build_config(input, config, title, paper)?;
    let output = output.unwrap_or_else(|| default_output(input));
    let pages = PdfWriter::new(cfg)
        .convert_file(input, &output)
        .with_context(|| format!("rendering {}", input.display()))?;
    info!(pages, "{} -> {}", input.display(), output.display());
    Ok(())
}

/// Process every image independently; false if any failed.
fn transparency(images: &[PathBuf], tolerance: u8) -> bool {
    let remover = BackgroundRemover::new(tolerance);
    let mut failures = 0usize;
    for path in images {
        match remover.process_file(path) {
            Ok(report) => info!(
                cleared = report.cleared,
                total = report.total,
                "processed {}",
                path.display()
            ),
            Err(err) => {
                error!("{}: {err}", path.display());
                failures += 1;
            }
        }
    }
    if failures > 0 {
        error!(failures, total = images.len(), "some images could not be processed");
    }
    failures == 0
}
