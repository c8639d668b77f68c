//! `arkg-segment` — Cleans an extracted text file and splits it into event
//! segments, the units handed to the triple generator.
//!
//! **Usage:**
//! ```
//! arkg-segment <file> [--config arkg.toml] [--json] [--chunks]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use arkg::ontology::detect_theme_hint;
use arkg::text::{chunk_text, clean_document};
use arkg::{Config, Pipeline};
use clap::Parser;

/// Clean a text file and print its event segments.
#[derive(Parser)]
#[command(name = "arkg-segment", about = "Clean text and split it into event segments")]
struct Args {
    /// Extracted text file (UTF-8).
    file: PathBuf,

    /// Configuration file; defaults apply if it does not exist.
    #[arg(long, default_value = "arkg.toml")]
    config: PathBuf,

    /// Print the segments as a JSON array instead of numbered blocks.
    #[arg(long)]
    json: bool,

    /// Split each segment further into sentence chunks of at most
    /// `chunk_size` characters.
    #[arg(long)]
    chunks: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = Config::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let cleaned = clean_document(&raw);
    let mut segments = Pipeline::from_config(&config).segmenter().segment(&cleaned);
    if args.chunks {
        segments = segments
            .iter()
            .flat_map(|s| chunk_text(s, config.chunk_size))
            .collect();
    }

    if args.json {
        let json = serde_json::to_string_pretty(&segments).context("Failed to encode segments")?;
        println!("{json}");
        return Ok(());
    }

    match detect_theme_hint(&cleaned) {
        Some(theme) => println!("Theme hint: {theme}"),
        None => println!("Theme hint: none (classify externally)"),
    }
    println!("{} segment(s)", segments.len());
    for (i, segment) in segments.iter().enumerate() {
        println!();
        println!("--- segment {} ({} chars) ---", i + 1, segment.chars().count());
        println!("{segment}");
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
