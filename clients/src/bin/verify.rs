//! `arkg-verify` — Checks exported artifacts: Turtle and N-Triples must
//! parse, JSON-LD must be well-formed, and all formats must agree on the
//! number of triples.
//!
//! **Usage:**
//! ```
//! arkg-verify [--dir <path>] [--basename <name>]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use arkg::verify::{verify_artifacts, Severity};
use clap::Parser;

/// Verify arkg RDF artifacts.
#[derive(Parser)]
#[command(name = "arkg-verify", about = "Verify exported RDF artifacts")]
struct Args {
    /// Directory holding the artifacts.
    #[arg(long, default_value = "triples")]
    dir: PathBuf,

    /// Artifact file stem.
    #[arg(long, default_value = "graph")]
    basename: String,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let report = verify_artifacts(&args.dir, &args.basename)
        .with_context(|| format!("Failed to verify artifacts in {}", args.dir.display()))?;

    println!("Artifact Verification Report");
    println!("============================");
    println!();

    let mut passed = 0usize;
    let mut warned = 0usize;
    let mut failed = 0usize;
    for result in &report.results {
        match result.severity {
            Severity::Pass => passed += 1,
            Severity::Warning => warned += 1,
            Severity::Failure => failed += 1,
        }
        println!("[{}] {}: {}", result.severity, result.check, result.message);
    }

    println!();
    println!("Summary: {passed} passed, {warned} warnings, {failed} failed");

    if failed > 0 {
        eprintln!("Verification FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }

    println!("Verification PASSED.");
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
