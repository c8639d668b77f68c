//! `arkg-build` — Filters generated candidate triples against a thematic
//! ontology, builds and merges the per-document graphs, and writes the RDF
//! artifacts to the output directory.
//!
//! The input is one JSON file of candidates (an array of
//! `{subject, predicate, object, span}` objects, optionally inside a
//! Markdown code fence) or a directory searched recursively for `*.json`
//! files. Each file counts as one document; documents are processed in
//! path order.
//!
//! **Outputs:**
//! - `<out>/<basename>.ttl` — Turtle 1.1
//! - `<out>/<basename>.jsonld` — JSON-LD 1.1
//! - `<out>/<basename>.nt` — N-Triples
//! - `<out>/<basename>.graph.json` — merged graph, reloadable
//! - `<out>/<basename>.graphml` — with `--graphml`
//! - `<out>/<basename>.gexf` — with `--gexf`
//!
//! **Usage:**
//! ```
//! arkg-build --input <path> [--theme event|cultural|other] [--class <iri>]
//!            [--config arkg.toml] [--out <path>] [--basename <name>]
//!            [--formats ttl,jsonld,nt] [--graphml] [--gexf]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use arkg::export::{export, write_gexf, write_graph_json, write_graphml};
use arkg::{
    parse_candidates, Config, ExportFormat, KnowledgeGraph, OntologyRegistry, Pipeline, Triple,
};
use clap::Parser;
use walkdir::WalkDir;

/// Build ontology-constrained RDF artifacts from candidate triples.
#[derive(Parser)]
#[command(
    name = "arkg-build",
    about = "Filter candidate triples, merge document graphs and export RDF"
)]
struct Args {
    /// Candidate file, or directory of `*.json` candidate files.
    #[arg(long)]
    input: PathBuf,

    /// Theme of the documents: event, cultural or other.
    #[arg(long, default_value = "event")]
    theme: String,

    /// Ontology class for theme `other` (IRI, prefixed name or local name).
    #[arg(long)]
    class: Option<String>,

    /// Configuration file; defaults apply if it does not exist.
    #[arg(long, default_value = "arkg.toml")]
    config: PathBuf,

    /// Output directory (overrides the configuration).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Artifact file stem (overrides the configuration).
    #[arg(long)]
    basename: Option<String>,

    /// Comma-separated formats to write (overrides the configuration).
    #[arg(long, value_delimiter = ',')]
    formats: Vec<String>,

    /// Also write the merged graph as GraphML.
    #[arg(long)]
    graphml: bool,

    /// Also write the merged graph as GEXF.
    #[arg(long)]
    gexf: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = Config::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    let out = args.out.clone().unwrap_or_else(|| config.output_dir.clone());
    let basename = args.basename.clone().unwrap_or_else(|| config.basename.clone());
    let formats = if args.formats.is_empty() {
        config.formats.clone()
    } else {
        args.formats
            .iter()
            .map(|f| f.trim().parse::<ExportFormat>())
            .collect::<arkg::Result<Vec<_>>>()?
    };

    let registry = OntologyRegistry::from_config(&config);
    let profile = registry
        .resolve(&args.theme, args.class.as_deref())
        .with_context(|| format!("Failed to resolve theme '{}'", args.theme))?;
    let pipeline = Pipeline::from_config(&config);

    let inputs = candidate_files(&args.input)?;
    if inputs.is_empty() {
        bail!("No candidate files found under {}", args.input.display());
    }

    println!(
        "Theme {} ({}): {} allowed predicates, {} document(s)",
        profile.theme(),
        profile.ontology_class(),
        profile.allowed_predicates().len(),
        inputs.len()
    );

    let mut all_triples: Vec<Triple> = Vec::new();
    let mut graphs: Vec<KnowledgeGraph> = Vec::with_capacity(inputs.len());
    for path in &inputs {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let candidates = parse_candidates(&raw)
            .with_context(|| format!("Failed to parse candidates in {}", path.display()))?;
        let name = document_name(path);
        let (kept, graph) = pipeline.build_from_candidates(&name, &candidates, &profile);
        println!(
            "  {name}: {} candidates, {} kept, {} nodes, {} edges",
            candidates.len(),
            kept.len(),
            graph.node_count(),
            graph.edge_count()
        );
        all_triples.extend(kept);
        graphs.push(graph);
    }

    let merged = KnowledgeGraph::merge_with_keying(config.edge_keying, &graphs);
    println!(
        "Merged graph: {} nodes, {} edges",
        merged.node_count(),
        merged.edge_count()
    );

    let written = export(&all_triples, &profile, &formats, &out, &basename)
        .with_context(|| format!("Failed to export artifacts to {}", out.display()))?;
    for path in written.values() {
        println!("  Written: {}", path.display());
    }

    let graph_path = write_graph_json(&merged, &out, &basename)
        .with_context(|| format!("Failed to write graph dump to {}", out.display()))?;
    println!("  Written: {}", graph_path.display());

    if args.graphml {
        let graphml_path = write_graphml(&merged, &out, &basename)
            .with_context(|| format!("Failed to write GraphML to {}", out.display()))?;
        println!("  Written: {}", graphml_path.display());
    }

    if args.gexf {
        let gexf_path = write_gexf(&merged, &out, &basename)
            .with_context(|| format!("Failed to write GEXF to {}", out.display()))?;
        println!("  Written: {}", gexf_path.display());
    }

    println!("Build complete.");
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

/// The candidate files under `input`, sorted by path. Graph dumps
/// (`*.graph.json`) are skipped.
fn candidate_files(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk {}", input.display()))?;
        let path = entry.path();
        let is_candidates = path.extension().is_some_and(|e| e == "json")
            && !path.to_string_lossy().ends_with(".graph.json");
        if entry.file_type().is_file() && is_candidates {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
