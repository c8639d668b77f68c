//! Ontology-constrained knowledge graphs from bilingual (Arabic/English) text.
//!
//! The `arkg` crate turns extracted document text into RDF and property
//! graphs that only use predicates allowed by a thematic ontology:
//!
//! - [`text`] normalizes and cleans Arabic and English text
//! - [`segment`] splits cleaned text at event-marker lines
//! - [`ontology`] resolves a theme to its class, predicates and T-Box template
//! - [`filter`] drops candidate triples outside the ontology
//! - [`ids`] derives deterministic resource identifiers
//! - [`graph`] builds and merges labeled directed graphs
//! - [`serializer`] and [`export`] write Turtle, JSON-LD, N-Triples, GraphML and GEXF
//! - [`pipeline`] runs a document through all of the above
//! - [`verify`] checks written artifacts for well-formedness and parity
//!
//! # Example
//!
//! ```
//! use arkg::{filter_triples, KnowledgeGraph, OntologyRegistry, Provenance, Triple};
//!
//! let registry = OntologyRegistry::new("ontology");
//! let profile = registry.resolve("event", None).unwrap();
//!
//! let candidates = vec![
//!     Triple::new("مؤتمر المناخ", "occurredIn", "باريس", "عقد مؤتمر المناخ في باريس"),
//!     Triple::new("مؤتمر المناخ", "likes", "القهوة", ""),
//! ];
//! let kept = filter_triples(&candidates, &profile);
//! assert_eq!(kept.len(), 1);
//!
//! let graph = KnowledgeGraph::build(&kept, &Provenance::from_profile(&profile, "report.pdf"));
//! assert_eq!(graph.node_count(), 2);
//!
//! let turtle = arkg::serializer::turtle::to_turtle(&kept, &profile);
//! assert!(turtle.contains(":Event_1 onto:occurredIn :باريس ."));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod graph;
pub mod ids;
pub mod model;
pub mod ontology;
pub mod pipeline;
pub mod segment;
pub mod serializer;
pub mod text;
pub mod verify;

pub use config::Config;
pub use error::{Error, Result};
pub use export::{export, ExportArtifact, ExportFormat};
pub use filter::filter_triples;
pub use graph::{EdgeKeying, GraphEdge, GraphNode, KnowledgeGraph, NodeKind, Provenance};
pub use ids::EventIdAssigner;
pub use model::{parse_candidates, Triple};
pub use ontology::{OntologyClass, OntologyProfile, OntologyRegistry, Predicate, SchemaTemplate, Theme};
pub use pipeline::{
    CandidateSource, Document, DocumentResult, GenerationRequest, LookupCache, Pipeline,
    PredicateAlternative, PredicateLookup,
};
pub use segment::EventSegmenter;
pub use text::{clean_text, normalize_arabic, normalize_english};
pub use verify::{verify_artifacts, VerifyReport};
