//! Writing serialized artifacts to disk.
//!
//! Each writer is independent: it creates the output directory if needed,
//! writes one UTF-8 file as a whole and returns where it went. Writes are
//! not atomic; concurrent exports must use distinct directories or
//! basenames.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::KnowledgeGraph;
use crate::model::Triple;
use crate::ontology::OntologyProfile;
use crate::serializer::{gexf, graphml, jsonld, ntriples, turtle};

/// An RDF output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Turtle (`.ttl`).
    #[serde(rename = "ttl")]
    Turtle,
    /// JSON-LD (`.jsonld`).
    #[serde(rename = "jsonld")]
    JsonLd,
    /// N-Triples (`.nt`).
    #[serde(rename = "nt")]
    NTriples,
}

impl ExportFormat {
    /// All formats, in the order they are written.
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Turtle,
        ExportFormat::JsonLd,
        ExportFormat::NTriples,
    ];

    /// The format name, which is also the file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Turtle => "ttl",
            ExportFormat::JsonLd => "jsonld",
            ExportFormat::NTriples => "nt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ttl" | "turtle" => Ok(ExportFormat::Turtle),
            "jsonld" | "json-ld" => Ok(ExportFormat::JsonLd),
            "nt" | "ntriples" | "n-triples" => Ok(ExportFormat::NTriples),
            other => Err(Error::UnknownFormat(other.to_owned())),
        }
    }
}

/// A written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Format of the file.
    pub format: ExportFormat,
    /// Path of the written file.
    pub path: PathBuf,
}

fn write_file(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let path = dir.join(file_name);
    fs::write(&path, contents).map_err(|e| Error::io(&path, e))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "written");
    Ok(path)
}

fn artifact_name(basename: &str, format: ExportFormat) -> String {
    format!("{basename}.{}", format.extension())
}

/// Writes `<dir>/<basename>.ttl`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be created or the file
/// cannot be written.
pub fn write_turtle(
    triples: &[Triple],
    profile: &OntologyProfile,
    dir: &Path,
    basename: &str,
) -> Result<ExportArtifact> {
    let format = ExportFormat::Turtle;
    let text = turtle::to_turtle(triples, profile);
    let path = write_file(dir, &artifact_name(basename, format), &text)?;
    Ok(ExportArtifact { format, path })
}

/// Writes `<dir>/<basename>.jsonld` (pretty-printed).
///
/// # Errors
///
/// Returns [`Error::Io`] on filesystem failures and [`Error::Json`] if the
/// document cannot be encoded.
pub fn write_json_ld(
    triples: &[Triple],
    profile: &OntologyProfile,
    dir: &Path,
    basename: &str,
) -> Result<ExportArtifact> {
    let format = ExportFormat::JsonLd;
    let text = serde_json::to_string_pretty(&jsonld::to_json_ld(triples, profile))?;
    let path = write_file(dir, &artifact_name(basename, format), &text)?;
    Ok(ExportArtifact { format, path })
}

/// Writes `<dir>/<basename>.nt`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be created or the file
/// cannot be written.
pub fn write_ntriples(
    triples: &[Triple],
    profile: &OntologyProfile,
    dir: &Path,
    basename: &str,
) -> Result<ExportArtifact> {
    let format = ExportFormat::NTriples;
    let text = ntriples::to_ntriples(triples, profile);
    let path = write_file(dir, &artifact_name(basename, format), &text)?;
    Ok(ExportArtifact { format, path })
}

/// Writes the requested formats and maps each to its file.
///
/// Requesting a format twice writes it once. An empty `formats` slice
/// writes nothing.
///
/// # Errors
///
/// Stops at the first failing writer; files already written stay on disk.
pub fn export(
    triples: &[Triple],
    profile: &OntologyProfile,
    formats: &[ExportFormat],
    dir: &Path,
    basename: &str,
) -> Result<BTreeMap<ExportFormat, PathBuf>> {
    let mut paths = BTreeMap::new();
    for &format in formats {
        if paths.contains_key(&format) {
            continue;
        }
        let artifact = match format {
            ExportFormat::Turtle => write_turtle(triples, profile, dir, basename)?,
            ExportFormat::JsonLd => write_json_ld(triples, profile, dir, basename)?,
            ExportFormat::NTriples => write_ntriples(triples, profile, dir, basename)?,
        };
        paths.insert(artifact.format, artifact.path);
    }
    Ok(paths)
}

/// Exports the triples recovered from `graph` (see [`KnowledgeGraph::triples`]).
///
/// # Errors
///
/// Same as [`export`].
pub fn export_graph(
    graph: &KnowledgeGraph,
    profile: &OntologyProfile,
    formats: &[ExportFormat],
    dir: &Path,
    basename: &str,
) -> Result<BTreeMap<ExportFormat, PathBuf>> {
    export(&graph.triples(), profile, formats, dir, basename)
}

/// Writes `<dir>/<basename>.graphml`.
///
/// # Errors
///
/// Returns [`Error::Io`] on filesystem failures.
pub fn write_graphml(graph: &KnowledgeGraph, dir: &Path, basename: &str) -> Result<PathBuf> {
    write_file(dir, &format!("{basename}.graphml"), &graphml::to_graphml(graph))
}

/// Writes `<dir>/<basename>.gexf`.
///
/// # Errors
///
/// Returns [`Error::Io`] on filesystem failures.
pub fn write_gexf(graph: &KnowledgeGraph, dir: &Path, basename: &str) -> Result<PathBuf> {
    write_file(dir, &format!("{basename}.gexf"), &gexf::to_gexf(graph))
}

/// Writes the graph as JSON (`<dir>/<basename>.graph.json`), reloadable
/// with [`read_graph_json`] for later merging.
///
/// # Errors
///
/// Returns [`Error::Io`] on filesystem failures and [`Error::Json`] if the
/// graph cannot be encoded.
pub fn write_graph_json(graph: &KnowledgeGraph, dir: &Path, basename: &str) -> Result<PathBuf> {
    let text = serde_json::to_string_pretty(graph)?;
    write_file(dir, &format!("{basename}.graph.json"), &text)
}

/// Reads a graph written by [`write_graph_json`].
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Json`] if
/// it is not a graph dump.
pub fn read_graph_json(path: &Path) -> Result<KnowledgeGraph> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Provenance;
    use crate::ontology::{OntologyClass, SchemaTemplate};

    fn profile() -> OntologyProfile {
        OntologyProfile::new(
            OntologyClass::Event,
            Vec::new(),
            SchemaTemplate::Missing {
                file: "event.tbox.ttl".to_owned(),
            },
        )
    }

    fn triples() -> Vec<Triple> {
        vec![Triple::new("مؤتمر المناخ", "occurredIn", "باريس", "...")]
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("ttl".parse::<ExportFormat>().unwrap(), ExportFormat::Turtle);
        assert_eq!("json-ld".parse::<ExportFormat>().unwrap(), ExportFormat::JsonLd);
        assert_eq!("nt".parse::<ExportFormat>().unwrap(), ExportFormat::NTriples);
        assert!(matches!(
            "rdfxml".parse::<ExportFormat>(),
            Err(Error::UnknownFormat(_))
        ));
    }

    #[test]
    fn writes_only_requested_formats() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("triples");
        let paths = export(
            &triples(),
            &profile(),
            &[ExportFormat::NTriples, ExportFormat::Turtle, ExportFormat::Turtle],
            &out,
            "graph",
        )
        .unwrap();

        assert_eq!(paths.len(), 2);
        assert_eq!(paths[&ExportFormat::Turtle], out.join("graph.ttl"));
        assert_eq!(paths[&ExportFormat::NTriples], out.join("graph.nt"));
        assert!(!out.join("graph.jsonld").exists());

        let ttl = fs::read_to_string(out.join("graph.ttl")).unwrap();
        assert!(ttl.contains(":Event_1 onto:occurredIn :باريس ."));
    }

    #[test]
    fn no_formats_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export(&triples(), &profile(), &[], dir.path(), "graph").unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn export_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        export(&triples(), &profile(), &ExportFormat::ALL, dir.path(), "g").unwrap();
        let first = fs::read_to_string(dir.path().join("g.jsonld")).unwrap();
        export(&triples(), &profile(), &ExportFormat::ALL, dir.path(), "g").unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("g.jsonld")).unwrap(), first);
    }

    #[test]
    fn write_failure_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let err = write_turtle(&triples(), &profile(), &blocker, "graph").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn graph_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let graph = KnowledgeGraph::build(
            &triples(),
            &Provenance::new(OntologyClass::Event, "doc"),
        );
        let path = write_graph_json(&graph, dir.path(), "doc").unwrap();
        assert_eq!(read_graph_json(&path).unwrap(), graph);
        let graphml = write_graphml(&graph, dir.path(), "doc").unwrap();
        assert!(graphml.ends_with("doc.graphml"));
        let gexf = write_gexf(&graph, dir.path(), "doc").unwrap();
        assert!(fs::read_to_string(&gexf).unwrap().contains("<gexf "));
    }
}
