//! Verification of exported artifacts.
//!
//! Parses `<basename>.ttl` and `<basename>.nt` with a real RDF parser and
//! `<basename>.jsonld` as JSON, counts statements, and checks that the
//! three files describe the same number of filtered triples:
//!
//! - Turtle carries four statements per triple (type, two labels, predicate)
//! - N-Triples carries two (type, predicate)
//! - JSON-LD carries one `@graph` node
//!
//! A missing file is a warning (formats may be skipped on export); a file
//! that does not parse is a failure.

use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;
use sophia_api::source::TripleSource;
use sophia_turtle::parser::{nt, turtle};

use crate::error::{Error, Result};
use crate::export::ExportFormat;
use crate::serializer::{ONTOLOGY_NS, RDF_TYPE};

/// Severity level of a check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The check passed.
    Pass,
    /// Something is off but the artifacts are still usable.
    Warning,
    /// The artifacts are broken or inconsistent.
    Failure,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        })
    }
}

/// A single check result.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Short identifier of the check (`turtle`, `ntriples`, `parity`, ...).
    pub check: String,
    /// Human-readable outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
}

impl CheckResult {
    /// Creates a passing result.
    pub fn pass(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(Severity::Pass, check, message)
    }

    /// Creates a warning.
    pub fn warn(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(Severity::Warning, check, message)
    }

    /// Creates a failure.
    pub fn fail(check: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(Severity::Failure, check, message)
    }

    fn with(severity: Severity, check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            message: message.into(),
            severity,
        }
    }

    /// Returns true if this result is a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Statement counts found in each artifact (`None` if absent or unparsable).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactCounts {
    /// Statements parsed from the Turtle file.
    pub turtle: Option<usize>,
    /// Statements parsed from the N-Triples file.
    pub ntriples: Option<usize>,
    /// Nodes in the JSON-LD `@graph`.
    pub json_ld: Option<usize>,
}

impl ArtifactCounts {
    /// Number of filtered triples implied by each present artifact.
    #[must_use]
    pub fn implied_triples(&self) -> Vec<(ExportFormat, usize)> {
        let mut out = Vec::new();
        if let Some(n) = self.turtle {
            out.push((ExportFormat::Turtle, n / 4));
        }
        if let Some(n) = self.json_ld {
            out.push((ExportFormat::JsonLd, n));
        }
        if let Some(n) = self.ntriples {
            out.push((ExportFormat::NTriples, n / 2));
        }
        out
    }
}

/// Aggregated verification report.
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// All individual results, in check order.
    pub results: Vec<CheckResult>,
    /// Statement counts per artifact.
    pub counts: ArtifactCounts,
}

impl VerifyReport {
    /// Appends a result.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Returns the count of failed checks.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Returns true if no check failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}

/// Verifies the artifacts `<dir>/<basename>.{ttl,jsonld,nt}`.
///
/// # Errors
///
/// Returns [`Error::Io`] if a present artifact cannot be read. Parse errors
/// are reported as failures in the returned report.
pub fn verify_artifacts(dir: &Path, basename: &str) -> Result<VerifyReport> {
    let mut report = VerifyReport::default();

    report.counts.turtle = verify_turtle(dir, basename, &mut report)?;
    report.counts.json_ld = verify_json_ld(dir, basename, &mut report)?;
    report.counts.ntriples = verify_ntriples(dir, basename, &mut report)?;
    verify_parity(&mut report);

    tracing::debug!(
        failures = report.failure_count(),
        checks = report.results.len(),
        "verified artifacts"
    );
    Ok(report)
}

fn read_artifact(
    dir: &Path,
    basename: &str,
    format: ExportFormat,
    report: &mut VerifyReport,
) -> Result<Option<String>> {
    let path = dir.join(format!("{basename}.{}", format.extension()));
    if !path.exists() {
        report.push(CheckResult::warn(
            check_name(format),
            format!("{} not found", path.display()),
        ));
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    Ok(Some(text))
}

fn check_name(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Turtle => "turtle",
        ExportFormat::JsonLd => "jsonld",
        ExportFormat::NTriples => "ntriples",
    }
}

fn verify_turtle(dir: &Path, basename: &str, report: &mut VerifyReport) -> Result<Option<usize>> {
    let Some(content) = read_artifact(dir, basename, ExportFormat::Turtle, report)? else {
        return Ok(None);
    };

    let mut count = 0usize;
    if let Err(e) = turtle::parse_str(&content).for_each_triple(|_| count += 1) {
        report.push(CheckResult::fail("turtle", format!("Turtle parse error: {e}")));
        return Ok(None);
    }
    report.push(CheckResult::pass(
        "turtle",
        format!("Turtle parses ({count} statements)"),
    ));

    if count % 4 != 0 {
        report.push(CheckResult::fail(
            "turtle",
            format!("{count} statements is not four per triple"),
        ));
    }
    Ok(Some(count))
}

fn verify_ntriples(dir: &Path, basename: &str, report: &mut VerifyReport) -> Result<Option<usize>> {
    let Some(content) = read_artifact(dir, basename, ExportFormat::NTriples, report)? else {
        return Ok(None);
    };

    let mut count = 0usize;
    if let Err(e) = nt::parse_str(&content).for_each_triple(|_| count += 1) {
        report.push(CheckResult::fail(
            "ntriples",
            format!("N-Triples parse error: {e}"),
        ));
        return Ok(None);
    }
    report.push(CheckResult::pass(
        "ntriples",
        format!("N-Triples parses ({count} statements)"),
    ));

    let type_iri = format!("<{RDF_TYPE}>");
    let ontology_prefix = format!("<{ONTOLOGY_NS}");
    let predicate_iris = content
        .lines()
        .filter_map(|l| l.split_whitespace().nth(1));
    let (types, predicates) = predicate_iris.fold((0, 0), |(t, p), iri| {
        if iri == type_iri {
            (t + 1, p)
        } else if iri.starts_with(&ontology_prefix) {
            (t, p + 1)
        } else {
            (t, p)
        }
    });
    if types == predicates && types * 2 == count {
        report.push(CheckResult::pass(
            "ntriples",
            format!("{types} type statements pair with {predicates} predicate statements"),
        ));
    } else {
        report.push(CheckResult::fail(
            "ntriples",
            format!("{types} type statements but {predicates} predicate statements"),
        ));
    }
    Ok(Some(count))
}

fn verify_json_ld(dir: &Path, basename: &str, report: &mut VerifyReport) -> Result<Option<usize>> {
    let Some(content) = read_artifact(dir, basename, ExportFormat::JsonLd, report)? else {
        return Ok(None);
    };

    let value: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            report.push(CheckResult::fail("jsonld", format!("not valid JSON: {e}")));
            return Ok(None);
        }
    };

    let context = value.get("@context").and_then(Value::as_object);
    let missing: Vec<&str> = ["@vocab", "onto", "dbo", "rdfs"]
        .into_iter()
        .filter(|k| context.map_or(true, |c| !c.contains_key(*k)))
        .collect();
    if missing.is_empty() {
        report.push(CheckResult::pass("jsonld", "@context declares all prefixes"));
    } else {
        report.push(CheckResult::fail(
            "jsonld",
            format!("@context is missing: {}", missing.join(", ")),
        ));
    }

    let Some(nodes) = value.get("@graph").and_then(Value::as_array) else {
        report.push(CheckResult::fail("jsonld", "no @graph array"));
        return Ok(None);
    };
    let untyped = nodes
        .iter()
        .filter(|n| n.get("@id").is_none() || n.get("@type").is_none())
        .count();
    if untyped == 0 {
        report.push(CheckResult::pass(
            "jsonld",
            format!("{} nodes, all with @id and @type", nodes.len()),
        ));
    } else {
        report.push(CheckResult::fail(
            "jsonld",
            format!("{untyped} of {} nodes lack @id or @type", nodes.len()),
        ));
    }
    Ok(Some(nodes.len()))
}

fn verify_parity(report: &mut VerifyReport) {
    let implied = report.counts.implied_triples();
    let Some(&(_, first)) = implied.first() else {
        report.push(CheckResult::fail("parity", "no artifact could be verified"));
        return;
    };
    if implied.iter().all(|&(_, n)| n == first) {
        report.push(CheckResult::pass(
            "parity",
            format!("{} artifact(s) agree on {first} triples", implied.len()),
        ));
    } else {
        let detail: Vec<String> = implied
            .iter()
            .map(|(format, n)| format!("{format}={n}"))
            .collect();
        report.push(CheckResult::fail(
            "parity",
            format!("artifacts disagree on triple count: {}", detail.join(", ")),
        ));
    }
}
