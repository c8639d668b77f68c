//! Candidate triples exchanged with the generation collaborator.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A subject–predicate–object statement with the sentence it came from.
///
/// `predicate` is an ontology predicate key such as `occurredIn`; `span`
/// is empty when the generator did not supply one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Free-text subject label.
    pub subject: String,
    /// Ontology predicate key.
    pub predicate: String,
    /// Free-text object label.
    pub object: String,
    /// Source sentence.
    #[serde(default)]
    pub span: String,
}

impl Triple {
    /// Creates a triple.
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
        span: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            span: span.into(),
        }
    }
}

/// Strips a surrounding Markdown code fence (```` ```json ... ``` ````).
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parses a generator reply into candidate triples.
///
/// The reply must be a JSON array (optionally wrapped in a Markdown code
/// fence). Elements that are not well-formed triples are dropped; they are
/// counted in a `warn!` event but never repaired.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if the reply is not a JSON array at all.
pub fn parse_candidates(raw: &str) -> Result<Vec<Triple>> {
    let items: Vec<Value> = serde_json::from_str(strip_code_fence(raw))?;
    let total = items.len();
    let triples: Vec<Triple> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if triples.len() < total {
        tracing::warn!(
            dropped = total - triples.len(),
            kept = triples.len(),
            "dropped malformed candidate triples"
        );
    }
    Ok(triples)
}
