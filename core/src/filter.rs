//! Ontology conformance filter for candidate triples.

use crate::model::Triple;
use crate::ontology::OntologyProfile;

/// Keeps the triples whose predicate key is allowed by `profile`.
///
/// The result is a subsequence of `triples` in the original order.
/// Predicates are compared exactly (no trimming, no case folding) and
/// rejected triples are dropped without being rewritten.
#[must_use]
pub fn filter_triples(triples: &[Triple], profile: &OntologyProfile) -> Vec<Triple> {
    let kept: Vec<Triple> = triples
        .iter()
        .filter(|t| profile.allows(&t.predicate))
        .cloned()
        .collect();
    tracing::debug!(
        candidates = triples.len(),
        kept = kept.len(),
        theme = %profile.theme(),
        "filtered candidate triples"
    );
    kept
}
