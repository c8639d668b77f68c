//! Document pipeline and the seams to external collaborators.
//!
//! ```text
//! raw text ─► clean_document ─► EventSegmenter ─► CandidateSource (per segment)
//!          ─► filter_triples ─► KnowledgeGraph::build ─► DocumentResult
//! ```
//!
//! The candidate generator and the predicate lookup service are traits so
//! that callers plug in their language-model client or SPARQL client. Both
//! are called synchronously, one segment at a time, in segment order.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::filter::filter_triples;
use crate::graph::{EdgeKeying, KnowledgeGraph, Provenance};
use crate::model::Triple;
use crate::ontology::{OntologyClass, OntologyProfile, Theme};
use crate::segment::EventSegmenter;
use crate::text::clean_document;

/// What the generator is asked to extract triples from.
#[derive(Debug, Clone)]
pub struct GenerationRequest<'a> {
    /// One event segment of cleaned text.
    pub segment: &'a str,
    /// Topics selected for the document.
    pub topics: &'a [String],
    /// Profile constraining the allowed predicates.
    pub profile: &'a OntologyProfile,
    /// Ready-made prompt built by [`generation_prompt`].
    pub prompt: String,
}

/// Proposes candidate triples for a segment (typically a language model).
pub trait CandidateSource {
    /// Returns candidates for one segment. They may violate the ontology;
    /// the pipeline filters them.
    ///
    /// # Errors
    ///
    /// Implementations return [`crate::Error::Collaborator`] (or any other
    /// variant) when the request fails; the pipeline stops on the error.
    fn candidates(&mut self, request: &GenerationRequest<'_>) -> Result<Vec<Triple>>;
}

impl<F> CandidateSource for F
where
    F: FnMut(&GenerationRequest<'_>) -> Result<Vec<Triple>>,
{
    fn candidates(&mut self, request: &GenerationRequest<'_>) -> Result<Vec<Triple>> {
        self(request)
    }
}

/// Builds the extraction prompt for one segment.
///
/// The prompt lists the T-Box template, the allowed predicates with their
/// glosses and the topics, and asks for a JSON array of
/// `{subject, predicate, object, span}` objects.
#[must_use]
pub fn generation_prompt(segment: &str, topics: &[String], profile: &OntologyProfile) -> String {
    let predicates: Vec<String> = profile
        .allowed_predicates()
        .iter()
        .map(|p| format!("- {} ({})", p.key, p.gloss))
        .collect();
    format!(
        "Extract subject-predicate-object triples from the text below.\n\
         Use ONLY these predicates; never invent others:\n{predicates}\n\n\
         Ontology (T-Box):\n{template}\n\n\
         Every subject is typed as {class}.\n\
         Topics: {topics}\n\n\
         Rules:\n\
         1. Every triple must be stated explicitly in the text.\n\
         2. The span is the sentence the triple comes from.\n\
         3. Do not repeat facts.\n\
         4. Focus on the event structure: who took part, where, when, with what outcome.\n\n\
         Answer with a JSON array only:\n\
         [{{\"subject\": \"...\", \"predicate\": \"...\", \"object\": \"...\", \"span\": \"...\"}}]\n\n\
         Text:\n{segment}\n",
        predicates = predicates.join("\n"),
        template = profile.template().text(),
        class = profile.ontology_class(),
        topics = topics.join(", "),
    )
}

/// A document to process.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    /// Name recorded as the source of every node and edge.
    pub name: &'a str,
    /// Raw extracted text.
    pub text: &'a str,
}

/// Everything produced for one document.
#[derive(Debug, Clone)]
pub struct DocumentResult {
    /// Theme of the profile the document was processed under.
    pub theme: Theme,
    /// Class every event subject is typed with.
    pub ontology_class: OntologyClass,
    /// Event segments of the cleaned text, in order.
    pub segments: Vec<String>,
    /// Number of candidates proposed across all segments.
    pub candidate_count: usize,
    /// Candidates that passed the ontology filter, in order.
    pub triples: Vec<Triple>,
    /// Graph built from `triples`.
    pub graph: KnowledgeGraph,
}

/// Runs documents through cleaning, segmentation, generation, filtering
/// and graph construction.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    segmenter: EventSegmenter,
    keying: EdgeKeying,
}

impl Pipeline {
    /// Creates a pipeline with the given segmenter and pair-keyed graphs.
    #[must_use]
    pub fn new(segmenter: EventSegmenter) -> Self {
        Self {
            segmenter,
            keying: EdgeKeying::Pair,
        }
    }

    /// Creates a pipeline from configuration (extra markers, edge keying).
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(EventSegmenter::with_extra_markers(&config.extra_markers))
            .with_keying(config.edge_keying)
    }

    /// Sets the edge keying of built graphs.
    #[must_use]
    pub fn with_keying(mut self, keying: EdgeKeying) -> Self {
        self.keying = keying;
        self
    }

    /// The segmenter in use.
    #[must_use]
    pub fn segmenter(&self) -> &EventSegmenter {
        &self.segmenter
    }

    /// Processes one document under an already-resolved profile.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `source`.
    pub fn run_document<S>(
        &self,
        document: Document<'_>,
        profile: &OntologyProfile,
        topics: &[String],
        source: &mut S,
    ) -> Result<DocumentResult>
    where
        S: CandidateSource + ?Sized,
    {
        let cleaned = clean_document(document.text);
        let segments = self.segmenter.segment(&cleaned);

        let mut candidates = Vec::new();
        for segment in &segments {
            let request = GenerationRequest {
                segment,
                topics,
                profile,
                prompt: generation_prompt(segment, topics, profile),
            };
            candidates.extend(source.candidates(&request)?);
        }

        let triples = filter_triples(&candidates, profile);
        let provenance = Provenance::from_profile(profile, document.name);
        let graph = KnowledgeGraph::build_with_keying(self.keying, &triples, &provenance);
        tracing::info!(
            document = document.name,
            segments = segments.len(),
            candidates = candidates.len(),
            kept = triples.len(),
            "processed document"
        );

        Ok(DocumentResult {
            theme: profile.theme(),
            ontology_class: profile.ontology_class().clone(),
            segments,
            candidate_count: candidates.len(),
            triples,
            graph,
        })
    }

    /// Filters already-generated candidates and builds the document graph,
    /// for callers whose candidates were produced elsewhere.
    #[must_use]
    pub fn build_from_candidates(
        &self,
        document_name: &str,
        candidates: &[Triple],
        profile: &OntologyProfile,
    ) -> (Vec<Triple>, KnowledgeGraph) {
        let triples = filter_triples(candidates, profile);
        let provenance = Provenance::from_profile(profile, document_name);
        let graph = KnowledgeGraph::build_with_keying(self.keying, &triples, &provenance);
        (triples, graph)
    }
}

/// A predicate found in an external knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateAlternative {
    /// Knowledge base the property comes from (e.g. `dbpedia`).
    pub source: String,
    /// Property IRI.
    pub property: String,
    /// Property label.
    pub label: String,
}

/// Suggests alternative predicates from external knowledge bases.
pub trait PredicateLookup {
    /// Looks up properties whose label matches `predicate`.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the service fails.
    fn lookup(&mut self, predicate: &str) -> Result<Vec<PredicateAlternative>>;
}

/// Caller-owned memo of predicate lookups.
///
/// Lookup results are treated as static reference data, so a cached answer
/// is reused for as long as the cache lives. The least recently used entry
/// is evicted once `capacity` entries are held.
#[derive(Debug, Clone)]
pub struct LookupCache {
    capacity: usize,
    entries: HashMap<String, Vec<PredicateAlternative>>,
    recency: VecDeque<String>,
    hits: usize,
    misses: usize,
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new(128)
    }
}

impl LookupCache {
    /// Creates a cache holding at most `capacity` predicates (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            recency: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns alternatives for `predicate`, calling `lookup` only on a miss.
    ///
    /// Predicates shorter than two characters (after trimming) return no
    /// alternatives without calling `lookup`.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures; failed lookups are not cached.
    pub fn alternatives<L>(
        &mut self,
        lookup: &mut L,
        predicate: &str,
    ) -> Result<Vec<PredicateAlternative>>
    where
        L: PredicateLookup + ?Sized,
    {
        let key = predicate.trim();
        if key.chars().count() < 2 {
            return Ok(Vec::new());
        }

        if let Some(found) = self.entries.get(key) {
            let found = found.clone();
            self.hits += 1;
            self.touch(key);
            return Ok(found);
        }

        self.misses += 1;
        let found = lookup.lookup(key)?;
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.recency.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key.to_owned(), found.clone());
        self.recency.push_back(key.to_owned());
        Ok(found)
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }

    /// Number of cached predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    #[must_use]
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}
