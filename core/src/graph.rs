//! Directed, provenance-annotated knowledge graphs built from triples.
//!
//! Nodes are identified by the slug of their normalized label, so the same
//! entity mentioned with different spacing maps to one node. Nodes and
//! edges keep insertion order, which keeps exports deterministic.
//!
//! # Edge identity
//!
//! By default an edge is keyed by its ordered `(source, target)` pair: a
//! second triple between the same two nodes overwrites the first one's
//! predicate. [`EdgeKeying::Relation`] keys edges by
//! `(source, predicate, target)` instead, which keeps parallel relations.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::ids::slug;
use crate::model::Triple;
use crate::ontology::{OntologyClass, OntologyProfile, Theme};

/// Trims a label and collapses internal whitespace to single spaces.
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum NodeKind {
    /// A subject or object mentioned in a triple.
    Entity,
}

/// How edges between the same pair of nodes are told apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKeying {
    /// One edge per ordered `(source, target)` pair; the last predicate wins.
    #[default]
    Pair,
    /// One edge per `(source, predicate, target)`.
    Relation,
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Slug of the normalized label.
    pub id: String,
    /// Normalized label.
    pub label: String,
    /// Theme of the document that last wrote this node.
    pub theme: Theme,
    /// Ontology class of the document that last wrote this node.
    pub ontology_class: OntologyClass,
    /// Document that last wrote this node.
    pub source_document: String,
    /// Node kind.
    pub kind: NodeKind,
}

/// A directed, annotated edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Display label: the predicate's gloss when known, else its key.
    pub predicate_label: String,
    /// Ontology predicate key.
    pub predicate_key: String,
    /// Theme of the originating document.
    pub theme: Theme,
    /// Ontology class of the originating document.
    pub ontology_class: OntologyClass,
    /// Sentence the triple was extracted from.
    pub span: String,
    /// Originating document.
    pub source_document: String,
}

/// Where triples come from: the profile they were filtered with and the
/// document they were extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Ontology class (and therefore theme) of the triples.
    pub ontology_class: OntologyClass,
    /// Source document name.
    pub source_document: String,
    glosses: BTreeMap<String, String>,
}

impl Provenance {
    /// Provenance without predicate glosses; edge labels are the keys.
    pub fn new(ontology_class: OntologyClass, source_document: impl Into<String>) -> Self {
        Self {
            ontology_class,
            source_document: source_document.into(),
            glosses: BTreeMap::new(),
        }
    }

    /// Provenance taking class and predicate glosses from `profile`.
    pub fn from_profile(profile: &OntologyProfile, source_document: impl Into<String>) -> Self {
        let mut provenance = Self::new(profile.ontology_class().clone(), source_document);
        provenance.glosses = profile
            .allowed_predicates()
            .iter()
            .map(|p| (p.key.clone(), p.gloss.clone()))
            .collect();
        provenance
    }

    /// Theme of the triples.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.ontology_class.theme()
    }

    fn label_for(&self, key: &str) -> String {
        self.glosses
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EdgeKey {
    source: String,
    target: String,
    predicate: Option<String>,
}

/// A directed graph of entities connected by ontology predicates.
///
/// Every edge endpoint is a node of the same graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphDump", into = "GraphDump")]
pub struct KnowledgeGraph {
    keying: EdgeKeying,
    nodes: Vec<GraphNode>,
    node_index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_index: HashMap<EdgeKey, usize>,
}

#[derive(Serialize, Deserialize)]
struct GraphDump {
    #[serde(default)]
    keying: EdgeKeying,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl From<KnowledgeGraph> for GraphDump {
    fn from(graph: KnowledgeGraph) -> Self {
        Self {
            keying: graph.keying,
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }
}

impl From<GraphDump> for KnowledgeGraph {
    fn from(dump: GraphDump) -> Self {
        let mut graph = KnowledgeGraph::with_keying(dump.keying);
        for node in dump.nodes {
            graph.upsert_node(node);
        }
        for edge in dump.edges {
            // Dumps written by hand may reference nodes that are not listed.
            for id in [&edge.source, &edge.target] {
                if !graph.contains_node(id) {
                    graph.upsert_node(GraphNode {
                        id: id.clone(),
                        label: id.clone(),
                        theme: edge.theme,
                        ontology_class: edge.ontology_class.clone(),
                        source_document: edge.source_document.clone(),
                        kind: NodeKind::Entity,
                    });
                }
            }
            graph.upsert_edge(edge);
        }
        graph
    }
}

impl PartialEq for KnowledgeGraph {
    /// Graphs are equal when their node and edge lists (with attributes)
    /// are equal in order.
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

impl KnowledgeGraph {
    /// Creates an empty graph with pair-keyed edges.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with the given edge keying.
    #[must_use]
    pub fn with_keying(keying: EdgeKeying) -> Self {
        Self {
            keying,
            ..Self::default()
        }
    }

    /// The edge keying of this graph.
    #[must_use]
    pub fn keying(&self) -> EdgeKeying {
        self.keying
    }

    /// Nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if a node with `id` exists.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Edges from `source` to `target` (at most one under pair keying).
    pub fn edges_between<'a>(
        &'a self,
        source: &'a str,
        target: &'a str,
    ) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges
            .iter()
            .filter(move |e| e.source == source && e.target == target)
    }

    /// Node ids as a set, for membership comparisons.
    #[must_use]
    pub fn node_ids(&self) -> BTreeSet<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    /// Edge identities as a set of `(source, predicate, target)`; the
    /// predicate is empty under pair keying.
    #[must_use]
    pub fn edge_keys(&self) -> BTreeSet<(String, String, String)> {
        self.edge_index
            .keys()
            .map(|k| {
                (
                    k.source.clone(),
                    k.predicate.clone().unwrap_or_default(),
                    k.target.clone(),
                )
            })
            .collect()
    }

    fn edge_key(&self, edge: &GraphEdge) -> EdgeKey {
        EdgeKey {
            source: edge.source.clone(),
            target: edge.target.clone(),
            predicate: match self.keying {
                EdgeKeying::Pair => None,
                EdgeKeying::Relation => Some(edge.predicate_key.clone()),
            },
        }
    }

    fn upsert_node(&mut self, node: GraphNode) {
        match self.node_index.get(&node.id) {
            Some(&i) => self.nodes[i] = node,
            None => {
                self.node_index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    fn upsert_edge(&mut self, edge: GraphEdge) {
        let key = self.edge_key(&edge);
        match self.edge_index.get(&key) {
            Some(&i) => self.edges[i] = edge,
            None => {
                self.edge_index.insert(key, self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    fn entity_node(label: String, provenance: &Provenance) -> GraphNode {
        GraphNode {
            id: slug(&label),
            label,
            theme: provenance.theme(),
            ontology_class: provenance.ontology_class.clone(),
            source_document: provenance.source_document.clone(),
            kind: NodeKind::Entity,
        }
    }

    /// Adds one triple: creates or updates its subject and object nodes and
    /// inserts (or overwrites) the edge for its key.
    ///
    /// Returns `false`, leaving the graph unchanged, if the subject, object
    /// or predicate is blank after normalization.
    pub fn add_triple(&mut self, triple: &Triple, provenance: &Provenance) -> bool {
        let subject = normalize_label(&triple.subject);
        let object = normalize_label(&triple.object);
        let predicate = normalize_label(&triple.predicate);
        if subject.is_empty() || object.is_empty() || predicate.is_empty() {
            tracing::warn!(?triple, "skipping triple with a blank component");
            return false;
        }

        let source = Self::entity_node(subject, provenance);
        let target = Self::entity_node(object, provenance);
        let edge = GraphEdge {
            source: source.id.clone(),
            target: target.id.clone(),
            predicate_label: provenance.label_for(&predicate),
            predicate_key: predicate,
            theme: provenance.theme(),
            ontology_class: provenance.ontology_class.clone(),
            span: triple.span.clone(),
            source_document: provenance.source_document.clone(),
        };

        self.upsert_node(source);
        self.upsert_node(target);
        self.upsert_edge(edge);
        true
    }

    /// Builds a pair-keyed graph from `triples`.
    #[must_use]
    pub fn build(triples: &[Triple], provenance: &Provenance) -> Self {
        Self::build_with_keying(EdgeKeying::Pair, triples, provenance)
    }

    /// Builds a graph with the given edge keying.
    #[must_use]
    pub fn build_with_keying(
        keying: EdgeKeying,
        triples: &[Triple],
        provenance: &Provenance,
    ) -> Self {
        let mut graph = Self::with_keying(keying);
        for triple in triples {
            graph.add_triple(triple, provenance);
        }
        tracing::debug!(
            source_document = %provenance.source_document,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built graph"
        );
        graph
    }

    /// Merges `graphs` in argument order with last-writer-wins attributes.
    ///
    /// The result uses the keying of the first graph (pair keying when
    /// `graphs` is empty). Node and edge membership does not depend on the
    /// order of `graphs`; attribute values do.
    #[must_use]
    pub fn merge(graphs: &[KnowledgeGraph]) -> Self {
        let keying = graphs.first().map_or(EdgeKeying::Pair, |g| g.keying);
        Self::merge_with_keying(keying, graphs)
    }

    /// Merges `graphs` into a graph with the given keying.
    #[must_use]
    pub fn merge_with_keying(keying: EdgeKeying, graphs: &[KnowledgeGraph]) -> Self {
        let mut merged = Self::with_keying(keying);
        for graph in graphs {
            merged.absorb(graph);
        }
        tracing::debug!(
            inputs = graphs.len(),
            nodes = merged.node_count(),
            edges = merged.edge_count(),
            "merged graphs"
        );
        merged
    }

    /// Merges `other` into `self`, overwriting attributes on conflict.
    pub fn absorb(&mut self, other: &KnowledgeGraph) {
        for node in &other.nodes {
            self.upsert_node(node.clone());
        }
        for edge in &other.edges {
            self.upsert_edge(edge.clone());
        }
    }

    /// Recovers the triple list (in edge order) using node labels.
    #[must_use]
    pub fn triples(&self) -> Vec<Triple> {
        self.edges
            .iter()
            .filter_map(|e| {
                let source = self.node(&e.source)?;
                let target = self.node(&e.target)?;
                Some(Triple::new(
                    source.label.clone(),
                    e.predicate_key.clone(),
                    target.label.clone(),
                    e.span.clone(),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(doc: &str) -> Provenance {
        Provenance::new(OntologyClass::Event, doc)
    }

    fn sample() -> Vec<Triple> {
        vec![
            Triple::new(
                "مؤتمر المناخ العالمي",
                "occurredIn",
                "باريس",
                "انعقد مؤتمر المناخ العالمي في باريس.",
            ),
            Triple::new(
                "خبراء",
                "hasParticipant",
                "مؤتمر  المناخ العالمي ",
                "شارك خبراء في المؤتمر.",
            ),
        ]
    }

    #[test]
    fn builds_nodes_and_edges() {
        let graph = KnowledgeGraph::build(&sample(), &event("report.pdf"));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let node = graph.node("مؤتمر_المناخ_العالمي").unwrap();
        assert_eq!(node.label, "مؤتمر المناخ العالمي");
        assert_eq!(node.theme, Theme::Event);
        assert_eq!(node.source_document, "report.pdf");

        let edge = graph
            .edges_between("مؤتمر_المناخ_العالمي", "باريس")
            .next()
            .unwrap();
        assert_eq!(edge.predicate_key, "occurredIn");
        assert_eq!(edge.span, "انعقد مؤتمر المناخ العالمي في باريس.");
    }

    #[test]
    fn every_edge_endpoint_is_a_node() {
        let graph = KnowledgeGraph::build(&sample(), &event("a"));
        for edge in graph.edges() {
            assert!(graph.contains_node(&edge.source));
            assert!(graph.contains_node(&edge.target));
        }
    }

    #[test]
    fn reinsertion_updates_instead_of_duplicating() {
        let mut graph = KnowledgeGraph::new();
        graph.add_triple(&Triple::new("a", "occurredIn", "b", ""), &event("one"));
        graph.add_triple(&Triple::new(" a ", "occurredIn", "c", ""), &event("two"));
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.node("a").unwrap().source_document, "two");
    }

    #[test]
    fn pair_keying_overwrites_predicate() {
        let triples = [
            Triple::new("a", "occurredIn", "b", "first"),
            Triple::new("a", "hasOutcome", "b", "second"),
        ];
        let graph = KnowledgeGraph::build(&triples, &event("doc"));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].predicate_key, "hasOutcome");
        assert_eq!(graph.edges()[0].span, "second");
    }

    #[test]
    fn relation_keying_keeps_parallel_edges() {
        let triples = [
            Triple::new("a", "occurredIn", "b", ""),
            Triple::new("a", "hasOutcome", "b", ""),
            Triple::new("a", "occurredIn", "b", "again"),
        ];
        let graph = KnowledgeGraph::build_with_keying(EdgeKeying::Relation, &triples, &event("d"));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges_between("a", "b").count(), 2);
        assert_eq!(graph.edges()[0].span, "again");
    }

    #[test]
    fn blank_components_are_skipped() {
        let mut graph = KnowledgeGraph::new();
        assert!(!graph.add_triple(&Triple::new("  ", "occurredIn", "b", ""), &event("d")));
        assert!(!graph.add_triple(&Triple::new("a", "occurredIn", "", ""), &event("d")));
        assert!(graph.is_empty());
    }

    #[test]
    fn predicate_labels_use_profile_glosses() {
        let profile = OntologyProfile::new(
            OntologyClass::Event,
            vec![crate::ontology::Predicate {
                key: "occurredIn".to_owned(),
                gloss: "وقع في".to_owned(),
            }],
            crate::ontology::SchemaTemplate::Missing {
                file: "event.tbox.ttl".to_owned(),
            },
        );
        let provenance = Provenance::from_profile(&profile, "doc");
        let graph = KnowledgeGraph::build(&[Triple::new("a", "occurredIn", "b", "")], &provenance);
        assert_eq!(graph.edges()[0].predicate_label, "وقع في");
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        let merged = KnowledgeGraph::merge(&[]);
        assert!(merged.is_empty());
        assert_eq!(merged.edge_count(), 0);
    }

    #[test]
    fn merge_of_one_is_identity() {
        let graph = KnowledgeGraph::build(&sample(), &event("a"));
        assert_eq!(KnowledgeGraph::merge(std::slice::from_ref(&graph)), graph);
    }

    #[test]
    fn merge_membership_is_order_independent() {
        let g1 = KnowledgeGraph::build(&sample(), &event("one"));
        let g2 = KnowledgeGraph::build(
            &[
                Triple::new("باريس", "relatedToEvent", "قمة الأرض", ""),
                Triple::new("خبراء", "hasParticipant", "مؤتمر المناخ العالمي", "other span"),
            ],
            &Provenance::new(OntologyClass::Cultural, "two"),
        );
        let ab = KnowledgeGraph::merge(&[g1.clone(), g2.clone()]);
        let ba = KnowledgeGraph::merge(&[g2, g1]);

        assert_eq!(ab.node_ids(), ba.node_ids());
        assert_eq!(ab.edge_keys(), ba.edge_keys());
        assert_eq!(ab.node_count(), 4);
        assert_eq!(ab.edge_count(), 3);

        // Attribute values follow argument order.
        assert_eq!(ab.node("باريس").unwrap().source_document, "two");
        assert_eq!(ba.node("باريس").unwrap().source_document, "one");
    }

    #[test]
    fn merge_membership_is_associative() {
        let g1 = KnowledgeGraph::build(&[Triple::new("a", "p", "b", "")], &event("1"));
        let g2 = KnowledgeGraph::build(&[Triple::new("b", "p", "c", "")], &event("2"));
        let g3 = KnowledgeGraph::build(&[Triple::new("a", "q", "b", "")], &event("3"));
        let left = KnowledgeGraph::merge(&[KnowledgeGraph::merge(&[g1.clone(), g2.clone()]), g3.clone()]);
        let right = KnowledgeGraph::merge(&[g1, KnowledgeGraph::merge(&[g2, g3])]);
        assert_eq!(left, right);
    }

    #[test]
    fn triples_round_trip_through_labels() {
        let graph = KnowledgeGraph::build(&sample(), &event("a"));
        let triples = graph.triples();
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[1].object, "مؤتمر المناخ العالمي");
    }

    #[test]
    fn serde_dump_restores_indices() {
        let graph = KnowledgeGraph::build_with_keying(
            EdgeKeying::Relation,
            &sample(),
            &event("report.pdf"),
        );
        let json = serde_json::to_string(&graph).unwrap();
        let restored: KnowledgeGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, graph);
        assert_eq!(restored.keying(), EdgeKeying::Relation);
        assert!(restored.contains_node("باريس"));
    }
}
