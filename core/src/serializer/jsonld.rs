//! JSON-LD 1.1 serializer for filtered triples.
//!
//! Produces a single document with an `@context` and a `@graph` array
//! holding one node per triple. Node ids come from the 1-based position of
//! the triple in the input, independently of the Turtle serializer's
//! subject-based numbering.

use serde_json::{json, Map, Value};

use crate::ids::{canonical_entity, event_id, slug};
use crate::model::Triple;
use crate::ontology::OntologyProfile;
use crate::serializer::{
    escape_iri, label_language, DBO_NS, ONTOLOGY_NS, RDFS_NS, RESOURCE_NS,
};

/// Serializes `triples` to a JSON-LD `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json_ld(triples: &[Triple], profile: &OntologyProfile) -> Value {
    let graph: Vec<Value> = triples
        .iter()
        .enumerate()
        .map(|(i, t)| triple_to_node(i + 1, t, profile))
        .collect();
    json!({
        "@context": build_context(),
        "@graph": graph
    })
}

fn build_context() -> Value {
    let mut ctx = Map::new();
    ctx.insert("@vocab".to_owned(), json!(RESOURCE_NS));
    ctx.insert("onto".to_owned(), json!(ONTOLOGY_NS));
    ctx.insert("dbo".to_owned(), json!(DBO_NS));
    ctx.insert("rdfs".to_owned(), json!(RDFS_NS));
    Value::Object(ctx)
}

fn label_value(label: &str) -> Value {
    match label_language(label) {
        Some(lang) => json!({ "@value": label, "@language": lang }),
        None => json!(label),
    }
}

fn triple_to_node(index: usize, t: &Triple, profile: &OntologyProfile) -> Value {
    let id = format!("{RESOURCE_NS}{}", event_id(index));
    let predicate = format!("{ONTOLOGY_NS}{}", escape_iri(&slug(&t.predicate)));
    let object = format!("{RESOURCE_NS}{}", escape_iri(&canonical_entity(&t.object)));

    let mut node = Map::new();
    node.insert("@id".to_owned(), json!(id));
    node.insert("@type".to_owned(), json!(profile.ontology_class().iri()));
    node.insert(predicate, json!({ "@id": object }));
    node.insert("rdfs:label".to_owned(), label_value(&t.subject));
    Value::Object(node)
}
