//! N-Triples serializer for filtered triples.
//!
//! One statement per line with absolute IRIs; per triple an `rdf:type`
//! statement and the predicate statement. The subject is `Event_<i>` for
//! the 1-based position of the triple.

use crate::ids::{canonical_entity, event_id, slug};
use crate::model::Triple;
use crate::ontology::OntologyProfile;
use crate::serializer::{escape_iri, ONTOLOGY_NS, RDF_TYPE, RESOURCE_NS};

/// Serializes `triples` to an N-Triples string.
///
/// This function is infallible.
#[must_use]
pub fn to_ntriples(triples: &[Triple], profile: &OntologyProfile) -> String {
    let mut out = String::with_capacity(triples.len() * 256);
    let class = iri(&profile.ontology_class().iri());

    for (i, t) in triples.iter().enumerate() {
        let subj = format!("{RESOURCE_NS}{}", event_id(i + 1));
        let pred = format!("{ONTOLOGY_NS}{}", escape_iri(&slug(&t.predicate)));
        let obj = format!("{RESOURCE_NS}{}", escape_iri(&canonical_entity(&t.object)));

        triple(&mut out, &subj, RDF_TYPE, &class);
        triple(&mut out, &subj, &pred, &iri(&obj));
    }

    out
}

fn triple(out: &mut String, subj: &str, pred: &str, obj: &str) {
    out.push('<');
    out.push_str(subj);
    out.push_str("> <");
    out.push_str(pred);
    out.push_str("> ");
    out.push_str(obj);
    out.push_str(" .\n");
}

fn iri(s: &str) -> String {
    format!("<{}>", s)
}
