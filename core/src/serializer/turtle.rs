//! Turtle 1.1 serializer for filtered triples.
//!
//! Each distinct subject becomes an `Event_<n>` resource typed with the
//! profile's ontology class. Per triple the output holds a type statement,
//! labels for subject and object, and the predicate statement, one
//! statement per line.

use crate::ids::{canonical_entity, slug, EventIdAssigner};
use crate::model::Triple;
use crate::ontology::OntologyProfile;
use crate::serializer::{label_literal, turtle_name, ONTOLOGY_NS, RESOURCE_NS};

/// The fixed prefix block at the top of every document.
pub const PREFIXES: &str = "\
@prefix : <http://example.org/resource/> .
@prefix onto: <http://example.org/ontology/> .
@prefix dbo: <http://dbpedia.org/ontology/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
";

/// Serializes `triples` to a Turtle string under `profile`.
///
/// This function is infallible; event ids are assigned by a fresh
/// [`EventIdAssigner`] per call.
#[must_use]
pub fn to_turtle(triples: &[Triple], profile: &OntologyProfile) -> String {
    let mut out = String::with_capacity(1024 + triples.len() * 256);

    out.push_str(PREFIXES);
    out.push('\n');

    // T-Box template as comments
    out.push_str("# Ontology Template Used\n");
    // A lone carriage return also ends a Turtle comment.
    for line in profile.template().text().lines().flat_map(|l| l.split('\r')) {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');

    let class = profile.ontology_class().turtle_term();
    let mut ids = EventIdAssigner::new();

    for t in triples {
        let subject = turtle_name("", RESOURCE_NS, &ids.event_id_for(t.subject.trim()));
        let object = turtle_name("", RESOURCE_NS, &canonical_entity(&t.object));
        let predicate = turtle_name("onto", ONTOLOGY_NS, &slug(&t.predicate));

        out.push_str(&format!("{subject} a {class} .\n"));
        out.push_str(&format!(
            "{subject} rdfs:label {} .\n",
            label_literal(t.subject.trim())
        ));
        out.push_str(&format!(
            "{object} rdfs:label {} .\n",
            label_literal(t.object.trim())
        ));
        out.push_str(&format!("{subject} {predicate} {object} .\n\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{OntologyClass, SchemaTemplate};

    fn profile(template: SchemaTemplate) -> OntologyProfile {
        OntologyProfile::new(OntologyClass::Event, Vec::new(), template)
    }

    fn climate() -> Vec<Triple> {
        vec![Triple::new("مؤتمر المناخ", "occurredIn", "باريس", "...")]
    }

    #[test]
    fn emits_expected_statements() {
        let ttl = to_turtle(
            &climate(),
            &profile(SchemaTemplate::Missing {
                file: "event.tbox.ttl".to_owned(),
            }),
        );
        let lines: Vec<&str> = ttl.lines().collect();
        assert!(lines.contains(&":Event_1 a dbo:Event ."));
        assert!(lines.contains(&":Event_1 onto:occurredIn :باريس ."));
        assert!(lines.contains(&":Event_1 rdfs:label \"مؤتمر المناخ\"@ar ."));
        assert!(lines.contains(&":باريس rdfs:label \"باريس\"@ar ."));
    }

    #[test]
    fn starts_with_fixed_prefixes() {
        let ttl = to_turtle(&[], &profile(SchemaTemplate::Loaded(String::new())));
        assert!(ttl.starts_with("@prefix : <http://example.org/resource/> ."));
        for prefix in ["onto:", "dbo:", "rdfs:"] {
            assert!(ttl.contains(&format!("@prefix {prefix}")));
        }
    }

    #[test]
    fn template_is_commented() {
        let ttl = to_turtle(
            &climate(),
            &profile(SchemaTemplate::Loaded(
                "onto:occurredIn a rdf:Property .\nonto:hasOutcome a rdf:Property .".to_owned(),
            )),
        );
        assert!(ttl.contains("# onto:occurredIn a rdf:Property ."));
        assert!(ttl.contains("# onto:hasOutcome a rdf:Property ."));

        let missing = to_turtle(
            &climate(),
            &profile(SchemaTemplate::Missing {
                file: "event.tbox.ttl".to_owned(),
            }),
        );
        assert!(missing.contains("# # WARNING: Missing T-Box file: event.tbox.ttl"));
    }

    #[test]
    fn bare_carriage_returns_stay_inside_comments() {
        let ttl = to_turtle(
            &climate(),
            &profile(SchemaTemplate::Loaded(
                "onto:occurredIn a rdf:Property .\ronto:hasOutcome a rdf:Property .\r\n".to_owned(),
            )),
        );
        assert!(!ttl.contains('\r'));
        assert!(ttl.contains("\n# onto:occurredIn a rdf:Property .\n"));
        assert!(ttl.contains("\n# onto:hasOutcome a rdf:Property .\n"));
    }

    #[test]
    fn repeated_subjects_share_an_id() {
        let triples = vec![
            Triple::new("الحرب", "occurredIn", "القدس", ""),
            Triple::new("الهدنة", "occurredIn", "رودس", ""),
            Triple::new("الحرب", "hasOutcome", "الهدنة", ""),
        ];
        let ttl = to_turtle(&triples, &profile(SchemaTemplate::Loaded(String::new())));
        assert!(ttl.contains(":Event_1 onto:hasOutcome :الهدنة ."));
        assert!(ttl.contains(":Event_2 onto:occurredIn :رودس ."));
        assert!(!ttl.contains("Event_3"));
        // One type statement per triple, even for a repeated subject.
        assert_eq!(ttl.lines().filter(|l| l.contains(" a dbo:Event .")).count(), 3);
    }

    #[test]
    fn padded_subjects_share_an_id() {
        let triples = vec![
            Triple::new("X", "occurredIn", "A", ""),
            Triple::new(" X ", "occurredIn", "B", ""),
        ];
        let ttl = to_turtle(&triples, &profile(SchemaTemplate::Loaded(String::new())));
        assert!(ttl.contains(":Event_1 onto:occurredIn :A ."));
        assert!(ttl.contains(":Event_1 onto:occurredIn :B ."));
        assert!(!ttl.contains("Event_2"));
    }

    #[test]
    fn awkward_labels_fall_back_to_full_iris() {
        let triples = vec![Triple::new("Talks", "occurredIn", "Washington, D.C.", "")];
        let ttl = to_turtle(&triples, &profile(SchemaTemplate::Loaded(String::new())));
        assert!(ttl.contains(
            ":Event_1 onto:occurredIn <http://example.org/resource/Washington,_D.C.> ."
        ));
        assert!(ttl.contains(":Event_1 rdfs:label \"Talks\" ."));
    }

    #[test]
    fn user_class_terms() {
        let profile = OntologyProfile::new(
            OntologyClass::UserDefined("http://schema.org/Book".to_owned()),
            Vec::new(),
            SchemaTemplate::Loaded(String::new()),
        );
        let ttl = to_turtle(&[Triple::new("كتاب", "hasAuthor", "مؤلف", "")], &profile);
        assert!(ttl.contains(":Event_1 a <http://schema.org/Book> ."));
    }
}
