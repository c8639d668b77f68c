//! End-to-end runs: raw text through segmentation, generation, filtering,
//! graph merging, export and artifact verification.

use std::fs;
use std::path::PathBuf;

use arkg::export::{read_graph_json, write_graph_json};
use arkg::verify::verify_artifacts;
use arkg::{
    export, Config, Document, EdgeKeying, ExportFormat, GenerationRequest, KnowledgeGraph,
    OntologyRegistry, Pipeline, Triple,
};

fn registry() -> OntologyRegistry {
    OntologyRegistry::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("ontology"))
}

const CLIMATE: &str = "\
تقرير   المناخ\u{0640}\u{0640}
انعقد مؤتمر المناخ في باريس .
اندلعت احتجاجات في المدينة !!
";

const TALKS: &str = "\
وقعت المحادثات في باريس
شارك فيها خبراء البيئة
";

/// Canned generator: answers by looking at which city or event the segment
/// mentions, and always proposes one predicate outside the ontology.
fn generator(req: &GenerationRequest<'_>) -> arkg::Result<Vec<Triple>> {
    let mut out = Vec::new();
    if req.segment.contains("مؤتمر") {
        out.push(Triple::new("مؤتمر المناخ", "occurredIn", "باريس", req.segment));
    }
    if req.segment.contains("احتجاجات") {
        out.push(Triple::new("احتجاجات", "precededBy", "مؤتمر المناخ", req.segment));
    }
    if req.segment.contains("المحادثات") {
        out.push(Triple::new("المحادثات", "occurredIn", "باريس", req.segment));
        out.push(Triple::new("المحادثات", "hasParticipant", "خبراء البيئة", req.segment));
    }
    out.push(Triple::new("المقال", "hasAuthorMood", "متفائل", req.segment));
    Ok(out)
}

#[test]
fn documents_merge_and_export_consistently() {
    let profile = registry().resolve("event", None).unwrap();
    assert!(profile.template().is_loaded());
    let pipeline = Pipeline::default();

    let climate = pipeline
        .run_document(
            Document {
                name: "climate.pdf",
                text: CLIMATE,
            },
            &profile,
            &[],
            &mut generator,
        )
        .unwrap();
    assert_eq!(climate.segments.len(), 2);
    assert_eq!(climate.candidate_count, 4);
    assert_eq!(climate.triples.len(), 2);

    let talks = pipeline
        .run_document(
            Document {
                name: "talks.pdf",
                text: TALKS,
            },
            &profile,
            &[],
            &mut generator,
        )
        .unwrap();
    assert_eq!(talks.segments.len(), 1);
    assert_eq!(talks.triples.len(), 2);

    // "باريس" appears in both documents.
    let merged = KnowledgeGraph::merge(&[climate.graph.clone(), talks.graph.clone()]);
    assert_eq!(merged.node_count(), 5);
    assert_eq!(merged.edge_count(), 4);
    assert_eq!(merged.node("باريس").unwrap().source_document, "talks.pdf");

    let reversed = KnowledgeGraph::merge(&[talks.graph.clone(), climate.graph.clone()]);
    assert_eq!(reversed.node_ids(), merged.node_ids());
    assert_eq!(reversed.edge_keys(), merged.edge_keys());
    assert_eq!(reversed.node("باريس").unwrap().source_document, "climate.pdf");

    let triples: Vec<Triple> = climate.triples.iter().chain(&talks.triples).cloned().collect();
    let dir = tempfile::tempdir().unwrap();
    let written = export(&triples, &profile, &ExportFormat::ALL, dir.path(), "events").unwrap();
    assert_eq!(written.len(), 3);

    let ttl = fs::read_to_string(&written[&ExportFormat::Turtle]).unwrap();
    let lines: Vec<&str> = ttl.lines().collect();
    assert!(lines.contains(&":Event_1 a dbo:Event ."));
    assert!(lines.contains(&":Event_1 onto:occurredIn :باريس ."));
    assert!(lines.contains(&":Event_2 onto:precededBy :مؤتمر_المناخ ."));
    assert!(lines.contains(&":Event_3 onto:hasParticipant :خبراء_البيئة ."));
    assert!(lines.contains(&"# onto:occurredIn a rdf:Property ; rdfs:domain dbo:Event ; rdfs:label \"وقع في\"@ar ."));

    let report = verify_artifacts(dir.path(), "events").unwrap();
    assert!(report.all_passed(), "{:#?}", report.results);
    assert_eq!(report.counts.ntriples, Some(8));
    assert_eq!(report.counts.turtle, Some(16));
    assert_eq!(report.counts.json_ld, Some(4));
}

#[test]
fn graph_dump_survives_a_round_trip() {
    let profile = registry().resolve("event", None).unwrap();
    let result = Pipeline::default()
        .run_document(
            Document {
                name: "talks.pdf",
                text: TALKS,
            },
            &profile,
            &[],
            &mut generator,
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = write_graph_json(&result.graph, dir.path(), "talks").unwrap();
    let reloaded = read_graph_json(&path).unwrap();
    assert_eq!(reloaded, result.graph);
    assert_eq!(reloaded.triples(), result.triples);
}

#[test]
fn configuration_drives_markers_and_keying() {
    let config = Config::from_toml_str(
        r#"
        edge_keying   = "relation"
        extra_markers = ["مهرجان"]
        "#,
    )
    .unwrap();
    let pipeline = Pipeline::from_config(&config);

    let text = "افتتاح\nمهرجان الشعر في القاهرة\nمهرجان الموسيقى في القاهرة";
    let mut same_pair = |req: &GenerationRequest<'_>| -> arkg::Result<Vec<Triple>> {
        Ok(vec![
            Triple::new("المهرجان", "occurredIn", "القاهرة", req.segment),
            Triple::new("المهرجان", "relatedToEvent", "القاهرة", req.segment),
        ])
    };
    let profile = registry().resolve("event", None).unwrap();
    let result = pipeline
        .run_document(
            Document {
                name: "festival.txt",
                text,
            },
            &profile,
            &[],
            &mut same_pair,
        )
        .unwrap();

    assert_eq!(result.segments.len(), 3);
    assert_eq!(result.graph.keying(), EdgeKeying::Relation);
    // Parallel relations between the same pair are both kept.
    assert_eq!(result.graph.edges_between("المهرجان", "القاهرة").count(), 2);

    let pair_keyed = Pipeline::default()
        .run_document(
            Document {
                name: "festival.txt",
                text,
            },
            &profile,
            &[],
            &mut same_pair,
        )
        .unwrap();
    assert_eq!(pair_keyed.segments.len(), 1);
    let edges: Vec<_> = pair_keyed
        .graph
        .edges_between("المهرجان", "القاهرة")
        .collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].predicate_key, "relatedToEvent");
    assert_eq!(edges[0].predicate_label, "مرتبط ب");
}

#[test]
fn user_defined_theme_exports_its_class() {
    let profile = registry()
        .with_custom_predicates([("hasAuthor", "له مؤلف")])
        .resolve("other", Some("http://schema.org/Book"))
        .unwrap();
    let triples = vec![
        Triple::new("ديوان المتنبي", "hasAuthor", "المتنبي", ""),
        Triple::new("ديوان المتنبي", "occurredIn", "الكوفة", ""),
    ];
    let kept = arkg::filter_triples(&triples, &profile);
    assert_eq!(kept.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    export(&kept, &profile, &ExportFormat::ALL, dir.path(), "books").unwrap();
    let ttl = fs::read_to_string(dir.path().join("books.ttl")).unwrap();
    assert!(ttl.contains(":Event_1 a <http://schema.org/Book> ."));
    let nt = fs::read_to_string(dir.path().join("books.nt")).unwrap();
    assert!(nt.contains("<http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/Book> ."));

    let report = verify_artifacts(dir.path(), "books").unwrap();
    assert!(report.all_passed(), "{:#?}", report.results);
}

#[test]
fn percent_and_bracket_labels_export_cleanly() {
    let profile = registry().resolve("event", None).unwrap();
    let triples = vec![
        Triple::new("s", "occurredIn", "50%", ""),
        Triple::new("ارتفاع الأسعار", "hasOutcome", "نسبة 5%", ""),
        Triple::new("s", "relatedToEvent", "[x]", ""),
        Triple::new("s", "precededBy", "a#b?c/d", ""),
    ];
    let dir = tempfile::tempdir().unwrap();
    export(&triples, &profile, &ExportFormat::ALL, dir.path(), "news").unwrap();

    let ttl = fs::read_to_string(dir.path().join("news.ttl")).unwrap();
    assert!(ttl.contains("<http://example.org/resource/50%25>"));
    assert!(ttl.contains("<http://example.org/resource/%5Bx%5D>"));
    let nt = fs::read_to_string(dir.path().join("news.nt")).unwrap();
    assert!(nt.contains("<http://example.org/resource/نسبة_5%25>"));
    assert!(nt.contains("<http://example.org/resource/a%23b%3Fc_d>"));

    let report = verify_artifacts(dir.path(), "news").unwrap();
    assert!(report.all_passed(), "{:#?}", report.results);
}

#[test]
fn awkward_user_classes_export_cleanly() {
    for class in [
        "Poetry Collection!",
        "onto:Poem.",
        "http://schema.org/My Book",
        "onto:a#b",
    ] {
        let profile = registry()
            .with_custom_predicates([("hasAuthor", "له مؤلف")])
            .resolve("other", Some(class))
            .unwrap();
        let triples = vec![Triple::new("ديوان المتنبي", "hasAuthor", "المتنبي", "")];
        let dir = tempfile::tempdir().unwrap();
        export(&triples, &profile, &ExportFormat::ALL, dir.path(), "books").unwrap();

        let report = verify_artifacts(dir.path(), "books").unwrap();
        assert!(report.all_passed(), "{class}: {:#?}", report.results);
        assert_eq!(report.counts.turtle, Some(4), "{class}");
    }
}
