//! Runs a short Arabic report through the pipeline with a canned generator
//! and prints the Turtle output and graph statistics.
//!
//! Run with: `cargo run --example build_graph -p arkg`

use arkg::{Document, GenerationRequest, OntologyRegistry, Pipeline, Triple};

const REPORT: &str = "\
تقرير عن مؤتمر المناخ
انعقد مؤتمر المناخ في باريس بمشاركة خبراء البيئة .
اندلعت احتجاجات في المدينة بعد المؤتمر !!
";

fn main() -> arkg::Result<()> {
    let registry = OntologyRegistry::new(concat!(env!("CARGO_MANIFEST_DIR"), "/ontology"));
    let profile = registry.resolve("event", None)?;

    // Stands in for a language model: one candidate set per segment.
    let mut generator = |req: &GenerationRequest<'_>| -> arkg::Result<Vec<Triple>> {
        if req.segment.contains("باريس") {
            Ok(vec![
                Triple::new("مؤتمر المناخ", "occurredIn", "باريس", req.segment),
                Triple::new("مؤتمر المناخ", "hasParticipant", "خبراء البيئة", req.segment),
                Triple::new("مؤتمر المناخ", "wasBoring", "نعم", req.segment),
            ])
        } else {
            Ok(vec![Triple::new(
                "احتجاجات المدينة",
                "precededBy",
                "مؤتمر المناخ",
                req.segment,
            )])
        }
    };

    let result = Pipeline::default().run_document(
        Document {
            name: "report.txt",
            text: REPORT,
        },
        &profile,
        &["المناخ".to_owned()],
        &mut generator,
    )?;

    println!("Segments:   {}", result.segments.len());
    println!("Candidates: {}", result.candidate_count);
    println!("Kept:       {}", result.triples.len());
    println!(
        "Graph:      {} nodes, {} edges",
        result.graph.node_count(),
        result.graph.edge_count()
    );
    println!();
    print!("{}", arkg::serializer::turtle::to_turtle(&result.triples, &profile));
    Ok(())
}
