//! GEXF 1.2 serializer for knowledge graphs, the native format of Gephi.
//! Labels are GEXF labels; the remaining attributes are declared once and
//! written as `<attvalue>`s.

use crate::graph::{GraphEdge, GraphNode, KnowledgeGraph, NodeKind};
use crate::serializer::escape_xml;

const NODE_ATTRIBUTES: &[&str] = &["theme", "ontology_class", "source", "type"];
const EDGE_ATTRIBUTES: &[&str] = &["predicate", "theme", "ontology_class", "span", "source"];

/// Serializes `graph` to a GEXF document.
#[must_use]
pub fn to_gexf(graph: &KnowledgeGraph) -> String {
    let mut out = String::with_capacity(1024 + graph.edge_count() * 512);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<gexf xmlns=\"http://gexf.net/1.2\" version=\"1.2\">\n");
    out.push_str("  <meta>\n    <creator>arkg</creator>\n  </meta>\n");
    out.push_str("  <graph mode=\"static\" defaultedgetype=\"directed\">\n");

    declare(&mut out, "node", NODE_ATTRIBUTES);
    declare(&mut out, "edge", EDGE_ATTRIBUTES);

    out.push_str("    <nodes>\n");
    for node in graph.nodes() {
        write_node(&mut out, node);
    }
    out.push_str("    </nodes>\n    <edges>\n");
    for (i, edge) in graph.edges().iter().enumerate() {
        write_edge(&mut out, i, edge);
    }
    out.push_str("    </edges>\n  </graph>\n</gexf>\n");
    out
}

fn declare(out: &mut String, class: &str, names: &[&str]) {
    out.push_str(&format!("    <attributes class=\"{class}\">\n"));
    for name in names {
        out.push_str(&format!(
            "      <attribute id=\"{name}\" title=\"{name}\" type=\"string\"/>\n"
        ));
    }
    out.push_str("    </attributes>\n");
}

fn write_node(out: &mut String, node: &GraphNode) {
    let kind = match node.kind {
        NodeKind::Entity => "entity",
    };
    out.push_str(&format!(
        "      <node id=\"{}\" label=\"{}\">\n        <attvalues>\n",
        escape_xml(&node.id),
        escape_xml(&node.label)
    ));
    attvalue(out, "theme", node.theme.as_str());
    attvalue(out, "ontology_class", node.ontology_class.as_str());
    attvalue(out, "source", &node.source_document);
    attvalue(out, "type", kind);
    out.push_str("        </attvalues>\n      </node>\n");
}

fn write_edge(out: &mut String, index: usize, edge: &GraphEdge) {
    out.push_str(&format!(
        "      <edge id=\"{index}\" source=\"{}\" target=\"{}\" label=\"{}\">\n        <attvalues>\n",
        escape_xml(&edge.source),
        escape_xml(&edge.target),
        escape_xml(&edge.predicate_label)
    ));
    attvalue(out, "predicate", &edge.predicate_key);
    attvalue(out, "theme", edge.theme.as_str());
    attvalue(out, "ontology_class", edge.ontology_class.as_str());
    attvalue(out, "span", &edge.span);
    attvalue(out, "source", &edge.source_document);
    out.push_str("        </attvalues>\n      </edge>\n");
}

fn attvalue(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!(
        "          <attvalue for=\"{name}\" value=\"{}\"/>\n",
        escape_xml(value)
    ));
}
