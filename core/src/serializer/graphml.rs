//! GraphML serializer for knowledge graphs, for graph tools such as Gephi
//! or yEd. All node and edge attributes are written as `<data>` elements.

use crate::graph::{GraphEdge, GraphNode, KnowledgeGraph, NodeKind};
use crate::serializer::escape_xml;

const NODE_KEYS: &[&str] = &["label", "theme", "ontology_class", "source", "type"];
const EDGE_KEYS: &[&str] = &[
    "label",
    "predicate",
    "theme",
    "ontology_class",
    "span",
    "source",
];

/// Serializes `graph` to a GraphML document.
#[must_use]
pub fn to_graphml(graph: &KnowledgeGraph) -> String {
    let mut out = String::with_capacity(1024 + graph.edge_count() * 512);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">\n");

    for key in NODE_KEYS {
        out.push_str(&format!(
            "  <key id=\"n_{key}\" for=\"node\" attr.name=\"{key}\" attr.type=\"string\"/>\n"
        ));
    }
    for key in EDGE_KEYS {
        out.push_str(&format!(
            "  <key id=\"e_{key}\" for=\"edge\" attr.name=\"{key}\" attr.type=\"string\"/>\n"
        ));
    }

    out.push_str("  <graph id=\"G\" edgedefault=\"directed\">\n");
    for node in graph.nodes() {
        write_node(&mut out, node);
    }
    for (i, edge) in graph.edges().iter().enumerate() {
        write_edge(&mut out, i, edge);
    }
    out.push_str("  </graph>\n</graphml>\n");
    out
}

fn write_node(out: &mut String, node: &GraphNode) {
    let kind = match node.kind {
        NodeKind::Entity => "entity",
    };
    out.push_str(&format!("    <node id=\"{}\">\n", escape_xml(&node.id)));
    data(out, "n_label", &node.label);
    data(out, "n_theme", node.theme.as_str());
    data(out, "n_ontology_class", node.ontology_class.as_str());
    data(out, "n_source", &node.source_document);
    data(out, "n_type", kind);
    out.push_str("    </node>\n");
}

fn write_edge(out: &mut String, index: usize, edge: &GraphEdge) {
    out.push_str(&format!(
        "    <edge id=\"e{index}\" source=\"{}\" target=\"{}\">\n",
        escape_xml(&edge.source),
        escape_xml(&edge.target)
    ));
    data(out, "e_label", &edge.predicate_label);
    data(out, "e_predicate", &edge.predicate_key);
    data(out, "e_theme", edge.theme.as_str());
    data(out, "e_ontology_class", edge.ontology_class.as_str());
    data(out, "e_span", &edge.span);
    data(out, "e_source", &edge.source_document);
    out.push_str("    </edge>\n");
}

fn data(out: &mut String, key: &str, value: &str) {
    out.push_str(&format!(
        "      <data key=\"{key}\">{}</data>\n",
        escape_xml(value)
    ));
}
