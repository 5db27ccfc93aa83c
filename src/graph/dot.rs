//! Minimal Graphviz `dot` document model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node shapes used for machine diagrams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    Box,
    Diamond,
    Ellipse,
}

impl NodeShape {
    /// Order in which node groups are written.
    pub const ALL: [NodeShape; 3] = [NodeShape::Box, NodeShape::Diamond, NodeShape::Ellipse];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeShape::Box => "box",
            NodeShape::Diamond => "diamond",
            NodeShape::Ellipse => "ellipse",
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotNode {
    pub name: String,
    pub shape: Option<NodeShape>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

/// A directed graph ready to be written as `dot` source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotGraph {
    pub name: String,
    pub label: String,
    pub default_shape: NodeShape,
    pub font_size: u32,
    nodes: Vec<DotNode>,
    edges: Vec<DotEdge>,
}

impl DotGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            default_shape: NodeShape::Box,
            font_size: 12,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_default_shape(mut self, shape: NodeShape) -> Self {
        self.default_shape = shape;
        self
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Add a node; re-adding a name only updates its shape.
    pub fn add_node(&mut self, name: impl Into<String>, shape: Option<NodeShape>) {
        let name = name.into();
        match self.nodes.iter_mut().find(|n| n.name == name) {
            Some(existing) => existing.shape = shape,
            None => self.nodes.push(DotNode { name, shape }),
        }
    }

    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        label: Option<&str>,
    ) {
        self.edges.push(DotEdge {
            from: from.into(),
            to: to.into(),
            label: label.map(str::to_string),
        });
    }

    pub fn nodes(&self) -> &[DotNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DotEdge] {
        &self.edges
    }

    /// Shape a node is drawn with.
    pub fn shape_of(&self, node: &DotNode) -> NodeShape {
        node.shape.unwrap_or(self.default_shape)
    }

    /// The document, one statement per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("digraph {} {{ ", quote_id(&self.name))];

        for shape in NodeShape::ALL {
            let members: Vec<String> = self
                .nodes
                .iter()
                .filter(|node| self.shape_of(node) == shape)
                .map(|node| quote_id(&node.name))
                .collect();
            if !members.is_empty() {
                lines.push(format!("node [shape={}] {}", shape, members.join("; ")));
            }
        }

        for edge in &self.edges {
            let from = quote_id(&edge.from);
            let to = quote_id(&edge.to);
            match &edge.label {
                Some(label) => {
                    lines.push(format!("{from}->{to} [label=\"{}\"];", escape(label)))
                }
                None => lines.push(format!("{from}->{to};")),
            }
        }

        lines.push("overlap=false".to_string());
        lines.push(format!("label=\"{}\"", escape(&self.label)));
        lines.push(format!("fontsize={}", self.font_size));
        lines.push("}".to_string());
        lines
    }
}

impl fmt::Display for DotGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Bare identifiers stay bare; anything else is quoted.
fn quote_id(id: &str) -> String {
    let plain = id
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        id.to_string()
    } else {
        format!("\"{}\"", escape(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_has_frame_and_properties() {
        let graph = DotGraph::new("G").with_label("demo").with_font_size(9);

        assert_eq!(
            graph.lines(),
            vec!["digraph G { ", "overlap=false", "label=\"demo\"", "fontsize=9", "}"]
        );
    }

    #[test]
    fn nodes_are_grouped_by_shape() {
        let mut graph = DotGraph::new("G");
        graph.add_node("A", None);
        graph.add_node("B", Some(NodeShape::Ellipse));
        graph.add_node("C", Some(NodeShape::Box));
        graph.add_node("D", Some(NodeShape::Diamond));

        let lines = graph.lines();
        assert_eq!(lines[1], "node [shape=box] A; C");
        assert_eq!(lines[2], "node [shape=diamond] D");
        assert_eq!(lines[3], "node [shape=ellipse] B");
    }

    #[test]
    fn default_shape_applies_to_unshaped_nodes() {
        let mut graph = DotGraph::new("G").with_default_shape(NodeShape::Ellipse);
        graph.add_node("A", None);

        assert_eq!(graph.lines()[1], "node [shape=ellipse] A");
    }

    #[test]
    fn edges_render_with_optional_labels() {
        let mut graph = DotGraph::new("G");
        graph.add_edge("A", "B", None);
        graph.add_edge("B", "A", Some("T"));

        let text = graph.to_string();
        assert!(text.contains("A->B;\n"));
        assert!(text.contains("B->A [label=\"T\"];\n"));
    }

    #[test]
    fn awkward_identifiers_are_quoted() {
        assert_eq!(quote_id("Plain_1"), "Plain_1");
        assert_eq!(quote_id("has space"), "\"has space\"");
        assert_eq!(quote_id("9lives"), "\"9lives\"");
        assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
    }
}
