//! Graph export for machine types.
//!
//! Produces Graphviz `dot` source describing a compiled machine. Terminal
//! states are diamonds, decisions ellipses and actions boxes; decision edges
//! are labelled `T` and `F`. Rendering the source to an image is left to the
//! Graphviz tools.

mod dot;

pub use dot::{DotEdge, DotGraph, DotNode, NodeShape};

use crate::core::{StateKind, Transitions};
use crate::runtime::MachineType;

/// Shape a state of the given kind is drawn with.
pub fn shape_for(kind: StateKind) -> NodeShape {
    match kind {
        StateKind::Terminal => NodeShape::Diamond,
        StateKind::Decision => NodeShape::Ellipse,
        StateKind::Action => NodeShape::Box,
    }
}

/// Describe `machine` as a `dot` graph.
pub fn export<D>(machine: &MachineType<D>) -> DotGraph {
    let style = &machine.config().graph;
    let mut graph = DotGraph::new(machine.name())
        .with_label(format!("AutoGen for StateMachine {}", machine.name()))
        .with_default_shape(style.default_shape)
        .with_font_size(style.font_size);

    for (id, transitions) in machine.table().iter() {
        graph.add_node(machine.label(id), Some(shape_for(transitions.kind())));
    }

    for (id, transitions) in machine.table().iter() {
        let from = machine.label(id);
        match *transitions {
            Transitions::Terminal => {}
            Transitions::Action(next) => graph.add_edge(from, machine.label(next), None),
            Transitions::Decision { on_true, on_false } => {
                graph.add_edge(from.clone(), machine.label(on_true), Some("T"));
                graph.add_edge(from, machine.label(on_false), Some("F"));
            }
        }
    }

    tracing::debug!(
        machine = %machine.name(),
        nodes = graph.nodes().len(),
        edges = graph.edges().len(),
        "exported machine graph"
    );
    graph
}
