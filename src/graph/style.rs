//! Fixed mapping from element kind and visual classes to drawing attributes.
//!
//! Later rules win, mirroring a cascading stylesheet: kind first, then
//! `mst`, then `instrumented`, then `current`.

use super::model::{Edge, EdgeKind, Node, NodeKind};
use super::overlay::{ElementVisual, VisualClass};

const ENTRY_GREEN: &str = "#22c55e";
const EXIT_RED: &str = "#ef4444";
const DECISION_BLUE: &str = "#0ea5e9";
const NORMAL_GRAY: &str = "#1f2937";
const EDGE_GRAY: &str = "#6b7280";
const DARK: &str = "#111827";
const CURRENT_PURPLE: &str = "#7c3aed";

/// Outline of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
	/// Plain rectangle.
	Rectangle,
	/// Rectangle with rounded corners.
	RoundRectangle,
	/// Diamond.
	Diamond,
}

/// Resolved drawing attributes of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
	/// Outline.
	pub shape: NodeShape,
	/// Fill colour.
	pub fill: &'static str,
	/// Label colour.
	pub text: &'static str,
	/// Border width and colour, if any.
	pub border: Option<(f64, &'static str)>,
	/// Ghost nodes are fully transparent.
	pub opacity: f64,
}

/// Resolved drawing attributes of an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	/// Line and arrow colour.
	pub color: &'static str,
	/// Line width.
	pub width: f64,
	/// Dashed line.
	pub dashed: bool,
}

/// Style for a node given its current visual state.
pub fn node_style(node: &Node, visual: Option<&ElementVisual>) -> NodeStyle {
	let (shape, fill, text) = match node.kind {
		NodeKind::Entry => (NodeShape::RoundRectangle, ENTRY_GREEN, DARK),
		NodeKind::Exit => (NodeShape::RoundRectangle, EXIT_RED, DARK),
		NodeKind::Decision => (NodeShape::Diamond, DECISION_BLUE, DARK),
		NodeKind::Normal => (NodeShape::Rectangle, NORMAL_GRAY, "#e5e7eb"),
	};
	let current = visual.is_some_and(|v| v.has(VisualClass::Current));
	NodeStyle {
		shape,
		fill,
		text,
		border: current.then_some((4.0, CURRENT_PURPLE)),
		opacity: if node.ghost { 0.0 } else { 1.0 },
	}
}

/// Style for an edge given its current visual state.
pub fn edge_style(edge: &Edge, visual: Option<&ElementVisual>) -> EdgeStyle {
	let mut style = EdgeStyle {
		color: match edge.kind {
			EdgeKind::Entry => ENTRY_GREEN,
			EdgeKind::Exit => EXIT_RED,
			EdgeKind::Normal => EDGE_GRAY,
		},
		width: 2.0,
		dashed: false,
	};
	let Some(visual) = visual else {
		return style;
	};
	if visual.has(VisualClass::Mst) {
		style.color = DARK;
		style.width = 5.0;
	}
	if visual.has(VisualClass::Instrumented) {
		style.dashed = true;
	}
	if visual.has(VisualClass::Current) {
		style.color = CURRENT_PURPLE;
		style.width = 6.0;
	}
	style
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn visual(classes: &[VisualClass]) -> ElementVisual {
		ElementVisual {
			classes: classes.iter().copied().collect(),
			display_label: String::new(),
		}
	}

	#[rstest]
	#[case(NodeKind::Entry, NodeShape::RoundRectangle, ENTRY_GREEN)]
	#[case(NodeKind::Exit, NodeShape::RoundRectangle, EXIT_RED)]
	#[case(NodeKind::Decision, NodeShape::Diamond, DECISION_BLUE)]
	#[case(NodeKind::Normal, NodeShape::Rectangle, NORMAL_GRAY)]
	fn node_kind_sets_shape_and_fill(
		#[case] kind: NodeKind,
		#[case] shape: NodeShape,
		#[case] fill: &str,
	) {
		let style = node_style(&Node::new("n", "n", kind), None);
		assert_eq!(style.shape, shape);
		assert_eq!(style.fill, fill);
		assert_eq!(style.border, None);
	}

	#[test]
	fn current_node_gets_purple_border_and_ghosts_are_invisible() {
		let style = node_style(
			&Node::new("n", "n", NodeKind::Normal),
			Some(&visual(&[VisualClass::Current])),
		);
		assert_eq!(style.border, Some((4.0, CURRENT_PURPLE)));
		assert_eq!(node_style(&Node::ghost("g"), None).opacity, 0.0);
	}

	#[test]
	fn current_overrides_mst_but_keeps_dashing() {
		let edge = Edge::new("e", "a", "b", EdgeKind::Entry);
		assert_eq!(edge_style(&edge, None).color, ENTRY_GREEN);

		let mst = edge_style(&edge, Some(&visual(&[VisualClass::Mst])));
		assert_eq!((mst.color, mst.width, mst.dashed), (DARK, 5.0, false));

		let all = edge_style(
			&edge,
			Some(&visual(&[VisualClass::Mst, VisualClass::Instrumented, VisualClass::Current])),
		);
		assert_eq!((all.color, all.width, all.dashed), (CURRENT_PURPLE, 6.0, true));
	}
}
