//! Graph and overlay value types.
//!
//! Graphs are built once per selected example and treated as immutable
//! afterwards. Overlays are transient and always replace the previous one.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Role of a node in a control-flow graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// The single entry point.
	Entry,
	/// The single exit point.
	Exit,
	/// A branching node.
	Decision,
	/// Anything else.
	#[default]
	Normal,
}

/// Role of an edge in a control-flow graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
	/// Edge leaving the entry node, or the sentinel edge into it.
	Entry,
	/// Edge reaching the exit node, or the sentinel edge out of it.
	Exit,
	/// Anything else.
	#[default]
	Normal,
}

/// A graph vertex.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
	/// Unique within a graph.
	pub id: String,
	/// Display text, may be empty.
	pub label: String,
	/// Semantic role.
	pub kind: NodeKind,
	/// Invisible, non-interactive anchor for a sentinel edge.
	pub ghost: bool,
}

impl Node {
	/// Creates a visible node.
	pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
			kind,
			ghost: false,
		}
	}

	/// Creates an unlabeled ghost node.
	pub fn ghost(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: String::new(),
			kind: NodeKind::Normal,
			ghost: true,
		}
	}
}

/// A directed graph edge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Edge {
	/// Unique within a graph.
	pub id: String,
	/// Id of the source node.
	pub source: String,
	/// Id of the target node.
	pub target: String,
	/// Optional display text.
	pub label: Option<String>,
	/// Optional numeric weight.
	pub weight: Option<f64>,
	/// Semantic role.
	pub kind: EdgeKind,
}

impl Edge {
	/// Creates an edge without label or weight.
	pub fn new(
		id: impl Into<String>,
		source: impl Into<String>,
		target: impl Into<String>,
		kind: EdgeKind,
	) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			label: None,
			weight: None,
			kind,
		}
	}

	/// Sets the display label.
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Sets the weight.
	pub fn with_weight(mut self, weight: f64) -> Self {
		self.weight = Some(weight);
		self
	}

	/// The label the edge shows when no overlay decorates it.
	pub fn base_label(&self) -> &str {
		self.label.as_deref().unwrap_or("")
	}
}

/// Ordered nodes and edges. Order is insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Graph {
	/// Nodes in insertion order.
	pub nodes: Vec<Node>,
	/// Edges in insertion order.
	pub edges: Vec<Edge>,
}

impl Graph {
	/// Creates a graph from node and edge lists.
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		Self { nodes, edges }
	}

	/// Looks up a node by id. With duplicate ids the last one wins.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().rev().find(|n| n.id == id)
	}

	/// Looks up an edge by id. With duplicate ids the last one wins.
	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.edges.iter().rev().find(|e| e.id == id)
	}

	/// Whether a node with `id` exists.
	pub fn has_node(&self, id: &str) -> bool {
		self.nodes.iter().any(|n| n.id == id)
	}

	/// Whether the graph has no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Transient display state layered onto a graph for one render cycle.
///
/// Every overlay fully replaces the previous one; nothing is patched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Overlay {
	/// Append `" (w=<weight>)"` to weighted edge labels.
	pub show_weights: bool,
	/// Edges drawn with the heavy spanning-tree treatment.
	pub mst_edge_ids: BTreeSet<String>,
	/// Edges drawn dashed.
	pub instrumented_edge_ids: BTreeSet<String>,
	/// Execution count per edge id. `None` entries are skipped.
	pub counters: BTreeMap<String, Option<u64>>,
	/// Node to highlight as the current position.
	pub current_node_id: Option<String>,
	/// Edge to highlight as the current position.
	pub current_edge_id: Option<String>,
}

impl Overlay {
	/// Overlay that only toggles weight labels.
	pub fn weights(show_weights: bool) -> Self {
		Self {
			show_weights,
			..Self::default()
		}
	}

	/// Records an execution count for an edge.
	pub fn with_counter(mut self, edge_id: impl Into<String>, count: u64) -> Self {
		self.counters.insert(edge_id.into(), Some(count));
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn overlay_deserializes_from_camel_case_json() {
		let overlay: Overlay = serde_json::from_str(
			r#"{
				"showWeights": true,
				"mstEdgeIds": ["e1", "e2"],
				"counters": { "e1": 3, "e2": null },
				"currentNodeId": "D"
			}"#,
		)
		.expect("overlay json");

		assert!(overlay.show_weights);
		assert_eq!(overlay.mst_edge_ids.len(), 2);
		assert!(overlay.instrumented_edge_ids.is_empty());
		assert_eq!(overlay.counters.get("e1"), Some(&Some(3)));
		assert_eq!(overlay.counters.get("e2"), Some(&None));
		assert_eq!(overlay.current_node_id.as_deref(), Some("D"));
		assert_eq!(overlay.current_edge_id, None);
	}

	#[test]
	fn graph_defaults_missing_fields() {
		let graph: Graph = serde_json::from_str(
			r#"{
				"nodes": [{ "id": "ENTRY", "label": "ENTRY", "kind": "entry" }, { "id": "A" }],
				"edges": [{ "id": "e0", "source": "ENTRY", "target": "A", "weight": 20 }]
			}"#,
		)
		.expect("graph json");

		let a = graph.node("A").expect("node A");
		assert_eq!(a.kind, NodeKind::Normal);
		assert_eq!(a.label, "");
		assert!(!a.ghost);

		let e0 = graph.edge("e0").expect("edge e0");
		assert_eq!(e0.kind, EdgeKind::Normal);
		assert_eq!(e0.base_label(), "");
		assert_eq!(e0.weight, Some(20.0));
	}

	#[test]
	fn duplicate_ids_resolve_to_last_inserted() {
		let graph = Graph::new(
			vec![
				Node::new("A", "first", NodeKind::Normal),
				Node::new("A", "second", NodeKind::Decision),
			],
			Vec::new(),
		);
		assert_eq!(graph.node("A").map(|n| n.label.as_str()), Some("second"));
	}
}
