//! Ghost endpoints and sentinel edges bracketing entry and exit.

use super::model::{Edge, EdgeKind, Graph, Node};

/// Reserved id of the entry anchor.
pub const ENTRY_ID: &str = "ENTRY";
/// Reserved id of the exit anchor.
pub const EXIT_ID: &str = "EXIT";
/// Reserved id of the ghost node feeding `ENTRY`.
pub const GHOST_IN_ID: &str = "__ghost_in__";
/// Reserved id of the ghost node fed by `EXIT`.
pub const GHOST_OUT_ID: &str = "__ghost_out__";
/// Id given to the `ghost-in -> ENTRY` sentinel edge.
pub const ENTRY_SENTINEL_ID: &str = "__entry_sentinel__";
/// Id given to the `EXIT -> ghost-out` sentinel edge.
pub const EXIT_SENTINEL_ID: &str = "__exit_sentinel__";

/// Returns a copy of `graph` with ghost endpoints and sentinel edges added.
///
/// Graphs lacking either `ENTRY` or `EXIT` come back unchanged. Existing
/// nodes and edges are never removed or reordered, and nothing is added
/// twice: ghost nodes are matched by id, sentinel edges by
/// `(source, target, kind)`. Applying this to its own output is a no-op.
pub fn normalize(graph: &Graph) -> Graph {
	let mut out = graph.clone();
	if !(out.has_node(ENTRY_ID) && out.has_node(EXIT_ID)) {
		return out;
	}

	for ghost in [GHOST_IN_ID, GHOST_OUT_ID] {
		if !out.has_node(ghost) {
			out.nodes.push(Node::ghost(ghost));
		}
	}

	let sentinels = [
		(ENTRY_SENTINEL_ID, GHOST_IN_ID, ENTRY_ID, EdgeKind::Entry),
		(EXIT_SENTINEL_ID, EXIT_ID, GHOST_OUT_ID, EdgeKind::Exit),
	];
	for (id, source, target, kind) in sentinels {
		let present = out
			.edges
			.iter()
			.any(|e| e.source == source && e.target == target && e.kind == kind);
		if !present {
			out.edges
				.push(Edge::new(id, source, target, kind).with_label("").with_weight(0.0));
		}
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::model::NodeKind;

	fn linear() -> Graph {
		Graph::new(
			vec![
				Node::new(ENTRY_ID, "ENTRY", NodeKind::Entry),
				Node::new("A", "A", NodeKind::Normal),
				Node::new(EXIT_ID, "EXIT", NodeKind::Exit),
			],
			vec![
				Edge::new("e0", ENTRY_ID, "A", EdgeKind::Entry).with_weight(20.0),
				Edge::new("e1", "A", EXIT_ID, EdgeKind::Exit).with_weight(70.0),
			],
		)
	}

	fn sentinel_count(graph: &Graph, source: &str, target: &str) -> usize {
		graph
			.edges
			.iter()
			.filter(|e| e.source == source && e.target == target)
			.count()
	}

	#[test]
	fn graph_without_both_anchors_is_returned_unchanged() {
		let mut graph = linear();
		graph.nodes.retain(|n| n.id != EXIT_ID);

		let normalized = normalize(&graph);

		assert_eq!(normalized, graph);
	}

	#[test]
	fn adds_two_ghosts_and_two_sentinels_after_existing_elements() {
		let graph = linear();
		let normalized = normalize(&graph);

		assert_eq!(normalized.nodes.len(), graph.nodes.len() + 2);
		assert_eq!(normalized.edges.len(), graph.edges.len() + 2);
		assert_eq!(&normalized.nodes[..3], &graph.nodes[..]);
		assert_eq!(&normalized.edges[..2], &graph.edges[..]);

		let ghosts: Vec<_> = normalized.nodes.iter().filter(|n| n.ghost).collect();
		assert_eq!(ghosts.len(), 2);
		assert_eq!(ghosts[0].id, GHOST_IN_ID);
		assert_eq!(ghosts[1].id, GHOST_OUT_ID);

		let entry = normalized.edge(ENTRY_SENTINEL_ID).expect("entry sentinel");
		assert_eq!((entry.source.as_str(), entry.target.as_str()), (GHOST_IN_ID, ENTRY_ID));
		assert_eq!(entry.kind, EdgeKind::Entry);
		let exit = normalized.edge(EXIT_SENTINEL_ID).expect("exit sentinel");
		assert_eq!((exit.source.as_str(), exit.target.as_str()), (EXIT_ID, GHOST_OUT_ID));
		assert_eq!(exit.kind, EdgeKind::Exit);
	}

	#[test]
	fn normalizing_twice_matches_normalizing_once() {
		let once = normalize(&linear());
		let twice = normalize(&once);

		assert_eq!(twice, once);
		assert_eq!(sentinel_count(&twice, GHOST_IN_ID, ENTRY_ID), 1);
		assert_eq!(sentinel_count(&twice, EXIT_ID, GHOST_OUT_ID), 1);
	}

	#[test]
	fn existing_sentinel_with_other_id_is_not_duplicated() {
		let mut graph = linear();
		graph.nodes.push(Node::ghost(GHOST_IN_ID));
		graph
			.edges
			.push(Edge::new("custom-in", GHOST_IN_ID, ENTRY_ID, EdgeKind::Entry));

		let normalized = normalize(&graph);

		assert_eq!(sentinel_count(&normalized, GHOST_IN_ID, ENTRY_ID), 1);
		assert!(normalized.edge(ENTRY_SENTINEL_ID).is_none());
		assert_eq!(normalized.nodes.iter().filter(|n| n.id == GHOST_IN_ID).count(), 1);
		assert_eq!(sentinel_count(&normalized, EXIT_ID, GHOST_OUT_ID), 1);
	}

	#[test]
	fn input_graph_is_not_mutated() {
		let graph = linear();
		let before = graph.clone();
		let _ = normalize(&graph);
		assert_eq!(graph, before);
	}
}
