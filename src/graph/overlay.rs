//! Maps a graph plus an overlay onto per-element visual state.

use std::collections::{BTreeSet, HashMap};

use super::model::{Graph, Overlay};

/// Style classes the renderer understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VisualClass {
	/// Heavy spanning-tree line.
	Mst,
	/// Dashed line.
	Instrumented,
	/// Current-position highlight.
	Current,
}

/// Classes and the label actually shown for one element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementVisual {
	/// Active style classes.
	pub classes: BTreeSet<VisualClass>,
	/// Label after overlay decoration.
	pub display_label: String,
}

impl ElementVisual {
	fn with_label(label: &str) -> Self {
		Self {
			classes: BTreeSet::new(),
			display_label: label.to_owned(),
		}
	}

	/// Whether `class` is active.
	pub fn has(&self, class: VisualClass) -> bool {
		self.classes.contains(&class)
	}
}

/// Visual state of every loaded element, keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderState {
	nodes: HashMap<String, ElementVisual>,
	edges: HashMap<String, ElementVisual>,
}

impl RenderState {
	/// Fresh state for a newly loaded element list: no classes, base labels.
	pub fn from_graph(graph: &Graph) -> Self {
		let nodes = graph
			.nodes
			.iter()
			.map(|n| (n.id.clone(), ElementVisual::with_label(&n.label)))
			.collect();
		let edges = graph
			.edges
			.iter()
			.map(|e| (e.id.clone(), ElementVisual::with_label(e.base_label())))
			.collect();
		Self { nodes, edges }
	}

	/// Visual state of a node.
	pub fn node(&self, id: &str) -> Option<&ElementVisual> {
		self.nodes.get(id)
	}

	/// Visual state of an edge.
	pub fn edge(&self, id: &str) -> Option<&ElementVisual> {
		self.edges.get(id)
	}

	fn add_edge_class(&mut self, id: &str, class: VisualClass) {
		if let Some(visual) = self.edges.get_mut(id) {
			visual.classes.insert(class);
		}
	}
}

/// Resets `state` and re-applies `overlay` on top of `graph`.
///
/// The result depends only on `(graph, overlay)`, never on what was applied
/// before. Ids that do not resolve are ignored.
pub fn apply(state: &mut RenderState, graph: &Graph, overlay: &Overlay) {
	// Reset
	for visual in state.nodes.values_mut() {
		visual.classes.remove(&VisualClass::Current);
	}
	for edge in &graph.edges {
		if let Some(visual) = state.edges.get_mut(&edge.id) {
			visual.classes.clear();
			visual.display_label = edge.base_label().to_owned();
		}
	}

	if overlay.show_weights {
		for edge in &graph.edges {
			if let (Some(weight), Some(visual)) = (edge.weight, state.edges.get_mut(&edge.id)) {
				visual.display_label = format!("{} (w={})", edge.base_label(), weight);
			}
		}
	}

	for id in &overlay.mst_edge_ids {
		state.add_edge_class(id, VisualClass::Mst);
	}
	for id in &overlay.instrumented_edge_ids {
		state.add_edge_class(id, VisualClass::Instrumented);
	}

	for (id, count) in &overlay.counters {
		let (Some(count), Some(visual)) = (count, state.edges.get_mut(id)) else {
			continue;
		};
		visual.display_label = if visual.display_label.is_empty() {
			format!("×{count}")
		} else {
			format!("{}  ×{count}", visual.display_label)
		};
	}

	if let Some(visual) = overlay
		.current_node_id
		.as_deref()
		.and_then(|id| state.nodes.get_mut(id))
	{
		visual.classes.insert(VisualClass::Current);
	}
	if let Some(id) = overlay.current_edge_id.as_deref() {
		state.add_edge_class(id, VisualClass::Current);
	}
}
