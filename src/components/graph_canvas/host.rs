use log::{debug, info};

use crate::graph::layout::{FIT_PADDING, LayoutName, LayoutStrategy};
use crate::graph::{Graph, Overlay, RenderState, apply};

/// What the host needs from a drawing engine.
pub trait Renderer {
	/// Replaces every element with those of `graph`.
	fn load(&mut self, graph: &Graph);
	/// Per-element classes and display labels, keyed by id.
	fn render_state_mut(&mut self) -> &mut RenderState;
	/// Positions the loaded elements.
	fn run_layout(&mut self, strategy: &LayoutStrategy);
	/// Fits the viewport around all elements.
	fn fit(&mut self, padding: f64);
	/// Frees everything the engine holds.
	fn release(&mut self);
}

/// Owns one renderer and feeds it graph, overlay and layout changes.
///
/// The three reactions stay independent: a new overlay never re-runs layout
/// and a new layout never touches element visuals.
pub struct CanvasHost<R: Renderer> {
	renderer: Option<R>,
	graph: Graph,
	overlay: Overlay,
	layout: LayoutName,
}

impl<R: Renderer> CanvasHost<R> {
	/// Takes ownership of `renderer` and loads the initial state.
	pub fn new(renderer: R, graph: Graph, overlay: Overlay, layout: LayoutName) -> Self {
		let mut host = Self {
			renderer: Some(renderer),
			graph: Graph::default(),
			overlay,
			layout,
		};
		host.set_graph(graph);
		host
	}

	/// Full element replace, then overlay and layout.
	pub fn set_graph(&mut self, graph: Graph) {
		self.graph = graph;
		let Some(renderer) = self.renderer.as_mut() else {
			return;
		};
		debug!(
			"Loading graph: {} nodes, {} edges",
			self.graph.nodes.len(),
			self.graph.edges.len()
		);
		renderer.load(&self.graph);
		apply(renderer.render_state_mut(), &self.graph, &self.overlay);
		Self::layout_with(renderer, self.layout);
	}

	/// Re-applies visuals only.
	pub fn set_overlay(&mut self, overlay: Overlay) {
		self.overlay = overlay;
		if let Some(renderer) = self.renderer.as_mut() {
			apply(renderer.render_state_mut(), &self.graph, &self.overlay);
		}
	}

	/// Re-runs layout only.
	pub fn set_layout(&mut self, layout: LayoutName) {
		self.layout = layout;
		if let Some(renderer) = self.renderer.as_mut() {
			Self::layout_with(renderer, layout);
		}
	}

	/// Re-runs the current layout.
	pub fn relayout(&mut self) {
		self.set_layout(self.layout);
	}

	fn layout_with(renderer: &mut R, layout: LayoutName) {
		debug!("Running {layout} layout");
		renderer.run_layout(&layout.into());
		renderer.fit(FIT_PADDING);
	}

	/// Currently loaded graph.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// The owned renderer, `None` once destroyed.
	pub fn renderer(&self) -> Option<&R> {
		self.renderer.as_ref()
	}

	/// Mutable access to the owned renderer.
	pub fn renderer_mut(&mut self) -> Option<&mut R> {
		self.renderer.as_mut()
	}

	/// Releases the renderer. Later updates are ignored.
	pub fn destroy(&mut self) {
		if let Some(mut renderer) = self.renderer.take() {
			renderer.release();
			info!("Graph canvas destroyed");
		}
	}
}

impl<R: Renderer> Drop for CanvasHost<R> {
	fn drop(&mut self) {
		self.destroy();
	}
}
