use crate::graph::layout::{
	Bounds, LayoutStrategy, MAX_ZOOM, MIN_ZOOM, Point, Positions, ViewTransform, fit_viewport,
	node_size,
};
use crate::graph::{Graph, RenderState};

use super::host::Renderer;

/// Per-second fraction of the remaining distance covered while easing.
const EASE_RATE: f64 = 8.0;

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_id: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Point,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Canvas-backed renderer: elements, visuals, positions and view.
pub struct CanvasState {
	pub graph: Graph,
	pub visuals: RenderState,
	/// Positions currently drawn.
	pub positions: Positions,
	/// Positions the last layout asked for.
	targets: Positions,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	snap: bool,
}

impl CanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: Graph::default(),
			visuals: RenderState::default(),
			positions: Positions::new(),
			targets: Positions::new(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			snap: true,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost visible node under a screen point. Ghosts are never hit.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.graph
			.nodes
			.iter()
			.rev()
			.filter(|node| !node.ghost)
			.find(|node| {
				let Some(p) = self.positions.get(&node.id) else {
					return false;
				};
				let (w, h) = node_size(node);
				(gx - p.x).abs() <= w / 2.0 && (gy - p.y).abs() <= h / 2.0
			})
			.map(|node| node.id.clone())
	}

	pub fn begin_drag(&mut self, node_id: String, x: f64, y: f64) {
		let node_start = self.positions.get(&node_id).copied().unwrap_or_default();
		self.drag = DragState {
			active: true,
			node_id: Some(node_id),
			start_x: x,
			start_y: y,
			node_start,
		};
	}

	pub fn begin_pan(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pointer_moved(&mut self, x: f64, y: f64) {
		if self.drag.active {
			let Some(id) = self.drag.node_id.clone() else {
				return;
			};
			let moved = Point {
				x: self.drag.node_start.x + (x - self.drag.start_x) / self.transform.k,
				y: self.drag.node_start.y + (y - self.drag.start_y) / self.transform.k,
			};
			// Dragged nodes stay where they are dropped until the next layout.
			self.targets.insert(id.clone(), moved);
			self.positions.insert(id, moved);
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	pub fn end_pointer(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn zoom_at(&mut self, x: f64, y: f64, zoom_in: bool) {
		let factor = if zoom_in { 1.1 } else { 0.9 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Eases drawn positions toward the layout targets.
	pub fn tick(&mut self, dt: f64) {
		let t = (EASE_RATE * dt).min(1.0);
		for (id, target) in &self.targets {
			let p = self.positions.entry(id.clone()).or_insert(*target);
			p.x += (target.x - p.x) * t;
			p.y += (target.y - p.y) * t;
			if (target.x - p.x).abs() < 0.01 && (target.y - p.y).abs() < 0.01 {
				*p = *target;
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

impl Renderer for CanvasState {
	fn load(&mut self, graph: &Graph) {
		self.graph = graph.clone();
		self.visuals = RenderState::from_graph(graph);
		self.positions.clear();
		self.targets.clear();
		self.drag = DragState::default();
		self.snap = true;
	}

	fn render_state_mut(&mut self) -> &mut RenderState {
		&mut self.visuals
	}

	fn run_layout(&mut self, strategy: &LayoutStrategy) {
		self.targets = strategy.compute(&self.graph);
		if std::mem::take(&mut self.snap) {
			self.positions = self.targets.clone();
		}
	}

	fn fit(&mut self, padding: f64) {
		let bounds = Bounds::around(&self.graph, &self.targets);
		self.transform = fit_viewport(bounds, self.width, self.height, padding);
	}

	fn release(&mut self) {
		self.graph = Graph::default();
		self.visuals = RenderState::default();
		self.positions.clear();
		self.targets.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::ExamplesCatalog;
	use crate::graph::layout::{FIT_PADDING, LayoutName};
	use crate::graph::sentinel::GHOST_IN_ID;

	fn loaded() -> CanvasState {
		let mut state = CanvasState::new(800.0, 600.0);
		state.load(&ExamplesCatalog.get_default().graph);
		state.run_layout(&LayoutName::Dagre.into());
		state.fit(FIT_PADDING);
		state
	}

	fn screen_of(state: &CanvasState, id: &str) -> (f64, f64) {
		let p = state.positions[id];
		(
			p.x * state.transform.k + state.transform.x,
			p.y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn first_layout_snaps_and_later_layouts_ease() {
		let mut state = loaded();
		assert_eq!(state.positions, state.targets);

		state.run_layout(&LayoutName::Elk.into());
		let before = state.positions.clone();
		state.tick(0.016);
		assert_ne!(state.positions, before);

		for _ in 0..2000 {
			state.tick(0.016);
		}
		assert_eq!(state.positions, state.targets);
	}

	#[test]
	fn hit_testing_finds_visible_nodes_and_skips_ghosts() {
		let state = loaded();
		let (x, y) = screen_of(&state, "A");
		assert_eq!(state.node_at_position(x, y).as_deref(), Some("A"));

		let (gx, gy) = screen_of(&state, GHOST_IN_ID);
		assert_ne!(state.node_at_position(gx, gy).as_deref(), Some(GHOST_IN_ID));
	}

	#[test]
	fn dragging_moves_the_node_in_world_units() {
		let mut state = loaded();
		let (x, y) = screen_of(&state, "B");
		let start = state.positions["B"];

		state.begin_drag("B".into(), x, y);
		state.pointer_moved(x + 10.0 * state.transform.k, y);
		state.end_pointer();

		assert!((state.positions["B"].x - (start.x + 10.0)).abs() < 1e-9);
		assert_eq!(state.positions["B"].y, start.y);
		assert!(!state.drag.active);
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed_and_clamps() {
		let mut state = loaded();
		let before = state.screen_to_graph(100.0, 100.0);
		state.zoom_at(100.0, 100.0, true);
		let after = state.screen_to_graph(100.0, 100.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);

		for _ in 0..200 {
			state.zoom_at(0.0, 0.0, false);
		}
		assert_eq!(state.transform.k, MIN_ZOOM);
	}

	#[test]
	fn release_drops_all_elements() {
		let mut state = loaded();
		state.release();
		assert!(state.graph.is_empty());
		assert!(state.positions.is_empty());
		assert!(state.visuals.node("A").is_none());
	}
}
