//! Named layout strategies and viewport fitting.
//!
//! Both strategies rank nodes the same way: back edges found by a DFS from
//! the sources are reversed, then every node sits one layer below its
//! deepest predecessor. They differ in how nodes are ordered and spaced
//! within a layer.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::model::{Graph, Node};

/// Width of a visible node in world units.
pub const NODE_WIDTH: f64 = 96.0;
/// Height of a visible node in world units.
pub const NODE_HEIGHT: f64 = 36.0;
/// Side of a ghost node.
pub const GHOST_SIZE: f64 = 1.0;
/// Margin kept around the graph when fitting the viewport.
pub const FIT_PADDING: f64 = 20.0;
/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 10.0;

/// Size of a node's box.
pub fn node_size(node: &Node) -> (f64, f64) {
	if node.ghost {
		(GHOST_SIZE, GHOST_SIZE)
	} else {
		(NODE_WIDTH, NODE_HEIGHT)
	}
}

/// Layout names accepted from the UI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LayoutName {
	/// Fast hierarchical layout.
	#[default]
	Dagre,
	/// Constraint-based layered layout.
	Elk,
}

impl LayoutName {
	/// Every selectable layout, default first.
	pub const ALL: [LayoutName; 2] = [LayoutName::Dagre, LayoutName::Elk];

	/// Wire name.
	pub fn as_str(self) -> &'static str {
		match self {
			LayoutName::Dagre => "dagre",
			LayoutName::Elk => "elk",
		}
	}

	/// Parses a wire name; anything unknown selects the default.
	pub fn parse(name: &str) -> Self {
		match name.trim().to_ascii_lowercase().as_str() {
			"elk" => LayoutName::Elk,
			_ => LayoutName::Dagre,
		}
	}
}

impl FromStr for LayoutName {
	type Err = Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::parse(s))
	}
}

impl fmt::Display for LayoutName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Flow direction of the layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
	/// Layers stacked downwards.
	#[default]
	TopToBottom,
	/// Layers stacked rightwards.
	LeftToRight,
}

/// Parameters of the fast hierarchical layout.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchicalLayout {
	/// Gap between neighbouring nodes in a rank.
	pub node_sep: f64,
	/// Gap between ranks.
	pub rank_sep: f64,
	/// Rank direction.
	pub direction: Direction,
}

impl Default for HierarchicalLayout {
	fn default() -> Self {
		Self {
			node_sep: 30.0,
			rank_sep: 60.0,
			direction: Direction::TopToBottom,
		}
	}
}

/// Parameters of the constraint-based layered layout.
#[derive(Clone, Debug, PartialEq)]
pub struct LayeredLayout {
	/// Minimum gap between neighbouring nodes in a layer.
	pub node_spacing: f64,
	/// Gap between layers.
	pub layer_spacing: f64,
	/// Layer direction.
	pub direction: Direction,
	/// Alternating barycenter sweeps used to order each layer.
	pub sweeps: usize,
	/// Simulation steps spent relaxing positions inside layers.
	pub relax_steps: usize,
}

impl Default for LayeredLayout {
	fn default() -> Self {
		Self {
			node_spacing: 20.0,
			layer_spacing: 40.0,
			direction: Direction::TopToBottom,
			sweeps: 4,
			relax_steps: 120,
		}
	}
}

/// A layout strategy with its tuning.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutStrategy {
	/// See [`HierarchicalLayout`].
	Hierarchical(HierarchicalLayout),
	/// See [`LayeredLayout`].
	Layered(LayeredLayout),
}

impl Default for LayoutStrategy {
	fn default() -> Self {
		LayoutName::default().into()
	}
}

impl From<LayoutName> for LayoutStrategy {
	fn from(name: LayoutName) -> Self {
		match name {
			LayoutName::Dagre => LayoutStrategy::Hierarchical(HierarchicalLayout::default()),
			LayoutName::Elk => LayoutStrategy::Layered(LayeredLayout::default()),
		}
	}
}

/// Picks the strategy for a layout name. Unknown names get the default.
pub fn select_layout(name: &str) -> LayoutStrategy {
	LayoutName::parse(name).into()
}

/// A point in world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

/// Node centres keyed by node id.
pub type Positions = HashMap<String, Point>;

impl LayoutStrategy {
	/// Name this strategy is selected by.
	pub fn name(&self) -> LayoutName {
		match self {
			LayoutStrategy::Hierarchical(_) => LayoutName::Dagre,
			LayoutStrategy::Layered(_) => LayoutName::Elk,
		}
	}

	/// Computes a centre for every node of `graph`.
	pub fn compute(&self, graph: &Graph) -> Positions {
		let ranking = Ranking::new(graph);
		let axes = |direction: Direction| Axes::new(direction, graph);
		match self {
			LayoutStrategy::Hierarchical(opts) => {
				let mut layers = ranking.layers.clone();
				ranking.sweep(&mut layers, 1);
				let axes = axes(opts.direction);
				let coords = axes.place(&layers, opts.node_sep, opts.rank_sep);
				axes.into_positions(graph, &coords)
			}
			LayoutStrategy::Layered(opts) => {
				let mut layers = ranking.layers.clone();
				ranking.sweep(&mut layers, opts.sweeps);
				let axes = axes(opts.direction);
				let mut coords = axes.place(&layers, opts.node_spacing, opts.layer_spacing);
				relax(&ranking.edges, &mut coords, opts.relax_steps);
				axes.compact(&mut layers, &mut coords, opts.node_spacing);
				axes.into_positions(graph, &coords)
			}
		}
	}
}

/// Layer assignment shared by both strategies.
struct Ranking {
	/// Acyclic `(from, to)` pairs over node indices.
	edges: Vec<(usize, usize)>,
	/// Node indices per layer, in graph order.
	layers: Vec<Vec<usize>>,
}

impl Ranking {
	fn new(graph: &Graph) -> Self {
		let index: HashMap<&str, usize> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();
		let n = graph.nodes.len();

		let mut outgoing = vec![Vec::new(); n];
		let mut indegree = vec![0usize; n];
		for edge in &graph.edges {
			if let (Some(&from), Some(&to)) =
				(index.get(edge.source.as_str()), index.get(edge.target.as_str()))
			{
				if from != to {
					outgoing[from].push(to);
					indegree[to] += 1;
				}
			}
		}

		let edges = acyclic_edges(&outgoing, &indegree);
		let ranks = longest_path_ranks(n, &edges);

		let depth = ranks.iter().copied().max().map_or(0, |r| r + 1);
		let mut layers = vec![Vec::new(); depth];
		for (node, &rank) in ranks.iter().enumerate() {
			layers[rank].push(node);
		}

		Self { edges, layers }
	}

	/// Reorders layers by the mean position of their neighbours, alternating
	/// downward and upward passes.
	fn sweep(&self, layers: &mut [Vec<usize>], passes: usize) {
		let node_count = layers.iter().map(Vec::len).sum::<usize>();
		let mut preds = vec![Vec::new(); node_count];
		let mut succs = vec![Vec::new(); node_count];
		for &(from, to) in &self.edges {
			preds[to].push(from);
			succs[from].push(to);
		}

		let mut order = vec![0usize; node_count];
		for layer in layers.iter() {
			for (pos, &node) in layer.iter().enumerate() {
				order[node] = pos;
			}
		}

		for pass in 0..passes {
			let downward = pass % 2 == 0;
			let neighbours = if downward { &preds } else { &succs };
			let sequence: Vec<usize> = if downward {
				(1..layers.len()).collect()
			} else {
				(0..layers.len().saturating_sub(1)).rev().collect()
			};
			for li in sequence {
				let barycenter = |node: usize| {
					let adjacent = &neighbours[node];
					if adjacent.is_empty() {
						order[node] as f64
					} else {
						adjacent.iter().map(|&m| order[m] as f64).sum::<f64>() / adjacent.len() as f64
					}
				};
				let mut keyed: Vec<(f64, usize)> =
					layers[li].iter().map(|&node| (barycenter(node), node)).collect();
				keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
				layers[li] = keyed.into_iter().map(|(_, node)| node).collect();
				for (pos, &node) in layers[li].iter().enumerate() {
					order[node] = pos;
				}
			}
		}
	}
}

/// Walks the graph depth-first from its sources and reverses every edge that
/// closes a cycle.
fn acyclic_edges(outgoing: &[Vec<usize>], indegree: &[usize]) -> Vec<(usize, usize)> {
	const UNSEEN: u8 = 0;
	const ACTIVE: u8 = 1;
	const DONE: u8 = 2;

	let n = outgoing.len();
	let mut state = vec![UNSEEN; n];
	let mut edges = Vec::new();

	let roots = (0..n).filter(|&v| indegree[v] == 0).chain(0..n);
	for root in roots {
		if state[root] != UNSEEN {
			continue;
		}
		state[root] = ACTIVE;
		let mut stack = vec![(root, 0usize)];
		while let Some((node, child)) = stack.pop() {
			let Some(&next) = outgoing[node].get(child) else {
				state[node] = DONE;
				continue;
			};
			stack.push((node, child + 1));
			if state[next] == ACTIVE {
				edges.push((next, node));
			} else {
				edges.push((node, next));
				if state[next] == UNSEEN {
					state[next] = ACTIVE;
					stack.push((next, 0));
				}
			}
		}
	}

	edges
}

fn longest_path_ranks(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
	let mut indegree = vec![0usize; n];
	let mut outgoing = vec![Vec::new(); n];
	for &(from, to) in edges {
		outgoing[from].push(to);
		indegree[to] += 1;
	}

	let mut ranks = vec![0usize; n];
	let mut ready: BTreeSet<usize> = (0..n).filter(|&v| indegree[v] == 0).collect();
	while let Some(node) = ready.pop_first() {
		for &to in &outgoing[node] {
			ranks[to] = ranks[to].max(ranks[node] + 1);
			indegree[to] -= 1;
			if indegree[to] == 0 {
				ready.insert(to);
			}
		}
	}
	ranks
}

/// Cross-axis / main-axis view of node sizes for one direction.
struct Axes {
	direction: Direction,
	/// Node extent across the layer.
	cross: Vec<f64>,
	/// Layer thickness.
	main: f64,
}

/// `(cross, main)` coordinate of every node.
type Coords = Vec<(f64, f64)>;

impl Axes {
	fn new(direction: Direction, graph: &Graph) -> Self {
		let cross = graph
			.nodes
			.iter()
			.map(|n| {
				let (w, h) = node_size(n);
				match direction {
					Direction::TopToBottom => w,
					Direction::LeftToRight => h,
				}
			})
			.collect();
		let main = match direction {
			Direction::TopToBottom => NODE_HEIGHT,
			Direction::LeftToRight => NODE_WIDTH,
		};
		Self {
			direction,
			cross,
			main,
		}
	}

	/// Centres each layer on the main axis, packing nodes with `gap`.
	fn place(&self, layers: &[Vec<usize>], gap: f64, layer_gap: f64) -> Coords {
		let mut coords = vec![(0.0, 0.0); self.cross.len()];
		for (rank, layer) in layers.iter().enumerate() {
			let total = layer.iter().map(|&v| self.cross[v]).sum::<f64>()
				+ gap * layer.len().saturating_sub(1) as f64;
			let main = rank as f64 * (self.main + layer_gap);
			let mut cursor = -total / 2.0;
			for &node in layer {
				let extent = self.cross[node];
				coords[node] = (cursor + extent / 2.0, main);
				cursor += extent + gap;
			}
		}
		coords
	}

	/// Restores a left-to-right order per layer and enforces `gap` between
	/// neighbours.
	fn compact(&self, layers: &mut [Vec<usize>], coords: &mut Coords, gap: f64) {
		for layer in layers.iter_mut() {
			layer.sort_by(|&a, &b| coords[a].0.partial_cmp(&coords[b].0).unwrap_or(Ordering::Equal));
			for pair in 1..layer.len() {
				let (prev, node) = (layer[pair - 1], layer[pair]);
				let min = coords[prev].0 + (self.cross[prev] + self.cross[node]) / 2.0 + gap;
				if coords[node].0 < min {
					coords[node].0 = min;
				}
			}
		}
	}

	fn into_positions(&self, graph: &Graph, coords: &Coords) -> Positions {
		graph
			.nodes
			.iter()
			.zip(coords)
			.map(|(node, &(cross, main))| {
				let point = match self.direction {
					Direction::TopToBottom => Point { x: cross, y: main },
					Direction::LeftToRight => Point { x: main, y: cross },
				};
				(node.id.clone(), point)
			})
			.collect()
	}
}

/// Lets a force simulation spread nodes across their layer while every node
/// stays pinned to its layer's main-axis coordinate.
fn relax(edges: &[(usize, usize)], coords: &mut Coords, steps: usize) {
	if coords.len() < 2 || steps == 0 {
		return;
	}

	let mut sim: ForceGraph<usize, ()> = ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});
	let handles: Vec<_> = coords
		.iter()
		.enumerate()
		.map(|(i, &(cross, main))| {
			sim.add_node(NodeData {
				x: cross as f32,
				y: main as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: i,
			})
		})
		.collect();
	for &(from, to) in edges {
		sim.add_edge(handles[from], handles[to], EdgeData::default());
	}

	let layer_of: Vec<f32> = coords.iter().map(|&(_, main)| main as f32).collect();
	for _ in 0..steps {
		sim.update(0.016);
		sim.visit_nodes_mut(|node| node.data.y = layer_of[node.data.user_data]);
	}

	let mut relaxed = coords.clone();
	let mut finite = true;
	sim.visit_nodes(|node| {
		let x = node.x() as f64;
		finite &= x.is_finite();
		relaxed[node.data.user_data].0 = x;
	});
	if finite {
		*coords = relaxed;
	}
}

/// Axis-aligned box around laid-out nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	/// Left edge.
	pub min_x: f64,
	/// Top edge.
	pub min_y: f64,
	/// Right edge.
	pub max_x: f64,
	/// Bottom edge.
	pub max_y: f64,
}

impl Bounds {
	/// Box enclosing every positioned node including its size, or `None`
	/// when nothing is positioned.
	pub fn around(graph: &Graph, positions: &Positions) -> Option<Self> {
		graph
			.nodes
			.iter()
			.filter_map(|node| {
				let p = positions.get(&node.id)?;
				let (w, h) = node_size(node);
				Some(Bounds {
					min_x: p.x - w / 2.0,
					min_y: p.y - h / 2.0,
					max_x: p.x + w / 2.0,
					max_y: p.y + h / 2.0,
				})
			})
			.reduce(|a, b| Bounds {
				min_x: a.min_x.min(b.min_x),
				min_y: a.min_y.min(b.min_y),
				max_x: a.max_x.max(b.max_x),
				max_y: a.max_y.max(b.max_y),
			})
	}

	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}
}

/// Screen transform: `screen = world * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal translation.
	pub x: f64,
	/// Vertical translation.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

/// Transform that fits `bounds` into a `width × height` viewport with
/// `padding` on every side. Without bounds the world origin is centred.
pub fn fit_viewport(bounds: Option<Bounds>, width: f64, height: f64, padding: f64) -> ViewTransform {
	let Some(bounds) = bounds else {
		return ViewTransform {
			x: width / 2.0,
			y: height / 2.0,
			k: 1.0,
		};
	};

	let avail_w = (width - 2.0 * padding).max(1.0);
	let avail_h = (height - 2.0 * padding).max(1.0);
	let k = (avail_w / bounds.width().max(1.0))
		.min(avail_h / bounds.height().max(1.0))
		.clamp(MIN_ZOOM, MAX_ZOOM);
	let (cx, cy) = (
		(bounds.min_x + bounds.max_x) / 2.0,
		(bounds.min_y + bounds.max_y) / 2.0,
	);
	ViewTransform {
		x: width / 2.0 - cx * k,
		y: height / 2.0 - cy * k,
		k,
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::catalog::ExamplesCatalog;
	use crate::graph::model::{Edge, EdgeKind, NodeKind};

	fn chain(ids: &[&str], back: Option<(&str, &str)>) -> Graph {
		let nodes = ids
			.iter()
			.map(|id| Node::new(*id, *id, NodeKind::Normal))
			.collect();
		let mut edges: Vec<Edge> = ids
			.windows(2)
			.enumerate()
			.map(|(i, w)| Edge::new(format!("e{i}"), w[0], w[1], EdgeKind::Normal))
			.collect();
		if let Some((from, to)) = back {
			edges.push(Edge::new("back", from, to, EdgeKind::Normal));
		}
		Graph::new(nodes, edges)
	}

	fn assert_no_overlap(graph: &Graph, positions: &Positions) {
		for (i, a) in graph.nodes.iter().enumerate() {
			for b in &graph.nodes[i + 1..] {
				let (pa, pb) = (positions[&a.id], positions[&b.id]);
				let ((wa, ha), (wb, hb)) = (node_size(a), node_size(b));
				let apart_x = (pa.x - pb.x).abs() >= (wa + wb) / 2.0 - 1e-6;
				let apart_y = (pa.y - pb.y).abs() >= (ha + hb) / 2.0 - 1e-6;
				assert!(apart_x || apart_y, "{} overlaps {}", a.id, b.id);
			}
		}
	}

	#[rstest]
	#[case("dagre", LayoutName::Dagre)]
	#[case("elk", LayoutName::Elk)]
	#[case(" ELK ", LayoutName::Elk)]
	#[case("cose", LayoutName::Dagre)]
	#[case("", LayoutName::Dagre)]
	fn layout_names_parse_with_default_fallback(#[case] input: &str, #[case] expected: LayoutName) {
		assert_eq!(LayoutName::parse(input), expected);
		assert_eq!(select_layout(input).name(), expected);
	}

	#[test]
	fn default_strategy_carries_fixed_spacing() {
		let LayoutStrategy::Hierarchical(opts) = select_layout("unknown") else {
			panic!("default should be hierarchical");
		};
		assert_eq!(opts, HierarchicalLayout::default());
		assert_eq!((opts.node_sep, opts.rank_sep), (30.0, 60.0));

		let LayoutStrategy::Layered(opts) = select_layout("elk") else {
			panic!("elk should be layered");
		};
		assert_eq!(opts.layer_spacing, 40.0);
	}

	#[test]
	fn back_edges_do_not_pull_nodes_upward() {
		let graph = chain(&["A", "B", "C"], Some(("C", "A")));
		let positions = select_layout("dagre").compute(&graph);

		assert!(positions["A"].y < positions["B"].y);
		assert!(positions["B"].y < positions["C"].y);
	}

	#[test]
	fn hierarchical_ranks_are_spaced_by_rank_sep() {
		let graph = chain(&["A", "B"], None);
		let positions = select_layout("dagre").compute(&graph);
		assert_eq!(positions["B"].y - positions["A"].y, NODE_HEIGHT + 60.0);
	}

	#[test]
	fn left_to_right_swaps_axes() {
		let graph = chain(&["A", "B"], None);
		let strategy = LayoutStrategy::Hierarchical(HierarchicalLayout {
			direction: Direction::LeftToRight,
			..HierarchicalLayout::default()
		});
		let positions = strategy.compute(&graph);
		assert_eq!(positions["A"].y, positions["B"].y);
		assert!(positions["A"].x < positions["B"].x);
	}

	#[rstest]
	fn every_example_lays_out_without_overlap(
		#[values(LayoutName::Dagre, LayoutName::Elk)] name: LayoutName,
	) {
		for item in ExamplesCatalog.list() {
			let positions = LayoutStrategy::from(name).compute(&item.graph);
			assert_eq!(positions.len(), item.graph.nodes.len(), "{}", item.id);
			assert!(positions.values().all(|p| p.x.is_finite() && p.y.is_finite()));
			assert_no_overlap(&item.graph, &positions);
			assert!(positions["__ghost_in__"].y < positions["ENTRY"].y, "{}", item.id);
			assert!(positions["EXIT"].y < positions["__ghost_out__"].y, "{}", item.id);
		}
	}

	#[test]
	fn layout_is_deterministic() {
		let graph = ExamplesCatalog.get_default().graph;
		for name in LayoutName::ALL {
			let strategy = LayoutStrategy::from(name);
			assert_eq!(strategy.compute(&graph), strategy.compute(&graph));
		}
	}

	#[test]
	fn empty_graph_has_no_positions_and_centred_view() {
		let graph = Graph::default();
		let positions = select_layout("elk").compute(&graph);
		assert!(positions.is_empty());
		assert_eq!(Bounds::around(&graph, &positions), None);
		assert_eq!(
			fit_viewport(None, 800.0, 600.0, FIT_PADDING),
			ViewTransform { x: 400.0, y: 300.0, k: 1.0 }
		);
	}

	#[test]
	fn fit_keeps_padding_around_bounds() {
		let bounds = Bounds { min_x: 0.0, min_y: 0.0, max_x: 200.0, max_y: 100.0 };
		let view = fit_viewport(Some(bounds), 440.0, 1000.0, FIT_PADDING);

		assert_eq!(view.k, 2.0);
		let left = bounds.min_x * view.k + view.x;
		let right = bounds.max_x * view.k + view.x;
		assert_eq!(left, FIT_PADDING);
		assert_eq!(right, 440.0 - FIT_PADDING);
	}
}
