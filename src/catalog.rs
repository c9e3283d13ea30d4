//! Built-in example control-flow graphs.

use crate::graph::{Edge, EdgeKind as Ek, Graph, Node, NodeKind as Nk, normalize};

/// One selectable example.
#[derive(Clone, Debug, PartialEq)]
pub struct ExampleItem {
	/// Stable identifier.
	pub id: &'static str,
	/// Short title.
	pub title: &'static str,
	/// One-line description.
	pub description: &'static str,
	/// Normalized graph.
	pub graph: Graph,
}

/// Source of the built-in examples.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExamplesCatalog;

impl ExamplesCatalog {
	/// All examples, each with sentinels already in place.
	pub fn list(&self) -> Vec<ExampleItem> {
		[linear_flow, if_else, while_loop, nested_loop, switch_three, loop_with_if]
			.into_iter()
			.map(|build| {
				let item = build();
				ExampleItem {
					graph: normalize(&item.graph),
					..item
				}
			})
			.collect()
	}

	/// The first example.
	pub fn get_default(&self) -> ExampleItem {
		// Non-empty by construction.
		self.list().swap_remove(0)
	}

	/// Looks an example up by id.
	pub fn get(&self, id: &str) -> Option<ExampleItem> {
		self.list().into_iter().find(|item| item.id == id)
	}
}

fn n(id: &str, label: &str, kind: Nk) -> Node {
	Node::new(id, label, kind)
}

fn e(id: &str, source: &str, target: &str, label: &str, weight: f64, kind: Ek) -> Edge {
	Edge::new(id, source, target, kind)
		.with_label(label)
		.with_weight(weight)
}

fn linear_flow() -> ExampleItem {
	ExampleItem {
		id: "linear-flow",
		title: "Linear flow",
		description: "The simplest case, no branching.",
		graph: Graph::new(
			vec![
				n("ENTRY", "ENTRY", Nk::Entry),
				n("A", "A", Nk::Normal),
				n("B", "B", Nk::Normal),
				n("C", "C", Nk::Normal),
				n("EXIT", "EXIT", Nk::Exit),
			],
			vec![
				e("e0", "ENTRY", "A", "", 20.0, Ek::Entry),
				e("e1", "A", "B", "", 60.0, Ek::Normal),
				e("e2", "B", "C", "", 50.0, Ek::Normal),
				e("e3", "C", "EXIT", "", 70.0, Ek::Exit),
			],
		),
	}
}

fn if_else() -> ExampleItem {
	ExampleItem {
		id: "if-else",
		title: "If / Else",
		description: "A branch whose paths merge again.",
		graph: Graph::new(
			vec![
				n("ENTRY", "ENTRY", Nk::Entry),
				n("S", "Start", Nk::Normal),
				n("D", "Condition", Nk::Decision),
				n("T", "Branch T", Nk::Normal),
				n("F", "Branch F", Nk::Normal),
				n("M", "Merge", Nk::Normal),
				n("EXIT", "EXIT", Nk::Exit),
			],
			vec![
				e("e0", "ENTRY", "S", "", 22.0, Ek::Entry),
				e("e1", "S", "D", "", 66.0, Ek::Normal),
				e("e2", "D", "T", "true", 55.0, Ek::Normal),
				e("e3", "D", "F", "false", 33.0, Ek::Normal),
				e("e4", "T", "M", "", 40.0, Ek::Normal),
				e("e5", "F", "M", "", 30.0, Ek::Normal),
				e("e6", "M", "EXIT", "", 77.0, Ek::Exit),
			],
		),
	}
}

fn while_loop() -> ExampleItem {
	ExampleItem {
		id: "while-loop",
		title: "Simple loop",
		description: "A while loop with one back edge.",
		graph: Graph::new(
			vec![
				n("ENTRY", "ENTRY", Nk::Entry),
				n("I", "Init", Nk::Normal),
				n("D", "Condition", Nk::Decision),
				n("B", "Loop body", Nk::Normal),
				n("EXIT", "EXIT", Nk::Exit),
			],
			vec![
				e("e0", "ENTRY", "I", "", 18.0, Ek::Entry),
				e("e1", "I", "D", "", 66.0, Ek::Normal),
				e("e2", "D", "B", "true", 55.0, Ek::Normal),
				// back
				e("e3", "B", "D", "", 33.0, Ek::Normal),
				e("e4", "D", "EXIT", "false", 44.0, Ek::Exit),
			],
		),
	}
}

fn nested_loop() -> ExampleItem {
	ExampleItem {
		id: "nested-loop",
		title: "Nested loop",
		description: "An inner loop inside an outer one.",
		graph: Graph::new(
			vec![
				n("ENTRY", "ENTRY", Nk::Entry),
				n("P", "Pre", Nk::Normal),
				n("D1", "Condition 1", Nk::Decision),
				n("D2", "Condition 2", Nk::Decision),
				n("B", "Inner body", Nk::Normal),
				n("EXIT", "EXIT", Nk::Exit),
			],
			vec![
				e("e0", "ENTRY", "P", "", 20.0, Ek::Entry),
				e("e1", "P", "D1", "", 60.0, Ek::Normal),
				e("e2", "D1", "D2", "true", 50.0, Ek::Normal),
				e("e3", "D2", "B", "true", 30.0, Ek::Normal),
				// inner back
				e("e4", "B", "D2", "", 30.0, Ek::Normal),
				e("e5", "D2", "D1", "false", 30.0, Ek::Normal),
				e("e6", "D1", "EXIT", "false", 70.0, Ek::Exit),
			],
		),
	}
}

fn switch_three() -> ExampleItem {
	ExampleItem {
		id: "switch-three",
		title: "Multiple outcomes",
		description: "A three-way branch that merges.",
		graph: Graph::new(
			vec![
				n("ENTRY", "ENTRY", Nk::Entry),
				n("D", "Choice", Nk::Decision),
				n("B0", "Branch = 0", Nk::Normal),
				n("B1", "Branch = 1", Nk::Normal),
				n("B2", "Else", Nk::Normal),
				n("M", "Merge", Nk::Normal),
				n("EXIT", "EXIT", Nk::Exit),
			],
			vec![
				e("e0", "ENTRY", "D", "", 22.0, Ek::Entry),
				e("e1", "D", "B0", "=0", 66.0, Ek::Normal),
				e("e2", "D", "B1", "=1", 55.0, Ek::Normal),
				e("e3", "D", "B2", "else", 33.0, Ek::Normal),
				e("e4", "B0", "M", "", 35.0, Ek::Normal),
				e("e5", "B1", "M", "", 25.0, Ek::Normal),
				e("e6", "B2", "M", "", 20.0, Ek::Normal),
				e("e7", "M", "EXIT", "", 77.0, Ek::Exit),
			],
		),
	}
}

fn loop_with_if() -> ExampleItem {
	ExampleItem {
		id: "loop-if",
		title: "Loop + if",
		description: "An if/else inside a loop.",
		graph: Graph::new(
			vec![
				n("ENTRY", "ENTRY", Nk::Entry),
				n("Dloop", "Loop condition", Nk::Decision),
				n("Body", "Body", Nk::Normal),
				n("Dif", "Body condition", Nk::Decision),
				n("T", "Path T", Nk::Normal),
				n("F", "Path F", Nk::Normal),
				n("EXIT", "EXIT", Nk::Exit),
			],
			vec![
				e("e0", "ENTRY", "Dloop", "", 21.0, Ek::Entry),
				e("e1", "Dloop", "Body", "true", 61.0, Ek::Normal),
				e("e2", "Body", "Dif", "", 36.0, Ek::Normal),
				e("e3", "Dif", "T", "true", 34.0, Ek::Normal),
				e("e4", "Dif", "F", "false", 27.0, Ek::Normal),
				e("e5", "T", "Dloop", "", 28.0, Ek::Normal),
				e("e6", "F", "Dloop", "", 26.0, Ek::Normal),
				e("e7", "Dloop", "EXIT", "false", 72.0, Ek::Exit),
			],
		),
	}
}
