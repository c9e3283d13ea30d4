use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::graph::layout::{Point, node_size};
use crate::graph::style::{NodeShape, edge_style, node_style};
use crate::graph::{Edge, Node};

use super::state::CanvasState;

const BACKGROUND: &str = "#f9fafb";
const EDGE_TEXT: &str = "#1f2937";
const ARROW_SIZE: f64 = 9.0;

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	for edge in &state.graph.edges {
		draw_edge(state, ctx, edge);
	}
	for node in state.graph.nodes.iter().filter(|n| !n.ghost) {
		draw_node(state, ctx, node);
	}
	ctx.restore();
}

/// Distance from a node centre to its outline along `(ux, uy)`.
fn boundary_offset(node: &Node, ux: f64, uy: f64) -> f64 {
	let (w, h) = node_size(node);
	let (hw, hh) = (w / 2.0, h / 2.0);
	match node_style(node, None).shape {
		NodeShape::Diamond => 1.0 / (ux.abs() / hw + uy.abs() / hh).max(f64::EPSILON),
		NodeShape::Rectangle | NodeShape::RoundRectangle => {
			let tx = if ux.abs() > f64::EPSILON { hw / ux.abs() } else { f64::INFINITY };
			let ty = if uy.abs() > f64::EPSILON { hh / uy.abs() } else { f64::INFINITY };
			tx.min(ty)
		}
	}
}

fn draw_edge(state: &CanvasState, ctx: &CanvasRenderingContext2d, edge: &Edge) {
	let (Some(src), Some(tgt)) = (state.graph.node(&edge.source), state.graph.node(&edge.target))
	else {
		return;
	};
	let (Some(&p1), Some(&p2)) = (state.positions.get(&src.id), state.positions.get(&tgt.id)) else {
		return;
	};
	let (dx, dy) = (p2.x - p1.x, p2.y - p1.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let start = Point {
		x: p1.x + ux * boundary_offset(src, ux, uy),
		y: p1.y + uy * boundary_offset(src, ux, uy),
	};
	let tip = Point {
		x: p2.x - ux * boundary_offset(tgt, ux, uy),
		y: p2.y - uy * boundary_offset(tgt, ux, uy),
	};

	let visual = state.visuals.edge(&edge.id);
	let style = edge_style(edge, visual);

	ctx.set_stroke_style_str(style.color);
	ctx.set_line_width(style.width);
	if style.dashed {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(8.0),
			&JsValue::from_f64(5.0),
		));
	}
	ctx.begin_path();
	ctx.move_to(start.x, start.y);
	ctx.line_to(tip.x - ux * ARROW_SIZE, tip.y - uy * ARROW_SIZE);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	ctx.set_fill_style_str(style.color);
	let (back_x, back_y) = (tip.x - ux * ARROW_SIZE, tip.y - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();

	let Some(label) = visual.map(|v| v.display_label.as_str()).filter(|l| !l.is_empty()) else {
		return;
	};
	let (mx, my) = ((start.x + tip.x) / 2.0, (start.y + tip.y) / 2.0);
	ctx.set_font("bold 14px sans-serif");
	let text_w = ctx.measure_text(label).map(|m| m.width()).unwrap_or(0.0);
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.fill_rect(mx - text_w / 2.0 - 2.0, my - 9.0, text_w + 4.0, 18.0);
	ctx.set_fill_style_str(EDGE_TEXT);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, mx, my);
}

fn draw_node(state: &CanvasState, ctx: &CanvasRenderingContext2d, node: &Node) {
	let Some(&p) = state.positions.get(&node.id) else {
		return;
	};
	let style = node_style(node, state.visuals.node(&node.id));
	let (w, h) = node_size(node);
	let (x, y) = (p.x - w / 2.0, p.y - h / 2.0);

	ctx.set_global_alpha(style.opacity);
	ctx.begin_path();
	match style.shape {
		NodeShape::Rectangle => ctx.rect(x, y, w, h),
		NodeShape::RoundRectangle => {
			let r = h / 4.0;
			ctx.move_to(x + r, y);
			let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
			let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
			let _ = ctx.arc_to(x, y + h, x, y, r);
			let _ = ctx.arc_to(x, y, x + w, y, r);
			ctx.close_path();
		}
		NodeShape::Diamond => {
			ctx.move_to(p.x, y);
			ctx.line_to(x + w, p.y);
			ctx.line_to(p.x, y + h);
			ctx.line_to(x, p.y);
			ctx.close_path();
		}
	}
	ctx.set_fill_style_str(style.fill);
	ctx.fill();
	if let Some((width, color)) = style.border {
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		ctx.stroke();
	}

	if let Some(label) = state
		.visuals
		.node(&node.id)
		.map(|v| v.display_label.as_str())
		.filter(|l| !l.is_empty())
	{
		ctx.set_fill_style_str(style.text);
		ctx.set_font("12px sans-serif");
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(label, p.x, p.y);
	}
	ctx.set_global_alpha(1.0);
}
