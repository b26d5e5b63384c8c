use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::OrbitGraphState;
use super::types::OrbitNode;

const BACKGROUND: &str = "#09090b";
const EDGE_RGB: &str = "96, 165, 250";
const MATCH_RGB: &str = "245, 158, 11";
const FOCUS_RING: &str = "rgba(59, 130, 246, 0.9)";
const LOADING_ALPHA: f64 = 0.2;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &OrbitGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	if state.has_error {
		return;
	}

	ctx.save();
	if state.is_loading {
		ctx.set_global_alpha(LOADING_ALPHA);
	}
	draw_orbits(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_orbits(state: &OrbitGraphState, ctx: &CanvasRenderingContext2d) {
	let (cx, cy) = state.center();
	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.06)");
	ctx.set_line_width(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(2.0),
		&JsValue::from_f64(6.0),
	));
	for ring in &state.layout.rings {
		ctx.begin_path();
		let _ = ctx.arc(cx, cy, ring.radius, 0.0, 2.0 * PI);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edges(state: &OrbitGraphState, ctx: &CanvasRenderingContext2d) {
	let (cx, cy) = state.center();
	for (ring, nodes) in state.layout.rings.iter().enumerate() {
		for node in &nodes.nodes {
			if !state.config.edge_visible(node.strength) {
				continue;
			}
			let (x, y) = state.screen_position(ring, node);
			ctx.set_stroke_style_str(&format!("rgba({EDGE_RGB}, {})", node.strength * 0.6));
			ctx.set_line_width(1.0);
			ctx.begin_path();
			ctx.move_to(cx, cy);
			ctx.line_to(x, y);
			ctx.stroke();

			if state.config.edge_pulses(node.strength) {
				let t = state.pulse_progress(node.strength);
				ctx.set_fill_style_str(&format!("rgb({EDGE_RGB})"));
				ctx.begin_path();
				let _ = ctx.arc(cx + (x - cx) * t, cy + (y - cy) * t, 2.0, 0.0, 2.0 * PI);
				ctx.fill();
			}
		}
	}
}

fn draw_nodes(state: &OrbitGraphState, ctx: &CanvasRenderingContext2d) {
	let radius = state.node_radius();
	let mut hovered = None;
	let mut focused = None;
	for (ring, nodes) in state.layout.rings.iter().enumerate() {
		for node in &nodes.nodes {
			let (x, y) = state.screen_position(ring, node);
			draw_node(ctx, node, x, y, radius);
			if state.is_hovered(&node.key) {
				hovered = Some((node, x, y));
			}
			if state.is_focused(&node.key) {
				focused = Some((node, x, y));
			}
		}
	}

	if let Some((node, x, y)) = focused {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 4.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(FOCUS_RING);
		ctx.set_line_width(2.0);
		ctx.stroke();
		if hovered.is_none_or(|(h, _, _)| h.key != node.key) {
			draw_label(ctx, node, x, y, radius, 1.0);
		}
	}

	let Some((node, x, y)) = hovered else {
		return;
	};
	let t = ease_out_cubic(state.hover.highlight_t);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius + 3.0, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
	ctx.set_line_width(1.5);
	ctx.stroke();
	draw_label(ctx, node, x, y, radius, t);
}

fn draw_label(ctx: &CanvasRenderingContext2d, node: &OrbitNode, x: f64, y: f64, radius: f64, alpha: f64) {
	let Some(attendee) = &node.attendee else {
		return;
	};
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {alpha})"));
	ctx.set_font("12px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&attendee.display_name, x, y + radius + 16.0);
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &OrbitNode, x: f64, y: f64, radius: f64) {
	if node.is_opportunity {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + 6.0, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&format!("rgba({MATCH_RGB}, 0.25)"));
		ctx.fill();
	}

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match &node.attendee {
		Some(_) => ctx.set_fill_style_str("rgba(39, 39, 42, 0.9)"),
		None => ctx.set_fill_style_str("rgba(255, 255, 255, 0.04)"),
	}
	ctx.fill();
	let border = if node.is_opportunity {
		format!("rgba({MATCH_RGB}, 0.5)")
	} else {
		"rgba(255, 255, 255, 0.1)".to_string()
	};
	ctx.set_stroke_style_str(&border);
	ctx.set_line_width(1.0);
	ctx.stroke();

	if let Some(attendee) = &node.attendee {
		ctx.set_fill_style_str("rgba(255, 255, 255, 0.6)");
		ctx.set_font(&format!("{}px sans-serif", (radius * 0.6).max(10.0)));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&attendee.initials(), x, y);
		ctx.set_text_baseline("alphabetic");
	}
}
