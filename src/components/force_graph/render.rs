use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{ForceGraphState, NODE_BORDER, NODE_RADIUS};

const BACKGROUND: &str = "#1a1a2e";
const NODE_FONT: f64 = 14.0;
const EDGE_FONT: f64 = 12.0;
const EDGE_WIDTH: f64 = 2.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (EDGE_WIDTH / k, 8.0 / k, 4.0 / k, 8.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for link in &state.links {
		let (Some((x1, y1)), Some((x2, y2))) =
			(state.position(link.source), state.position(link.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_highlighted =
			state.is_highlighted(link.source) && state.is_highlighted(link.target);

		// t=0: all edges at base (0.6), t=1: highlighted at 0.9, others at 0.15
		let (edge_alpha, arrow_alpha, width) = if is_highlighted {
			(0.6 + 0.3 * t, 0.8 + 0.1 * t, line_width * (1.0 + 0.3 * t))
		} else {
			(0.6 - 0.45 * t, 0.8 - 0.45 * t, line_width * (1.0 - 0.3 * t))
		};

		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {})", edge_alpha));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!("rgba(100, 180, 255, {})", arrow_alpha));
		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if !link.label.is_empty() {
			draw_edge_label(ctx, &link.label, (x1 + x2) / 2.0, (y1 + y2) / 2.0, k, edge_alpha);
		}
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_edge_label(ctx: &CanvasRenderingContext2d, label: &str, x: f64, y: f64, k: f64, alpha: f64) {
	ctx.set_font(&format!("{}px sans-serif", EDGE_FONT / k.max(0.5)));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	// Halo keeps the label readable over the edge line.
	ctx.set_stroke_style_str(BACKGROUND);
	ctx.set_line_width(3.0 / k);
	let _ = ctx.stroke_text(label, x, y);
	ctx.set_fill_style_str(&format!("rgba(220, 230, 255, {})", alpha + 0.2));
	let _ = ctx.fill_text(label, x, y);
	ctx.set_text_align("start");
	ctx.set_text_baseline("alphabetic");
}

fn draw_dot(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: &str, k: f64) {
	ctx.save();
	ctx.set_shadow_color("rgba(0, 0, 0, 0.5)");
	ctx.set_shadow_blur(6.0);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color);
	ctx.fill();
	ctx.restore();

	ctx.set_stroke_style_str("rgba(255, 255, 255, 0.85)");
	ctx.set_line_width(NODE_BORDER / k.max(0.5));
	ctx.stroke();
}

fn draw_label(ctx: &CanvasRenderingContext2d, label: &str, x: f64, y: f64, radius: f64, k: f64) {
	ctx.set_font(&format!("{}px sans-serif", NODE_FONT / k.max(0.5)));
	let _ = ctx.fill_text(label, x + radius + 4.0, y + 4.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	state.graph.visit_nodes(|node| {
		let (idx, x, y) = (node.index(), node.x() as f64, node.y() as f64);
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let Some(info) = state.node_info(idx) else {
			return;
		};
		let (alpha, radius) = (1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		draw_dot(ctx, x, y, radius, &info.color, k);
		ctx.set_global_alpha(1.0);

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
		draw_label(ctx, &info.label, x, y, radius, k);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let (idx, x, y) = (node.index(), node.x() as f64, node.y() as f64);
		if !state.is_highlighted(idx) {
			return;
		}
		let Some(info) = state.node_info(idx) else {
			return;
		};
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(
				NODE_RADIUS * (1.0 + 0.35 * t),
				NODE_RADIUS * (1.8 + 1.2 * t),
			)
		} else if is_neighbor {
			(NODE_RADIUS * (1.0 + 0.2 * t), NODE_RADIUS * (1.4 + 0.6 * t))
		} else {
			(NODE_RADIUS, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient
					.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		draw_dot(ctx, x, y, radius, &info.color, k);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str("white");
		draw_label(ctx, &info.label, x, y, radius, k);
	});
}

/// Drawn in screen space so it stays legible at any zoom.
fn draw_tooltip(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(idx) = state.tooltip_node() else {
		return;
	};
	let (Some(info), Some((gx, gy))) = (state.node_info(idx), state.position(idx)) else {
		return;
	};
	let sx = gx * state.transform.k + state.transform.x;
	let sy = gy * state.transform.k + state.transform.y;

	ctx.set_font("12px sans-serif");
	let text_width = ctx
		.measure_text(&info.title)
		.map(|m| m.width())
		.unwrap_or(info.title.len() as f64 * 7.0);
	let (pad, h) = (6.0, 22.0);
	let w = text_width + pad * 2.0;
	let bx = (sx + 12.0).min(state.width - w - 4.0).max(4.0);
	let by = (sy + 12.0).min(state.height - h - 4.0).max(4.0);

	ctx.set_fill_style_str("rgba(255, 255, 240, 0.95)");
	ctx.fill_rect(bx, by, w, h);
	ctx.set_stroke_style_str("rgba(0, 0, 0, 0.4)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(bx, by, w, h);
	ctx.set_fill_style_str("#222");
	let _ = ctx.fill_text(&info.title, bx + pad, by + 15.0);
}
