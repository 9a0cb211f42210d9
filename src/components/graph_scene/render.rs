use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{DEFAULT_COLOR, NODE_RADIUS, SceneState};
use crate::camera::ScreenPoint;
use crate::camera::transition::ease_out_cubic;

const BACKGROUND: &str = "#05060d";
const EDGE_RGB: &str = "156, 163, 175";
const EDGE_ALPHA: f64 = 0.35;
/// Labels are skipped for nodes drawn smaller than this many pixels.
const LABEL_MIN_RADIUS: f64 = 3.0;

pub fn render(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let projected = state.project_nodes();
	draw_edges(state, ctx, &projected);
	draw_nodes(state, ctx, &projected);
}

fn draw_edges(state: &SceneState, ctx: &CanvasRenderingContext2d, projected: &[Option<ScreenPoint>]) {
	let t = ease_out_cubic(state.hover.highlight_t);
	ctx.set_line_width(1.0);

	for &(src, tgt) in &state.edges {
		let (Some(a), Some(b)) = (projected[src], projected[tgt]) else {
			continue;
		};
		let alpha = if state.is_highlighted(src) && state.is_highlighted(tgt) {
			EDGE_ALPHA + 0.45 * t
		} else {
			EDGE_ALPHA * (1.0 - 0.6 * t)
		};
		ctx.set_stroke_style_str(&format!("rgba({EDGE_RGB}, {alpha})"));
		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
}

fn draw_nodes(state: &SceneState, ctx: &CanvasRenderingContext2d, projected: &[Option<ScreenPoint>]) {
	let t = ease_out_cubic(state.hover.highlight_t);

	// Painter's order: farthest first.
	let mut order: Vec<(usize, ScreenPoint)> = projected
		.iter()
		.enumerate()
		.filter_map(|(i, p)| p.map(|p| (i, p)))
		.collect();
	order.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

	for (idx, p) in order {
		let node = &state.nodes[idx];
		let radius = NODE_RADIUS * p.scale * state.scales[idx];
		let color = node.color.as_deref().unwrap_or(DEFAULT_COLOR);
		let highlighted = state.is_highlighted(idx);
		let alpha = if highlighted { 1.0 } else { 1.0 - 0.6 * t };

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius.max(0.5), 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color);
		ctx.fill();

		// Fake sphere shading.
		if radius > 2.0 {
			if let Ok(gradient) = ctx.create_radial_gradient(
				p.x - radius * 0.35,
				p.y - radius * 0.35,
				radius * 0.1,
				p.x,
				p.y,
				radius,
			) {
				let _ = gradient.add_color_stop(0.0, "rgba(255, 255, 255, 0.45)");
				let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0.25)");
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		if state.hover.node == Some(idx) || state.focused_index() == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius + 2.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
			ctx.set_line_width(1.5);
			ctx.stroke();
		}
		ctx.set_global_alpha(1.0);

		if radius >= LABEL_MIN_RADIUS || highlighted {
			let size = (radius * 0.9).clamp(9.0, 16.0);
			ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.85));
			ctx.set_font(&format!("{size}px sans-serif"));
			let _ = ctx.fill_text(node.display_label(), p.x + radius + 3.0, p.y + size * 0.35);
		}
	}
}
