use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasState, ConnectDrag, ViewTransform};
use super::style::{ACCENT_COLOR, CurveKind, EdgeStyle};
use super::types::{MindMapEdge, Position, SOURCE_HANDLE, TARGET_HANDLE};

const BACKGROUND: &str = "#0e1f16";
const DOT_COLOR: &str = "#7AC8B5";
const DOT_GAP: f64 = 24.0;
const DOT_SIZE: f64 = 1.0;
const STEP_OFFSET: f64 = 20.0;
const CORNER_RADIUS: f64 = 5.0;
const DASH: f64 = 5.0;

/// Vertical direction a handle faces: -1 up, +1 down.
fn handle_direction(handle: &str) -> f64 {
	if handle == TARGET_HANDLE { -1.0 } else { 1.0 }
}

/// Corner points of an orthogonal route between two vertical handles.
///
/// The first and last points are the anchors themselves. Consecutive duplicates
/// are dropped so a vertically aligned pair yields no zero-length corners.
pub fn smooth_step_points(
	source: Position,
	source_dir: f64,
	target: Position,
	target_dir: f64,
	offset: f64,
) -> Vec<Position> {
	let s1 = Position::new(source.x, source.y + source_dir * offset);
	let t1 = Position::new(target.x, target.y + target_dir * offset);
	let raw = if source_dir > 0.0 && target_dir < 0.0 && t1.y >= s1.y {
		let mid_y = (source.y + target.y) / 2.0;
		vec![
			source,
			Position::new(source.x, mid_y),
			Position::new(target.x, mid_y),
			target,
		]
	} else {
		let mid_x = (source.x + target.x) / 2.0;
		vec![
			source,
			s1,
			Position::new(mid_x, s1.y),
			Position::new(mid_x, t1.y),
			t1,
			target,
		]
	};
	let mut points: Vec<Position> = Vec::with_capacity(raw.len());
	for p in raw {
		if points.last() != Some(&p) {
			points.push(p);
		}
	}
	points
}

fn edge_points(state: &CanvasState, edge: &MindMapEdge) -> Option<Vec<Position>> {
	let scene = &state.scene;
	let (src, tgt) = (scene.node(&edge.source)?, scene.node(&edge.target)?);
	let (sh, th) = (edge.source_handle(), edge.target_handle());
	let (a, b) = (state.geometry.anchor(src, sh), state.geometry.anchor(tgt, th));
	Some(match edge.style.curve {
		CurveKind::SmoothStep => {
			smooth_step_points(a, handle_direction(sh), b, handle_direction(th), STEP_OFFSET)
		}
		CurveKind::Straight => vec![a, b],
	})
}

/// Draw the cached scene. Callers refresh it with [`CanvasState::sync_scene`] first.
pub fn render(
	state: &CanvasState,
	transform: &ViewTransform,
	connecting: Option<&ConnectDrag>,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_background(state, transform, ctx);
	ctx.save();
	let _ = ctx.translate(transform.x, transform.y);
	let _ = ctx.scale(transform.k, transform.k);
	draw_edges(state, ctx);
	if let Some(drag) = connecting {
		draw_preview(state, drag, ctx);
	}
	ctx.restore();
}

fn draw_background(state: &CanvasState, t: &ViewTransform, ctx: &CanvasRenderingContext2d) {
	let gap = DOT_GAP * t.k;
	// Too dense to read below this; skip rather than fill the screen.
	if gap < 6.0 {
		return;
	}
	let size = (DOT_SIZE * t.k).max(1.0);
	let (ox, oy) = (t.x.rem_euclid(gap), t.y.rem_euclid(gap));
	ctx.set_fill_style_str(DOT_COLOR);
	let mut y = oy;
	while y < state.height {
		let mut x = ox;
		while x < state.width {
			ctx.fill_rect(x - size / 2.0, y - size / 2.0, size, size);
			x += gap;
		}
		y += gap;
	}
}

fn draw_edges(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let mut edges: Vec<&MindMapEdge> = state.scene.edges.iter().collect();
	edges.sort_by_key(|e| e.style.z_index.unwrap_or(0));
	for edge in edges {
		let Some(points) = edge_points(state, edge) else {
			continue;
		};
		stroke_route(&points, &edge.style, state.flow_time, ctx);
	}
}

fn stroke_route(points: &[Position], style: &EdgeStyle, flow_time: f64, ctx: &CanvasRenderingContext2d) {
	if points.len() < 2 {
		return;
	}
	ctx.set_stroke_style_str(style.stroke);
	ctx.set_line_width(style.stroke_width);
	if style.animated {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(DASH),
			&JsValue::from_f64(DASH),
		));
		ctx.set_line_dash_offset(-(flow_time * 30.0) % (2.0 * DASH));
	}

	ctx.begin_path();
	ctx.move_to(points[0].x, points[0].y);
	for w in points.windows(3) {
		let _ = ctx.arc_to(w[1].x, w[1].y, w[2].x, w[2].y, CORNER_RADIUS);
	}
	let (prev, tip) = (points[points.len() - 2], points[points.len() - 1]);
	ctx.line_to(tip.x, tip.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	draw_arrow(prev, tip, style, ctx);
}

fn draw_arrow(from: Position, tip: Position, style: &EdgeStyle, ctx: &CanvasRenderingContext2d) {
	let (dx, dy) = (tip.x - from.x, tip.y - from.y);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	// Marker sizes are in units of stroke width, as in SVG markers.
	let (len, half) = (
		style.marker_end.height * 0.35,
		style.marker_end.width * 0.175,
	);
	let (back_x, back_y) = (tip.x - ux * len, tip.y - uy * len);
	let (px, py) = (-uy * half, ux * half);
	ctx.set_fill_style_str(style.marker_end.color);
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_preview(state: &CanvasState, drag: &ConnectDrag, ctx: &CanvasRenderingContext2d) {
	let (Some(node), Some(cursor)) = (state.scene.node(&drag.source), drag.cursor) else {
		return;
	};
	let start = state.geometry.anchor(node, SOURCE_HANDLE);
	ctx.set_stroke_style_str(ACCENT_COLOR);
	ctx.set_line_width(2.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(DASH),
		&JsValue::from_f64(DASH),
	));
	ctx.begin_path();
	ctx.move_to(start.x, start.y);
	ctx.line_to(cursor.x, cursor.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}
