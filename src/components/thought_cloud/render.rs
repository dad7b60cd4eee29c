use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::{LinkSprite, MarkerSprite, SceneFrame};

const BACKGROUND: &str = "#f1f5f9";
const FACETS: usize = 6;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(frame: &SceneFrame, ctx: &CanvasRenderingContext2d, time: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
	draw_links(&frame.links, ctx, time);
	for marker in &frame.markers {
		draw_marker(marker, ctx);
	}
}

fn draw_links(links: &[LinkSprite], ctx: &CanvasRenderingContext2d, time: f64) {
	let (dash, gap) = (6.0, 4.0);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	));
	ctx.set_line_dash_offset(-(time * 20.0) % (dash + gap));
	ctx.set_line_width(1.5);
	for link in links {
		ctx.set_stroke_style_str(&link.color.css_alpha(link.opacity));
		ctx.begin_path();
		ctx.move_to(link.from.0, link.from.1);
		ctx.line_to(link.to.0, link.to.1);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Flat-shaded icosahedron silhouette: a spinning hexagon with its
/// light-facing half drawn brighter.
fn draw_marker(m: &MarkerSprite, ctx: &CanvasRenderingContext2d) {
	let (x, y, r) = (m.x, m.y, m.radius);
	if r < 0.5 {
		return;
	}
	let t = ease_out_cubic(m.hover_t);

	if t > 0.01 {
		if let Ok(gradient) = ctx.create_radial_gradient(x, y, r * 0.3, x, y, r * (1.6 + 0.8 * t)) {
			let _ = gradient.add_color_stop(0.0, &m.base.css_alpha(0.35 * t));
			let _ = gradient.add_color_stop(1.0, &m.base.css_alpha(0.0));
			ctx.begin_path();
			let _ = ctx.arc(x, y, r * (1.6 + 0.8 * t), 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}
	}

	let corner = |i: usize| {
		let a = m.rotation + i as f64 * 2.0 * PI / FACETS as f64;
		(x + r * a.cos(), y + r * a.sin())
	};

	ctx.set_global_alpha(0.9);
	ctx.begin_path();
	let (sx, sy) = corner(0);
	ctx.move_to(sx, sy);
	for i in 1..FACETS {
		let (cx, cy) = corner(i);
		ctx.line_to(cx, cy);
	}
	ctx.close_path();
	ctx.set_fill_style_str(&m.fill.css());
	ctx.fill();

	// upper facets, toward the light
	ctx.begin_path();
	ctx.move_to(x, y);
	for i in 3..=FACETS {
		let (cx, cy) = corner(i % FACETS);
		ctx.line_to(cx, cy);
	}
	ctx.close_path();
	ctx.set_fill_style_str(&m.highlight.css());
	ctx.fill();
	ctx.set_global_alpha(1.0);

	if m.selected {
		ctx.begin_path();
		let _ = ctx.arc(x, y, r + 3.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&m.base.css_alpha(0.8));
		ctx.set_line_width(2.0);
		ctx.stroke();
	} else if t > 0.01 {
		ctx.begin_path();
		let _ = ctx.arc(x, y, r + 2.0, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
		ctx.set_line_width(1.5);
		ctx.stroke();
	}
}
