use std::cell::Cell;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::state::ForceGraphState;
use crate::graph::{GraphNode, NodeKind};
use crate::panel::favicon_url;

const LABEL_MAX: usize = 22;

#[derive(Clone, Copy, PartialEq)]
enum FaviconStatus {
	Loading,
	Ready,
	Failed,
}

struct Favicon {
	element: HtmlImageElement,
	status: Rc<Cell<FaviconStatus>>,
}

/// Session-lifetime favicon store. Images load lazily the first time a
/// domain node is drawn; a broken image flips to `Failed` and the node
/// falls back to its glyph from then on.
#[derive(Default)]
pub struct FaviconCache {
	images: HashMap<String, Favicon>,
}

impl FaviconCache {
	pub fn ready_image(&mut self, domain: &str) -> Option<HtmlImageElement> {
		if !self.images.contains_key(domain) {
			let Ok(element) = HtmlImageElement::new() else {
				return None;
			};
			let status = Rc::new(Cell::new(FaviconStatus::Loading));

			let on_load = {
				let status = status.clone();
				Closure::once(move || status.set(FaviconStatus::Ready))
			};
			element.set_onload(Some(on_load.as_ref().unchecked_ref()));
			on_load.forget();

			let on_error = {
				let status = status.clone();
				Closure::once(move || status.set(FaviconStatus::Failed))
			};
			element.set_onerror(Some(on_error.as_ref().unchecked_ref()));
			on_error.forget();

			element.set_src(&favicon_url(domain));
			self.images.insert(domain.to_string(), Favicon { element, status });
		}

		let favicon = &self.images[domain];
		(favicon.status.get() == FaviconStatus::Ready).then(|| favicon.element.clone())
	}
}

fn truncate_label(label: &str) -> String {
	if label.chars().count() > LABEL_MAX {
		let mut out: String = label.chars().take(LABEL_MAX - 2).collect();
		out.push_str("..");
		out
	} else {
		label.to_string()
	}
}

/// Full draw pass: clear, apply the view transform, edges below nodes.
pub fn render(state: &ForceGraphState, favicons: &mut FaviconCache, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	// One position pass feeds both the edge and node layers.
	let mut positions: HashMap<usize, (f64, f64, f64)> = HashMap::new();
	state.graph.visit_nodes(|node| {
		positions.insert(
			node.index().index(),
			(node.x() as f64, node.y() as f64, node.data.user_data.size),
		);
	});

	draw_edges(state, ctx, &positions);
	draw_nodes(state, favicons, ctx);
	ctx.restore();
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	positions: &HashMap<usize, (f64, f64, f64)>,
) {
	ctx.set_stroke_style_str("rgba(55, 65, 81, 0.5)");
	ctx.set_line_width(1.5);
	for edge in &state.edges {
		let (Some(&(x1, y1, r1)), Some(&(x2, y2, r2))) = (
			positions.get(&edge.source.index()),
			positions.get(&edge.target.index()),
		) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		if edge.dashed {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(6.0),
				&JsValue::from_f64(4.0),
			));
		}
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * r2, y2 - uy * r2);
		ctx.stroke();
		if edge.dashed {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}
}

fn glow_ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, inner: f64, outer: f64, color: &str, alpha: f64) {
	let Ok(gradient) = ctx.create_radial_gradient(x, y, inner, x, y, outer) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, &with_alpha(color, alpha));
	let _ = gradient.add_color_stop(1.0, &with_alpha(color, 0.0));
	ctx.begin_path();
	let _ = ctx.arc(x, y, outer, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

/// Hex color to an rgba() string with the given alpha.
fn with_alpha(hex: &str, alpha: f64) -> String {
	let parse = |s: &str| u8::from_str_radix(s, 16).unwrap_or(255);
	if let Some(stripped) = hex.strip_prefix('#') {
		if stripped.len() == 6 {
			let (r, g, b) = (
				parse(&stripped[0..2]),
				parse(&stripped[2..4]),
				parse(&stripped[4..6]),
			);
			return format!("rgba({r}, {g}, {b}, {alpha})");
		}
	}
	hex.to_string()
}

fn badge_gradient(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	kind: NodeKind,
) -> Option<web_sys::CanvasGradient> {
	let (light, dark) = kind.gradient();
	let gradient = ctx
		.create_radial_gradient(x - radius * 0.4, y - radius * 0.4, radius * 0.1, x, y, radius)
		.ok()?;
	gradient.add_color_stop(0.0, light).ok()?;
	gradient.add_color_stop(1.0, dark).ok()?;
	Some(gradient)
}

fn draw_nodes(
	state: &ForceGraphState,
	favicons: &mut FaviconCache,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	state.graph.visit_nodes(|sim_node| {
		let idx = sim_node.index();
		let node: &GraphNode = &sim_node.data.user_data;
		let (x, y) = (sim_node.x() as f64, sim_node.y() as f64);
		let hovered = state.hover == Some(idx);
		let selected = state.selected == Some(idx);
		let radius = if hovered { node.size + 4.0 } else { node.size };

		if node.kind.has_glow() {
			glow_ring(ctx, x, y, radius * 0.5, radius + 10.0, node.color, 0.25);
		}
		if matches!(node.kind, NodeKind::Malware | NodeKind::Phishing) {
			glow_ring(ctx, x, y, radius * 0.6, radius + 16.0, node.color, 0.15);
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		match badge_gradient(ctx, x, y, radius, node.kind) {
			Some(gradient) => {
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			}
			None => ctx.set_fill_style_str(node.color),
		}
		ctx.fill();

		if selected {
			ctx.set_stroke_style_str("#fff");
			ctx.set_line_width(4.0);
		} else {
			ctx.set_stroke_style_str(node.kind.stroke(node.has_screenshot));
			ctx.set_line_width(if node.kind.is_danger() { 3.0 } else { 2.0 });
		}
		ctx.stroke();

		// Favicon for domain-flavored nodes, glyph everywhere else and as
		// the broken-image fallback.
		let mut drew_favicon = false;
		if node.kind.uses_favicon() {
			if let Some(domain) = &node.domain {
				if let Some(image) = favicons.ready_image(domain) {
					ctx.save();
					ctx.begin_path();
					let _ = ctx.arc(x, y, radius * 0.65, 0.0, 2.0 * PI);
					ctx.clip();
					let side = radius * 1.1;
					let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
						&image,
						x - side / 2.0,
						y - side / 2.0,
						side,
						side,
					);
					ctx.restore();
					drew_favicon = true;
				}
			}
		}
		if !drew_favicon {
			ctx.set_font(&format!("{}px sans-serif", radius * 0.55));
			ctx.set_fill_style_str("#fff");
			let _ = ctx.fill_text(node.kind.glyph(), x, y);
		}

		if node.has_screenshot {
			ctx.begin_path();
			let _ = ctx.arc(x + radius * 0.6, y - radius * 0.6, 8.0, 0.0, 2.0 * PI);
			ctx.set_fill_style_str("#22c55e");
			ctx.fill();
			ctx.set_stroke_style_str("#fff");
			ctx.set_line_width(2.0);
			ctx.stroke();
			ctx.set_font("8px sans-serif");
			let _ = ctx.fill_text("\u{1F4F7}", x + radius * 0.6, y - radius * 0.6);
		}

		if matches!(node.kind, NodeKind::Malware | NodeKind::Phishing) {
			ctx.begin_path();
			let _ = ctx.arc(x - radius * 0.6, y - radius * 0.6, 10.0, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(if node.kind == NodeKind::Malware {
				"#dc2626"
			} else {
				"#f59e0b"
			});
			ctx.fill();
			ctx.set_stroke_style_str("#fff");
			ctx.set_line_width(2.0);
			ctx.stroke();
			ctx.set_font("10px sans-serif");
			let _ = ctx.fill_text(node.kind.glyph(), x - radius * 0.6, y - radius * 0.6);
		}

		if node.kind == NodeKind::Phone {
			if let Some(country) = &node.country {
				ctx.set_font("14px sans-serif");
				let _ = ctx.fill_text(
					&crate::geo::flag_emoji(country),
					x + radius * 0.7,
					y - radius * 0.7,
				);
			}
		}

		ctx.set_fill_style_str("#e5e7eb");
		ctx.set_font("500 11px sans-serif");
		let _ = ctx.fill_text(&truncate_label(&node.label), x, y + radius + 14.0);
	});
}
