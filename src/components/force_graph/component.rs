use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::render;
use super::state::ForceGraphState;
use super::types::{GraphData, NodeSelection};
use crate::config::PhysicsConfig;
use crate::error::AppError;

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Pointer travel (px) below which a press on a node counts as a click.
const CLICK_SLOP: f64 = 4.0;
const PAN_STEP: f64 = 40.0;
const ZOOM_STEP: f64 = 1.2;

#[derive(Clone, Copy)]
enum NavAction {
	ZoomIn,
	ZoomOut,
	Fit,
}

/// Interactive force-directed view of one extraction result.
///
/// Mount a fresh instance per result: once its canvas leaves the document the
/// animation loop stops and the window listener is removed.
#[component]
pub fn ForceGraphCanvas(
	data: GraphData,
	#[prop(optional)] physics: Option<PhysicsConfig>,
	#[prop(default = 0.3)] tooltip_delay: f64,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] on_select: Option<Callback<NodeSelection>>,
	#[prop(optional)] on_error: Option<Callback<AppError>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let physics = physics.unwrap_or_default();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let started = start(
			&canvas,
			&data,
			&physics,
			tooltip_delay,
			(width, height),
			&state_init,
			&animate_init,
			&resize_cb_init,
		);
		if let Err(err) = started {
			log::error!("Error initializing network: {err}");
			state_init.borrow_mut().take();
			if let Some(cb) = on_error.as_ref() {
				cb.run(err);
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.moved = false;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_mm.borrow_mut() {
			// Update hover state when not dragging
			if !s.drag.active {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}

			if s.drag.active {
				let (sx, sy) = (x - s.drag.start_x, y - s.drag.start_y);
				if !s.drag.moved && (sx * sx + sy * sy).sqrt() > CLICK_SLOP {
					s.drag.moved = true;
				}
				if let (Some(idx), true) = (s.drag.node_idx, s.drag.moved) {
					let (dx, dy) = (sx / s.transform.k, sy / s.transform.k);
					let (nx, ny) = (
						s.drag.node_start_x + dx as f32,
						s.drag.node_start_y + dy as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut selected = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if let (true, Some(idx)) = (s.drag.active, s.drag.node_idx) {
				if s.drag.moved {
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.is_anchor = true;
						}
					});
				} else {
					selected = s.selection(idx);
				}
			}
			s.drag.active = false;
			s.drag.moved = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}
		if let (Some(selection), Some(cb)) = (selected, on_select.as_ref()) {
			cb.run(selection);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	let state_kd = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		let mut handled = true;
		if let Some(ref mut s) = *state_kd.borrow_mut() {
			match ev.key().as_str() {
				"ArrowLeft" => s.pan_by(PAN_STEP, 0.0),
				"ArrowRight" => s.pan_by(-PAN_STEP, 0.0),
				"ArrowUp" => s.pan_by(0.0, PAN_STEP),
				"ArrowDown" => s.pan_by(0.0, -PAN_STEP),
				"+" | "=" => s.zoom_center(ZOOM_STEP),
				"-" | "_" => s.zoom_center(1.0 / ZOOM_STEP),
				"0" => s.fit_view(),
				_ => handled = false,
			}
		}
		if handled {
			ev.prevent_default();
		}
	};

	let state_nav = state.clone();
	let nav = move |action: NavAction| {
		if let Some(ref mut s) = *state_nav.borrow_mut() {
			match action {
				NavAction::ZoomIn => s.zoom_center(ZOOM_STEP),
				NavAction::ZoomOut => s.zoom_center(1.0 / ZOOM_STEP),
				NavAction::Fit => s.fit_view(),
			}
		}
	};
	let (nav_in, nav_out, nav_fit) = (nav.clone(), nav.clone(), nav);

	view! {
		<div class="force-graph">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				tabindex="0"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				on:keydown=on_keydown
				style="display: block; cursor: grab;"
			/>
			<div class="graph-nav">
				<button type="button" title="Zoom in" on:click=move |_| nav_in(NavAction::ZoomIn)>
					"+"
				</button>
				<button type="button" title="Zoom out" on:click=move |_| nav_out(NavAction::ZoomOut)>
					"−"
				</button>
				<button type="button" title="Fit to view" on:click=move |_| nav_fit(NavAction::Fit)>
					"⤢"
				</button>
			</div>
		</div>
	}
}

/// Pointer position relative to the canvas' top-left corner.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn canvas_size(canvas: &HtmlCanvasElement, (width, height): (Option<f64>, Option<f64>)) -> (f64, f64) {
	let parent = canvas.parent_element();
	let measure = |f: fn(&web_sys::Element) -> i32, fallback: f64| {
		parent
			.as_ref()
			.map(|p| f(p) as f64)
			.filter(|v| *v > 0.0)
			.unwrap_or(fallback)
	};
	(
		width.unwrap_or_else(|| measure(web_sys::Element::client_width, 800.0)),
		height.unwrap_or_else(|| measure(web_sys::Element::client_height, 600.0)),
	)
}

fn render_error(value: JsValue) -> AppError {
	AppError::Render(AppError::from_js(value).to_string())
}

#[allow(clippy::too_many_arguments)]
fn start(
	canvas: &HtmlCanvasElement,
	data: &GraphData,
	physics: &PhysicsConfig,
	tooltip_delay: f64,
	size: (Option<f64>, Option<f64>),
	state: &SharedState,
	animate: &SharedClosure,
	resize_cb: &SharedClosure,
) -> Result<(), AppError> {
	let window: Window =
		web_sys::window().ok_or_else(|| AppError::Render("no window available".into()))?;

	let (w, h) = canvas_size(canvas, size);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(render_error)?
		.ok_or_else(|| AppError::Render("2D canvas context unavailable".into()))?
		.dyn_into()
		.map_err(|obj| render_error(obj.into()))?;

	let graph_state = ForceGraphState::new(data, physics, tooltip_delay, w, h);
	log::debug!(
		"Graph ready: {} nodes, {} drawn edges, {}x{}",
		data.nodes.len(),
		graph_state.links.len(),
		w,
		h
	);
	*state.borrow_mut() = Some(graph_state);

	let (state_resize, canvas_resize) = (state.clone(), canvas.clone());
	*resize_cb.borrow_mut() = Some(Closure::new(move || {
		let (nw, nh) = canvas_size(&canvas_resize, size);
		canvas_resize.set_width(nw as u32);
		canvas_resize.set_height(nh as u32);
		if let Some(ref mut s) = *state_resize.borrow_mut() {
			s.resize(nw, nh);
		}
	}));
	if let Some(ref cb) = *resize_cb.borrow() {
		window
			.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
			.map_err(render_error)?;
	}

	let (state_anim, animate_inner, resize_inner, canvas_anim) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		canvas.clone(),
	);
	*animate.borrow_mut() = Some(Closure::new(move || {
		if !canvas_anim.is_connected() {
			release(animate_inner.clone(), resize_inner.clone());
			return;
		}
		if let Some(ref mut s) = *state_anim.borrow_mut() {
			if s.animation_running {
				s.tick(0.016);
			}
			render::render(s, &ctx);
		}
		if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
			let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.map_err(render_error)?;
	}
	Ok(())
}

/// Drops the frame and resize closures once the current frame has returned.
fn release(animate: SharedClosure, resize_cb: SharedClosure) {
	wasm_bindgen_futures::spawn_local(async move {
		let resize = resize_cb.borrow_mut().take();
		if let (Some(win), Some(cb)) = (web_sys::window(), resize.as_ref()) {
			let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		drop(resize);
		let frame = animate.borrow_mut().take();
		drop(frame);
		log::debug!("Released detached graph canvas");
	});
}
