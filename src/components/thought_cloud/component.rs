use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::config::VisualizerConfig;
use super::render;
use super::scheduler::{AnimationFrameScheduler, FrameScheduler};
use super::state::{CloudState, SceneEvent};
use super::types::DisplayNode;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

fn local_coords(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Canvas that draws the active thoughts as a 3D cloud.
///
/// Selection is owned by the caller: clicks are reported through `on_event`
/// and the resulting selection comes back in through `selected`.
#[component]
pub fn ThoughtCloudCanvas(
	#[prop(into)] nodes: Signal<Vec<DisplayNode>>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(into)] on_event: Callback<SceneEvent>,
	#[prop(optional)] config: VisualizerConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CloudState>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let scheduler = Rc::new(AnimationFrameScheduler::new());

	// Unmount on every new thought list: stop the loop, unhook resize, drop state.
	let teardown = SendWrapper::new((scheduler.clone(), resize_cb.clone(), state.clone()));
	on_cleanup(move || {
		let (scheduler, resize_cb, state) = teardown.take();
		scheduler.stop();
		if let (Some(cb), Some(window)) = (resize_cb.borrow_mut().take(), web_sys::window()) {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		state.borrow_mut().take();
		debug!("thought cloud canvas unmounted");
	});

	let (state_init, resize_cb_init, scheduler_init) =
		(state.clone(), resize_cb.clone(), scheduler.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window; thought cloud not mounted");
			return;
		};
		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("2d canvas context unavailable");
			return;
		};

		let (w, h) = container_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let mut cloud = CloudState::new(config.clone(), w, h);
		cloud.set_nodes(nodes.get_untracked());
		cloud.set_selection(selected.get_untracked());
		*state_init.borrow_mut() = Some(cloud);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = container_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let state_anim = state_init.clone();
		scheduler_init.on_tick(Box::new(move |dt| {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(dt);
				render::render(s.frame(), &ctx, s.elapsed());
			}
		}));
	});

	let state_nodes = state.clone();
	Effect::new(move |_| {
		let nodes = nodes.get();
		if let Some(ref mut s) = *state_nodes.borrow_mut() {
			s.set_nodes(nodes);
		}
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		let selected = selected.get();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.set_selection(selected);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		let hovering = match *state_mm.borrow_mut() {
			Some(ref mut s) => {
				s.pointer_move(x, y);
				s.hovered.is_some()
			}
			None => false,
		};
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			let cursor = if hovering { "pointer" } else { "grab" };
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_coords(canvas_ref, &ev) else {
			return;
		};
		let event = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.pointer_up(x, y));
		if let Some(event) = event {
			on_event.run(event);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(ev.delta_y());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="thought-cloud-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
