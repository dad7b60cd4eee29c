use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::error;
use wasm_bindgen::prelude::*;

/// Longest frame step fed to animations, in seconds. Background tabs can
/// stall the frame loop for a long time.
const MAX_DT: f64 = 0.1;

/// Source of animation ticks. Callbacks receive the seconds since the
/// previous tick.
pub trait FrameScheduler {
	fn on_tick(&self, callback: Box<dyn FnMut(f64)>);

	/// Stop ticking and release every registered callback.
	fn stop(&self);
}

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Drives ticks from `requestAnimationFrame` until stopped.
#[derive(Default)]
pub struct AnimationFrameScheduler {
	frame: FrameSlot,
	pending: Rc<Cell<Option<i32>>>,
}

impl AnimationFrameScheduler {
	pub fn new() -> Self {
		Self::default()
	}
}

impl FrameScheduler for AnimationFrameScheduler {
	fn on_tick(&self, mut callback: Box<dyn FnMut(f64)>) {
		let Some(window) = web_sys::window() else {
			error!("no window; animation loop not started");
			return;
		};
		let (frame_inner, pending) = (self.frame.clone(), self.pending.clone());
		let mut last: Option<f64> = None;

		*self.frame.borrow_mut() = Some(Closure::new(move |now: f64| {
			pending.set(None);
			let dt = last.map_or(0.0, |prev| ((now - prev) / 1000.0).clamp(0.0, MAX_DT));
			last = Some(now);
			callback(dt);

			if let (Some(win), Some(cb)) = (web_sys::window(), frame_inner.borrow().as_ref()) {
				pending.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *self.frame.borrow() {
			self.pending
				.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	}

	fn stop(&self) {
		if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
		// the closure holds its own slot; dropping it breaks the cycle
		self.frame.borrow_mut().take();
	}
}

/// Ticks only when told to. Lets animation logic run without a browser.
#[cfg(test)]
#[derive(Default)]
pub struct ManualScheduler {
	callbacks: RefCell<Vec<Box<dyn FnMut(f64)>>>,
}

#[cfg(test)]
impl ManualScheduler {
	pub fn advance(&self, frames: usize, dt: f64) {
		for _ in 0..frames {
			for cb in self.callbacks.borrow_mut().iter_mut() {
				cb(dt);
			}
		}
	}
}

#[cfg(test)]
impl FrameScheduler for ManualScheduler {
	fn on_tick(&self, callback: Box<dyn FnMut(f64)>) {
		self.callbacks.borrow_mut().push(callback);
	}

	fn stop(&self) {
		self.callbacks.borrow_mut().clear();
	}
}
