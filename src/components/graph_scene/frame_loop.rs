use std::sync::atomic::{AtomicUsize, Ordering};

use wasm_bindgen::prelude::*;
use web_sys::Window;

static RUNNING: AtomicUsize = AtomicUsize::new(0);

/// Render loops currently alive across all mounted scenes.
pub fn running_loops() -> usize {
	RUNNING.load(Ordering::SeqCst)
}

/// Browser callbacks owned by one mounted scene: the animation-frame closure,
/// the window resize listener and the pending frame id.
#[derive(Default)]
pub(super) struct FrameLoop {
	animate: Option<Closure<dyn FnMut()>>,
	resize: Option<Closure<dyn FnMut()>>,
	frame: Option<i32>,
}

impl FrameLoop {
	/// Registers `resize` on the window and schedules the first frame,
	/// replacing any loop started earlier.
	pub fn start(&mut self, window: &Window, animate: Closure<dyn FnMut()>, resize: Closure<dyn FnMut()>) {
		self.stop(window);
		let _ = window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref());
		self.frame = window
			.request_animation_frame(animate.as_ref().unchecked_ref())
			.ok();
		self.animate = Some(animate);
		self.resize = Some(resize);
		RUNNING.fetch_add(1, Ordering::SeqCst);
	}

	/// Schedules the next frame. No-op once stopped.
	pub fn request_next(&mut self, window: &Window) {
		if let Some(cb) = &self.animate {
			self.frame = window.request_animation_frame(cb.as_ref().unchecked_ref()).ok();
		}
	}

	/// Cancels the pending frame, removes the resize listener and drops both
	/// closures. Must not run from inside the frame callback.
	pub fn stop(&mut self, window: &Window) {
		if let Some(id) = self.frame.take() {
			let _ = window.cancel_animation_frame(id);
		}
		if let Some(cb) = self.resize.take() {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		if self.animate.take().is_some() {
			RUNNING.fetch_sub(1, Ordering::SeqCst);
		}
	}
}
