use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::frame_loop::FrameLoop;
use super::render;
use super::state::SceneState;
use crate::graph::GraphData;

/// Upper bound on one frame step, in seconds.
const MAX_FRAME_DT: f64 = 0.1;

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback| v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback);
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

/// Full-window 3D view of a graph snapshot.
///
/// Every new snapshot reframes the camera from its current direction; a new
/// `focus` id moves in on that node. Drag to orbit, scroll to zoom, click a
/// node to select it.
#[component]
pub fn GraphScene(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] focus: Signal<Option<String>>,
	#[prop(into)] on_select: Callback<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<SceneState>>> = Rc::new(RefCell::new(None));
	let frame_loop = StoredValue::new_local(FrameLoop::default());
	let state_init = state.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = window_size(&window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				warn!("2d canvas context unavailable");
				return;
			}
		};
		let mut scene = SceneState::new(&data.get_untracked(), w, h);
		if let Some(id) = focus.get_untracked() {
			scene.focus(&id);
		}
		*state_init.borrow_mut() = Some(scene);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		let resize = Closure::<dyn FnMut()>::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = window_size(&win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		});

		let state_anim = state_init.clone();
		let mut last_frame = js_sys::Date::now();
		let animate = Closure::<dyn FnMut()>::new(move || {
			let now = js_sys::Date::now();
			let dt = ((now - last_frame) / 1000.0).clamp(0.0, MAX_FRAME_DT);
			last_frame = now;
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(dt);
				render::render(s, &ctx);
			}
			if let Some(win) = web_sys::window() {
				frame_loop.try_update_value(|l| l.request_next(&win));
			}
		});

		frame_loop.update_value(|l| l.start(&window, animate, resize));
	});

	on_cleanup(move || {
		if let Some(window) = web_sys::window() {
			frame_loop.try_update_value(|l| l.stop(&window));
		}
	});

	// The init effect reads the first snapshot itself.
	let state_data = state.clone();
	Effect::new(move |prev: Option<()>| {
		let snapshot = data.get();
		if prev.is_none() {
			return;
		}
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.set_graph(&snapshot);
		}
	});

	let state_focus = state.clone();
	Effect::new(move |_| {
		let target = focus.get();
		if let Some(ref mut s) = *state_focus.borrow_mut() {
			match target {
				Some(id) => {
					if !s.focus(&id) {
						warn!("focus target {id} is not in the graph");
					}
				}
				None => s.clear_focus(),
			}
		}
	});

	let local_point = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
		let rect = canvas.get_bounding_client_rect();
		Some((ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top()))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.begin_drag(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
			} else {
				let hovered = s.node_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		// Release the borrow before the callback re-enters through `focus`.
		let clicked = state_mu.borrow_mut().as_mut().and_then(|s| {
			let idx = s.end_drag(x, y)?;
			s.node_id(idx).map(str::to_owned)
		});
		if let Some(id) = clicked {
			on_select.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel_drag();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(ev.delta_y());
		}
	};

	let state_dbl = state.clone();
	let on_dblclick = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_dbl.borrow_mut() {
			s.fit();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-scene-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:dblclick=on_dblclick
			style="display: block; cursor: grab;"
		/>
	}
}
