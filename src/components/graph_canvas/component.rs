use leptos::html::Canvas;
use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, MouseEvent, WheelEvent, Window};

use super::host::CanvasHost;
use super::render;
use super::state::CanvasState;
use crate::graph::{Graph, LayoutName, Overlay};

type HostCell = StoredValue<Option<CanvasHost<CanvasState>>, LocalStorage>;

fn with_state(host: HostCell, f: impl FnOnce(&mut CanvasState)) {
	host.try_update_value(|h| {
		if let Some(state) = h.as_mut().and_then(|h| h.renderer_mut()) {
			f(state);
		}
	});
}

fn pointer_position(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn viewport_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

/// Canvas that shows a graph, its overlay and the selected layout.
#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<Graph>,
	#[prop(into)] overlay: Signal<Overlay>,
	#[prop(into)] layout: Signal<LayoutName>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let host: HostCell = StoredValue::new_local(None);
	let animate = StoredValue::new_local(None::<Closure<dyn FnMut()>>);
	let resize_cb = StoredValue::new_local(None::<Closure<dyn FnMut()>>);
	let frame = StoredValue::new(None::<i32>);
	let ready = RwSignal::new(false);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if host.with_value(Option::is_some) {
			return;
		}
		let Some(window) = web_sys::window() else {
			warn!("No window, graph canvas disabled");
			return;
		};

		let (w, h) = if fullscreen {
			viewport_size(&window)
		} else {
			let parent = |f: fn(&web_sys::Element) -> i32, fallback| {
				canvas
					.parent_element()
					.map(|p| f(&p) as f64)
					.unwrap_or(fallback)
			};
			(
				width.unwrap_or_else(|| parent(web_sys::Element::client_width, 800.0)),
				height.unwrap_or_else(|| parent(web_sys::Element::client_height, 600.0)),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("2D context unavailable, graph canvas disabled");
			return;
		};

		host.set_value(Some(CanvasHost::new(
			CanvasState::new(w, h),
			data.get_untracked(),
			overlay.get_untracked(),
			layout.get_untracked(),
		)));
		info!("Graph canvas ready ({w}x{h})");

		if fullscreen {
			let canvas_resize = canvas.clone();
			resize_cb.set_value(Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				with_state(host, |s| s.resize(nw, nh));
			})));
			resize_cb.with_value(|cb| {
				if let Some(cb) = cb {
					let _ =
						window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			});
		}

		animate.set_value(Some(Closure::new(move || {
			with_state(host, |s| {
				s.tick(0.016);
				render::render(s, &ctx);
			});
			let next = animate
				.try_with_value(|cb| {
					let cb = cb.as_ref()?;
					web_sys::window()?
						.request_animation_frame(cb.as_ref().unchecked_ref())
						.ok()
				})
				.flatten();
			frame.try_update_value(|f| *f = next);
		})));
		let first = animate.with_value(|cb| {
			cb.as_ref().and_then(|cb| {
				window
					.request_animation_frame(cb.as_ref().unchecked_ref())
					.ok()
			})
		});
		frame.set_value(first);
		ready.set(true);
	});

	// Three independent reactions: graph, overlay, layout.
	Effect::new(move |_| {
		if !ready.get() {
			return;
		}
		let graph = data.get();
		host.update_value(|h| {
			if let Some(h) = h {
				h.set_graph(graph);
			}
		});
	});

	Effect::new(move |_| {
		if !ready.get() {
			return;
		}
		let overlay = overlay.get();
		host.update_value(|h| {
			if let Some(h) = h {
				h.set_overlay(overlay);
			}
		});
	});

	Effect::new(move |_| {
		if !ready.get() {
			return;
		}
		let layout = layout.get();
		host.update_value(|h| {
			if let Some(h) = h {
				h.set_layout(layout);
			}
		});
	});

	on_cleanup(move || {
		let window = web_sys::window();
		if let (Some(Some(id)), Some(win)) = (frame.try_get_value(), window.as_ref()) {
			let _ = win.cancel_animation_frame(id);
		}
		if let (Some(Some(cb)), Some(win)) = (resize_cb.try_update_value(Option::take), window.as_ref())
		{
			let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		host.try_update_value(|h| {
			if let Some(mut h) = h.take() {
				h.destroy();
			}
		});
		let _ = animate.try_update_value(Option::take);
	});

	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		with_state(host, |s| match s.node_at_position(x, y) {
			Some(id) => s.begin_drag(id, x, y),
			None => s.begin_pan(x, y),
		});
	};

	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		with_state(host, |s| s.pointer_moved(x, y));
	};

	let on_mouseup = move |_: MouseEvent| with_state(host, CanvasState::end_pointer);
	let on_mouseleave = move |_: MouseEvent| with_state(host, CanvasState::end_pointer);

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let zoom_in = ev.delta_y() < 0.0;
		with_state(host, |s| s.zoom_at(x, y, zoom_in));
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
