use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, FocusEvent, HtmlCanvasElement, HtmlElement, IntersectionObserver,
	IntersectionObserverEntry, KeyboardEvent, MouseEvent,
};

use super::config::GraphConfig;
use super::render;
use super::state::{OrbitGraphState, connect_headline};
use super::types::{AttendeeNode, NetworkData, OpportunityMatch, RelationshipEdge};

const RESIZE_DEBOUNCE_MS: i32 = 100;
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);
/// Longest frame step fed to the animation, in seconds.
const MAX_FRAME_DT: f64 = 0.1;

type Shared<T> = Rc<RefCell<Option<T>>>;

fn shared<T>() -> Shared<T> {
	Rc::new(RefCell::new(None))
}

fn measure(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (f64::from(p.client_width()), f64::from(p.client_height())))
		.filter(|(w, h)| *w > 0.0 && *h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		f64::from(ev.client_x()) - rect.left(),
		f64::from(ev.client_y()) - rect.top(),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

/// Orbital network graph drawn on a canvas.
///
/// The layout is recomputed when the inputs change or the viewport crosses
/// the mobile breakpoint. Animation pauses while the canvas is off screen.
/// Tab and the arrow keys move focus between attendees; Enter or Space opens
/// the focused one through `on_node_click`.
#[component]
pub fn OrbitGraphCanvas(
	/// People placed on the rings, closest connections first.
	#[prop(into)]
	attendees: Signal<Vec<AttendeeNode>>,
	/// Edges from the current user; their strength weights each node.
	#[prop(into, optional)]
	relationships: Signal<Vec<RelationshipEdge>>,
	/// Suggested matches, highlighted on the rings.
	#[prop(into, optional)]
	opportunities: Signal<Vec<OpportunityMatch>>,
	/// Dims the graph and shows the loading overlay.
	#[prop(into, optional)]
	is_loading: Signal<bool>,
	/// Replaces the graph with an error overlay.
	#[prop(into, optional)]
	error: Signal<Option<String>>,
	/// Shown as a Retry button on the error overlay.
	#[prop(optional)]
	on_retry: Option<Callback<()>>,
	/// Called with the attendee picked by pointer, keyboard or match card.
	#[prop(optional)]
	on_node_click: Option<Callback<AttendeeNode>>,
	/// Shows the top match suggestion in the centre.
	#[prop(optional)]
	matchmaking_enabled: bool,
	/// Size of the whole network for the headline; defaults to the attendee count.
	#[prop(into, optional)]
	total_count: Signal<Option<usize>>,
	/// Geometry and animation tuning.
	#[prop(optional)]
	config: GraphConfig,
) -> impl IntoView {
	let config = match config.validate() {
		Ok(()) => config,
		Err(err) => {
			warn!("invalid graph config ({err}), using defaults");
			GraphConfig::default()
		}
	};

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let status = RwSignal::new(String::new());
	let label = RwSignal::new(String::new());
	let state: Shared<OrbitGraphState> = shared();
	let animate: Shared<Closure<dyn FnMut(f64)>> = shared();
	let resize_cb: Shared<Closure<dyn FnMut()>> = shared();
	let apply_resize: Shared<Closure<dyn FnMut()>> = shared();
	let visibility_cb: Shared<Closure<dyn FnMut(js_sys::Array)>> = shared();
	let observer: Shared<IntersectionObserver> = shared();
	let pending_resize: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

	let state_init = state.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			error!("orbit graph: 2d canvas context unavailable");
			return;
		};

		let (w, h) = measure(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let data = NetworkData {
			attendees: attendees.get_untracked(),
			relationships: relationships.get_untracked(),
			opportunities: opportunities.get_untracked(),
		};
		let mut initial = OrbitGraphState::new(config.clone(), data, w, h);
		initial.set_status(
			is_loading.get_untracked(),
			error.with_untracked(Option::is_some),
		);
		status.set(initial.status_message());
		label.set(initial.aria_label());
		debug!("orbit graph mounted at {w}x{h} ({:?})", initial.viewport());
		*state_init.borrow_mut() = Some(initial);

		// Resize is applied after the window has been quiet for a moment.
		let (state_resize, canvas_resize, pending) =
			(state_init.clone(), canvas.clone(), pending_resize.clone());
		*apply_resize.borrow_mut() = Some(Closure::new(move || {
			pending.set(None);
			let (nw, nh) = measure(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.set_viewport(nw, nh);
				status.set(s.status_message());
			}
		}));
		let (apply_inner, pending) = (apply_resize.clone(), pending_resize.clone());
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			if let Some(handle) = pending.take() {
				win.clear_timeout_with_handle(handle);
			}
			if let Some(ref cb) = *apply_inner.borrow() {
				pending.set(
					win.set_timeout_with_callback_and_timeout_and_arguments_0(
						cb.as_ref().unchecked_ref(),
						RESIZE_DEBOUNCE_MS,
					)
					.ok(),
				);
			}
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let state_visible = state_init.clone();
		*visibility_cb.borrow_mut() = Some(Closure::new(move |entries: js_sys::Array| {
			let visible = entries
				.iter()
				.filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
				.last()
				.map(|entry| entry.is_intersecting());
			if let (Some(visible), Some(s)) = (visible, state_visible.borrow_mut().as_mut()) {
				s.set_visible(visible);
			}
		}));
		if let Some(ref cb) = *visibility_cb.borrow() {
			match IntersectionObserver::new(cb.as_ref().unchecked_ref()) {
				Ok(obs) => {
					obs.observe(&canvas);
					*observer.borrow_mut() = Some(obs);
				}
				Err(err) => warn!("orbit graph: no IntersectionObserver ({err:?})"),
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate.clone());
		let (resize_teardown, observer_teardown) = (resize_cb.clone(), observer.clone());
		let (apply_teardown, visibility_teardown) = (apply_resize.clone(), visibility_cb.clone());
		let pending_teardown = pending_resize.clone();
		let mut last_frame: Option<f64> = None;
		*animate.borrow_mut() = Some(Closure::new(move |now: f64| {
			let Some(win) = web_sys::window() else {
				return;
			};
			if !canvas.is_connected() {
				debug!("orbit graph detached, stopping animation");
				if let Some(cb) = resize_teardown.borrow_mut().take() {
					let _ =
						win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				if let Some(handle) = pending_teardown.take() {
					win.clear_timeout_with_handle(handle);
				}
				if let Some(obs) = observer_teardown.borrow_mut().take() {
					obs.disconnect();
				}
				let _ = apply_teardown.borrow_mut().take();
				let _ = visibility_teardown.borrow_mut().take();
				// Releases this closure once the current frame returns.
				let _ = animate_inner.borrow_mut().take();
				return;
			}
			let dt = last_frame.map_or(0.0, |prev| ((now - prev) / 1000.0).clamp(0.0, MAX_FRAME_DT));
			last_frame = Some(now);
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(dt);
					render::render(s, &ctx);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_data = state.clone();
	Effect::new(move |_| {
		let data = NetworkData {
			attendees: attendees.get(),
			relationships: relationships.get(),
			opportunities: opportunities.get(),
		};
		let (loading, failed) = (is_loading.get(), error.with(Option::is_some));
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.set_data(data);
			s.set_status(loading, failed);
			status.set(s.status_message());
			label.set(s.aria_label());
		}
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = local_point(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let cursor = s.hover_at(x, y);
			let _ = HtmlElement::style(&canvas).set_property("cursor", cursor);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.set_hover(None);
		}
	};

	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = local_point(&canvas, &ev);
		let clicked = state_click
			.borrow()
			.as_ref()
			.and_then(|s| s.node_at_position(x, y))
			.and_then(|n| n.attendee.clone());
		if let (Some(attendee), Some(cb)) = (clicked, on_node_click) {
			cb.run(attendee);
		}
	};

	let state_key = state.clone();
	let on_keydown = move |ev: KeyboardEvent| {
		let mut activated = None;
		let handled = {
			let mut guard = state_key.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let handled = match ev.key().as_str() {
				// Tab past the last attendee leaves the canvas.
				"Tab" => s.move_focus(!ev.shift_key(), false),
				"ArrowRight" | "ArrowDown" => s.move_focus(true, true),
				"ArrowLeft" | "ArrowUp" => s.move_focus(false, true),
				"Enter" | " " => {
					activated = s.focused_attendee().cloned();
					activated.is_some()
				}
				"Escape" => {
					let had_focus = s.focus.is_some();
					s.clear_focus();
					had_focus
				}
				_ => false,
			};
			label.set(s.aria_label());
			handled
		};
		if handled {
			ev.prevent_default();
		}
		if let (Some(attendee), Some(cb)) = (activated, on_node_click) {
			cb.run(attendee);
		}
	};

	let state_blur = state.clone();
	let on_blur = move |_: FocusEvent| {
		if let Some(ref mut s) = *state_blur.borrow_mut() {
			s.clear_focus();
			label.set(s.aria_label());
		}
	};

	let headline = move || {
		if error.with(Option::is_some) {
			return None;
		}
		let total = total_count.get().unwrap_or_else(|| attendees.with(Vec::len));
		opportunities
			.with(|ops| connect_headline(matchmaking_enabled, ops, total))
			.map(|text| {
				view! {
					<h3 class="orbit-graph-headline">{text}</h3>
					<p class="orbit-graph-subline">"Attendees"</p>
				}
			})
	};

	let callout = move || {
		if !matchmaking_enabled || error.with(Option::is_some) {
			return None;
		}
		let Some(top) = opportunities.with(|ops| ops.first().cloned()) else {
			return Some(view! { <div class="orbit-graph-match-pill">"AI Match"</div> }.into_any());
		};
		let candidate = attendees.with(|list| top.candidate_in(list));
		Some(
			view! {
				<div class="orbit-graph-match" style="pointer-events: auto;">
					<p class="orbit-graph-match-name">{top.display_name.clone()}</p>
					<p class="orbit-graph-match-score">{format!("{}% match", top.score_percent())}</p>
					<p class="orbit-graph-match-reason">{top.reason.clone()}</p>
					<button on:click=move |_| {
						if let Some(cb) = on_node_click {
							cb.run(candidate.clone());
						}
					}>"Connect"</button>
				</div>
			}
				.into_any(),
		)
	};

	view! {
		<div class="orbit-graph" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="orbit-graph-canvas"
				role="application"
				tabindex="0"
				aria-label=move || label.get()
				aria-busy=move || is_loading.get().to_string()
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
				on:keydown=on_keydown
				on:blur=on_blur
				style="display: block;"
			/>
			<div
				class="orbit-graph-center"
				style="position: absolute; inset: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; pointer-events: none;"
			>
				{callout}
				{headline}
			</div>
			<Show when=move || is_loading.get()>
				<div class="orbit-graph-overlay">"Loading network..."</div>
			</Show>
			{move || {
				error
					.get()
					.map(|message| {
						view! {
							<div class="orbit-graph-overlay orbit-graph-error" role="alert">
								<p>{message}</p>
								{on_retry
									.map(|cb| {
										view! { <button on:click=move |_| cb.run(())>"Retry"</button> }
									})}
							</div>
						}
					})
			}}
			<p class="sr-only" aria-live="polite">
				{move || status.get()}
			</p>
		</div>
	}
}
