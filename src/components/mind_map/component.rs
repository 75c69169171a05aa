use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window};

use super::controller::{MindMapController, Phase, TextPatch};
use super::render;
use super::state::{CanvasState, ConnectDrag, PanState, ViewTransform};
use super::types::{
	Connection, DEFAULT_ROOT_TITLE, MindMapNode, NodeId, SOURCE_HANDLE, TARGET_HANDLE,
};

fn node_element_id(id: &str) -> String {
	format!("mind-map-node-{id}")
}

/// Remove the window resize listener and drop its closure.
fn detach_resize(resize_cb: &RefCell<Option<Closure<dyn FnMut()>>>) {
	let Some(cb) = resize_cb.borrow_mut().take() else {
		return;
	};
	if let Some(window) = web_sys::window() {
		let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
	debug!("Resize listener detached");
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
		window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
	)
}

/// Re-measure node cards so edge anchors follow their real size.
/// Cards that are not mounted yet keep their previous geometry.
fn measure_nodes(state: &RefCell<CanvasState>, ids: &[NodeId]) {
	let Some(document) = web_sys::window().and_then(|w| w.document()) else {
		return;
	};
	let mut state = state.borrow_mut();
	for id in ids {
		if let Some(el) = document.get_element_by_id(&node_element_id(id)) {
			// client sizes are layout sizes, unaffected by the zoom transform
			state
				.geometry
				.set(id, el.client_width() as f64, el.client_height() as f64);
		}
	}
}

#[component]
pub fn MindMapCanvas(
	#[prop(into)] root_title: Signal<Option<String>>,
	#[prop(default = true)] fullscreen: bool,
) -> impl IntoView {
	let mut initial = MindMapController::new(DEFAULT_ROOT_TITLE);
	if let Err(e) = initial.sync_root_title(root_title.get_untracked().as_deref()) {
		warn!("Root title not applied: {e}");
	}
	let controller = RwSignal::new(initial);
	let transform = RwSignal::new(ViewTransform::default());
	let connecting = RwSignal::new(None::<ConnectDrag>);
	let selected = RwSignal::new(None::<NodeId>);

	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let title_ref = NodeRef::<leptos::html::Input>::new();

	let state: Rc<RefCell<CanvasState>> = Rc::new(RefCell::new(CanvasState::default()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	// The root follows the entry parameter whenever it changes; local edits in between survive.
	Effect::new(move |_| {
		let title = root_title.get();
		let changed = controller
			.try_update_untracked(|c| match c.sync_root_title(title.as_deref()) {
				Ok(changed) => changed,
				Err(e) => {
					warn!("Root title not applied: {e}");
					false
				}
			})
			.unwrap_or(false);
		if changed {
			controller.notify();
		}
	});

	// Post-mutation reconciliation: focus the dialog and re-measure touched nodes.
	let state_reconcile = state.clone();
	Effect::new(move |_| {
		controller.track();
		let (ids, focus) = controller
			.try_update_untracked(|c| (c.take_reconciliation(), c.take_focus_request()))
			.unwrap_or_default();
		if focus {
			request_animation_frame(move || {
				if let Some(input) = title_ref.get_untracked() {
					let _ = input.focus();
				}
			});
		}
		if !ids.is_empty() {
			let state = state_reconcile.clone();
			request_animation_frame(move || measure_nodes(&state, &ids));
		}
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas;
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.unwrap_or((800.0, 600.0))
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("2d canvas context unavailable");
			return;
		};
		state_init.borrow_mut().resize(w, h);

		let ids: Vec<NodeId> =
			controller.with_untracked(|c| c.model().nodes().map(|n| n.id.clone()).collect());
		let state_measure = state_init.clone();
		request_animation_frame(move || measure_nodes(&state_measure, &ids));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				state_resize.borrow_mut().resize(nw, nh);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, resize_teardown) =
			(state_init.clone(), animate_init.clone(), resize_cb_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// Signals are gone once the component unmounts; stop the loop then.
			let (Some(t), Some(drag)) = (transform.try_get_untracked(), connecting.try_get_untracked())
			else {
				detach_resize(&resize_teardown);
				return;
			};
			let synced = controller.try_with_untracked(|c| {
				let mut s = state_anim.borrow_mut();
				s.tick(0.016);
				if s.sync_scene(c.model().revision(), || c.snapshot()) {
					debug!(
						"Scene refreshed at revision {} ({} nodes)",
						c.model().revision(),
						s.scene.nodes.len()
					);
				}
			});
			if synced.is_none() {
				detach_resize(&resize_teardown);
				return;
			}
			render::render(&state_anim.borrow(), &t, drag.as_ref(), &ctx);
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let local_point = move |ev: &MouseEvent| -> Option<(f64, f64)> {
		let el = container_ref.get_untracked()?;
		let rect = el.get_bounding_client_rect();
		Some((
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		))
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		let t = transform.get_untracked();
		state_md.borrow_mut().pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: t.x,
			transform_start_y: t.y,
		};
		selected.set(None);
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		if connecting.with_untracked(Option::is_some) {
			let cursor = transform.get_untracked().screen_to_graph(x, y);
			connecting.update_untracked(|c| {
				if let Some(drag) = c {
					drag.cursor = Some(cursor);
				}
			});
			return;
		}
		let pan = state_mm.borrow().pan.clone();
		if pan.active {
			transform.update(|t| {
				t.x = pan.transform_start_x + (x - pan.start_x);
				t.y = pan.transform_start_y + (y - pan.start_y);
			});
		}
	};

	// Handles see mouseup first; by the time it bubbles here any connect is done.
	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		state_mu.borrow_mut().pan.active = false;
		connecting.set(None);
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.borrow_mut().pan.active = false;
		connecting.set(None);
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(&ev) else {
			return;
		};
		transform.update(|t| *t = t.zoom_at(x, y, ev.delta_y()));
	};

	let on_add_child = Callback::new(move |id: NodeId| {
		controller.update(|c| {
			if let Err(e) = c.request_add_child(&id) {
				warn!("Cannot add child: {e}");
			}
		});
	});
	let on_select = Callback::new(move |id: NodeId| selected.set(Some(id)));
	let on_connect_start = Callback::new(move |id: NodeId| {
		connecting.set(Some(ConnectDrag {
			source: id,
			cursor: None,
		}));
	});
	let on_connect_end = Callback::new(move |target: NodeId| {
		let Some(drag) = connecting.get_untracked() else {
			return;
		};
		let conn = Connection::new(drag.source, target).with_handles(SOURCE_HANDLE, TARGET_HANDLE);
		controller.update(|c| match c.connect(conn) {
			Ok(id) => debug!("Connected {id}"),
			Err(e) => warn!("Connection refused: {e}"),
		});
	});
	let on_rename = Callback::new(move |id: NodeId| {
		let Some(current) =
			controller.with_untracked(|c| c.model().node(&id).map(|n| n.data.title.clone()))
		else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Ok(Some(title)) = window.prompt_with_message_and_default("Rename node", &current) {
			if title.trim().is_empty() {
				return;
			}
			let patch = TextPatch {
				title: Some(title),
				..Default::default()
			};
			controller.update(|c| {
				if let Err(e) = c.update_node(&id, patch) {
					warn!("Rename failed: {e}");
				}
			});
		}
	});

	let submit = move || {
		controller.update(|c| match c.submit() {
			Ok(id) => debug!("Created node {id}"),
			Err(e) => debug!("Submit blocked: {e}"),
		});
	};
	let cancel = move || controller.update(|c| c.cancel());

	view! {
		<div
			node_ref=container_ref
			class="mind-map"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="position: relative; width: 100%; height: 100%; overflow: hidden; cursor: grab;"
		>
			<canvas
				node_ref=canvas_ref
				class="mind-map-canvas"
				style="display: block; position: absolute; top: 0; left: 0;"
			/>
			<div
				class="mind-map-nodes"
				style=move || {
					let t = transform.get();
					format!(
						"position: absolute; top: 0; left: 0; transform-origin: 0 0; transform: translate({}px, {}px) scale({});",
						t.x,
						t.y,
						t.k,
					)
				}
			>
				<For
					each=move || controller.with(|c| c.snapshot().nodes)
					key=|n: &MindMapNode| (n.id.clone(), n.data.title.clone(), n.data.content.clone())
					children=move |node: MindMapNode| {
						let id = node.id.clone();
						let is_selected = Signal::derive(move || {
							selected.with(|s| s.as_deref() == Some(id.as_str()))
						});
						view! {
							<NodeCard
								node=node
								selected=is_selected
								on_add_child=on_add_child
								on_select=on_select
								on_connect_start=on_connect_start
								on_connect_end=on_connect_end
								on_rename=on_rename
							/>
						}
					}
				/>
			</div>
			<Show when=move || controller.with(|c| c.phase() == Phase::Composing)>
				<div
					class="mind-map-modal-backdrop"
					on:mousedown=|ev: MouseEvent| ev.stop_propagation()
					on:wheel=|ev: WheelEvent| ev.stop_propagation()
				>
					<div class="mind-map-modal">
						<h2>"Add New Node"</h2>
						<label>"Title"</label>
						<input
							node_ref=title_ref
							type="text"
							placeholder="Enter node title"
							prop:value=move || controller.with(|c| c.dialog().title_input.clone())
							on:input=move |ev| {
								let value = event_target_value(&ev);
								controller.update(|c| c.set_title_input(value));
							}
							on:keydown=move |ev: KeyboardEvent| match ev.key().as_str() {
								"Enter" => submit(),
								"Escape" => cancel(),
								_ => {}
							}
						/>
						<label>"Description"</label>
						<textarea
							placeholder="Enter node description"
							prop:value=move || controller.with(|c| c.dialog().content_input.clone())
							on:input=move |ev| {
								let value = event_target_value(&ev);
								controller.update(|c| c.set_content_input(value));
							}
						></textarea>
						<div class="mind-map-modal-actions">
							<button class="cancel" on:click=move |_| cancel()>
								"Cancel"
							</button>
							<button
								class="create"
								disabled=move || !controller.with(|c| c.dialog().can_submit())
								on:click=move |_| submit()
							>
								"Create Node"
							</button>
						</div>
					</div>
				</div>
			</Show>
		</div>
	}
}

/// One idea card: title, content, add-child trigger, inbound and outbound handles.
#[component]
fn NodeCard(
	node: MindMapNode,
	#[prop(into)] selected: Signal<bool>,
	on_add_child: Callback<NodeId>,
	on_select: Callback<NodeId>,
	on_connect_start: Callback<NodeId>,
	on_connect_end: Callback<NodeId>,
	on_rename: Callback<NodeId>,
) -> impl IntoView {
	let MindMapNode { id, data, position } = node;
	let (id_add, id_select, id_source, id_target, id_rename) =
		(id.clone(), id.clone(), id.clone(), id.clone(), id.clone());

	view! {
		<div
			id=node_element_id(&id)
			class="mind-map-node"
			class:selected=move || selected.get()
			style=format!("position: absolute; left: {}px; top: {}px;", position.x, position.y)
			on:mousedown=move |ev: MouseEvent| {
				ev.stop_propagation();
				on_select.run(id_select.clone());
			}
		>
			<div
				class="mind-map-handle target"
				on:mouseup=move |_: MouseEvent| on_connect_end.run(id_target.clone())
			/>
			<h1 class="mind-map-node-title" on:dblclick=move |_| on_rename.run(id_rename.clone())>
				{data.title}
			</h1>
			<div class="mind-map-node-content">{data.content}</div>
			<button class="mind-map-add-child" on:click=move |_| on_add_child.run(id_add.clone())>
				"+ Add Child Node"
			</button>
			<div
				class="mind-map-handle source"
				on:mousedown=move |ev: MouseEvent| {
					ev.stop_propagation();
					on_connect_start.run(id_source.clone());
				}
			/>
		</div>
	}
}
