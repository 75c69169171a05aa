use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::mind_map::MindMapCanvas;

/// The editor page. `?rootTitle=` names the root idea.
#[component]
pub fn MindMapPage() -> impl IntoView {
	let query = use_query_map();
	// Memoised so the root is only retitled when the parameter really changes.
	let root_title = Memo::new(move |_| query.with(|q| q.get("rootTitle")));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-map">
				<MindMapCanvas root_title=root_title fullscreen=true />
				<div class="map-overlay">
					<h1>"Your Mind Map"</h1>
				</div>
				<div class="map-panel">"Click \"Add Child Node\" to create connected nodes"</div>
			</div>
		</ErrorBoundary>
	}
}
