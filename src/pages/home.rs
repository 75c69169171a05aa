use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use log::info;

/// Landing page: name the central idea and open the editor.
#[component]
pub fn Home() -> impl IntoView {
	let (idea, set_idea) = signal(String::new());
	let navigate = use_navigate();

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		let title = idea.get_untracked();
		if title.trim().is_empty() {
			return;
		}
		let encoded = String::from(js_sys::encode_uri_component(&title));
		info!("Opening mind map for {title:?}");
		navigate(&format!("/mindmaps?rootTitle={encoded}"), Default::default());
	};

	view! {
		<div class="hero">
			<h1>"Map out your ideas"</h1>
			<p class="subtitle">"Start with one thought and grow it into a connected map."</p>
			<form on:submit=on_submit>
				<input
					type="text"
					placeholder="What's on your mind?"
					prop:value=idea
					on:input=move |ev| set_idea.set(event_target_value(&ev))
				/>
				<button type="submit" disabled=move || idea.with(|t| t.trim().is_empty())>
					"Generate"
				</button>
			</form>
		</div>
	}
}
