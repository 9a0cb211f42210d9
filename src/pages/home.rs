use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::ApiClient;
use crate::components::graph_scene::GraphScene;
use crate::components::node_panel::NodePanel;
use crate::components::search_panel::SearchPanel;
use crate::graph::{GraphData, load_graph};
use crate::interaction::{RequestTracker, retain_focus};

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph = RwSignal::new(GraphData::default());
	let loading = RwSignal::new(true);
	let notice = RwSignal::new(Option::<String>::None);
	let focus = RwSignal::new(Option::<String>::None);
	let tracker = RequestTracker::new();

	// Only the latest refresh lands.
	let reload = Callback::new(move |_: ()| {
		let tracker = tracker.clone();
		let token = tracker.issue();
		loading.set(true);
		spawn_local(async move {
			let fetched = match ApiClient::from_env() {
				Ok(client) => client.fetch_graph().await,
				Err(e) => Err(e),
			};
			if !tracker.is_current(token) {
				return;
			}
			let load = load_graph(fetched, &mut rand::thread_rng());
			notice.set(load.notice.map(|n| n.to_string()));
			focus.update(|f| *f = retain_focus(f.take(), &load.data.nodes));
			graph.set(load.data);
			loading.set(false);
		});
	});
	reload.run(());

	let on_select = Callback::new(move |id: String| focus.set(Some(id)));

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

			<div class="fullscreen-graph">
				<GraphScene data=graph focus=focus on_select=on_select />
				<div class="graph-overlay">
					<h1>"Company Graph"</h1>
					<p class="subtitle">"Drag to orbit. Scroll to zoom. Click a company to focus it."</p>
					<SearchPanel graph=graph focus=focus />
					<Show when=move || loading.get()>
						<p class="status">"Loading graph..."</p>
					</Show>
					{move || notice.get().map(|n| view! { <p class="notice">{n}</p> })}
					<button on:click=move |_| reload.run(()) disabled=move || loading.get()>
						"Refresh"
					</button>
				</div>
				<NodePanel graph=graph focus=focus />
			</div>
		</ErrorBoundary>
	}
}
