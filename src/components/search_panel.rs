//! Search box with local matches and debounced lookups against the backend.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;

use crate::api::ApiClient;
use crate::graph::GraphData;
use crate::interaction::debounce::{self, RequestTracker, SEARCH_DEBOUNCE};
use crate::interaction::search::{
	FocusSelection, MAX_LOCAL_MATCHES, REMOTE_LIMIT, SearchHit, match_nodes, remote_suggestions,
	resolve_submission, select_hit, settle_search,
};

#[component]
pub fn SearchPanel(
	#[prop(into)] graph: Signal<GraphData>,
	focus: RwSignal<Option<String>>,
) -> impl IntoView {
	let query = RwSignal::new(String::new());
	let remote = RwSignal::new(Vec::<SearchHit>::new());
	let tracker = RequestTracker::new();
	let client = ApiClient::from_env().ok();

	let apply = move |selection: FocusSelection| {
		query.set(selection.label);
		focus.set(Some(selection.node_id));
	};

	let local_hits = Memo::new(move |_| {
		let q = query.get();
		graph.with(|g| {
			match_nodes(&g.nodes, &q, MAX_LOCAL_MATCHES)
				.into_iter()
				.map(FocusSelection::for_node)
				.collect::<Vec<_>>()
		})
	});

	let remote_hits = Memo::new(move |_| {
		let local = local_hits.get();
		remote.with(|hits| graph.with(|g| remote_suggestions(&g.nodes, &local, hits)))
	});
	let no_matches = move || {
		!query.with(|q| q.trim().is_empty())
			&& local_hits.with(Vec::is_empty)
			&& remote_hits.with(Vec::is_empty)
	};

	let tracker_input = tracker.clone();
	let on_input = move |ev: leptos::ev::Event| {
		let text = event_target_value(&ev);
		query.set(text.clone());
		if text.trim().is_empty() {
			tracker_input.cancel();
			remote.set(Vec::new());
			focus.set(None);
			return;
		}
		let Some(client) = client.clone() else {
			return;
		};
		let tracker = tracker_input.clone();
		let token = tracker.issue();
		spawn_local(async move {
			debounce::wait(SEARCH_DEBOUNCE).await;
			if !tracker.is_current(token) {
				return;
			}
			let result = client.search(text.trim(), REMOTE_LIMIT).await;
			if let Err(e) = &result {
				debug!("search for {:?} failed: {e}", text.trim());
			}
			if let Some(hits) = settle_search(tracker.is_current(token), result) {
				remote.set(hits);
			}
		});
	};

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let selection = graph.with_untracked(|g| resolve_submission(&g.nodes, &query.get_untracked()));
		if let Some(selection) = selection {
			apply(selection);
		}
	};

	view! {
		<div class="search-panel">
			<form on:submit=on_submit>
				<input
					type="search"
					placeholder="Search companies..."
					prop:value=move || query.get()
					on:input=on_input
				/>
			</form>
			<Show when=move || !local_hits.get().is_empty()>
				<ul class="search-results">
					<For
						each=move || local_hits.get()
						key=|hit| hit.node_id.clone()
						children=move |hit| {
							let label = hit.label.clone();
							let id = hit.node_id.clone();
							view! {
								<li>
									<button on:click=move |_| apply(hit.clone())>
										<span class="search-label">{label}</span>
										<span class="search-id">{id}</span>
									</button>
								</li>
							}
						}
					/>
				</ul>
			</Show>
			<Show when=no_matches>
				<p class="search-empty">"No companies match that search."</p>
			</Show>
			<Show when=move || !remote_hits.with(Vec::is_empty)>
				<p class="search-heading">"From the index"</p>
				<ul class="search-results remote">
					<For
						each=move || remote_hits.get()
						key=|hit| hit.id.clone()
						children=move |hit| {
							let on_pick = {
								let hit = hit.clone();
								move |_| {
									if let Some(selection) = graph.with_untracked(|g| select_hit(&g.nodes, &hit)) {
										apply(selection);
									}
								}
							};
							view! {
								<li>
									<button on:click=on_pick>
										<span class="search-label">{hit.label.clone()}</span>
										<span class="search-id">{hit.sector.clone().unwrap_or_default()}</span>
									</button>
								</li>
							}
						}
					/>
				</ul>
			</Show>
		</div>
	}
}
