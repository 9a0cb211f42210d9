use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;
use serde_json::Value;

use crate::api::{ApiClient, NodeDetail};
use crate::graph::{GraphData, Node};
use crate::interaction::debounce::RequestTracker;

/// What the panel shows: the hydrated node, overlaid with whatever the
/// detail endpoint added.
#[derive(Clone, Debug, PartialEq)]
struct PanelContent {
	id: String,
	label: String,
	description: String,
	/// Every other data attribute, sorted by key.
	attributes: Vec<(String, String)>,
}

fn display_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

impl PanelContent {
	fn new(node: &Node, detail: Option<&NodeDetail>) -> Self {
		let mut attributes: BTreeMap<&str, &Value> = node
			.data
			.attributes
			.iter()
			.map(|(k, v)| (k.as_str(), v))
			.collect();
		if let Some(d) = detail {
			attributes.extend(d.data.iter().map(|(k, v)| (k.as_str(), v)));
		}
		Self {
			id: node.id.clone(),
			label: detail
				.and_then(NodeDetail::label)
				.filter(|l| !l.trim().is_empty())
				.unwrap_or(node.display_label())
				.to_owned(),
			description: detail
				.and_then(NodeDetail::description)
				.unwrap_or(&node.data.description)
				.to_owned(),
			attributes: attributes
				.into_iter()
				.filter(|(k, v)| !matches!(*k, "label" | "description") && !v.is_null())
				.map(|(k, v)| (k.to_owned(), display_value(v)))
				.collect(),
		}
	}
}

/// Details for the focused node. Hidden when nothing is focused.
#[component]
pub fn NodePanel(
	#[prop(into)] graph: Signal<GraphData>,
	focus: RwSignal<Option<String>>,
) -> impl IntoView {
	let detail = RwSignal::new(Option::<NodeDetail>::None);
	let tracker = RequestTracker::new();
	let client = ApiClient::from_env().ok();

	Effect::new(move |_| {
		let id = focus.get();
		let token = tracker.issue();
		detail.set(None);
		let (Some(id), Some(client)) = (id, client.clone()) else {
			return;
		};
		let tracker = tracker.clone();
		spawn_local(async move {
			match client.fetch_node_detail(&id).await {
				Ok(d) if tracker.is_current(token) => detail.set(Some(d)),
				Ok(_) => {}
				Err(e) => debug!("no detail for {id}: {e}"),
			}
		});
	});

	let content = Memo::new(move |_| {
		let id = focus.get()?;
		graph.with(|g| {
			let node = g.node(&id)?;
			detail.with(|d| Some(PanelContent::new(node, d.as_ref().filter(|d| d.id == node.id))))
		})
	});

	view! {
		{move || {
			content
				.get()
				.map(|c| {
					view! {
						<aside class="node-panel">
							<h2>{c.label}</h2>
							<span class="node-id">"ID: " {c.id}</span>
							<p class="node-description">{c.description}</p>
							<h3>"Node Information"</h3>
							<ul class="node-info">
								{c
									.attributes
									.into_iter()
									.map(|(key, value)| view! { <li><strong>{key} ":"</strong> " " {value}</li> })
									.collect_view()}
							</ul>
							<button on:click=move |_| focus.set(None)>"Close"</button>
						</aside>
					}
				})
		}}
	}
}
