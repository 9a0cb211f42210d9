use std::fmt;

use log::{info, warn};
use rand::Rng;
use serde_json::Value;

use super::hydrate::hydrate;
use super::sample::{SAMPLE_NODE_COUNT, generate_sample_graph};
use super::types::GraphData;
use crate::error::ApiError;
use crate::layout::layout;

/// Why the sample dataset is on screen instead of fetched data.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadNotice {
	/// The fetch failed outright.
	Unavailable(String),
	/// The payload hydrated to zero nodes or zero edges.
	Empty,
}

impl fmt::Display for LoadNotice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LoadNotice::Unavailable(reason) => {
				write!(f, "API did not return graph data ({reason}). Showing sample dataset.")
			}
			LoadNotice::Empty => f.write_str("Graph data was empty. Showing sample dataset."),
		}
	}
}

#[derive(Clone, Debug)]
pub struct GraphLoad {
	pub data: GraphData,
	pub notice: Option<LoadNotice>,
}

/// Turns a fetch result into something drawable. Failures and insufficient
/// graphs fall through to the sample dataset immediately; nothing is retried.
pub fn load_graph<R: Rng + ?Sized>(fetched: Result<Value, ApiError>, rng: &mut R) -> GraphLoad {
	let notice = match fetched {
		Ok(raw) => {
			let hydrated = hydrate(&raw, rng);
			if !hydrated.is_insufficient() {
				let nodes = layout(&hydrated.nodes, &hydrated.edges, None);
				info!("loaded graph: {} nodes, {} edges", nodes.len(), hydrated.edges.len());
				return GraphLoad {
					data: GraphData {
						nodes,
						edges: hydrated.edges,
					},
					notice: None,
				};
			}
			LoadNotice::Empty
		}
		Err(err) => LoadNotice::Unavailable(err.to_string()),
	};

	warn!("{notice}");
	GraphLoad {
		data: generate_sample_graph(SAMPLE_NODE_COUNT, rng),
		notice: Some(notice),
	}
}
