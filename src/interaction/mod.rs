pub mod debounce;
pub mod search;

pub use debounce::{RequestTracker, SEARCH_DEBOUNCE};
pub use search::{
	FocusSelection, SearchHit, SearchResponse, match_nodes, remote_suggestions, resolve_submission,
	retain_focus, select_hit, settle_search,
};
