//! Client for the graph backend.
//!
//! Uses web-sys fetch on wasm32 and reqwest elsewhere. Every call is a single
//! attempt; callers decide what to fall back to.

use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{ApiError, Result};
use crate::interaction::search::SearchResponse;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Node detail as returned by `GET /api/nodes/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NodeDetail {
	pub id: String,
	#[serde(default)]
	pub data: Map<String, Value>,
}

impl NodeDetail {
	pub fn label(&self) -> Option<&str> {
		self.data.get("label").and_then(Value::as_str)
	}

	pub fn description(&self) -> Option<&str> {
		self.data
			.get("description")
			.and_then(Value::as_str)
			.filter(|d| !d.trim().is_empty())
	}
}

#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: Url,
}

impl ApiClient {
	/// The base may carry a path prefix; endpoints resolve below it.
	pub fn new(base_url: &str) -> Result<Self> {
		let mut base_url = Url::parse(base_url)?;
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());
			base_url.set_path(&path);
		}
		Ok(Self { base_url })
	}

	/// Client for the base URL baked in at build time via
	/// `GRAPH_API_BASE_URL`.
	pub fn from_env() -> Result<Self> {
		Self::new(option_env!("GRAPH_API_BASE_URL").unwrap_or(DEFAULT_BASE_URL))
	}

	pub fn graph_url(&self) -> Result<Url> {
		Ok(self.base_url.join("api/nodes")?)
	}

	pub fn node_url(&self, id: &str) -> Result<Url> {
		let mut url = self.base_url.join("api/nodes/")?;
		url.path_segments_mut()
			.map_err(|_| ApiError::Request(format!("{} cannot carry a path", self.base_url)))?
			.pop_if_empty()
			.push(id);
		Ok(url)
	}

	pub fn search_url(&self, query: &str, limit: usize) -> Result<Url> {
		let mut url = self.base_url.join("api/search")?;
		url.query_pairs_mut()
			.append_pair("query", query)
			.append_pair("limit", &limit.to_string());
		Ok(url)
	}

	/// Raw `{ nodes, edges }` payload, left untyped for hydration.
	pub async fn fetch_graph(&self) -> Result<Value> {
		self.get_json(self.graph_url()?).await
	}

	pub async fn fetch_node_detail(&self, id: &str) -> Result<NodeDetail> {
		let raw = self.get_json(self.node_url(id)?).await?;
		Ok(serde_json::from_value(raw)?)
	}

	pub async fn search(&self, query: &str, limit: usize) -> Result<SearchResponse> {
		let raw = self.get_json(self.search_url(query, limit)?).await?;
		Ok(serde_json::from_value(raw)?)
	}

	#[cfg(target_arch = "wasm32")]
	async fn get_json(&self, url: Url) -> Result<Value> {
		use wasm_bindgen::{JsCast, JsValue};
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{Request, RequestCache, RequestInit, RequestMode, Response};

		let js_err = |e: JsValue| ApiError::Request(format!("{e:?}"));

		let opts = RequestInit::new();
		opts.set_method("GET");
		opts.set_mode(RequestMode::Cors);
		opts.set_cache(RequestCache::NoStore);
		let request = Request::new_with_str_and_init(url.as_str(), &opts).map_err(js_err)?;

		let window = web_sys::window().ok_or_else(|| ApiError::Request("no window".into()))?;
		let resp: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(js_err)?
			.dyn_into()
			.map_err(|_| ApiError::Request("fetch did not yield a Response".into()))?;

		if !resp.ok() {
			return Err(ApiError::Status(resp.status()));
		}

		let text = JsFuture::from(resp.text().map_err(js_err)?)
			.await
			.map_err(js_err)?
			.as_string()
			.unwrap_or_default();
		Ok(serde_json::from_str(&text)?)
	}

	#[cfg(not(target_arch = "wasm32"))]
	async fn get_json(&self, url: Url) -> Result<Value> {
		let response = reqwest::get(url)
			.await
			.map_err(|e| ApiError::Request(e.to_string()))?;

		if !response.status().is_success() {
			return Err(ApiError::Status(response.status().as_u16()));
		}

		response
			.json::<Value>()
			.await
			.map_err(|e| ApiError::Request(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn builds_endpoint_urls() {
		let client = ApiClient::new("http://localhost:8000").unwrap();
		assert_eq!(client.graph_url().unwrap().as_str(), "http://localhost:8000/api/nodes");
		assert_eq!(
			client.node_url("acme/co 1").unwrap().as_str(),
			"http://localhost:8000/api/nodes/acme%2Fco%201"
		);
		assert_eq!(
			client.search_url("tesla & co", 5).unwrap().as_str(),
			"http://localhost:8000/api/search?query=tesla+%26+co&limit=5"
		);
	}

	#[test]
	fn keeps_base_path_prefix() {
		for base in ["https://host/graph", "https://host/graph/"] {
			let client = ApiClient::new(base).unwrap();
			assert_eq!(client.graph_url().unwrap().as_str(), "https://host/graph/api/nodes");
			assert_eq!(client.node_url("x").unwrap().as_str(), "https://host/graph/api/nodes/x");
			assert_eq!(
				client.search_url("a", 1).unwrap().as_str(),
				"https://host/graph/api/search?query=a&limit=1"
			);
		}
	}

	#[test]
	fn rejects_bad_base_url() {
		assert!(matches!(ApiClient::new("not a url"), Err(ApiError::Url(_))));
	}

	#[test]
	fn node_detail_accessors() {
		let detail: NodeDetail = serde_json::from_value(json!({
			"id": "n1",
			"data": {"label": "Acme", "description": " ", "sector": "AI"}
		}))
		.unwrap();
		assert_eq!(detail.label(), Some("Acme"));
		assert_eq!(detail.description(), None);

		let bare: NodeDetail = serde_json::from_value(json!({"id": "n2"})).unwrap();
		assert!(bare.data.is_empty());
	}
}
