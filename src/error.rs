use thiserror::Error;

/// Failures talking to the graph API. None of these are fatal: callers fall
/// back to sample data or empty results and show the message.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("invalid API url: {0}")]
	Url(#[from] url::ParseError),

	#[error("request failed: {0}")]
	Request(String),

	#[error("HTTP {0}")]
	Status(u16),

	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
