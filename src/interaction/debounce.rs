//! Debounced requests with last-one-wins semantics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Hands out increasing tokens; only the most recent one is current.
///
/// A task captures its token when scheduled and checks it after every await.
/// Anything issued later invalidates it, so stale results are dropped.
#[derive(Clone, Debug, Default)]
pub struct RequestTracker {
	latest: Arc<AtomicU64>,
}

impl RequestTracker {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn issue(&self) -> u64 {
		self.latest.fetch_add(1, Ordering::SeqCst) + 1
	}

	pub fn is_current(&self, token: u64) -> bool {
		self.latest.load(Ordering::SeqCst) == token
	}

	/// Invalidates everything in flight without starting a new request.
	pub fn cancel(&self) {
		self.issue();
	}
}

/// Waits out the debounce window.
#[cfg(target_arch = "wasm32")]
pub async fn wait(delay: Duration) {
	gloo_timers::future::TimeoutFuture::new(delay.as_millis() as u32).await;
}

/// Native builds have no timer source; the window is skipped.
#[cfg(not(target_arch = "wasm32"))]
pub async fn wait(delay: Duration) {
	let _ = delay;
}
