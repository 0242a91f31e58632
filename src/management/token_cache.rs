//! Opt-in cache for the client-credentials access token.

// std
use std::future::Future;
// crates.io
use tokio::sync::Mutex;
// self
use crate::{_prelude::*, management::types::TokenResponse};

/// Lead time before `expires_in` elapses at which a cached token is replaced.
pub const DEFAULT_REFRESH_EARLY: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
struct CachedToken {
	access_token: String,
	refresh_at: Instant,
}

/// Holds at most one access token until shortly before it expires.
///
/// The lock is held across the upstream grant so concurrent callers share one request.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
	slot: Mutex<Option<CachedToken>>,
}
impl TokenCache {
	pub(crate) async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<String>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<TokenResponse>>,
	{
		let mut slot = self.slot.lock().await;

		if let Some(cached) = slot.as_ref()
			&& Instant::now() < cached.refresh_at
		{
			tracing::trace!("reusing cached management token");

			return Ok(cached.access_token.clone());
		}

		let fetched_at = Instant::now();
		let response = fetch().await?;

		*slot = response
			.expires_in
			.map(Duration::from_secs)
			.filter(|lifetime| *lifetime > DEFAULT_REFRESH_EARLY)
			.map(|lifetime| CachedToken {
				access_token: response.access_token.clone(),
				refresh_at: fetched_at + lifetime - DEFAULT_REFRESH_EARLY,
			});

		Ok(response.access_token)
	}
}
