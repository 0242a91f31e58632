//! Request execution shared by every Management API call.

// crates.io
use reqwest::{RequestBuilder, Response};
use url::Url;
// self
use crate::_prelude::*;

/// Fixed per-request timeout applied to Management API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Send `builder` bounded by `timeout` and assert a 2xx status.
///
/// Non-2xx responses become [`Error::HttpStatus`] with the response body attached.
pub(crate) async fn execute(
	builder: RequestBuilder,
	url: &Url,
	timeout: Duration,
	operation: &'static str,
) -> Result<Response> {
	let start = Instant::now();
	let response = builder.timeout(timeout).send().await?;
	let elapsed = start.elapsed();
	let status = response.status();

	#[cfg(feature = "metrics")]
	crate::metrics::record_management_request(operation, status, elapsed);

	if !status.is_success() {
		let body = response.text().await.ok();

		tracing::debug!(operation, status = %status, elapsed = ?elapsed, "management request failed");

		return Err(Error::HttpStatus { status, url: url.clone(), body });
	}

	tracing::debug!(operation, status = %status, elapsed = ?elapsed, "management request complete");

	Ok(response)
}
