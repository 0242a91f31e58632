//! URL helpers for issuer and Management API endpoints.
//!
//! Every base URL handled by this crate ends with exactly one `/`, so relative paths such as
//! `oauth/token` or `roles` can be joined without dropping the last path segment.

// crates.io
use url::Url;
// self
use crate::_prelude::*;

/// Path appended to the issuer when no explicit Management API base is configured.
pub const MANAGEMENT_API_PATH: &str = "api/v2/";

/// Parse a base URL and enforce a single trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return Err(Error::Validation { field: "base_url", reason: "Must not be empty.".into() });
	}

	let url = Url::parse(&format!("{}/", trimmed.trim_end_matches('/')))?;

	if url.cannot_be_a_base() {
		return Err(Error::Validation {
			field: "base_url",
			reason: format!("{url} cannot be used as a base URL."),
		});
	}

	Ok(url)
}

/// Derive the Management API base (`{issuer}api/v2/`) from an issuer URL.
pub fn management_api_from_issuer(issuer: &Url) -> Result<Url> {
	let issuer = normalize_base_url(issuer.as_str())?;

	Ok(issuer.join(MANAGEMENT_API_PATH)?)
}

/// Ensure the provided URL uses HTTPS.
pub fn enforce_https(url: &Url) -> Result<()> {
	if url.scheme() == "https" {
		Ok(())
	} else {
		Err(Error::Security(format!("Upstream URL {url} must use HTTPS.")))
	}
}

/// Append path segments to `base`, percent-encoding each one.
///
/// When `base` cannot carry path segments the raw segments are appended to its text and the
/// result is parsed as-is, without percent-encoding.
pub fn with_path_segments(base: &Url, segments: &[&str]) -> Result<Url> {
	let mut url = base.clone();

	match url.path_segments_mut() {
		Ok(mut path) => {
			path.pop_if_empty().extend(segments);
		},
		Err(()) => {
			tracing::debug!(base = %base, "base URL rejects path segments; appending raw identifiers");

			let separator = if base.as_str().ends_with('/') { "" } else { "/" };

			return Ok(Url::parse(&format!("{base}{separator}{}", segments.join("/")))?);
		},
	}

	Ok(url)
}
