//! Crate-wide error types and `Result` alias.

// crates.io
use axum::{
	Json,
	response::{IntoResponse, Response},
};
use http::StatusCode;
use jsonwebtoken::errors::ErrorKind;

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the Auth0 toolkit.
#[allow(missing_docs)]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Jsonwebtoken(#[from] jsonwebtoken::errors::Error),
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	Serde(#[from] serde_json::Error),
	#[error(transparent)]
	Toml(#[from] toml::de::Error),
	#[error(transparent)]
	Url(#[from] url::ParseError),

	#[error("Unauthenticated: {0}")]
	Unauthenticated(#[from] AuthError),
	#[error("Upstream HTTP status {status} from {url}: {body:?}")]
	HttpStatus { status: StatusCode, url: url::Url, body: Option<String> },
	#[error("Security violation: {0}")]
	Security(String),
	#[error("Validation failed for {field}: {reason}")]
	Validation { field: &'static str, reason: String },
}
impl Error {
	/// Whether the error belongs to the "unauthenticated" category.
	pub fn is_unauthenticated(&self) -> bool {
		matches!(self, Self::Unauthenticated(_))
	}

	/// Upstream status code carried by [`Error::HttpStatus`].
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			Self::HttpStatus { status, .. } => Some(*status),
			Self::Reqwest(err) => err.status(),
			_ => None,
		}
	}

	/// Status code used when the error is rendered as an HTTP response.
	pub fn status_code(&self) -> StatusCode {
		match self {
			Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
			Self::HttpStatus { .. } | Self::Reqwest(_) => StatusCode::BAD_GATEWAY,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}
impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status_code();
		let reason = match &self {
			Self::Unauthenticated(auth) => auth.reason().to_owned(),
			_ => self.to_string(),
		};

		(status, Json(serde_json::json!({ "error": reason }))).into_response()
	}
}

/// Sub-reasons collapsed into [`Error::Unauthenticated`].
///
/// Callers only need to tell valid from invalid; the variant is kept for logging.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	/// No bearer token was presented.
	#[error("missing bearer token")]
	MissingToken,
	/// The token could not be parsed.
	#[error("malformed token: {0}")]
	Malformed(String),
	/// The signature did not verify against the configured key.
	#[error("invalid signature")]
	InvalidSignature,
	/// The `exp` claim is not in the future.
	#[error("token expired")]
	Expired,
	/// The `aud` claim does not contain the configured audience.
	#[error("audience mismatch")]
	InvalidAudience,
	/// The `iss` claim does not match the configured issuer.
	#[error("issuer mismatch")]
	InvalidIssuer,
	/// No configured key matches the token header.
	#[error("no signing key for kid {0:?}")]
	UnknownKey(Option<String>),
	/// Any other verification failure reported by `jsonwebtoken`.
	#[error("token rejected: {0}")]
	Rejected(String),
}
impl AuthError {
	/// Human-readable reason returned to HTTP clients.
	pub fn reason(&self) -> &'static str {
		match self {
			Self::MissingToken => "You're not authenticated.",
			Self::Expired => "Token has expired.",
			Self::InvalidAudience => "Token audience is not accepted.",
			Self::InvalidIssuer => "Token issuer is not accepted.",
			_ => "Token is invalid.",
		}
	}
}
impl From<jsonwebtoken::errors::Error> for AuthError {
	fn from(err: jsonwebtoken::errors::Error) -> Self {
		match err.kind() {
			ErrorKind::ExpiredSignature => Self::Expired,
			ErrorKind::InvalidAudience => Self::InvalidAudience,
			ErrorKind::InvalidIssuer => Self::InvalidIssuer,
			ErrorKind::InvalidSignature => Self::InvalidSignature,
			ErrorKind::InvalidToken
			| ErrorKind::Base64(_)
			| ErrorKind::Json(_)
			| ErrorKind::MissingRequiredClaim(_) => Self::Malformed(err.to_string()),
			_ => Self::Rejected(err.to_string()),
		}
	}
}
