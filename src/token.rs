//! Typed claim set carried by verified access tokens.

// crates.io
use serde::{Deserialize, Serialize};
// self
use crate::_prelude::*;

/// The `aud` claim, which Auth0 emits either as a string or as a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
	/// Single audience string.
	Single(String),
	/// Multiple audiences, e.g. an API identifier plus the `/userinfo` endpoint.
	Multiple(Vec<String>),
}
impl Audience {
	/// Whether `expected` is one of the audiences.
	pub fn contains(&self, expected: &str) -> bool {
		match self {
			Self::Single(aud) => aud == expected,
			Self::Multiple(auds) => auds.iter().any(|aud| aud == expected),
		}
	}

	/// Iterate over every audience value.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		let values: &[String] = match self {
			Self::Single(aud) => std::slice::from_ref(aud),
			Self::Multiple(auds) => auds,
		};

		values.iter().map(String::as_str)
	}
}
impl From<&str> for Audience {
	fn from(value: &str) -> Self {
		Self::Single(value.to_owned())
	}
}

/// Standard claims of a verified access token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
	/// Issuer (`iss`).
	pub iss: String,
	/// Subject (`sub`).
	pub sub: String,
	/// Audience (`aud`).
	pub aud: Audience,
	/// Issued-at (`iat`), seconds since the Unix epoch.
	pub iat: i64,
	/// Expiration (`exp`), seconds since the Unix epoch.
	pub exp: i64,
}
impl TokenClaims {
	/// Issued-at as a UTC timestamp.
	pub fn issued_at(&self) -> Option<DateTime<Utc>> {
		DateTime::from_timestamp(self.iat, 0)
	}

	/// Expiration as a UTC timestamp.
	pub fn expires_at(&self) -> Option<DateTime<Utc>> {
		DateTime::from_timestamp(self.exp, 0)
	}

	/// Whether the token is expired at `now`.
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		self.exp <= now.timestamp()
	}
}
