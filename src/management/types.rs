//! Management API resources and wire payloads.
//!
//! Field names match the API's snake_case JSON, so payloads serialise without renaming.

// std
use std::fmt::{Debug, Formatter, Result as FmtResult};
// crates.io
use serde::{Deserialize, Deserializer, Serialize};
// self
use crate::_prelude::*;

/// Role resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
	/// Role identifier (`rol_…`).
	pub id: String,
	/// Role name.
	pub name: String,
	/// Role description; `null` upstream decodes as an empty string.
	#[serde(default, deserialize_with = "nullable_string")]
	pub description: String,
}

/// Scope exposed by an API (resource server).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
	/// Scope value, e.g. `read:reports`.
	pub value: String,
	/// Scope description.
	pub description: String,
}
impl Scope {
	/// Create a scope.
	pub fn new(value: impl Into<String>, description: impl Into<String>) -> Self {
		Self { value: value.into(), description: description.into() }
	}
}

/// Permission granted to a role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
	/// Identifier (audience) of the API the permission belongs to.
	pub resource_server_identifier: String,
	/// Scope value granted by the permission.
	pub permission_name: String,
}
impl Permission {
	/// Create a permission.
	pub fn new(
		resource_server_identifier: impl Into<String>,
		permission_name: impl Into<String>,
	) -> Self {
		Self {
			resource_server_identifier: resource_server_identifier.into(),
			permission_name: permission_name.into(),
		}
	}
}

/// Client secret that never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);
impl ClientSecret {
	/// Wrap a secret.
	pub fn new(secret: impl Into<String>) -> Self {
		Self(secret.into())
	}

	/// Raw secret value.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for ClientSecret {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str("ClientSecret(..)")
	}
}
impl From<&str> for ClientSecret {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for ClientSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
	pub grant_type: &'static str,
	pub client_id: &'a str,
	pub client_secret: &'a str,
	pub audience: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
	pub access_token: String,
	#[serde(default)]
	pub expires_in: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRole<'a> {
	pub name: &'a str,
	pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScopesPatch<'a> {
	pub scopes: &'a [Scope],
}

#[derive(Debug, Serialize)]
pub(crate) struct PermissionsBody<'a> {
	pub permissions: &'a [Permission],
}

#[derive(Debug, Deserialize)]
struct RolesPage {
	roles: Vec<Role>,
}

/// Decode a roles listing that is either a bare array or a `{"roles": [...]}` page.
///
/// The page decode error is surfaced when neither shape matches.
pub(crate) fn decode_roles(bytes: &[u8]) -> Result<Vec<Role>> {
	match serde_json::from_slice::<Vec<Role>>(bytes) {
		Ok(roles) => Ok(roles),
		Err(err) => {
			tracing::debug!(error = %err, "roles response is not a bare array; trying paged shape");

			Ok(serde_json::from_slice::<RolesPage>(bytes)?.roles)
		},
	}
}

fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
