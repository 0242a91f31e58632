//! TOML configuration for the verifier and the Management API client.
//!
//! ```toml
//! issuer = "https://tenant.auth0.com/"
//! audience = "https://api.example.com"
//! algorithm = "RS256"
//!
//! [signing_key]
//! kind = "rsa_pem"
//! pem = """
//! -----BEGIN PUBLIC KEY-----
//! ...
//! -----END PUBLIC KEY-----
//! """
//!
//! [management]
//! client_id = "m2m-client"
//! client_secret = "m2m-secret"
//! cache_token = true
//! ```

// std
use std::path::Path;
// crates.io
use jsonwebtoken::Algorithm;
use serde::Deserialize;
// self
use crate::{
	_prelude::*,
	management::{ClientSecret, DEFAULT_TIMEOUT},
	verifier::SigningKey,
};

/// Root configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	/// Tenant issuer URL, e.g. `https://tenant.auth0.com/`.
	pub issuer: String,
	/// Audience (API identifier) that access tokens must carry.
	pub audience: String,
	/// Signature algorithm accepted by the verifier.
	#[serde(default = "default_algorithm")]
	pub algorithm: Algorithm,
	/// Key used to check signatures.
	pub signing_key: SigningKey,
	/// Clock skew tolerated when checking `exp`, in seconds.
	#[serde(default)]
	pub leeway_secs: u64,
	/// Management API client settings.
	#[serde(default)]
	pub management: Option<ManagementConfig>,
}
impl Config {
	/// Load and validate configuration from a TOML file.
	pub fn load<P>(path: P) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let content = std::fs::read_to_string(path)?;

		Self::from_toml_str(&content)
	}

	/// Parse and validate configuration from TOML text.
	pub fn from_toml_str(content: &str) -> Result<Self> {
		let config: Self = toml::from_str(content)?;

		config.validate()?;

		Ok(config)
	}

	/// Validate the configuration against the documented constraints.
	pub fn validate(&self) -> Result<()> {
		if self.issuer.trim().is_empty() {
			return Err(Error::Validation { field: "issuer", reason: "Must not be empty.".into() });
		}
		if self.audience.trim().is_empty() {
			return Err(Error::Validation { field: "audience", reason: "Must not be empty.".into() });
		}
		if let Some(management) = &self.management {
			management.validate()?;
		}

		Ok(())
	}

	/// Configured leeway as a [`Duration`].
	pub fn leeway(&self) -> Duration {
		Duration::from_secs(self.leeway_secs)
	}
}

/// Management API client settings.
#[derive(Clone, Debug, Deserialize)]
pub struct ManagementConfig {
	/// Machine-to-machine client identifier.
	pub client_id: String,
	/// Machine-to-machine client secret.
	pub client_secret: ClientSecret,
	/// Explicit Management API base; defaults to `{issuer}api/v2/`.
	#[serde(default)]
	pub api: Option<String>,
	/// Per-request timeout in seconds.
	#[serde(default = "default_timeout_secs")]
	pub timeout_secs: u64,
	/// Cache the access token across calls.
	#[serde(default)]
	pub cache_token: bool,
	/// Require HTTPS for the issuer and Management API URLs.
	#[serde(default = "default_true")]
	pub require_https: bool,
}
impl ManagementConfig {
	/// Validate the management section.
	pub fn validate(&self) -> Result<()> {
		if self.client_id.trim().is_empty() {
			return Err(Error::Validation {
				field: "management.client_id",
				reason: "Must not be empty.".into(),
			});
		}
		if self.client_secret.expose().is_empty() {
			return Err(Error::Validation {
				field: "management.client_secret",
				reason: "Must not be empty.".into(),
			});
		}
		if self.timeout_secs == 0 {
			return Err(Error::Validation {
				field: "management.timeout_secs",
				reason: "Must be greater than zero.".into(),
			});
		}

		Ok(())
	}

	/// Configured timeout as a [`Duration`].
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

fn default_algorithm() -> Algorithm {
	Algorithm::RS256
}

fn default_timeout_secs() -> u64 {
	DEFAULT_TIMEOUT.as_secs()
}

fn default_true() -> bool {
	true
}
