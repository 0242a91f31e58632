//! Tenant façade tying the verifier, the middleware, and the Management API together.

// crates.io
use reqwest::Client;
// self
use crate::{
	_prelude::*,
	config::{Config, ManagementConfig},
	management::{ClientSecret, ManagementClient, ManagementClientBuilder},
	middleware::AuthLayer,
	token::TokenClaims,
	verifier::TokenVerifier,
};

/// Entry point for a single tenant.
///
/// Holds the shared HTTP client so every management client handed out reuses its connection
/// pool.
#[derive(Clone, Debug)]
pub struct Auth0 {
	http: Client,
	verifier: Arc<TokenVerifier>,
}
impl Auth0 {
	/// Build a façade around `verifier` with a default HTTP client.
	pub fn new(verifier: TokenVerifier) -> Result<Self> {
		let http = Client::builder()
			.user_agent(format!("auth0-kit/{}", env!("CARGO_PKG_VERSION")))
			.connect_timeout(Duration::from_secs(5))
			.build()?;

		Ok(Self::with_http_client(verifier, http))
	}

	/// Build a façade reusing an existing HTTP client.
	pub fn with_http_client(verifier: TokenVerifier, http: Client) -> Self {
		Self { http, verifier: Arc::new(verifier) }
	}

	/// Build the verifier described by `config`.
	pub fn from_config(config: &Config) -> Result<Self> {
		config.validate()?;

		let verifier = TokenVerifier::new(
			&config.issuer,
			config.audience.clone(),
			config.algorithm,
			&config.signing_key,
		)?
		.with_leeway(config.leeway());

		Self::new(verifier)
	}

	/// Shared verifier.
	pub fn verifier(&self) -> Arc<TokenVerifier> {
		self.verifier.clone()
	}

	/// Verify an access token.
	pub fn verify_token(&self, token: &str) -> Result<TokenClaims> {
		self.verifier.verify(token)
	}

	/// Middleware layer backed by this tenant's verifier.
	pub fn layer(&self, requires_authentication: bool) -> AuthLayer {
		AuthLayer::new(self.verifier.clone(), requires_authentication)
	}

	/// Start a Management API client for this tenant.
	pub fn management(
		&self,
		client_id: impl Into<String>,
		client_secret: impl Into<ClientSecret>,
	) -> ManagementClientBuilder {
		ManagementClient::builder(self.verifier.issuer().as_str(), client_id, client_secret)
			.http_client(self.http.clone())
	}

	/// Build a Management API client from a configuration section.
	pub fn management_from_config(&self, config: &ManagementConfig) -> Result<ManagementClient> {
		config.validate()?;

		let mut builder = self
			.management(config.client_id.clone(), config.client_secret.clone())
			.timeout(config.timeout())
			.with_token_cache(config.cache_token)
			.with_require_https(config.require_https);

		if let Some(api) = &config.api {
			builder = builder.management_api(api.clone());
		}

		builder.build()
	}
}
