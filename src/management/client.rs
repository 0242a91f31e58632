//! Management API client authenticating through the client-credentials grant.

// crates.io
use reqwest::{Client, Method, Response};
use serde::Serialize;
use url::Url;
// self
use crate::{
	_prelude::*,
	endpoint,
	management::{
		request::{self, DEFAULT_TIMEOUT},
		token_cache::TokenCache,
		types::{
			ClientSecret, CreateRole, Permission, PermissionsBody, Role, Scope, ScopesPatch,
			TokenRequest, TokenResponse,
		},
	},
};

/// Grant type sent to the token endpoint.
const GRANT_TYPE: &str = "client_credentials";

/// Machine-to-machine credentials for the Management API.
#[derive(Clone, Debug)]
pub struct ManagementCredentials {
	/// Client identifier of the machine-to-machine application.
	pub client_id: String,
	/// Client secret of the machine-to-machine application.
	pub client_secret: ClientSecret,
	/// Management API base URL, also used as the grant audience.
	pub api: Url,
}

/// Builder for [`ManagementClient`].
#[derive(Debug)]
pub struct ManagementClientBuilder {
	issuer: String,
	client_id: String,
	client_secret: ClientSecret,
	management_api: Option<String>,
	http: Option<Client>,
	timeout: Duration,
	cache_token: bool,
	require_https: bool,
}
impl ManagementClientBuilder {
	/// Start a builder for the tenant at `issuer`.
	pub fn new(
		issuer: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<ClientSecret>,
	) -> Self {
		Self {
			issuer: issuer.into(),
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			management_api: None,
			http: None,
			timeout: DEFAULT_TIMEOUT,
			cache_token: false,
			require_https: true,
		}
	}

	/// Use an explicit Management API base instead of `{issuer}api/v2/`.
	pub fn management_api(mut self, api: impl Into<String>) -> Self {
		self.management_api = Some(api.into());

		self
	}

	/// Reuse an existing HTTP client.
	pub fn http_client(mut self, client: Client) -> Self {
		self.http = Some(client);

		self
	}

	/// Override the per-request timeout.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Cache the access token across calls until shortly before it expires.
	///
	/// Disabled by default: every operation performs its own grant.
	pub fn with_token_cache(mut self, enabled: bool) -> Self {
		self.cache_token = enabled;

		self
	}

	/// Set the HTTPS requirement for the issuer and Management API URLs (enabled by default).
	pub fn with_require_https(mut self, require_https: bool) -> Self {
		self.require_https = require_https;

		self
	}

	/// Validate the configuration and construct the client.
	pub fn build(self) -> Result<ManagementClient> {
		let issuer = endpoint::normalize_base_url(&self.issuer)?;
		let api = match &self.management_api {
			Some(api) => endpoint::normalize_base_url(api)?,
			None => endpoint::management_api_from_issuer(&issuer)?,
		};

		if self.require_https {
			endpoint::enforce_https(&issuer)?;
			endpoint::enforce_https(&api)?;
		}
		if self.client_id.is_empty() {
			return Err(Error::Validation { field: "client_id", reason: "Must not be empty.".into() });
		}
		if self.timeout.is_zero() {
			return Err(Error::Validation {
				field: "timeout",
				reason: "Must be greater than zero.".into(),
			});
		}

		let http = match self.http {
			Some(client) => client,
			None => Client::builder()
				.user_agent(format!("auth0-kit/{}", env!("CARGO_PKG_VERSION")))
				.connect_timeout(Duration::from_secs(5))
				.build()?,
		};

		Ok(ManagementClient {
			http,
			token_url: issuer.join("oauth/token")?,
			credentials: Arc::new(ManagementCredentials {
				client_id: self.client_id,
				client_secret: self.client_secret,
				api,
			}),
			timeout: self.timeout,
			token_cache: self.cache_token.then(|| Arc::new(TokenCache::default())),
		})
	}
}

/// Façade over the Management API.
///
/// Each operation obtains an access token first; with the opt-in cache the token is shared
/// between calls until it nears expiry.
#[derive(Clone, Debug)]
pub struct ManagementClient {
	http: Client,
	token_url: Url,
	credentials: Arc<ManagementCredentials>,
	timeout: Duration,
	token_cache: Option<Arc<TokenCache>>,
}
impl ManagementClient {
	/// Create a [`ManagementClientBuilder`].
	pub fn builder(
		issuer: impl Into<String>,
		client_id: impl Into<String>,
		client_secret: impl Into<ClientSecret>,
	) -> ManagementClientBuilder {
		ManagementClientBuilder::new(issuer, client_id, client_secret)
	}

	/// Credentials and Management API base in use.
	pub fn credentials(&self) -> &ManagementCredentials {
		&self.credentials
	}

	/// Management API base URL, always ending with `/`.
	pub fn api(&self) -> &Url {
		&self.credentials.api
	}

	/// Obtain an access token for the Management API via the client-credentials grant.
	#[tracing::instrument(skip(self), fields(client_id = %self.credentials.client_id))]
	pub async fn get_token(&self) -> Result<String> {
		match &self.token_cache {
			Some(cache) => cache.get_or_fetch(|| self.request_token()).await,
			None => Ok(self.request_token().await?.access_token),
		}
	}

	/// Delete the user identified by `id`.
	#[tracing::instrument(skip(self), fields(client_id = %self.credentials.client_id))]
	pub async fn delete_user(&self, id: &str) -> Result<()> {
		let url = endpoint::with_path_segments(self.api(), &["users", id])?;

		self.send(Method::DELETE, url, None::<&()>, "delete_user").await?;

		Ok(())
	}

	/// Create a role.
	#[tracing::instrument(skip(self), fields(client_id = %self.credentials.client_id))]
	pub async fn create_role(&self, name: &str, description: &str) -> Result<Role> {
		let url = endpoint::with_path_segments(self.api(), &["roles"])?;
		let body = CreateRole { name, description };
		let response = self.send(Method::POST, url, Some(&body), "create_role").await?;

		Ok(response.json().await?)
	}

	/// List roles.
	///
	/// Accepts both a bare array and a paged `{"roles": [...]}` response.
	#[tracing::instrument(skip(self), fields(client_id = %self.credentials.client_id))]
	pub async fn get_roles(&self) -> Result<Vec<Role>> {
		let url = endpoint::with_path_segments(self.api(), &["roles"])?;
		let response = self.send(Method::GET, url, None::<&()>, "get_roles").await?;
		let bytes = response.bytes().await?;

		crate::management::types::decode_roles(&bytes)
	}

	/// Add `scopes` to the API (resource server) identified by `api_id`.
	#[tracing::instrument(skip(self, scopes), fields(client_id = %self.credentials.client_id, count = scopes.len()))]
	pub async fn add_scopes(&self, scopes: &[Scope], api_id: &str) -> Result<()> {
		let url = endpoint::with_path_segments(self.api(), &["resource-servers", api_id])?;

		self.send(Method::PATCH, url, Some(&ScopesPatch { scopes }), "add_scopes").await?;

		Ok(())
	}

	/// Grant `permissions` to the role identified by `role_id`.
	#[tracing::instrument(skip(self, permissions), fields(client_id = %self.credentials.client_id, count = permissions.len()))]
	pub async fn add_permissions(&self, permissions: &[Permission], role_id: &str) -> Result<()> {
		let url = endpoint::with_path_segments(self.api(), &["roles", role_id, "permissions"])?;
		let body = PermissionsBody { permissions };

		self.send(Method::POST, url, Some(&body), "add_permissions").await?;

		Ok(())
	}

	async fn request_token(&self) -> Result<TokenResponse> {
		let credentials = &self.credentials;
		let body = TokenRequest {
			grant_type: GRANT_TYPE,
			client_id: &credentials.client_id,
			client_secret: credentials.client_secret.expose(),
			audience: credentials.api.as_str(),
		};
		let builder = self.http.post(self.token_url.clone()).json(&body);
		let response = request::execute(builder, &self.token_url, self.timeout, "get_token").await?;

		Ok(response.json().await?)
	}

	async fn send<B>(
		&self,
		method: Method,
		url: Url,
		body: Option<&B>,
		operation: &'static str,
	) -> Result<Response>
	where
		B: Serialize + ?Sized,
	{
		let token = self.get_token().await?;
		let mut builder = self.http.request(method, url.clone()).bearer_auth(token);

		if let Some(body) = body {
			builder = builder.json(body);
		}

		request::execute(builder, &url, self.timeout, operation).await
	}
}
