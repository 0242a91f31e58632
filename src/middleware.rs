//! Tower middleware that verifies bearer tokens and exposes the claims to handlers.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth0_kit::{middleware::{AuthLayer, RequireToken}, TokenVerifier};
//! use axum::{Router, routing::get};
//!
//! async fn me(RequireToken(claims): RequireToken) -> String {
//!     claims.sub
//! }
//!
//! let app = Router::new().route("/me", get(me)).layer(AuthLayer::new(verifier, false));
//! ```

// std
use std::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
};
// crates.io
use axum::{
	extract::FromRequestParts,
	response::{IntoResponse, Response},
};
use http::{Extensions, HeaderMap, Request, header::AUTHORIZATION, request::Parts};
use tower::{Layer, Service};
// self
use crate::{_prelude::*, error::AuthError, token::TokenClaims, verifier::TokenVerifier};

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively; other schemes yield `None`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
	let (scheme, token) = value.split_once(' ')?;

	scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

/// Typed access to the claims attached by [`AuthLayer`].
pub trait RequestTokenExt {
	/// Claims attached to the request, if any.
	fn token(&self) -> Option<&TokenClaims>;

	/// Claims attached to the request, or an unauthenticated error.
	fn require_token(&self) -> Result<&TokenClaims> {
		self.token().ok_or_else(|| AuthError::MissingToken.into())
	}
}
impl RequestTokenExt for Extensions {
	fn token(&self) -> Option<&TokenClaims> {
		self.get::<TokenClaims>()
	}
}
impl RequestTokenExt for Parts {
	fn token(&self) -> Option<&TokenClaims> {
		self.extensions.token()
	}
}
impl<B> RequestTokenExt for Request<B> {
	fn token(&self) -> Option<&TokenClaims> {
		self.extensions().token()
	}
}

/// Axum extractor that rejects requests without verified claims.
#[derive(Clone, Debug)]
pub struct RequireToken(pub TokenClaims);
impl<S> FromRequestParts<S> for RequireToken
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
		parts.require_token().cloned().map(Self)
	}
}

/// Layer installing [`AuthService`].
#[derive(Clone, Debug)]
pub struct AuthLayer {
	verifier: Arc<TokenVerifier>,
	requires_authentication: bool,
}
impl AuthLayer {
	/// Create a layer; when `requires_authentication` is set, requests without a bearer token
	/// are rejected before reaching the inner service.
	pub fn new(verifier: Arc<TokenVerifier>, requires_authentication: bool) -> Self {
		Self { verifier, requires_authentication }
	}
}
impl<S> Layer<S> for AuthLayer {
	type Service = AuthService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		AuthService {
			inner,
			verifier: self.verifier.clone(),
			requires_authentication: self.requires_authentication,
		}
	}
}

/// Service verifying bearer tokens before delegating to the inner service.
#[derive(Clone, Debug)]
pub struct AuthService<S> {
	inner: S,
	verifier: Arc<TokenVerifier>,
	requires_authentication: bool,
}
impl<S> AuthService<S> {
	fn authenticate<B>(&self, request: &mut Request<B>) -> Result<()> {
		match extract_bearer_token(request.headers()) {
			Some(token) => {
				let claims = self.verifier.verify(token)?;

				request.extensions_mut().insert(claims);
			},
			None if self.requires_authentication => {
				return Err(AuthError::MissingToken.into());
			},
			None => {},
		}

		Ok(())
	}
}
impl<S, B> Service<Request<B>> for AuthService<S>
where
	S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
	S::Future: Send + 'static,
	B: Send + 'static,
{
	type Error = S::Error;
	type Future = Pin<Box<dyn Future<Output = std::result::Result<Response, S::Error>> + Send>>;
	type Response = Response;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, mut request: Request<B>) -> Self::Future {
		if let Err(err) = self.authenticate(&mut request) {
			tracing::warn!(
				method = %request.method(),
				uri = %request.uri(),
				error = %err,
				"request rejected by auth middleware"
			);

			return Box::pin(async move { Ok(err.into_response()) });
		}

		// The clone may not be ready; keep the driven instance for this call.
		let clone = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, clone);

		Box::pin(async move { inner.call(request).await })
	}
}
