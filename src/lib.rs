//! Auth0 access-token verification, request middleware, and a Management API client for async
//! Rust services.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod endpoint;
pub mod management;
#[cfg(feature = "metrics")] pub mod metrics;
pub mod middleware;
pub mod token;
pub mod verifier;

mod auth0;
mod error;
mod _prelude {
	pub use std::{sync::Arc, time::Duration};

	pub use chrono::{DateTime, Utc};
	pub use tokio::time::Instant;

	pub use crate::{Error, Result};
}

pub use jsonwebtoken::Algorithm;

#[cfg(feature = "prometheus")]
pub use crate::metrics::{install_default_exporter, prometheus_handle};
pub use crate::{
	auth0::Auth0,
	config::{Config, ManagementConfig},
	error::{AuthError, Error, Result},
	management::{
		ClientSecret, ManagementClient, ManagementClientBuilder, ManagementCredentials, Permission,
		Role, Scope,
	},
	middleware::{AuthLayer, AuthService, RequestTokenExt, RequireToken, extract_bearer_token},
	token::{Audience, TokenClaims},
	verifier::{SigningKey, TokenVerifier},
};
