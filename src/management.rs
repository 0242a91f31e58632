//! Client for the Management API (users, roles, scopes, and permissions).

pub mod client;
pub mod types;

mod request;
mod token_cache;

pub use client::{ManagementClient, ManagementClientBuilder, ManagementCredentials};
pub use request::DEFAULT_TIMEOUT;
pub use token_cache::DEFAULT_REFRESH_EARLY;
pub use types::{ClientSecret, Permission, Role, Scope};
