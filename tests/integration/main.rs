//! Integration tests for the Management API client and the request middleware.

mod management;
mod middleware;
