//! REST API client module for the console backend.
//!
//! This module provides the `ApiClient` for the OAuth2 login/logout
//! endpoints and the coded-resource child queries, and `ResourceEndpoint`
//! for plugging one resource into the tree resolver.
//!
//! Authenticated requests carry a JWT bearer token obtained through
//! `/oauth2/login`; a 401 means the token is gone and the caller should
//! log the session out and redirect.

pub mod client;
pub mod error;

pub use client::{ApiClient, ResourceEndpoint};
pub use error::ApiError;
