//! Core library for admingate - an admin console client.
//!
//! The console's UI shells stay thin; this crate owns the logic that
//! recurs underneath every screen:
//!
//! - the authentication/session lifecycle over an injected token store
//!   ([`SessionManager`], [`CredentialStore`])
//! - the REST client for the OAuth2 endpoints and coded-resource queries
//!   ([`ApiClient`], [`ResourceEndpoint`])
//! - navigation tree assembly from recursive child queries
//!   ([`TreeResolver`]), flattening ([`flatten_forest`]) and
//!   expand/collapse state ([`set_expanded`])
//!
//! A typical shell logs in, hands the [`Authentication`] to the session
//! manager, resolves the menu tree through a [`ResourceEndpoint`], and
//! renders the flattened list.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod nav;
pub mod store;

pub use api::{ApiClient, ApiError, ResourceEndpoint};
pub use auth::{AuthError, Authentication, CredentialStore, Credentials, SessionManager};
pub use config::Config;
pub use models::{FlatNode, Page, ResourceNode, ROOT_CODE};
pub use nav::{flatten, flatten_forest, set_expanded, ResourceFetcher, TreeResolver};
pub use store::{
    FileTokenStore, KeyringTokenStore, MemoryTokenStore, NoopTokenStore, TokenStore,
};

use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Use the `RUST_LOG` env var to control the log level (e.g.
/// `RUST_LOG=debug`); defaults to `warn`. Call once from the shell's
/// entry point.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}
