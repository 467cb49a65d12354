//! # Spotify Integration Module
//!
//! This module holds the two upstream capabilities the web front-end relies on:
//!
//! - [`Catalog`] - read access to albums and playlists on the Web API
//! - [`TokenExchange`] - the authorization-code-for-token exchange on the
//!   accounts service
//!
//! Both are traits so the HTTP layer can be driven against in-process fakes.
//! [`SpotifyCatalog`] and [`SpotifyAuth`] are the reqwest implementations
//! used by the server.
//!
//! ## Architecture
//!
//! ```text
//! HTTP handlers (api)
//!          ↓
//! OAuth bridge / catalog dispatcher
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code exchange)
//!     └── Catalog (albums, playlists)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Error Handling
//!
//! Calls are bounded by the client timeout configured at startup and are
//! never retried. A failed call surfaces immediately as a [`CatalogError`]
//! or as the exchange error string, and the caller decides how to show it.

mod auth;
mod catalog;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Album, Playlist, Token};

pub use auth::SpotifyAuth;
pub use catalog::SpotifyCatalog;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Spotify API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request to Spotify failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Read access to the upstream music catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn get_album(&self, token: &str, id: &str) -> Result<Album, CatalogError>;

    async fn get_playlist(&self, token: &str, id: &str) -> Result<Playlist, CatalogError>;
}

/// Exchange of an authorization code for an access token.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<Token, String>;
}
