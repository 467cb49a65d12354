//! Configuration management for the Track Lister.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. The values are collected once into a [`Config`]
//! which is handed to the server, the OAuth bridge and the upstream clients.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::error::Error;

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SCOPE: &str = "user-read-private";
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Loads environment variables from `.env` files.
///
/// Looks for `tracklister/.env` in the platform-specific local data directory
/// first and then for a `.env` in the working directory. Variables already
/// present in the environment are never overwritten, and a missing file is
/// not an error.
///
/// The data directory lives at:
/// - Linux: `~/.local/share/tracklister/.env`
/// - macOS: `~/Library/Application Support/tracklister/.env`
/// - Windows: `%LOCALAPPDATA%/tracklister/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("tracklister/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Returns the address the HTTP server binds to.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string())
}

/// Returns the Spotify client ID, if set.
pub fn spotify_client_id() -> Option<String> {
    non_empty("SPOTIFY_ID")
}

/// Returns the Spotify client secret, if set.
///
/// The secret must never show up in logs.
pub fn spotify_client_secret() -> Option<String> {
    non_empty("SPOTIFY_SECRET")
}

/// Returns the OAuth redirect URI.
///
/// This must match the redirect URI registered in the Spotify application
/// settings. Falls back to the loopback callback on port 8080.
pub fn spotify_redirect_uri() -> String {
    non_empty("CALLBACK_URL").unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string())
}

/// Returns the requested OAuth scope.
pub fn spotify_scope() -> String {
    non_empty("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string())
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    non_empty("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string())
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    non_empty("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    non_empty("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string())
}

/// Returns the fixed OAuth state token, if one is configured.
///
/// When unset every authorization redirect gets its own random state.
pub fn oauth_state() -> Option<String> {
    non_empty("OAUTH_STATE")
}

/// Returns the directory the HTML templates are read from.
pub fn template_dir() -> PathBuf {
    PathBuf::from(non_empty("TEMPLATE_DIR").unwrap_or_else(|| DEFAULT_TEMPLATE_DIR.to_string()))
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn number<T: std::str::FromStr>(key: &str, default: T) -> Result<T, Error> {
    match non_empty(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{key} must be a number, got '{raw}'"))),
        None => Ok(default),
    }
}

/// Token bucket parameters for the inbound rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u32,
    pub burst: u32,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            per_second: 2,
            burst: 4,
        }
    }
}

/// Everything the server needs, collected once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub fixed_state: Option<String>,
    pub template_dir: PathBuf,
    pub rate_limit: RateLimit,
    pub upstream_timeout: Duration,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when the client credentials are missing, when a numeric value
    /// does not parse or when a rate limit value is zero.
    pub fn from_env() -> Result<Self, Error> {
        let client_id =
            spotify_client_id().ok_or_else(|| Error::Config("SPOTIFY_ID must be set".into()))?;
        let client_secret = spotify_client_secret()
            .ok_or_else(|| Error::Config("SPOTIFY_SECRET must be set".into()))?;

        let defaults = RateLimit::default();
        let rate_limit = RateLimit {
            per_second: number("RATE_LIMIT_PER_SECOND", defaults.per_second)?,
            burst: number("RATE_LIMIT_BURST", defaults.burst)?,
        };
        if rate_limit.per_second == 0 || rate_limit.burst == 0 {
            return Err(Error::Config(
                "RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST must be greater than zero".into(),
            ));
        }

        let timeout_secs: u64 = number("UPSTREAM_TIMEOUT_SECS", 10)?;

        Ok(Self {
            server_address: server_addr(),
            client_id,
            client_secret,
            redirect_uri: spotify_redirect_uri(),
            scope: spotify_scope(),
            auth_url: spotify_apiauth_url(),
            token_url: spotify_apitoken_url(),
            api_url: spotify_apiurl(),
            fixed_state: oauth_state(),
            template_dir: template_dir(),
            rate_limit,
            upstream_timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }

    /// A configuration with defaults and the given credentials, without
    /// touching the environment.
    pub fn with_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            fixed_state: None,
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
            rate_limit: RateLimit::default(),
            upstream_timeout: Duration::from_secs(10),
        }
    }
}
