//! Track Lister Library
//!
//! This library provides a small web front-end that authorizes a browser user
//! against Spotify using the OAuth 2.0 authorization-code flow and then lists
//! the tracks of a playlist or album the user points it at.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and the request middleware (rate limit, access log)
//! - `config` - Configuration management and environment variables
//! - `dispatch` - Catalog queries and track row flattening
//! - `error` - Error taxonomy shared by all request paths
//! - `limiter` - Token bucket admission filter for inbound requests
//! - `oauth` - Authorization redirects, callback completion and session cookies
//! - `reference` - Parsing of user-supplied playlist/album references
//! - `server` - Router assembly and the serve loop
//! - `spotify` - Spotify Web API and accounts service clients
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `views` - HTML templates for the rendered pages
//!
//! # Example
//!
//! ```
//! use tracklister::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> tracklister::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod limiter;
pub mod oauth;
pub mod reference;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod views;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Used by startup and serving code where any error simply ends the run.
/// Request handling uses [`Error`] instead so every failure can be mapped
/// to a response.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Write errors on stdout are ignored, so a closed log pipe never reaches
/// the request that is being logged.
///
/// # Example
///
/// ```
/// info!("listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::utils::log_line(
      &mut std::io::stdout().lock(),
      "o".blue().bold(),
      std::format_args!($($arg)*),
    );
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for startup failures. Nothing reachable from a request handler may
/// call this macro; request errors are reported with [`warning!`] and turned
/// into responses.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::utils::log_line(
      &mut std::io::stderr().lock(),
      "!".red().bold(),
      std::format_args!($($arg)*),
    );
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems such as a malformed reference, a failed
/// token exchange or a template that could not be rendered.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    $crate::utils::log_line(
      &mut std::io::stdout().lock(),
      "!".yellow().bold(),
      std::format_args!($($arg)*),
    );
  })
}
