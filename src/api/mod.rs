//! # API Module
//!
//! HTTP surface of the track lister, built on [axum](https://docs.rs/axum).
//!
//! ## Endpoints
//!
//! - [`index`] - landing page on `/`; every other unknown path gets the
//!   not-found page through [`not_found`]
//! - [`callback`] - OAuth redirect target; checks the state, exchanges the
//!   code and stores the token in the session cookie
//! - [`search`] / [`search_form`] - asks for authorization when there is no
//!   session, otherwise resolves the submitted reference and lists tracks
//! - [`health`] - status and version for monitoring
//!
//! ## Middleware
//!
//! Every request passes [`log_access`] (outermost) and then [`limit`]. The
//! limiter answers 429 when the token bucket is empty and tags the response
//! so the access log records `RateLimited` instead of a duration.
//!
//! ## Error Handling
//!
//! Handlers never fail the process. Invalid references and upstream errors
//! become a warning on the search page, authorization failures get a client
//! error page, and a template that cannot be rendered degrades to the error
//! page or a minimal inline body.

mod callback;
mod health;
mod index;
mod middleware;
mod search;

use std::sync::Arc;

use axum::{
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use crate::{
    error::Error,
    limiter::RateGate,
    oauth::OAuthBridge,
    spotify::Catalog,
    views::{self, PageData, Templates, View},
    warning,
};

pub use callback::callback;
pub use health::health;
pub use index::{index, not_found};
pub use middleware::{RateLimited, access_line, access_outcome, limit, log_access};
pub use search::{search, search_form};

/// Shared per-process state. Everything else is request scoped.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<RateGate>,
    pub bridge: Arc<OAuthBridge>,
    pub catalog: Arc<dyn Catalog>,
    pub templates: Arc<Templates>,
}

/// `302 Found` to the given location.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Renders a view, falling back to the error page and then to a built-in
/// body when templates are unavailable.
pub(crate) async fn render(
    state: &AppState,
    status: StatusCode,
    view: View,
    page: &PageData,
) -> Response {
    match state.templates.render(view, page).await {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => server_error(state, e).await,
    }
}

pub(crate) async fn server_error(state: &AppState, err: Error) -> Response {
    warning!("server error: {}", err);

    let page = PageData {
        title: "Server error".to_string(),
        warning: Some(err.to_string()),
        ..Default::default()
    };
    let body = match state.templates.render(View::Error, &page).await {
        Ok(body) => body,
        Err(_) => views::fallback_body(&err),
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
}
