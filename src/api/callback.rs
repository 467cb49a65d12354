use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::{AppState, found, render};
use crate::{
    error::Error,
    info, oauth,
    types::CallbackParams,
    views::{PageData, View},
    warning,
};

/// OAuth redirect target.
///
/// On success the session cookies are set, the one-shot state cookie is
/// cleared and the browser is sent on to `/search`. On failure no cookie is
/// touched.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Response {
    match state.bridge.complete_authorization(&jar, &params).await {
        Ok(token) => {
            info!("New auth expires {}", token.expiry());
            let (session, expiry) = state.bridge.session_cookies(&token);
            let jar = jar
                .add(session)
                .add(expiry)
                .add(oauth::clear_state_cookie());
            (jar, found("/search")).into_response()
        }
        Err(e) => {
            warning!("Authorization callback failed: {}", e);
            let status = match e {
                Error::AuthStateMismatch => StatusCode::NOT_FOUND,
                _ => StatusCode::FORBIDDEN,
            };
            let page = PageData {
                title: "Authorization failed".to_string(),
                warning: Some(e.to_string()),
                ..Default::default()
            };
            render(&state, status, View::Error, &page).await
        }
    }
}
