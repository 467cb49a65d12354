use axum::{
    Form,
    extract::{Query, State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::{AppState, found, render, server_error};
use crate::{
    dispatch,
    oauth::Session,
    reference,
    types::SearchParams,
    views::{PageData, View},
    warning,
};

pub async fn search(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<SearchParams>,
) -> Response {
    search_page(&state, jar, &params.playlist).await
}

/// Form submissions carry the reference in the body; a query parameter is
/// used when the body has none.
pub async fn search_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<SearchParams>,
    form: Result<Form<SearchParams>, FormRejection>,
) -> Response {
    let raw = match form {
        Ok(Form(body)) if !body.playlist.trim().is_empty() => body.playlist,
        _ => query.playlist,
    };
    search_page(&state, jar, &raw).await
}

async fn search_page(state: &AppState, jar: CookieJar, raw: &str) -> Response {
    let token = match state.bridge.ensure_token(&jar) {
        Session::Authenticated(token) => token,
        Session::RedirectRequired(redirect) => {
            let jar = match redirect.state_cookie {
                Some(cookie) => jar.add(cookie),
                None => jar,
            };
            return (jar, found(&redirect.url)).into_response();
        }
    };

    let input = raw.trim();
    let mut page = PageData {
        title: "Search".to_string(),
        reference: input.to_string(),
        ..Default::default()
    };

    let listed = match reference::resolve(input) {
        Ok(None) => Ok(Vec::new()),
        Ok(Some(resolved)) => dispatch::fetch(state.catalog.as_ref(), &resolved, &token).await,
        Err(e) => Err(e),
    };

    match listed {
        Ok(tracks) => page.tracks = tracks,
        Err(e) if e.is_warning() => {
            warning!("Search for '{}' failed: {}", input, e);
            page.warning = Some(e.to_string());
        }
        Err(e) => return server_error(state, e).await,
    }

    render(state, StatusCode::OK, View::Search, &page).await
}
