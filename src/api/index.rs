use axum::{extract::State, http::StatusCode, response::Response};

use super::{AppState, render};
use crate::views::{PageData, View};

pub async fn index(State(state): State<AppState>) -> Response {
    render(&state, StatusCode::OK, View::Index, &PageData::titled("Track lister")).await
}

pub async fn not_found(State(state): State<AppState>) -> Response {
    render(
        &state,
        StatusCode::NOT_FOUND,
        View::NotFound,
        &PageData::titled("404 - not found"),
    )
    .await
}
