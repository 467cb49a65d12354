#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tracklister::{
    api::AppState,
    config::{Config, RateLimit},
    server,
    spotify::{Catalog, CatalogError, TokenExchange},
    types::{Album, Page, Playlist, PlaylistItem, SimpleArtist, SimpleTrack, Token},
};

pub fn template_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
}

/// Config with generous rate limits so tests are never throttled by accident.
pub fn test_config() -> Config {
    let mut config = Config::with_credentials("client-id", "client-secret");
    config.template_dir = template_dir();
    config.rate_limit = RateLimit {
        per_second: 100,
        burst: 100,
    };
    config
}

pub fn track(id: &str, name: &str, artists: &[&str], duration_ms: u64) -> SimpleTrack {
    SimpleTrack {
        id: Some(id.to_string()),
        name: name.to_string(),
        artists: artists
            .iter()
            .map(|a| SimpleArtist {
                id: None,
                name: a.to_string(),
            })
            .collect(),
        duration_ms,
    }
}

pub fn sample_tracks() -> Vec<SimpleTrack> {
    vec![
        track("t1", "Intro", &["Tove Lo"], 65_000),
        track("t2", "Talking Body", &["Tove Lo", "Guest"], 238_000),
        track("t3", "Habits", &["Tove Lo"], 209_500),
    ]
}

pub fn album_of(tracks: Vec<SimpleTrack>) -> Album {
    Album {
        id: "7yQ3jgoi8fLV4RnD83cqzo".to_string(),
        name: "Queen of the Clouds".to_string(),
        tracks: Page {
            items: tracks,
            next: None,
            total: None,
        },
    }
}

pub fn playlist_of(tracks: Vec<SimpleTrack>) -> Playlist {
    Playlist {
        id: "6fCOzHcpq7P25OZC8Mikxr".to_string(),
        name: "Mix".to_string(),
        tracks: Page {
            items: tracks
                .into_iter()
                .map(|t| PlaylistItem {
                    added_at: Some("2024-01-01T00:00:00Z".to_string()),
                    track: Some(t),
                })
                .collect(),
            next: None,
            total: None,
        },
    }
}

/// Catalog that answers from fixed data and counts calls.
#[derive(Default)]
pub struct FakeCatalog {
    pub album: Option<Album>,
    pub playlist: Option<Playlist>,
    pub failure: Option<(u16, String)>,
    pub calls: AtomicUsize,
    pub last_token: std::sync::Mutex<Option<String>>,
}

impl FakeCatalog {
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, token: &str) -> Result<(), CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(token.to_string());
        match &self.failure {
            Some((status, message)) => Err(CatalogError::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn not_found() -> CatalogError {
        CatalogError::Api {
            status: 404,
            message: "Non existing id".to_string(),
        }
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn get_album(&self, token: &str, _id: &str) -> Result<Album, CatalogError> {
        self.record(token)?;
        self.album.clone().ok_or_else(Self::not_found)
    }

    async fn get_playlist(&self, token: &str, _id: &str) -> Result<Playlist, CatalogError> {
        self.record(token)?;
        self.playlist.clone().ok_or_else(Self::not_found)
    }
}

/// Token endpoint stand-in.
pub struct FakeExchange {
    pub result: Result<Token, String>,
    pub calls: AtomicUsize,
}

impl FakeExchange {
    pub fn granting(access_token: &str) -> Self {
        Self {
            result: Ok(Token {
                access_token: access_token.to_string(),
                token_type: "Bearer".to_string(),
                scope: "user-read-private".to_string(),
                expires_in: 3600,
                obtained_at: chrono::Utc::now().timestamp() as u64,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn refusing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchange for FakeExchange {
    async fn exchange_code(&self, _code: &str) -> Result<Token, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

pub fn state_with(
    config: &Config,
    catalog: Arc<FakeCatalog>,
    exchange: Arc<FakeExchange>,
) -> AppState {
    server::build_state(config, catalog, exchange).expect("state")
}

pub fn app(config: &Config, catalog: Arc<FakeCatalog>, exchange: Arc<FakeExchange>) -> Router {
    server::router(state_with(config, catalog, exchange))
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
