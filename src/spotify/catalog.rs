use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::{Catalog, CatalogError};
use crate::{
    config::Config,
    types::{Album, ApiErrorResponse, Playlist},
};

/// Web API client for album and playlist lookups.
pub struct SpotifyCatalog {
    client: Client,
    api_url: String,
}

impl SpotifyCatalog {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
        }
    }

    fn endpoint(&self, collection: &str, id: &str) -> Result<Url, CatalogError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| CatalogError::InvalidRequest(format!("bad API url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidRequest("API url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(collection)
            .push(id);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, token: &str) -> Result<T, CatalogError> {
        let response = self.client.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }
}

/// Decodes the Web API error body, falling back to the status reason.
fn api_error(status: StatusCode, body: &str) -> CatalogError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => CatalogError::Api {
            status: parsed.error.status,
            message: parsed.error.message,
        },
        Err(_) => CatalogError::Api {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string(),
        },
    }
}

#[async_trait]
impl Catalog for SpotifyCatalog {
    async fn get_album(&self, token: &str, id: &str) -> Result<Album, CatalogError> {
        let url = self.endpoint("albums", id)?;
        self.get_json(url, token).await
    }

    async fn get_playlist(&self, token: &str, id: &str) -> Result<Playlist, CatalogError> {
        let url = self.endpoint("playlists", id)?;
        self.get_json(url, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_escapes_id() {
        let config = Config::with_credentials("id", "secret");
        let catalog = SpotifyCatalog::new(Client::new(), &config);

        let url = catalog.endpoint("albums", "abc/../me").unwrap();
        assert_eq!(url.as_str(), "https://api.spotify.com/v1/albums/abc%2F..%2Fme");
    }

    #[test]
    fn api_error_prefers_body_message() {
        let body = r#"{"error":{"status":404,"message":"Non existing id"}}"#;
        let err = api_error(StatusCode::NOT_FOUND, body);
        assert_eq!(err.to_string(), "Spotify API error 404: Non existing id");

        let err = api_error(StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err.to_string(), "Spotify API error 502: Bad Gateway");
    }
}
