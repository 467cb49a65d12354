use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use super::TokenExchange;
use crate::{
    config::Config,
    types::{Token, TokenResponse},
};

/// Accounts service client for the authorization-code exchange.
///
/// Authenticates with the client id and secret over HTTP basic auth, the
/// confidential-client variant of the flow.
pub struct SpotifyAuth {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl SpotifyAuth {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
        }
    }
}

#[async_trait]
impl TokenExchange for SpotifyAuth {
    /// Exchanges the authorization code from the callback for an access
    /// token. The code is single-use and short-lived, so this runs straight
    /// from the callback handler.
    async fn exchange_code(&self, code: &str) -> Result<Token, String> {
        let res = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = res.status();
        if !status.is_success() {
            let json: Value = res.json().await.unwrap_or(Value::Null);
            let reason = json["error_description"]
                .as_str()
                .or_else(|| json["error"].as_str())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unexpected response"));
            return Err(format!("token endpoint returned {}: {}", status.as_u16(), reason));
        }

        let body: TokenResponse = res.json().await.map_err(|e| e.to_string())?;
        if body.access_token.is_empty() {
            return Err("token endpoint returned an empty access token".to_string());
        }

        Ok(Token {
            access_token: body.access_token,
            token_type: body.token_type,
            scope: body.scope,
            expires_in: body.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }
}
