//! Authorization-code flow between the browser, this server and the Spotify
//! accounts service.
//!
//! The bearer token lives only in the browser: after a successful callback
//! it is written to the `sp_token` cookie (with `sp_token_expiry` carrying
//! the expiry as unix seconds) and read back on every search request. No
//! session state is kept on the server.
//!
//! The `state` parameter is a fresh random value per redirect, remembered in
//! the short-lived `sp_auth_state` cookie. A fixed state can be configured
//! instead for deployments that relied on it.

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use time::{Duration, OffsetDateTime, PrimitiveDateTime};
use url::Url;

use crate::{
    config::Config,
    error::Error,
    spotify::TokenExchange,
    types::{BearerToken, CallbackParams, Token},
    utils,
};

pub const SESSION_COOKIE: &str = "sp_token";
pub const EXPIRY_COOKIE: &str = "sp_token_expiry";
pub const STATE_COOKIE: &str = "sp_auth_state";

const STATE_TTL_MINUTES: i64 = 10;

/// Where the expected `state` of a callback comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatePolicy {
    /// One constant for every redirect.
    Fixed(String),
    /// A random value per redirect, stored in [`STATE_COOKIE`].
    PerRequest,
}

/// Redirect to the authorization endpoint, plus the state cookie to set
/// alongside it when the state is per request.
#[derive(Debug, Clone)]
pub struct AuthorizationRedirect {
    pub url: String,
    pub state_cookie: Option<Cookie<'static>>,
}

/// Outcome of inspecting the session cookie.
#[derive(Debug, Clone)]
pub enum Session {
    Authenticated(BearerToken),
    RedirectRequired(AuthorizationRedirect),
}

pub struct OAuthBridge {
    auth_url: Url,
    client_id: String,
    redirect_uri: String,
    scope: String,
    state: StatePolicy,
    secure_cookies: bool,
    exchange: Arc<dyn TokenExchange>,
}

impl OAuthBridge {
    pub fn new(config: &Config, exchange: Arc<dyn TokenExchange>) -> Result<Self, Error> {
        let auth_url = Url::parse(&config.auth_url)
            .map_err(|e| Error::Config(format!("invalid authorization url: {}", e)))?;

        let state = match &config.fixed_state {
            Some(fixed) => StatePolicy::Fixed(fixed.clone()),
            None => StatePolicy::PerRequest,
        };

        Ok(Self {
            auth_url,
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scope: config.scope.clone(),
            state,
            secure_cookies: config.redirect_uri.starts_with("https://"),
            exchange,
        })
    }

    pub fn state_policy(&self) -> &StatePolicy {
        &self.state
    }

    /// Builds the authorization endpoint URL for the given state.
    pub fn authorize_url(&self, state: &str) -> String {
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("scope", &self.scope)
            .append_pair("state", state);
        url.into()
    }

    /// Starts a new authorization round trip.
    pub fn begin_authorization(&self) -> AuthorizationRedirect {
        match &self.state {
            StatePolicy::Fixed(state) => AuthorizationRedirect {
                url: self.authorize_url(state),
                state_cookie: None,
            },
            StatePolicy::PerRequest => {
                let state = utils::generate_state();
                AuthorizationRedirect {
                    url: self.authorize_url(&state),
                    state_cookie: Some(self.state_cookie(state)),
                }
            }
        }
    }

    /// Returns the bearer token carried by the session cookie, or the
    /// redirect that obtains one.
    ///
    /// The cookie value is used verbatim. A companion expiry that has
    /// passed or does not parse counts as no session.
    pub fn ensure_token(&self, jar: &CookieJar) -> Session {
        let access_token = match jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
            Some(value) if !value.is_empty() => value,
            _ => return Session::RedirectRequired(self.begin_authorization()),
        };

        let expires_at = match jar.get(EXPIRY_COOKIE) {
            None => None,
            Some(cookie) => match parse_expiry(cookie.value()) {
                Some(at) if at > Utc::now() => Some(at),
                _ => return Session::RedirectRequired(self.begin_authorization()),
            },
        };

        Session::Authenticated(BearerToken {
            access_token,
            expires_at,
        })
    }

    /// Completes the callback: checks the state, then exchanges the code.
    ///
    /// The state is compared before any upstream call, so a forged
    /// callback never reaches the token endpoint.
    pub async fn complete_authorization(
        &self,
        jar: &CookieJar,
        params: &CallbackParams,
    ) -> Result<Token, Error> {
        let expected = match &self.state {
            StatePolicy::Fixed(state) => Some(state.clone()),
            StatePolicy::PerRequest => jar.get(STATE_COOKIE).map(|c| c.value().to_string()),
        };

        match (expected.as_deref(), params.state.as_deref()) {
            (Some(expected), Some(got)) if !expected.is_empty() && expected == got => {}
            _ => return Err(Error::AuthStateMismatch),
        }

        if let Some(reason) = &params.error {
            return Err(Error::TokenExchangeFailed(format!(
                "authorization was denied: {}",
                reason
            )));
        }

        let code = params
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::TokenExchangeFailed("missing authorization code".to_string()))?;

        self.exchange
            .exchange_code(code)
            .await
            .map_err(Error::TokenExchangeFailed)
    }

    /// Cookies that carry a freshly obtained token back to the browser.
    pub fn session_cookies(&self, token: &Token) -> (Cookie<'static>, Cookie<'static>) {
        let expiry = token.expiry().timestamp();
        // Expiries past what `time` can represent are capped at its maximum.
        let expires = OffsetDateTime::from_unix_timestamp(expiry)
            .unwrap_or_else(|_| PrimitiveDateTime::MAX.assume_utc());

        let session = Cookie::build((SESSION_COOKIE, token.access_token.clone()))
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .expires(expires)
            .build();

        let companion = Cookie::build((EXPIRY_COOKIE, expiry.to_string()))
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .expires(expires)
            .build();

        (session, companion)
    }

    fn state_cookie(&self, state: String) -> Cookie<'static> {
        Cookie::build((STATE_COOKIE, state))
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(Duration::minutes(STATE_TTL_MINUTES))
            .build()
    }
}

/// Removal cookie for the one-shot state.
pub fn clear_state_cookie() -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let secs = raw.trim().parse::<i64>().ok()?;
    DateTime::<Utc>::from_timestamp(secs, 0)
}
