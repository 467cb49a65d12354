use std::{
    net::SocketAddr,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{Method, StatusCode, Version},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::{error::Error, info, utils};

/// Response marker set by [`limit`] when the bucket was empty.
#[derive(Debug, Clone, Copy)]
pub struct RateLimited;

/// Admits the request when the token bucket has a unit, otherwise answers
/// 429 without running anything further.
pub async fn limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if state.gate.allow() {
        return next.run(req).await;
    }

    let mut response =
        (StatusCode::TOO_MANY_REQUESTS, Error::RateLimited.to_string()).into_response();
    response.extensions_mut().insert(RateLimited);
    response
}

/// Writes one access log line per request after the inner stack answered.
pub async fn log_access(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let addr = utils::client_addr(req.headers(), peer);
    let method = req.method().clone();
    let target = req.uri().to_string();
    let version = req.version();

    let response = next.run(req).await;

    let outcome = access_outcome(&response, start.elapsed());
    info!("{}", access_line(&addr, &method, &target, version, &outcome));

    response
}

/// `RateLimited` for requests turned away by [`limit`], else the elapsed time.
pub fn access_outcome(response: &Response, elapsed: Duration) -> String {
    if response.extensions().get::<RateLimited>().is_some() {
        "RateLimited".to_string()
    } else {
        format!("{:?}", elapsed)
    }
}

/// `(addr) "METHOD target VERSION" outcome`
pub fn access_line(
    addr: &str,
    method: &Method,
    target: &str,
    version: Version,
    outcome: &str,
) -> String {
    format!("({}) \"{} {} {:?}\" {}", addr, method, target, version, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_requests_log_rate_limited() {
        let mut response = StatusCode::TOO_MANY_REQUESTS.into_response();
        response.extensions_mut().insert(RateLimited);

        assert_eq!(
            access_outcome(&response, Duration::from_millis(3)),
            "RateLimited"
        );
    }

    #[test]
    fn admitted_requests_log_elapsed_time() {
        let response = StatusCode::OK.into_response();
        assert_eq!(
            access_outcome(&response, Duration::from_millis(3)),
            "3ms"
        );
    }
}
