use std::{fmt, io::Write};

use axum::http::HeaderMap;
use rand::{Rng, distr::Alphanumeric};

pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Random alphanumeric value used as the OAuth `state` of one redirect.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Formats a duration in milliseconds as `m:ss`.
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Caller address for logging: the forwarded-for header when a proxy set
/// one, else the transport peer.
pub fn client_addr(headers: &HeaderMap, peer: Option<std::net::SocketAddr>) -> String {
    if let Some(forwarded) = headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }

    peer.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Writes one `[marker] message` log line. A failed write is dropped.
pub fn log_line<W: Write>(out: &mut W, marker: impl fmt::Display, args: fmt::Arguments<'_>) {
    let _ = writeln!(out, "[{}] {}", marker, args);
}

/// Escapes text for use inside HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
