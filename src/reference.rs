//! Parsing of user-supplied playlist and album references.
//!
//! Three shapes are accepted, tried in this order:
//!
//! 1. `spotify:<kind>:<id>` URIs
//! 2. `https://open.spotify.com/<kind>/<id>` web links, optionally with an
//!    `intl-xx` locale segment before the kind
//! 3. free text carrying a colon-delimited `<kind>:<id>` token; without
//!    one, the words `album` or `playlist` only set the kind and the
//!    reference stays invalid
//!
//! Kind tokens match case-insensitively. Ids are opaque and passed through
//! verbatim.

use url::Url;

use crate::{
    error::Error,
    types::{Reference, ResourceKind},
    warning,
};

pub const URI_SCHEME: &str = "spotify";
pub const WEB_HOST: &str = "open.spotify.com";

impl ResourceKind {
    /// Maps a kind token to a resource kind, ignoring case.
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("playlist") {
            ResourceKind::Playlist
        } else if token.eq_ignore_ascii_case("album") {
            ResourceKind::Album
        } else {
            ResourceKind::Unknown
        }
    }
}

impl Reference {
    pub fn unknown() -> Self {
        Self {
            kind: ResourceKind::Unknown,
            id: String::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.kind != ResourceKind::Unknown && !self.id.is_empty()
    }
}

/// Resolves raw input into a reference that is safe to dispatch.
///
/// Returns `Ok(None)` for blank input (no search submitted yet) and
/// `Err(Error::InvalidReference)` when no known kind and id can be found.
pub fn resolve(raw: &str) -> Result<Option<Reference>, Error> {
    let input = raw.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let reference = parse(input);
    if reference.is_valid() {
        Ok(Some(reference))
    } else {
        Err(Error::InvalidReference {
            input: input.to_string(),
        })
    }
}

/// Parses input into a reference without validating it.
///
/// Unrecognised input yields an `Unknown` kind and an empty id.
pub fn parse(raw: &str) -> Reference {
    let input = raw.trim();
    if input.is_empty() {
        return Reference::unknown();
    }

    match Url::parse(input) {
        Ok(url) => {
            if let Some(reference) = from_url(&url) {
                return reference;
            }
        }
        Err(e) => {
            if looks_like_url(input) {
                warning!("url parsing failed for '{}': {}", input, e);
            }
        }
    }

    from_free_text(input)
}

fn looks_like_url(input: &str) -> bool {
    input.contains("://") || input.to_ascii_lowercase().starts_with("spotify:")
}

fn from_url(url: &Url) -> Option<Reference> {
    if url.scheme() == URI_SCHEME {
        // spotify:playlist:<id> has no authority, everything after the
        // scheme lands in the path.
        let parts: Vec<&str> = url.path().split(':').collect();
        if parts.len() >= 2 {
            return Some(Reference {
                kind: ResourceKind::from_token(parts[0]),
                id: parts[1].to_string(),
            });
        }
        return None;
    }

    let is_web_link = url.scheme() == "https"
        && url
            .host_str()
            .is_some_and(|host| host.eq_ignore_ascii_case(WEB_HOST));
    if !is_web_link {
        return None;
    }

    let mut parts: Vec<&str> = url.path().split('/').collect();
    if parts
        .get(1)
        .is_some_and(|segment| segment.to_ascii_lowercase().starts_with("intl-"))
    {
        parts.remove(1);
    }

    if parts.len() >= 3 {
        Some(Reference {
            kind: ResourceKind::from_token(parts[1]),
            id: parts[2].to_string(),
        })
    } else {
        None
    }
}

fn from_free_text(input: &str) -> Reference {
    let tokens = || input.split_whitespace();

    // A `<kind>:<id>` token decides the kind on its own.
    for kind in [ResourceKind::Playlist, ResourceKind::Album] {
        if let Some(id) = tokens().find_map(|token| colon_id(token, kind)) {
            return Reference { kind, id };
        }
    }

    let lower = input.to_ascii_lowercase();
    let kind = if lower.contains("album") {
        ResourceKind::Album
    } else if lower.contains("playlist") {
        ResourceKind::Playlist
    } else {
        ResourceKind::Unknown
    };

    Reference {
        kind,
        id: String::new(),
    }
}

/// Id following a `<kind>:` segment inside one whitespace-free token.
fn colon_id(token: &str, kind: ResourceKind) -> Option<String> {
    let segments: Vec<&str> = token.split(':').collect();
    segments.windows(2).find_map(|pair| {
        let id = pair[1].trim_matches(|c: char| !c.is_ascii_alphanumeric());
        (ResourceKind::from_token(pair[0]) == kind && !id.is_empty()).then(|| id.to_string())
    })
}
