//! HTML rendering.
//!
//! Templates are plain HTML files with `{{placeholder}}` markers, read from
//! the template directory on every render so they can be edited while the
//! server runs. All substituted values are escaped.

use std::path::PathBuf;

use crate::{error::Error, types::TrackRow, utils::escape_html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Index,
    Search,
    NotFound,
    Error,
}

impl View {
    pub fn file_name(&self) -> &'static str {
        match self {
            View::Index => "index.html",
            View::Search => "search.html",
            View::NotFound => "not_found.html",
            View::Error => "error.html",
        }
    }
}

/// Data handed to a template.
#[derive(Debug, Clone, Default)]
pub struct PageData {
    pub title: String,
    pub warning: Option<String>,
    pub reference: String,
    pub tracks: Vec<TrackRow>,
}

impl PageData {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

pub struct Templates {
    dir: PathBuf,
}

impl Templates {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub async fn render(&self, view: View, page: &PageData) -> Result<String, Error> {
        let path = self.dir.join(view.file_name());
        let template = async_fs::read_to_string(&path)
            .await
            .map_err(|e| Error::RenderFailed {
                view: view.file_name().to_string(),
                reason: format!("{}: {}", path.display(), e),
            })?;

        Ok(fill(&template, page))
    }
}

/// Body written when not even the error template renders.
pub fn fallback_body(err: &Error) -> String {
    format!(
        "<p>500 Server error</p><p>{}</p>",
        escape_html(&err.to_string())
    )
}

fn fill(template: &str, page: &PageData) -> String {
    let warning = page
        .warning
        .as_deref()
        .map(|w| format!(r#"<p class="warning">{}</p>"#, escape_html(w)))
        .unwrap_or_default();

    // Single pass, so substituted values are never scanned for markers.
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        match &after[..end] {
            "title" => out.push_str(&escape_html(&page.title)),
            "warning" => out.push_str(&warning),
            "reference" => out.push_str(&escape_html(&page.reference)),
            "track_count" => out.push_str(&page.tracks.len().to_string()),
            "tracks" => out.push_str(&track_rows(&page.tracks)),
            other => {
                out.push_str("{{");
                out.push_str(other);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn track_rows(tracks: &[TrackRow]) -> String {
    tracks
        .iter()
        .map(|t| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                t.position,
                escape_html(&t.title),
                escape_html(&t.artists),
                escape_html(&t.duration)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_escapes_values() {
        let page = PageData {
            title: "Search".to_string(),
            warning: Some("<b>nope</b>".to_string()),
            reference: "\"quoted\"".to_string(),
            tracks: vec![TrackRow {
                position: 1,
                title: "Rock & Roll".to_string(),
                artists: "A".to_string(),
                duration: "3:05".to_string(),
                id: "x".to_string(),
            }],
        };

        let html = fill(
            "<h1>{{title}}</h1>{{warning}}<input value=\"{{reference}}\">{{track_count}}{{tracks}}",
            &page,
        );
        assert!(html.contains("<h1>Search</h1>"));
        assert!(html.contains("&lt;b&gt;nope&lt;/b&gt;"));
        assert!(html.contains("value=\"&#34;quoted&#34;\""));
        assert!(html.contains("<td>Rock &amp; Roll</td>"));
        assert!(html.contains(">1<tr>"));
    }

    #[test]
    fn fill_does_not_expand_markers_inside_values() {
        let page = PageData {
            title: "{{tracks}}".to_string(),
            ..Default::default()
        };
        assert_eq!(fill("<h1>{{title}}</h1>{{unknown}}", &page), "<h1>{{tracks}}</h1>{{unknown}}");
    }
}
