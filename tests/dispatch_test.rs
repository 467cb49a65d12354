mod common;

use std::sync::Arc;

use common::*;
use tracklister::{
    Error,
    dispatch::{fetch, flatten_album, flatten_playlist},
    types::{BearerToken, PlaylistItem, Reference, ResourceKind},
};

fn bearer(value: &str) -> BearerToken {
    BearerToken {
        access_token: value.to_string(),
        expires_at: None,
    }
}

#[test]
fn test_playlist_and_album_flatten_identically() {
    let from_album = flatten_album(&album_of(sample_tracks()));
    let from_playlist = flatten_playlist(&playlist_of(sample_tracks()));

    assert_eq!(from_album.len(), 3);
    assert_eq!(from_album, from_playlist);
}

#[test]
fn test_rows_carry_display_fields() {
    let rows = flatten_album(&album_of(sample_tracks()));

    assert_eq!(rows[0].position, 1);
    assert_eq!(rows[0].title, "Intro");
    assert_eq!(rows[0].duration, "1:05");
    assert_eq!(rows[1].artists, "Tove Lo, Guest");
    assert_eq!(rows[1].duration, "3:58");
    assert_eq!(rows[2].id, "t3");
    assert_eq!(rows[2].position, 3);
}

#[test]
fn test_playlist_entries_without_track_are_skipped() {
    let mut playlist = playlist_of(sample_tracks());
    playlist.tracks.items.insert(
        1,
        PlaylistItem {
            added_at: None,
            track: None,
        },
    );

    let rows = flatten_playlist(&playlist);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].title, "Talking Body");
    assert_eq!(rows[1].position, 2);
}

#[tokio::test]
async fn test_fetch_selects_operation_by_kind() {
    let catalog = FakeCatalog {
        playlist: Some(playlist_of(sample_tracks())),
        ..Default::default()
    };

    let playlist = Reference {
        kind: ResourceKind::Playlist,
        id: "6fCOzHcpq7P25OZC8Mikxr".to_string(),
    };
    let rows = fetch(&catalog, &playlist, &bearer("tok")).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(catalog.last_token.lock().unwrap().as_deref(), Some("tok"));

    // No album configured, so the album path answers "not found".
    let album = Reference {
        kind: ResourceKind::Album,
        id: "7yQ3jgoi8fLV4RnD83cqzo".to_string(),
    };
    let err = fetch(&catalog, &album, &bearer("tok")).await.unwrap_err();
    assert!(matches!(err, Error::UpstreamFetchFailed(ref msg) if msg.contains("Non existing id")));
    assert_eq!(catalog.calls(), 2);
}

#[tokio::test]
async fn test_upstream_failure_is_a_warning() {
    let catalog = Arc::new(FakeCatalog::failing(401, "The access token expired"));
    let album = Reference {
        kind: ResourceKind::Album,
        id: "7yQ3jgoi8fLV4RnD83cqzo".to_string(),
    };

    let err = fetch(catalog.as_ref(), &album, &bearer("old")).await.unwrap_err();
    assert!(err.is_warning());
    assert!(err.to_string().contains("The access token expired"));
}

#[tokio::test]
async fn test_invalid_references_are_never_dispatched() {
    let catalog = FakeCatalog::default();

    for reference in [
        Reference::unknown(),
        Reference {
            kind: ResourceKind::Album,
            id: String::new(),
        },
        Reference {
            kind: ResourceKind::Unknown,
            id: "abc".to_string(),
        },
    ] {
        let err = fetch(&catalog, &reference, &bearer("tok")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidReference { .. }));
    }
    assert_eq!(catalog.calls(), 0);
}
