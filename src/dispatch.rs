use crate::{
    error::Error,
    spotify::Catalog,
    types::{Album, BearerToken, Playlist, Reference, ResourceKind, SimpleTrack, TrackRow},
    utils,
};

/// Fetches the referenced album or playlist and flattens it into track rows.
///
/// Upstream failures come back as [`Error::UpstreamFetchFailed`] carrying the
/// upstream message, which the search page shows as a warning.
pub async fn fetch(
    catalog: &dyn Catalog,
    reference: &Reference,
    token: &BearerToken,
) -> Result<Vec<TrackRow>, Error> {
    if !reference.is_valid() {
        return Err(Error::InvalidReference {
            input: reference.id.clone(),
        });
    }

    match reference.kind {
        ResourceKind::Album => catalog
            .get_album(&token.access_token, &reference.id)
            .await
            .map(|album| flatten_album(&album))
            .map_err(|e| Error::UpstreamFetchFailed(e.to_string())),
        ResourceKind::Playlist => catalog
            .get_playlist(&token.access_token, &reference.id)
            .await
            .map(|playlist| flatten_playlist(&playlist))
            .map_err(|e| Error::UpstreamFetchFailed(e.to_string())),
        ResourceKind::Unknown => Err(Error::InvalidReference {
            input: reference.id.clone(),
        }),
    }
}

/// Album entries are tracks already.
pub fn flatten_album(album: &Album) -> Vec<TrackRow> {
    rows(album.tracks.items.iter())
}

/// Playlist entries wrap a track; entries without one are skipped.
pub fn flatten_playlist(playlist: &Playlist) -> Vec<TrackRow> {
    rows(playlist.tracks.items.iter().filter_map(|item| item.track.as_ref()))
}

fn rows<'a>(tracks: impl Iterator<Item = &'a SimpleTrack>) -> Vec<TrackRow> {
    tracks
        .enumerate()
        .map(|(i, track)| TrackRow {
            position: i + 1,
            title: track.name.clone(),
            artists: track
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            duration: utils::format_duration(track.duration_ms),
            id: track.id.clone().unwrap_or_default(),
        })
        .collect()
}
