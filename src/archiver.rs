//! Entry points tying fetch, report, archive and import together.
//!
//! These are what the CLI calls. Each one runs to completion sequentially and
//! surfaces the first error it meets.

use crate::{
    error::ArchiveError,
    fetch::fetch_playlist,
    import::{ImportStatus, import_playlist},
    management::{ArchiveStore, ArchivedPaths},
    report,
    spotify::{ReadApi, WriteApi},
    types::PlaylistSummary,
};

/// Output format of [`report_for_archive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Html,
}

/// Outcome of archiving one playlist as part of [`archive_all_for_user`].
#[derive(Debug)]
pub struct PlaylistArchiveResult {
    pub playlist: PlaylistSummary,
    pub result: Result<ArchivedPaths, ArchiveError>,
}

/// Fetches a playlist completely and writes its JSON document and README.
///
/// Nothing is written unless the fetch succeeded.
pub async fn fetch_and_archive<A: ReadApi>(
    api: &A,
    store: &ArchiveStore,
    playlist_id: &str,
) -> Result<ArchivedPaths, ArchiveError> {
    let playlist = fetch_playlist(api, playlist_id).await?;
    let readme = report::render_markdown(&playlist);
    store.write(&playlist, &readme).await
}

/// Archives every playlist of `user_id`, one after another.
///
/// Listing the playlists must succeed; after that a failing playlist is
/// recorded in its result and the remaining playlists are still archived.
pub async fn archive_all_for_user<A: ReadApi>(
    api: &A,
    store: &ArchiveStore,
    user_id: &str,
) -> Result<Vec<PlaylistArchiveResult>, ArchiveError> {
    let playlists = api.get_user_playlists(user_id).await?;

    let mut results = Vec::with_capacity(playlists.len());
    for playlist in playlists {
        let result = fetch_and_archive(api, store, &playlist.id).await;
        results.push(PlaylistArchiveResult { playlist, result });
    }
    Ok(results)
}

/// Loads an archived playlist and re-creates it for `user_id`.
pub async fn import_from_archive<W: WriteApi>(
    writer: &W,
    store: &ArchiveStore,
    user_id: &str,
    playlist_id: &str,
) -> Result<ImportStatus, ArchiveError> {
    let archived = store.load(playlist_id).await?;
    import_playlist(writer, user_id, &archived).await
}

/// Renders the report of an archived playlist without touching the network.
pub async fn report_for_archive(
    store: &ArchiveStore,
    playlist_id: &str,
    format: ReportFormat,
) -> Result<String, ArchiveError> {
    let playlist = store.load(playlist_id).await?;
    Ok(match format {
        ReportFormat::Markdown => report::render_markdown(&playlist),
        ReportFormat::Html => report::render_html(&playlist),
    })
}
