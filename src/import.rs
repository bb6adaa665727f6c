//! Re-creates an archived playlist for an authenticated user.

use crate::{
    error::ArchiveError,
    info,
    models::Playlist,
    spotify::{ADD_TRACKS_BATCH_SIZE, WriteApi},
    types::PlaylistSummary,
};

/// Why an import was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateReason {
    SameName,
    SameId,
}

/// Outcome of an import that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    /// A new private playlist was created and filled.
    Created {
        playlist_id: String,
        tracks_added: usize,
        batches: usize,
    },
    /// The user already has a matching playlist; nothing was written.
    DuplicateSkip {
        existing_id: String,
        reason: DuplicateReason,
    },
}

/// Finds an existing playlist that blocks the import.
///
/// A playlist with the same id or the same name counts as a duplicate. A
/// shared name is a weak signal (distinct playlists can share a name) but it
/// is treated exactly like an id match.
pub fn find_duplicate(
    existing: &[PlaylistSummary],
    archived: &Playlist,
) -> Option<(String, DuplicateReason)> {
    existing.iter().find_map(|p| {
        if p.id == archived.id {
            Some((p.id.clone(), DuplicateReason::SameId))
        } else if p.name == archived.name {
            Some((p.id.clone(), DuplicateReason::SameName))
        } else {
            None
        }
    })
}

/// Creates a private copy of `archived` for `user_id`.
///
/// Existing playlists are listed first through the user credential, so the
/// private copies left by earlier imports are seen too; on a duplicate the
/// import stops without any write call. Tracks are added in order, in batches of at
/// most [`ADD_TRACKS_BATCH_SIZE`]. The first failing batch aborts the import
/// and the partially filled playlist is left as is.
pub async fn import_playlist<W: WriteApi>(
    writer: &W,
    user_id: &str,
    archived: &Playlist,
) -> Result<ImportStatus, ArchiveError> {
    let existing = writer.get_own_playlists().await?;
    if let Some((existing_id, reason)) = find_duplicate(&existing, archived) {
        return Ok(ImportStatus::DuplicateSkip {
            existing_id,
            reason,
        });
    }

    let created = writer
        .create_playlist(user_id, &archived.name, &archived.description, false)
        .await?;
    info!("Created playlist {} ({})", created.name, created.id);

    let track_ids = archived.track_ids();
    let mut batches = 0;
    for chunk in track_ids.chunks(ADD_TRACKS_BATCH_SIZE) {
        writer.add_tracks(&created.id, chunk).await?;
        batches += 1;
    }

    Ok(ImportStatus::Created {
        playlist_id: created.id,
        tracks_added: track_ids.len(),
        batches,
    })
}
