use crate::{
    archiver,
    config::Config,
    error,
    import::{DuplicateReason, ImportStatus},
    info, success,
};

use super::{spinner, store, write_client};

pub async fn import(config: &Config, playlist_id: &str, user_id: Option<String>) {
    let user_id = match user_id {
        Some(user_id) => user_id,
        None => match config.require_user_id() {
            Ok(user_id) => user_id.to_string(),
            Err(e) => error!("{}", e),
        },
    };

    let writer = match write_client(config).await {
        Ok(api) => api,
        Err(e) => error!("{}", e),
    };

    let pb = spinner(format!("Importing playlist {playlist_id}..."));
    let result =
        archiver::import_from_archive(&writer, &store(config), &user_id, playlist_id).await;
    pb.finish_and_clear();

    match result {
        Ok(ImportStatus::Created {
            playlist_id: created,
            tracks_added,
            batches,
        }) => success!(
            "Created playlist {} with {} tracks in {} batch(es)",
            created,
            tracks_added,
            batches
        ),
        Ok(ImportStatus::DuplicateSkip {
            existing_id,
            reason,
        }) => {
            let why = match reason {
                DuplicateReason::SameName => "same name",
                DuplicateReason::SameId => "same id",
            };
            info!("Playlist already exists ({}): {}", why, existing_id);
        }
        Err(e) => error!("Failed to import playlist {}: {}", playlist_id, e),
    }
}
