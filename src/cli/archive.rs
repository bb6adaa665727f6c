use tabled::{Table, settings::Style};

use crate::{
    archiver, config::Config, error, info, success, types::ArchiveResultRow, warning,
};

use super::{read_client, spinner, store};

pub async fn archive(config: &Config, playlist_id: &str) {
    let api = match read_client(config).await {
        Ok(api) => api,
        Err(e) => error!("{}", e),
    };

    let pb = spinner(format!("Archiving playlist {playlist_id}..."));
    let result = archiver::fetch_and_archive(&api, &store(config), playlist_id).await;
    pb.finish_and_clear();

    match result {
        Ok(paths) => {
            success!("Archived playlist {}", playlist_id);
            info!("{}", paths.json.display());
            info!("{}", paths.readme.display());
        }
        Err(e) => error!("Failed to archive playlist {}: {}", playlist_id, e),
    }
}

pub async fn archive_user(config: &Config, user_id: &str) {
    let api = match read_client(config).await {
        Ok(api) => api,
        Err(e) => error!("{}", e),
    };

    let pb = spinner(format!("Archiving playlists of {user_id}..."));
    let results = archiver::archive_all_for_user(&api, &store(config), user_id).await;
    pb.finish_and_clear();

    let results = match results {
        Ok(results) => results,
        Err(e) => error!("Failed to list playlists of {}: {}", user_id, e),
    };

    if results.is_empty() {
        warning!("User {} has no playlists", user_id);
        return;
    }

    let failures = results.iter().filter(|r| r.result.is_err()).count();
    let rows = results.into_iter().map(|r| match r.result {
        Ok(paths) => ArchiveResultRow {
            playlist: r.playlist.name,
            status: "archived".to_string(),
            location: paths.dir.display().to_string(),
        },
        Err(e) => ArchiveResultRow {
            playlist: r.playlist.name,
            status: "failed".to_string(),
            location: e.to_string(),
        },
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if failures > 0 {
        warning!("{} playlist(s) could not be archived", failures);
    } else {
        success!("All playlists of {} archived", user_id);
    }
}
