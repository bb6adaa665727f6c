mod common;

use common::*;
use sparcli::{
    archiver::{
        ReportFormat, archive_all_for_user, fetch_and_archive, import_from_archive,
        report_for_archive,
    },
    error::ArchiveError,
    import::ImportStatus,
    management::{ARCHIVE_JSON, ARCHIVE_README, ArchiveStore},
    models::Playlist,
    report::render_markdown,
    types::PlaylistSummary,
};
use tempfile::TempDir;

fn store() -> (TempDir, ArchiveStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let store = ArchiveStore::new(dir.path());
    (dir, store)
}

#[tokio::test]
async fn test_write_layout_and_round_trip() {
    let (_dir, store) = store();
    let original = playlist("pl1", "Road Trip", numbered_tracks(4));

    let paths = store
        .write(&original, &render_markdown(&original))
        .await
        .unwrap();

    assert_eq!(
        paths.json,
        store
            .root()
            .join("playlists/Owner One_owner1/pl1")
            .join(ARCHIVE_JSON)
    );
    assert_eq!(paths.readme, paths.dir.join(ARCHIVE_README));
    assert!(paths.readme.is_file());
    assert!(!paths.dir.join("output.json.tmp").exists());
    assert!(!paths.dir.join("README.md.tmp").exists());

    let restored = store.load("pl1").await.unwrap();
    assert_eq!(restored, original);
}

#[tokio::test]
async fn test_json_is_pretty_and_keeps_non_ascii() {
    let (_dir, store) = store();
    let original = playlist("pl1", "夏の歌", numbered_tracks(1));

    let paths = store.write(&original, "readme").await.unwrap();
    let json = std::fs::read_to_string(&paths.json).unwrap();

    assert!(json.contains("夏の歌"));
    assert!(json.starts_with("{\n  \"id\": \"pl1\""));
    let readme = std::fs::read_to_string(&paths.readme).unwrap();
    assert_eq!(readme, "readme");
}

#[tokio::test]
async fn test_owner_name_is_sanitized() {
    let (_dir, store) = store();
    let mut original = playlist("pl1", "Road Trip", Vec::new());
    original.owner.display_name = "AC/DC".into();

    let paths = store.write(&original, "readme").await.unwrap();

    assert!(paths.dir.starts_with(store.root().join("playlists")));
    assert_eq!(
        paths.dir.parent().and_then(|p| p.parent()),
        Some(store.root().join("playlists").as_path())
    );
}

#[tokio::test]
async fn test_find_missing_archive_is_not_found() {
    let (_dir, store) = store();

    assert!(matches!(
        store.load("missing").await,
        Err(ArchiveError::NotFound(_))
    ));

    let other = playlist("pl2", "Other", Vec::new());
    store.write(&other, "readme").await.unwrap();
    assert!(matches!(
        store.find("missing").await,
        Err(ArchiveError::NotFound(_))
    ));
}

/// Puts a non-empty directory at `name` inside the archive directory of
/// `playlist`, so that writing or renaming a file onto it fails.
fn block_with_directory(store: &ArchiveStore, playlist: &Playlist, name: &str) {
    let blocker = store.playlist_dir(playlist).join(name);
    std::fs::create_dir_all(blocker.join("keep")).unwrap();
}

fn leftover_files(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().unwrap().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test]
async fn test_failed_staging_writes_nothing() {
    let (_dir, store) = store();
    let original = playlist("pl1", "Road Trip", numbered_tracks(2));
    block_with_directory(&store, &original, "README.md.tmp");

    let result = store.write(&original, "readme").await;

    assert!(matches!(result, Err(ArchiveError::Io(_))));
    assert!(leftover_files(&store.playlist_dir(&original)).is_empty());
}

#[tokio::test]
async fn test_failed_json_rename_writes_nothing() {
    let (_dir, store) = store();
    let original = playlist("pl1", "Road Trip", numbered_tracks(2));
    block_with_directory(&store, &original, ARCHIVE_JSON);

    let result = store.write(&original, "readme").await;

    assert!(matches!(result, Err(ArchiveError::Io(_))));
    let dir = store.playlist_dir(&original);
    assert!(dir.join(ARCHIVE_JSON).is_dir());
    assert!(leftover_files(&dir).is_empty());
}

#[tokio::test]
async fn test_failed_readme_rename_removes_new_json() {
    let (_dir, store) = store();
    let original = playlist("pl1", "Road Trip", numbered_tracks(2));
    block_with_directory(&store, &original, ARCHIVE_README);

    let result = store.write(&original, "readme").await;

    assert!(matches!(result, Err(ArchiveError::Io(_))));
    let dir = store.playlist_dir(&original);
    assert!(!dir.join(ARCHIVE_JSON).exists());
    assert!(leftover_files(&dir).is_empty());
}

#[tokio::test]
async fn test_failed_rewrite_restores_previous_archive() {
    let (_dir, store) = store();
    let first = playlist("pl1", "Road Trip", numbered_tracks(2));
    let paths = store.write(&first, "first readme").await.unwrap();

    // Replace the README with a directory so the second commit fails halfway.
    std::fs::remove_file(&paths.readme).unwrap();
    block_with_directory(&store, &first, ARCHIVE_README);
    let second = playlist("pl1", "Road Trip", numbered_tracks(7));

    let result = store.write(&second, "second readme").await;

    assert!(result.is_err());
    assert_eq!(store.load("pl1").await.unwrap(), first);
    assert_eq!(leftover_files(&paths.dir), vec![ARCHIVE_JSON.to_string()]);
}

#[tokio::test]
async fn test_rewrite_replaces_pair_without_backups() {
    let (_dir, store) = store();
    let first = playlist("pl1", "Road Trip", numbered_tracks(2));
    store.write(&first, "first readme").await.unwrap();
    let second = playlist("pl1", "Road Trip", numbered_tracks(7));

    let paths = store.write(&second, "second readme").await.unwrap();

    assert_eq!(store.load("pl1").await.unwrap(), second);
    assert_eq!(std::fs::read_to_string(&paths.readme).unwrap(), "second readme");
    let mut files = leftover_files(&paths.dir);
    files.sort();
    assert_eq!(files, vec![ARCHIVE_README.to_string(), ARCHIVE_JSON.to_string()]);
}

#[tokio::test]
async fn test_find_ignores_directory_named_like_archive() {
    let (_dir, store) = store();
    let original = playlist("pl1", "Road Trip", Vec::new());
    block_with_directory(&store, &original, ARCHIVE_JSON);

    assert!(matches!(
        store.find("pl1").await,
        Err(ArchiveError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_fetch_and_archive_writes_pair() {
    let (_dir, store) = store();
    let api = FakeApi::with_pages(&[100, 20]);

    let paths = fetch_and_archive(&api, &store, "pl1").await.unwrap();

    let archived: Playlist =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
    assert_eq!(archived.tracks.len(), 120);
    let readme = std::fs::read_to_string(&paths.readme).unwrap();
    assert_eq!(readme, render_markdown(&archived));
}

#[tokio::test]
async fn test_failed_fetch_writes_nothing() {
    let (dir, store) = store();
    let api = FakeApi {
        fail_page: Some(1),
        ..FakeApi::with_pages(&[100, 100, 3])
    };

    let result = fetch_and_archive(&api, &store, "pl1").await;

    assert!(result.is_err());
    assert!(!dir.path().join("playlists").exists());
}

#[tokio::test]
async fn test_archive_all_for_user_collects_results() {
    let (_dir, store) = store();
    let api = FakeApi {
        user_playlists: vec![
            PlaylistSummary {
                id: "pl1".into(),
                name: "Road Trip".into(),
            },
            PlaylistSummary {
                id: "pl2".into(),
                name: "Road Trip".into(),
            },
        ],
        ..FakeApi::with_pages(&[2, 3])
    };

    let results = archive_all_for_user(&api, &store, "owner1").await.unwrap();

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.result.is_ok()));
    assert_eq!(results[0].playlist.id, "pl1");
}

#[tokio::test]
async fn test_import_from_archive_round_trip() {
    let (_dir, store) = store();
    let original = playlist("pl1", "Road Trip", numbered_tracks(120));
    store.write(&original, "readme").await.unwrap();
    let api = FakeApi::default();

    let status = import_from_archive(&api, &store, "me", "pl1")
        .await
        .unwrap();

    assert!(matches!(
        status,
        ImportStatus::Created {
            tracks_added: 120,
            batches: 2,
            ..
        }
    ));
}

#[tokio::test]
async fn test_report_for_archive() {
    let (_dir, store) = store();
    let original = playlist("pl1", "Road Trip", numbered_tracks(2));
    store.write(&original, "readme").await.unwrap();

    let markdown = report_for_archive(&store, "pl1", ReportFormat::Markdown)
        .await
        .unwrap();
    let html = report_for_archive(&store, "pl1", ReportFormat::Html)
        .await
        .unwrap();

    assert_eq!(markdown, render_markdown(&original));
    assert!(html.starts_with("<h1>Road Trip</h1>"));
}
