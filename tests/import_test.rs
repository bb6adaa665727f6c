mod common;

use common::*;
use sparcli::{
    error::ArchiveError,
    import::{DuplicateReason, ImportStatus, find_duplicate, import_playlist},
    types::PlaylistSummary,
};

fn summary(id: &str, name: &str) -> PlaylistSummary {
    PlaylistSummary {
        id: id.to_string(),
        name: name.to_string(),
    }
}

#[tokio::test]
async fn test_import_batches_tracks_in_order() {
    let api = FakeApi::default();
    let archived = playlist("pl1", "Road Trip", numbered_tracks(250));

    let status = import_playlist(&api, "me", &archived).await.unwrap();

    assert_eq!(
        status,
        ImportStatus::Created {
            playlist_id: "new-playlist".to_string(),
            tracks_added: 250,
            batches: 3,
        }
    );

    let added = api.added.borrow();
    let sizes: Vec<usize> = added.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    let flattened: Vec<String> = added.iter().flatten().cloned().collect();
    assert_eq!(flattened, archived.track_ids());
}

#[tokio::test]
async fn test_import_creates_private_playlist_named_after_archive() {
    let api = FakeApi::default();
    let archived = playlist("pl1", "Road Trip", numbered_tracks(3));

    import_playlist(&api, "me", &archived).await.unwrap();

    assert_eq!(
        *api.created.borrow(),
        vec![("me".to_string(), "Road Trip".to_string(), false)]
    );
}

#[tokio::test]
async fn test_import_empty_playlist_adds_nothing() {
    let api = FakeApi::default();
    let archived = playlist("pl1", "Empty", Vec::new());

    let status = import_playlist(&api, "me", &archived).await.unwrap();

    assert!(matches!(
        status,
        ImportStatus::Created {
            tracks_added: 0,
            batches: 0,
            ..
        }
    ));
    assert_eq!(api.created.borrow().len(), 1);
    assert!(api.added.borrow().is_empty());
}

#[tokio::test]
async fn test_import_skips_on_same_name() {
    let api = FakeApi {
        own_playlists: vec![summary("other", "Something"), summary("x9", "Road Trip")],
        ..Default::default()
    };
    let archived = playlist("pl1", "Road Trip", numbered_tracks(5));

    let status = import_playlist(&api, "me", &archived).await.unwrap();

    assert_eq!(
        status,
        ImportStatus::DuplicateSkip {
            existing_id: "x9".to_string(),
            reason: DuplicateReason::SameName,
        }
    );
    assert_eq!(api.write_calls(), 0);
}

#[tokio::test]
async fn test_import_skips_on_same_id() {
    let api = FakeApi {
        own_playlists: vec![summary("pl1", "Renamed since")],
        ..Default::default()
    };
    let archived = playlist("pl1", "Road Trip", numbered_tracks(5));

    let status = import_playlist(&api, "me", &archived).await.unwrap();

    assert!(matches!(
        status,
        ImportStatus::DuplicateSkip {
            reason: DuplicateReason::SameId,
            ..
        }
    ));
    assert_eq!(api.write_calls(), 0);
}

#[tokio::test]
async fn test_import_stops_after_failed_batch() {
    let api = FakeApi {
        fail_add_batch: Some(1),
        ..Default::default()
    };
    let archived = playlist("pl1", "Road Trip", numbered_tracks(250));

    let result = import_playlist(&api, "me", &archived).await;

    assert!(matches!(result, Err(ArchiveError::RemoteCallFailure(_))));
    assert_eq!(api.added.borrow().len(), 2);
}

#[test]
fn test_find_duplicate_none() {
    let archived = playlist("pl1", "Road Trip", Vec::new());
    let existing = vec![summary("a", "Road trip"), summary("b", "Road Trip 2")];

    assert_eq!(find_duplicate(&existing, &archived), None);
}

#[tokio::test]
async fn test_import_sees_private_copy_from_earlier_import() {
    let api = FakeApi {
        user_playlists: Vec::new(),
        own_playlists: vec![summary("copy1", "Road Trip")],
        ..Default::default()
    };
    let archived = playlist("pl1", "Road Trip", numbered_tracks(5));

    let status = import_playlist(&api, "me", &archived).await.unwrap();

    assert_eq!(
        status,
        ImportStatus::DuplicateSkip {
            existing_id: "copy1".to_string(),
            reason: DuplicateReason::SameName,
        }
    );
    assert_eq!(api.write_calls(), 0);
}

#[tokio::test]
async fn test_public_listing_does_not_drive_duplicate_check() {
    let api = FakeApi {
        user_playlists: vec![summary("x9", "Road Trip")],
        ..Default::default()
    };
    let archived = playlist("pl1", "Road Trip", numbered_tracks(1));

    let status = import_playlist(&api, "me", &archived).await.unwrap();

    assert!(matches!(status, ImportStatus::Created { .. }));
}
