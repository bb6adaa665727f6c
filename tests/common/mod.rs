#![allow(dead_code)]

use std::cell::RefCell;

use sparcli::{
    error::ArchiveError,
    models::{Album, Artist, Owner, Playlist, ReleaseDatePrecision, Track},
    spotify::{ReadApi, WriteApi},
    types::{
        ExternalUrls, PlaylistSummary, RawAlbum, RawArtist, RawImage, RawOwner, RawPlaylist,
        RawPlaylistItem, RawTrack,
    },
};

pub fn urls(url: &str) -> Option<ExternalUrls> {
    Some(ExternalUrls {
        spotify: Some(url.to_string()),
    })
}

pub fn raw_artist(id: &str, name: &str) -> RawArtist {
    RawArtist {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        external_urls: urls(&format!("https://open.spotify.com/artist/{id}")),
    }
}

pub fn raw_album(id: &str) -> RawAlbum {
    RawAlbum {
        id: Some(id.to_string()),
        name: Some(format!("Album {id}")),
        release_date: Some("2021-04-09".to_string()),
        release_date_precision: Some("day".to_string()),
        artists: Some(vec![raw_artist("a1", "Artist One")]),
        images: Some(vec![RawImage {
            url: Some(format!("https://i.scdn.co/image/{id}")),
            width: Some(640),
            height: Some(640),
        }]),
        external_urls: urls(&format!("https://open.spotify.com/album/{id}")),
        total_tracks: Some(12),
    }
}

pub fn raw_track(id: &str) -> RawTrack {
    RawTrack {
        id: Some(id.to_string()),
        name: Some(format!("Track {id}")),
        artists: Some(vec![raw_artist("a1", "Artist One")]),
        album: Some(raw_album("al1")),
        duration_ms: Some(215_000),
        popularity: Some(50),
        external_urls: urls(&format!("https://open.spotify.com/track/{id}")),
    }
}

pub fn raw_item(id: &str) -> RawPlaylistItem {
    RawPlaylistItem {
        track: Some(raw_track(id)),
    }
}

pub fn raw_header(id: &str, name: &str) -> RawPlaylist {
    RawPlaylist {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        description: Some("Songs for the road".to_string()),
        owner: Some(RawOwner {
            id: Some("owner1".to_string()),
            display_name: Some("Owner One".to_string()),
            external_urls: urls("https://open.spotify.com/user/owner1"),
        }),
        external_urls: urls(&format!("https://open.spotify.com/playlist/{id}")),
    }
}

pub fn artist(id: &str, name: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
        url: Some(format!("https://open.spotify.com/artist/{id}")),
    }
}

pub fn album(id: &str) -> Album {
    Album {
        id: id.to_string(),
        name: format!("Album {id}"),
        release_date: "2021".to_string(),
        release_date_precision: ReleaseDatePrecision::Year,
        artists: vec![artist("a1", "Artist One")],
        images: Vec::new(),
        url: None,
        total_tracks: 0,
    }
}

pub fn track(id: &str, artists: Vec<Artist>, duration_ms: u64) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Track {id}"),
        artists,
        album: album("al1"),
        duration_ms,
        popularity: 42,
        url: Some(format!("https://open.spotify.com/track/{id}")),
    }
}

pub fn playlist(id: &str, name: &str, tracks: Vec<Track>) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: name.to_string(),
        description: "Songs for the road".to_string(),
        owner: Owner {
            display_name: "Owner One".to_string(),
            url: Some("https://open.spotify.com/user/owner1".to_string()),
            id: "owner1".to_string(),
        },
        tracks,
        url: Some(format!("https://open.spotify.com/playlist/{id}")),
    }
}

pub fn numbered_tracks(count: usize) -> Vec<Track> {
    (0..count)
        .map(|i| track(&format!("t{i}"), vec![artist("a1", "Artist One")], 180_000))
        .collect()
}

/// In-memory remote service that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub header: Option<RawPlaylist>,
    /// Sizes of the pages served for the track listing, in order. Requests
    /// past the last configured page get an empty page.
    pub page_sizes: Vec<usize>,
    pub fail_page: Option<usize>,
    /// Playlists listed through the read credential (public ones only).
    pub user_playlists: Vec<PlaylistSummary>,
    /// Playlists listed through the user credential, private ones included.
    pub own_playlists: Vec<PlaylistSummary>,
    pub fail_add_batch: Option<usize>,

    pub page_requests: RefCell<Vec<(u32, u32)>>,
    pub created: RefCell<Vec<(String, String, bool)>>,
    pub added: RefCell<Vec<Vec<String>>>,
}

impl FakeApi {
    pub fn with_pages(page_sizes: &[usize]) -> Self {
        Self {
            header: Some(raw_header("pl1", "Road Trip")),
            page_sizes: page_sizes.to_vec(),
            ..Default::default()
        }
    }

    pub fn write_calls(&self) -> usize {
        self.created.borrow().len() + self.added.borrow().len()
    }
}

impl ReadApi for FakeApi {
    async fn get_playlist(&self, playlist_id: &str) -> Result<RawPlaylist, ArchiveError> {
        self.header
            .clone()
            .ok_or_else(|| ArchiveError::NotFound(format!("playlist {playlist_id}")))
    }

    async fn get_playlist_tracks(
        &self,
        _playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RawPlaylistItem>, ArchiveError> {
        let call = self.page_requests.borrow().len();
        self.page_requests.borrow_mut().push((limit, offset));
        if self.fail_page == Some(call) {
            return Err(ArchiveError::RemoteCallFailure("502 Bad Gateway".into()));
        }

        let size = self.page_sizes.get(call).copied().unwrap_or(0);
        Ok((0..size)
            .map(|i| raw_item(&format!("t{}", offset as usize + i)))
            .collect())
    }

    async fn get_user_playlists(
        &self,
        _user_id: &str,
    ) -> Result<Vec<PlaylistSummary>, ArchiveError> {
        Ok(self.user_playlists.clone())
    }
}

impl WriteApi for FakeApi {
    async fn get_own_playlists(&self) -> Result<Vec<PlaylistSummary>, ArchiveError> {
        Ok(self.own_playlists.clone())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        _description: &str,
        public: bool,
    ) -> Result<PlaylistSummary, ArchiveError> {
        self.created
            .borrow_mut()
            .push((user_id.to_string(), name.to_string(), public));
        Ok(PlaylistSummary {
            id: "new-playlist".to_string(),
            name: name.to_string(),
        })
    }

    async fn add_tracks(
        &self,
        _playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ArchiveError> {
        let call = self.added.borrow().len();
        self.added.borrow_mut().push(track_ids.to_vec());
        if self.fail_add_batch == Some(call) {
            return Err(ArchiveError::RemoteCallFailure("429 Too Many Requests".into()));
        }
        Ok(())
    }
}
