//! # Spotify Integration Module
//!
//! Remote collaborators of the archiver. The core logic only sees the
//! [`ReadApi`] and [`WriteApi`] traits; [`SpotifyClient`] implements both over
//! the Spotify Web API with `reqwest`.
//!
//! ```text
//! Archiver / Importer
//!          ↓
//!   ReadApi / WriteApi
//!          ↓
//!   SpotifyClient (reqwest, bearer token)
//!          ↓
//!   Spotify Web API
//! ```
//!
//! Two credentials are in play:
//! - the read credential comes from the client-credentials grant
//!   ([`auth::client_credentials`]) and is enough for public playlists;
//! - the write credential is a user token obtained through the PKCE flow
//!   ([`auth::auth`]) and is needed to create playlists and add tracks.
//!
//! ## API Coverage
//!
//! - `GET /playlists/{id}` - playlist header
//! - `GET /playlists/{id}/tracks` - paginated playlist items
//! - `GET /users/{user_id}/playlists` - public playlists of a user
//! - `GET /me/playlists` - playlists of the token's user, private ones included
//! - `POST /users/{user_id}/playlists` - create a playlist
//! - `POST /playlists/{id}/tracks` - add up to 100 tracks
//!
//! No call is retried here. Failures surface as
//! [`ArchiveError::RemoteCallFailure`], and a 404 on a playlist lookup as
//! [`ArchiveError::NotFound`].

pub mod auth;
mod client;

pub use client::SpotifyClient;

use crate::{
    error::ArchiveError,
    types::{PlaylistSummary, RawPlaylist, RawPlaylistItem},
};

/// Page size used for playlist track listings.
pub const PLAYLIST_TRACKS_PAGE_SIZE: u32 = 100;

/// Page size used for user playlist listings.
pub const USER_PLAYLISTS_PAGE_SIZE: u32 = 50;

/// Maximum number of tracks accepted by one add-tracks call.
pub const ADD_TRACKS_BATCH_SIZE: usize = 100;

/// Read side of the remote service.
#[allow(async_fn_in_trait)]
pub trait ReadApi {
    /// Fetches a playlist's header fields. Fails with `NotFound` when the
    /// service has no such playlist.
    async fn get_playlist(&self, playlist_id: &str) -> Result<RawPlaylist, ArchiveError>;

    /// Fetches one page of a playlist's items.
    async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RawPlaylistItem>, ArchiveError>;

    /// Lists every playlist of a user visible to the read credential. An
    /// app-only token sees public playlists only.
    async fn get_user_playlists(&self, user_id: &str)
    -> Result<Vec<PlaylistSummary>, ArchiveError>;
}

/// Write side of the remote service, backed by a user credential.
#[allow(async_fn_in_trait)]
pub trait WriteApi {
    /// Lists every playlist of the credential's user, private ones included.
    async fn get_own_playlists(&self) -> Result<Vec<PlaylistSummary>, ArchiveError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistSummary, ArchiveError>;

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[String])
    -> Result<(), ArchiveError>;
}
