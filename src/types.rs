//! Wire-level records exchanged with the Spotify Web API and the token cache.
//!
//! The `Raw*` structs mirror the API's JSON with every field optional so that
//! absence can be reported precisely by the conversions in [`crate::models`].

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawImage {
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArtist {
    pub id: Option<String>,
    pub name: Option<String>,
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAlbum {
    pub id: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub release_date_precision: Option<String>,
    pub artists: Option<Vec<RawArtist>>,
    pub images: Option<Vec<RawImage>>,
    pub external_urls: Option<ExternalUrls>,
    pub total_tracks: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrack {
    pub id: Option<String>,
    pub name: Option<String>,
    pub artists: Option<Vec<RawArtist>>,
    pub album: Option<RawAlbum>,
    pub duration_ms: Option<i64>,
    pub popularity: Option<i64>,
    pub external_urls: Option<ExternalUrls>,
}

/// One entry of a playlist's track listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlaylistItem {
    pub track: Option<RawTrack>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOwner {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub external_urls: Option<ExternalUrls>,
}

/// Header fields of a playlist as returned by `GET /playlists/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPlaylist {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<RawOwner>,
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

/// Entry of a user's playlist listing, used for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentialsResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Tabled)]
pub struct ArchiveResultRow {
    pub playlist: String,
    pub status: String,
    pub location: String,
}
