//! Immutable domain model of an archived playlist.
//!
//! Every value is built once from a raw API record through `TryFrom` and is
//! never mutated afterwards. Fields the API contract guarantees are mandatory:
//! their absence is a [`ArchiveError::MalformedRecord`]. Fields the API is
//! known to omit use `Option` (external URLs) or a documented default
//! (`images` = empty, `total_tracks` = 0, `description` = empty).
//!
//! The serde form of [`Playlist`] is the archive's `output.json` document.

use serde::{Deserialize, Serialize};

use crate::{
    error::ArchiveError,
    types::{
        ExternalUrls, RawAlbum, RawArtist, RawImage, RawOwner, RawPlaylist, RawPlaylistItem,
        RawTrack,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Artists compare and hash by all of their fields, which makes them usable
/// directly as aggregation keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseDatePrecision {
    Day,
    Month,
    Year,
}

impl ReleaseDatePrecision {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "day" => Some(Self::Day),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub release_date: String,
    pub release_date_precision: ReleaseDatePrecision,
    pub artists: Vec<Artist>,
    pub images: Vec<Image>,
    pub url: Option<String>,
    pub total_tracks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: Album,
    pub duration_ms: u64,
    pub popularity: u8,
    pub url: Option<String>,
}

impl Track {
    /// Whole minutes and remaining seconds of the track, truncating milliseconds.
    pub fn minutes_and_seconds(&self) -> (u64, u64) {
        let seconds = self.duration_ms / 1000;
        (seconds / 60, seconds % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub display_name: String,
    pub url: Option<String>,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: Owner,
    pub tracks: Vec<Track>,
    pub url: Option<String>,
}

impl Playlist {
    /// Assembles a playlist from its header record and the complete, ordered
    /// track list.
    pub fn from_parts(header: RawPlaylist, tracks: Vec<Track>) -> Result<Self, ArchiveError> {
        let id = require(header.id, "playlist.id", "playlist")?;
        let context = format!("playlist {id}");
        Ok(Playlist {
            name: require(header.name, "playlist.name", &context)?,
            description: header.description.unwrap_or_default(),
            owner: Owner::try_from(require(header.owner, "playlist.owner", &context)?)?,
            url: spotify_url(header.external_urls),
            tracks,
            id,
        })
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.tracks.iter().map(|t| t.duration_ms).sum()
    }

    pub fn track_ids(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }
}

fn require<T>(value: Option<T>, field: &str, context: &str) -> Result<T, ArchiveError> {
    value.ok_or_else(|| ArchiveError::malformed(field, context))
}

fn spotify_url(urls: Option<ExternalUrls>) -> Option<String> {
    urls.and_then(|u| u.spotify)
}

fn convert_all<R, T>(raw: Vec<R>) -> Result<Vec<T>, ArchiveError>
where
    T: TryFrom<R, Error = ArchiveError>,
{
    raw.into_iter().map(T::try_from).collect()
}

impl TryFrom<RawImage> for Image {
    type Error = ArchiveError;

    fn try_from(raw: RawImage) -> Result<Self, Self::Error> {
        let url = require(raw.url, "image.url", "image")?;
        Ok(Image {
            width: require(raw.width, "image.width", &url)?,
            height: require(raw.height, "image.height", &url)?,
            url,
        })
    }
}

impl TryFrom<RawArtist> for Artist {
    type Error = ArchiveError;

    fn try_from(raw: RawArtist) -> Result<Self, Self::Error> {
        let id = require(raw.id, "artist.id", "artist")?;
        Ok(Artist {
            name: require(raw.name, "artist.name", &format!("artist {id}"))?,
            url: spotify_url(raw.external_urls),
            id,
        })
    }
}

impl TryFrom<RawAlbum> for Album {
    type Error = ArchiveError;

    fn try_from(raw: RawAlbum) -> Result<Self, Self::Error> {
        let id = require(raw.id, "album.id", "album")?;
        let context = format!("album {id}");
        let precision = require(
            raw.release_date_precision,
            "album.release_date_precision",
            &context,
        )?;

        Ok(Album {
            name: require(raw.name, "album.name", &context)?,
            release_date: require(raw.release_date, "album.release_date", &context)?,
            release_date_precision: ReleaseDatePrecision::parse(&precision).ok_or_else(|| {
                ArchiveError::malformed(
                    "album.release_date_precision",
                    format!("{context}: unknown precision {precision:?}"),
                )
            })?,
            artists: convert_all(require(raw.artists, "album.artists", &context)?)?,
            images: convert_all(raw.images.unwrap_or_default())?,
            url: spotify_url(raw.external_urls),
            total_tracks: raw.total_tracks.unwrap_or(0),
            id,
        })
    }
}

impl TryFrom<RawTrack> for Track {
    type Error = ArchiveError;

    fn try_from(raw: RawTrack) -> Result<Self, Self::Error> {
        let id = require(raw.id, "track.id", "track")?;
        let context = format!("track {id}");

        let artists: Vec<Artist> = convert_all(require(raw.artists, "track.artists", &context)?)?;
        if artists.is_empty() {
            return Err(ArchiveError::malformed(
                "track.artists",
                format!("{context}: no artists credited"),
            ));
        }

        let duration_ms = require(raw.duration_ms, "track.duration_ms", &context)?;
        let duration_ms = u64::try_from(duration_ms).map_err(|_| {
            ArchiveError::malformed(
                "track.duration_ms",
                format!("{context}: negative duration {duration_ms}"),
            )
        })?;

        let popularity = require(raw.popularity, "track.popularity", &context)?;
        let popularity = u8::try_from(popularity)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| {
                ArchiveError::malformed(
                    "track.popularity",
                    format!("{context}: popularity {popularity} outside 0..=100"),
                )
            })?;

        Ok(Track {
            name: require(raw.name, "track.name", &context)?,
            album: Album::try_from(require(raw.album, "track.album", &context)?)?,
            url: spotify_url(raw.external_urls),
            artists,
            duration_ms,
            popularity,
            id,
        })
    }
}

impl TryFrom<RawPlaylistItem> for Track {
    type Error = ArchiveError;

    fn try_from(item: RawPlaylistItem) -> Result<Self, Self::Error> {
        Track::try_from(require(item.track, "item.track", "playlist item")?)
    }
}

impl TryFrom<RawOwner> for Owner {
    type Error = ArchiveError;

    fn try_from(raw: RawOwner) -> Result<Self, Self::Error> {
        let id = require(raw.id, "owner.id", "owner")?;
        Ok(Owner {
            display_name: require(raw.display_name, "owner.display_name", &format!("owner {id}"))?,
            url: spotify_url(raw.external_urls),
            id,
        })
    }
}
