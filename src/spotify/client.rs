use reqwest::{Client, Response, StatusCode};

use crate::{
    config::Config,
    error::ArchiveError,
    fetch::{PagedSource, Pages},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, Paging, PlaylistSummary, RawPlaylist, RawPlaylistItem,
    },
};

use super::{ReadApi, USER_PLAYLISTS_PAGE_SIZE, WriteApi};

/// Spotify Web API client bound to a single bearer token.
///
/// Create one with a client-credentials token for reading and one with the
/// user's PKCE token for writing.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: String,
}

impl SpotifyClient {
    pub fn new(config: &Config, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    async fn get(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.http.get(url).bearer_auth(&self.token).send().await
    }

    /// One page of a playlist listing below `path`, e.g. `users/{id}/playlists`.
    async fn playlists_page(
        &self,
        path: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<PlaylistSummary>, ArchiveError> {
        let api_url = format!(
            "{uri}/{path}?limit={limit}&offset={offset}",
            uri = self.api_url,
        );

        let response = check_status(self.get(&api_url).await?, || path.to_string())?;
        let page = response.json::<Paging<PlaylistSummary>>().await?;
        Ok(page.items)
    }

    async fn list_playlists(&self, path: String) -> Result<Vec<PlaylistSummary>, ArchiveError> {
        Pages::new(PlaylistListing { client: self, path })
            .collect_all()
            .await
    }
}

/// Maps a non-success response to the error taxonomy. A 404 means the entity
/// does not exist; anything else is a failed remote call.
fn check_status<F>(response: Response, subject: F) -> Result<Response, ArchiveError>
where
    F: FnOnce() -> String,
{
    match response.error_for_status() {
        Ok(valid_response) => Ok(valid_response),
        Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => {
            Err(ArchiveError::NotFound(subject()))
        }
        Err(err) => Err(ArchiveError::RemoteCallFailure(err.to_string())),
    }
}

struct PlaylistListing<'a> {
    client: &'a SpotifyClient,
    path: String,
}

impl PagedSource for PlaylistListing<'_> {
    type Item = PlaylistSummary;

    fn page_size(&self) -> u32 {
        USER_PLAYLISTS_PAGE_SIZE
    }

    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<Vec<Self::Item>, ArchiveError> {
        self.client
            .playlists_page(&self.path, limit, offset)
            .await
    }
}

impl ReadApi for SpotifyClient {
    async fn get_playlist(&self, playlist_id: &str) -> Result<RawPlaylist, ArchiveError> {
        let api_url = format!(
            "{uri}/playlists/{id}?fields=id,name,description,owner,external_urls",
            uri = self.api_url,
            id = playlist_id
        );

        let response = check_status(self.get(&api_url).await?, || {
            format!("playlist {playlist_id}")
        })?;
        Ok(response.json::<RawPlaylist>().await?)
    }

    async fn get_playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<RawPlaylistItem>, ArchiveError> {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks?limit={limit}&offset={offset}",
            uri = self.api_url,
            id = playlist_id,
        );

        let response = check_status(self.get(&api_url).await?, || {
            format!("playlist {playlist_id}")
        })?;
        let page = response.json::<Paging<RawPlaylistItem>>().await?;
        Ok(page.items)
    }

    async fn get_user_playlists(
        &self,
        user_id: &str,
    ) -> Result<Vec<PlaylistSummary>, ArchiveError> {
        self.list_playlists(format!("users/{user_id}/playlists"))
            .await
    }
}

impl WriteApi for SpotifyClient {
    async fn get_own_playlists(&self) -> Result<Vec<PlaylistSummary>, ArchiveError> {
        self.list_playlists("me/playlists".to_string()).await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<PlaylistSummary, ArchiveError> {
        let api_url = format!("{uri}/users/{user_id}/playlists", uri = self.api_url);
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
            collaborative: false,
        };

        let response = self
            .http
            .post(&api_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, || format!("user {user_id}"))?;
        let created = response.json::<CreatePlaylistResponse>().await?;

        Ok(PlaylistSummary {
            id: created.id,
            name: created.name,
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), ArchiveError> {
        let api_url = format!("{uri}/playlists/{playlist_id}/tracks", uri = self.api_url);
        let body = AddTrackToPlaylistRequest {
            uris: track_ids
                .iter()
                .map(|id| format!("spotify:track:{id}"))
                .collect(),
        };

        let response = self
            .http
            .post(&api_url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, || format!("playlist {playlist_id}"))?;
        response.json::<AddTrackToPlaylistResponse>().await?;
        Ok(())
    }
}
