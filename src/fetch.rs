//! Paginated retrieval of a playlist into a fully materialized [`Playlist`].
//!
//! Offset pagination is modelled as [`Pages`], a lazy, finite stream of pages
//! over any [`PagedSource`]. The stream ends after the first page holding
//! fewer items than the page size, so a listing whose length is an exact
//! multiple of the page size costs one extra request that comes back empty.
//! Pages are never reordered, deduplicated or retried.

use crate::{
    error::ArchiveError,
    info,
    models::{Playlist, Track},
    spotify::{PLAYLIST_TRACKS_PAGE_SIZE, ReadApi},
    types::RawPlaylistItem,
};

/// A remote listing that can be read one offset-addressed page at a time.
#[allow(async_fn_in_trait)]
pub trait PagedSource {
    type Item;

    fn page_size(&self) -> u32;

    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<Vec<Self::Item>, ArchiveError>;
}

/// Lazy sequence of pages from a [`PagedSource`].
///
/// Once the terminal page has been yielded, or a page request failed, every
/// further call to [`Pages::next_page`] returns `None`.
pub struct Pages<S> {
    source: S,
    offset: u32,
    requests: usize,
    finished: bool,
}

impl<S: PagedSource> Pages<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            offset: 0,
            requests: 0,
            finished: false,
        }
    }

    pub async fn next_page(&mut self) -> Option<Result<Vec<S::Item>, ArchiveError>> {
        if self.finished {
            return None;
        }

        let limit = self.source.page_size().max(1);
        self.requests += 1;
        match self.source.fetch_page(limit, self.offset).await {
            Ok(items) => {
                let received = u32::try_from(items.len()).unwrap_or(u32::MAX);
                if received < limit {
                    self.finished = true;
                }
                self.offset = self.offset.saturating_add(received);
                Some(Ok(items))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }

    /// Drains the stream, concatenating pages in response order.
    pub async fn collect_all(mut self) -> Result<Vec<S::Item>, ArchiveError> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await {
            all.extend(page?);
        }
        Ok(all)
    }

    /// Number of page requests issued so far.
    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// The item listing of one playlist.
pub struct PlaylistItems<'a, A> {
    api: &'a A,
    playlist_id: &'a str,
}

impl<'a, A: ReadApi> PlaylistItems<'a, A> {
    pub fn new(api: &'a A, playlist_id: &'a str) -> Self {
        Self { api, playlist_id }
    }
}

impl<A: ReadApi> PagedSource for PlaylistItems<'_, A> {
    type Item = RawPlaylistItem;

    fn page_size(&self) -> u32 {
        PLAYLIST_TRACKS_PAGE_SIZE
    }

    async fn fetch_page(&self, limit: u32, offset: u32) -> Result<Vec<Self::Item>, ArchiveError> {
        self.api
            .get_playlist_tracks(self.playlist_id, limit, offset)
            .await
    }
}

/// Fetches a playlist's header and every one of its tracks.
///
/// Any failed page request or malformed item aborts the whole fetch; a
/// partially fetched playlist is never returned.
pub async fn fetch_playlist<A: ReadApi>(
    api: &A,
    playlist_id: &str,
) -> Result<Playlist, ArchiveError> {
    let header = api.get_playlist(playlist_id).await?;

    let mut pages = Pages::new(PlaylistItems::new(api, playlist_id));
    let mut tracks: Vec<Track> = Vec::new();
    while let Some(page) = pages.next_page().await {
        for item in page? {
            tracks.push(Track::try_from(item)?);
        }
    }

    info!(
        "Fetched {} tracks of playlist {} in {} page request(s)",
        tracks.len(),
        playlist_id,
        pages.requests()
    );

    Playlist::from_parts(header, tracks)
}
