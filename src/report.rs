//! Human-readable summary of a [`Playlist`].
//!
//! The report is plain markdown, composed in a fixed order: title, source URL,
//! description, owner, statistics and the per-track table. Rendering is a pure
//! function of the playlist, so the same playlist always yields byte-identical
//! text. [`render_html`] runs the same markdown through `pulldown-cmark`.

use std::collections::HashMap;

use pulldown_cmark::{Options, Parser, html};
use tabled::{Table, Tabled, settings::Style};

use crate::{
    models::{Artist, Playlist, Track},
    utils::format_duration,
};

/// Number of artists listed as primary artists.
pub const PRIMARY_ARTIST_COUNT: usize = 3;

/// Aggregate facts shown in the statistics block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistStats<'a> {
    pub track_count: usize,
    /// Total play time as (minutes, seconds).
    pub total_duration: (u64, u64),
    /// Top artists with their track-appearance counts.
    pub primary_artists: Vec<(&'a Artist, usize)>,
}

impl<'a> PlaylistStats<'a> {
    pub fn from_playlist(playlist: &'a Playlist) -> Self {
        let total_seconds = playlist.total_duration_ms() / 1000;
        Self {
            track_count: playlist.tracks.len(),
            total_duration: (total_seconds / 60, total_seconds % 60),
            primary_artists: primary_artists(&playlist.tracks, PRIMARY_ARTIST_COUNT),
        }
    }
}

/// Ranks artists by the number of track credits they hold.
///
/// Artists are grouped by value, so equal artists coming from different
/// tracks share one count. The ranking is a stable sort by descending count:
/// artists with equal counts keep the order in which they first appear in the
/// track list.
pub fn primary_artists(tracks: &[Track], limit: usize) -> Vec<(&Artist, usize)> {
    let mut index: HashMap<&Artist, usize> = HashMap::new();
    let mut counts: Vec<(&Artist, usize)> = Vec::new();

    for artist in tracks.iter().flat_map(|t| t.artists.iter()) {
        match index.get(artist) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                index.insert(artist, counts.len());
                counts.push((artist, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

#[derive(Tabled)]
struct TrackRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Artists")]
    artists: String,
    #[tabled(rename = "Album")]
    album: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Popularity")]
    popularity: u8,
}

impl TrackRow {
    fn new(position: usize, track: &Track) -> Self {
        let (minutes, seconds) = track.minutes_and_seconds();
        Self {
            position,
            title: link(&track.name, track.url.as_deref()),
            artists: track
                .artists
                .iter()
                .map(|a| escape(&a.name))
                .collect::<Vec<_>>()
                .join(" & "),
            album: link(&track.album.name, track.album.url.as_deref()),
            duration: format_duration(minutes, seconds),
            popularity: track.popularity,
        }
    }
}

/// Renders the markdown report that is archived as `README.md`.
pub fn render_markdown(playlist: &Playlist) -> String {
    let stats = PlaylistStats::from_playlist(playlist);
    let mut out = String::new();

    out.push_str(&title_line(&playlist.name));
    out.push_str("\n\n");

    match &playlist.url {
        Some(url) => out.push_str(&format!("Source: <{url}>\n\n")),
        None => out.push_str("Source: unavailable\n\n"),
    }

    if playlist.description.trim().is_empty() {
        out.push_str("> _No description_\n\n");
    } else {
        for line in playlist.description.lines() {
            out.push_str(&format!("> {line}\n"));
        }
        out.push('\n');
    }

    out.push_str("## Owner\n\n");
    out.push_str(&link(&playlist.owner.display_name, playlist.owner.url.as_deref()));
    out.push_str("\n\n");

    out.push_str("## Statistics\n\n");
    out.push_str(&format!("- Tracks: {}\n", stats.track_count));
    out.push_str(&format!(
        "- Total duration: {}\n",
        format_duration(stats.total_duration.0, stats.total_duration.1)
    ));
    let primary = stats
        .primary_artists
        .iter()
        .map(|(artist, count)| format!("{} ({count})", link(&artist.name, artist.url.as_deref())))
        .collect::<Vec<_>>();
    if primary.is_empty() {
        out.push_str("- Primary artists: none\n\n");
    } else {
        out.push_str(&format!("- Primary artists: {}\n\n", primary.join(", ")));
    }

    out.push_str("## Tracks\n\n");
    let rows = playlist
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| TrackRow::new(i + 1, track));
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    out.push_str(&table.to_string());
    out.push('\n');

    out
}

/// Renders the report as an HTML fragment.
pub fn render_html(playlist: &Playlist) -> String {
    let markdown = render_markdown(playlist);
    let parser = Parser::new_ext(&markdown, Options::ENABLE_TABLES);
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}

/// A name that already is an ATX heading (one to six `#` followed by a space
/// or nothing) is used verbatim. `#1 Hits` is not a heading.
fn title_line(name: &str) -> String {
    if is_heading(name) {
        name.to_string()
    } else {
        format!("# {name}")
    }
}

fn is_heading(line: &str) -> bool {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();
    (1..=6).contains(&level) && (rest.is_empty() || rest.starts_with(' '))
}

fn link(text: &str, url: Option<&str>) -> String {
    match url {
        Some(url) => format!("[{}]({})", escape(text), url),
        None => escape(text),
    }
}

/// Escapes characters that would break link text or table cells.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '|' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
