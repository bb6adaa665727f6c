//! # CLI Module
//!
//! User-facing commands. Each command resolves its credentials, calls one of
//! the entry points in [`crate::archiver`] and reports the outcome with the
//! crate's output macros.
//!
//! - [`auth`] - OAuth PKCE login; stores the user token used for writes
//! - [`archive`] - fetch one playlist and write its archive
//! - [`archive_user`] - archive every playlist of a user
//! - [`import`] - re-create an archived playlist for the configured user
//! - [`report`] - print the report of an archived playlist
//!
//! ```bash
//! sparcli auth
//! sparcli archive --id 37i9dQZF1DXcBWIGoYBM5M
//! sparcli archive-user --user spotify
//! sparcli import --id 37i9dQZF1DXcBWIGoYBM5M
//! sparcli report --id 37i9dQZF1DXcBWIGoYBM5M --html
//! ```

mod archive;
mod auth;
mod import;
mod report;

pub use archive::archive;
pub use archive::archive_user;
pub use auth::auth;
pub use import::import;
pub use report::report;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    config::Config,
    error::ArchiveError,
    management::{ArchiveStore, TokenManager},
    spotify::{self, SpotifyClient},
};

fn spinner(message: impl Into<std::borrow::Cow<'static, str>>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Client authorized with the app-only read credential.
async fn read_client(config: &Config) -> Result<SpotifyClient, ArchiveError> {
    let token = spotify::auth::client_credentials(config).await?;
    Ok(SpotifyClient::new(config, token))
}

/// Client authorized with the user token stored by `sparcli auth`.
async fn write_client(config: &Config) -> Result<SpotifyClient, ArchiveError> {
    let mut token_mgr = TokenManager::load().await.map_err(|e| {
        ArchiveError::Auth(format!(
            "Failed to load token. Please run sparcli auth\n Error: {e}"
        ))
    })?;
    let token = token_mgr
        .get_valid_token(config)
        .await
        .map_err(ArchiveError::Auth)?;
    Ok(SpotifyClient::new(config, token))
}

fn store(config: &Config) -> ArchiveStore {
    ArchiveStore::new(&config.archive_dir)
}
