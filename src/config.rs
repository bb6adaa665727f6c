//! Configuration management for the playlist archiver.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. The resolved values are collected once
//! into a [`Config`] which is handed to every component that talks to Spotify
//! or to the archive on disk.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-modify-private";
pub const DEFAULT_ARCHIVE_DIR: &str = "archive";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Failed to prepare data directory {0}: {1}")]
    DataDir(PathBuf, std::io::Error),

    #[error("Failed to read {0}: {1}")]
    EnvFile(PathBuf, String),
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives under `sparcli/.env` in the platform data directory:
/// - Linux: `~/.local/share/sparcli/.env`
/// - macOS: `~/Library/Application Support/sparcli/.env`
/// - Windows: `%LOCALAPPDATA%/sparcli/.env`
///
/// A missing file is fine; variables already exported in the process
/// environment are used as-is. A file that exists but cannot be parsed is an
/// error.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::DataDir(parent.to_path_buf(), e))?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::EnvFile(path.clone(), e.to_string()))?;
    }
    Ok(())
}

/// Returns the platform data directory used for `.env`, caches and tokens.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sparcli");
    path
}

fn env_file_path() -> PathBuf {
    data_dir().join(".env")
}

/// Resolved runtime configuration, created once per process run.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SPOTIFY_API_AUTH_CLIENT_ID`
    pub client_id: String,
    /// `SPOTIFY_API_AUTH_CLIENT_SECRET`, only needed for the read credential.
    pub client_secret: Option<String>,
    /// `SPOTIFY_USER_ID`, the account playlists are imported into.
    pub user_id: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Bind address of the local OAuth callback server.
    pub server_addr: String,
    /// Root of the on-disk archive tree.
    pub archive_dir: PathBuf,
}

impl Config {
    /// Builds the configuration from the current process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            client_id: get("SPOTIFY_API_AUTH_CLIENT_ID")
                .ok_or(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_ID"))?,
            client_secret: get("SPOTIFY_API_AUTH_CLIENT_SECRET"),
            user_id: get("SPOTIFY_USER_ID"),
            redirect_uri: or_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            api_url: or_default("SPOTIFY_API_URL", DEFAULT_API_URL),
            server_addr: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            archive_dir: PathBuf::from(or_default("SPARCLI_ARCHIVE_DIR", DEFAULT_ARCHIVE_DIR)),
        })
    }

    pub fn require_client_secret(&self) -> Result<&str, ConfigError> {
        self.client_secret
            .as_deref()
            .ok_or(ConfigError::Missing("SPOTIFY_API_AUTH_CLIENT_SECRET"))
    }

    pub fn require_user_id(&self) -> Result<&str, ConfigError> {
        self.user_id
            .as_deref()
            .ok_or(ConfigError::Missing("SPOTIFY_USER_ID"))
    }
}
