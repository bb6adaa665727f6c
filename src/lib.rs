//! Spotify Playlist Archiver Library
//!
//! This library archives playlists from Spotify into local files (a JSON
//! document plus a markdown report) and can re-create an archived playlist
//! for an authenticated user.
//!
//! # Modules
//!
//! - `api` - HTTP endpoint for the local OAuth callback server
//! - `archiver` - Entry points: archive, archive a user's playlists, import, report
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy
//! - `fetch` - Paginated playlist retrieval
//! - `import` - Duplicate detection and batched playlist creation
//! - `management` - Archive tree and token cache on disk
//! - `models` - Immutable playlist domain model
//! - `report` - Playlist statistics and markdown / HTML report
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Wire-level data structures
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use sparcli::{config, archiver, management::ArchiveStore, spotify::SpotifyClient};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> sparcli::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     let token = sparcli::spotify::auth::client_credentials(&config).await?;
//!     let api = SpotifyClient::new(&config, token);
//!     archiver::fetch_and_archive(&api, &ArchiveStore::new(&config.archive_dir), "37i9dQZF1DXcBWIGoYBM5M").await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod archiver;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod import;
pub mod management;
pub mod models;
pub mod report;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use sparcli::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Archiving playlist...");
/// info!("Fetched {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// success!("Archived {} playlists", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("Playlist has no description");
/// warning!("{} playlist(s) could not be archived", failures);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
