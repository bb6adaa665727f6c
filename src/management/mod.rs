mod archive;
mod auth;

pub use archive::ARCHIVE_JSON;
pub use archive::ARCHIVE_README;
pub use archive::ArchiveStore;
pub use archive::ArchivedPaths;
pub use auth::TokenManager;
