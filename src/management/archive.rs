use std::path::{Path, PathBuf};

use futures::StreamExt;
use sanitize_filename::sanitize;

use crate::{error::ArchiveError, models::Playlist};

pub const ARCHIVE_JSON: &str = "output.json";
pub const ARCHIVE_README: &str = "README.md";

/// Files written for one archived playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedPaths {
    pub dir: PathBuf,
    pub json: PathBuf,
    pub readme: PathBuf,
}

/// On-disk archive tree:
///
/// ```text
/// {root}/playlists/{owner_display_name}_{owner_id}/{playlist_id}/output.json
/// {root}/playlists/{owner_display_name}_{owner_id}/{playlist_id}/README.md
/// ```
pub struct ArchiveStore {
    root: PathBuf,
}

impl ArchiveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn playlists_dir(&self) -> PathBuf {
        self.root.join("playlists")
    }

    /// Directory an archive of `playlist` is written to.
    pub fn playlist_dir(&self, playlist: &Playlist) -> PathBuf {
        let owner_dir = format!("{}_{}", playlist.owner.display_name, playlist.owner.id);
        self.playlists_dir()
            .join(sanitize(owner_dir))
            .join(sanitize(&playlist.id))
    }

    /// Writes the JSON document and the README as a pair.
    ///
    /// Both files are staged as `*.tmp` siblings first and only renamed into
    /// place once both staged writes succeeded. The files of an existing
    /// archive of the same playlist are moved to `*.bak` while the new pair
    /// is renamed in, and moved back if that fails.
    pub async fn write(
        &self,
        playlist: &Playlist,
        readme: &str,
    ) -> Result<ArchivedPaths, ArchiveError> {
        let dir = self.playlist_dir(playlist);
        async_fs::create_dir_all(&dir).await?;

        let json = serde_json::to_string_pretty(playlist)?;
        let paths = ArchivedPaths {
            json: dir.join(ARCHIVE_JSON),
            readme: dir.join(ARCHIVE_README),
            dir,
        };
        let json_tmp = paths.json.with_extension("json.tmp");
        let readme_tmp = paths.readme.with_extension("md.tmp");

        let staged = async {
            async_fs::write(&json_tmp, json).await?;
            async_fs::write(&readme_tmp, readme).await
        }
        .await;
        if let Err(e) = staged {
            discard(&[json_tmp.as_path(), readme_tmp.as_path()]).await;
            return Err(e.into());
        }

        let targets = [paths.json.as_path(), paths.readme.as_path()];
        let previous = match SetAside::move_files(&targets).await {
            Ok(previous) => previous,
            Err(e) => {
                discard(&[json_tmp.as_path(), readme_tmp.as_path()]).await;
                return Err(e.into());
            }
        };

        let committed = async {
            async_fs::rename(&json_tmp, &paths.json).await?;
            async_fs::rename(&readme_tmp, &paths.readme).await
        }
        .await;

        match committed {
            Ok(()) => {
                previous.release().await;
                Ok(paths)
            }
            Err(e) => {
                // A regular file at `paths.json` can only be the new one here.
                discard(&[
                    json_tmp.as_path(),
                    readme_tmp.as_path(),
                    paths.json.as_path(),
                ])
                .await;
                previous.restore().await;
                Err(e.into())
            }
        }
    }

    /// Locates `playlists/*/{playlist_id}/output.json`.
    ///
    /// Owner directories are visited in sorted order and the first match wins.
    pub async fn find(&self, playlist_id: &str) -> Result<PathBuf, ArchiveError> {
        let not_found = || ArchiveError::NotFound(format!("archive of playlist {playlist_id}"));

        let mut owners = Vec::new();
        let mut entries = match async_fs::read_dir(self.playlists_dir()).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next().await {
            let entry = entry?;
            if entry.file_type().await?.is_dir() {
                owners.push(entry.path());
            }
        }
        owners.sort();

        for owner in owners {
            let candidate = owner.join(sanitize(playlist_id)).join(ARCHIVE_JSON);
            if is_file(&candidate).await {
                return Ok(candidate);
            }
        }
        Err(not_found())
    }

    /// Reads an archived playlist back into the domain model.
    pub async fn load(&self, playlist_id: &str) -> Result<Playlist, ArchiveError> {
        let path = self.find(playlist_id).await?;
        let content = async_fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Regular files of a previous archive, moved to `*.bak` siblings.
struct SetAside {
    moved: Vec<(PathBuf, PathBuf)>,
}

impl SetAside {
    async fn move_files(targets: &[&Path]) -> std::io::Result<Self> {
        let mut set_aside = Self { moved: Vec::new() };
        for target in targets {
            if !is_file(target).await {
                continue;
            }
            let mut aside = target.as_os_str().to_owned();
            aside.push(".bak");
            let aside = PathBuf::from(aside);

            if let Err(e) = async_fs::rename(target, &aside).await {
                set_aside.restore().await;
                return Err(e);
            }
            set_aside.moved.push((target.to_path_buf(), aside));
        }
        Ok(set_aside)
    }

    async fn restore(self) {
        for (original, aside) in self.moved {
            let _ = async_fs::rename(&aside, &original).await;
        }
    }

    async fn release(self) {
        for (_, aside) in self.moved {
            let _ = async_fs::remove_file(&aside).await;
        }
    }
}

async fn is_file(path: &Path) -> bool {
    matches!(async_fs::metadata(path).await, Ok(meta) if meta.is_file())
}

async fn discard(paths: &[&Path]) {
    for path in paths {
        let _ = async_fs::remove_file(path).await;
    }
}
