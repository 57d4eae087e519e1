use std::path::PathBuf;

use crate::{
    error::{StoreError, StoreResult},
    types::{FavoritesKind, FavoritesRecord},
};

/// File-backed document store for favorites snapshots.
///
/// Layout: `<root>/<user_id>/user_favorites/<top_artists|top_tracks>.json`.
/// Each document carries its owner's id, so the layout is only an index.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    root: PathBuf,
}

impl FavoritesStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Overwrites the document of the record's user and kind.
    pub async fn save(&self, record: &FavoritesRecord) -> StoreResult<()> {
        let path = self.document_path(&record.user_id, record.favorites.kind());
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        async_fs::write(&path, json).await?;
        log::debug!(
            "Stored {} {} for user {}",
            record.favorites.len(),
            record.favorites.kind().document_name(),
            record.user_id
        );
        Ok(())
    }

    pub async fn load(
        &self,
        user_id: &str,
        kind: FavoritesKind,
    ) -> StoreResult<Option<FavoritesRecord>> {
        let path = self.document_path(user_id, kind);
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let record = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    /// Every stored document, users in sorted order, artists before tracks.
    ///
    /// Unreadable documents are logged and skipped.
    pub async fn load_all(&self) -> StoreResult<Vec<FavoritesRecord>> {
        let mut user_ids = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                user_ids.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        user_ids.sort();

        let mut records = Vec::new();
        for user_id in user_ids {
            for kind in [FavoritesKind::Artists, FavoritesKind::Tracks] {
                match self.load(&user_id, kind).await {
                    Ok(Some(record)) => records.push(record),
                    Ok(None) => {}
                    Err(e) => log::warn!(
                        "Skipping {} of user {}: {}",
                        kind.document_name(),
                        user_id,
                        e
                    ),
                }
            }
        }

        Ok(records)
    }

    fn document_path(&self, user_id: &str, kind: FavoritesKind) -> PathBuf {
        let mut path = self.root.clone();
        path.push(user_id);
        path.push("user_favorites");
        path.push(format!("{}.json", kind.document_name()));
        path
    }
}
