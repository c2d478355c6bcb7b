//! Snapshot persistence for the record store
//!
//! Manages the `.rackbase/inventory.json` file which holds the full
//! serialized [`InventoryStore`].

use crate::error::{CoreError, Result};
use crate::store::InventoryStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const SNAPSHOT_VERSION: u32 = 1;
const SNAPSHOT_DIR: &str = ".rackbase";
const SNAPSHOT_FILE: &str = "inventory.json";
const SNAPSHOT_BACKUP: &str = "inventory.json.backup";

/// Versioned on-disk envelope around the store
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    saved_at: DateTime<Utc>,
    store: InventoryStore,
}

/// Reads and writes inventory snapshot files
pub struct SnapshotManager {
    /// Project root directory
    root: PathBuf,
}

impl SnapshotManager {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn snapshot_dir(&self) -> PathBuf {
        self.root.join(SNAPSHOT_DIR)
    }

    fn snapshot_path(&self) -> PathBuf {
        self.snapshot_dir().join(SNAPSHOT_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.snapshot_dir().join(SNAPSHOT_BACKUP)
    }

    async fn ensure_snapshot_dir(&self) -> Result<()> {
        let dir = self.snapshot_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created snapshot directory: {}", dir.display());
        }
        Ok(())
    }

    /// Load the persisted store, or an empty one when no snapshot exists
    pub async fn load(&self) -> Result<InventoryStore> {
        let path = self.snapshot_path();
        if !path.exists() {
            tracing::debug!("Snapshot not found, returning empty store");
            return Ok(InventoryStore::new());
        }

        let content = fs::read_to_string(&path).await?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        // Version check
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(CoreError::Snapshot(format!(
                "Snapshot version {} is newer than supported version {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        tracing::debug!(
            "Loaded snapshot with {} objects and {} IP records",
            snapshot.store.object_count(),
            snapshot.store.ip_count()
        );
        Ok(snapshot.store)
    }

    /// Persist the store, rotating the previous file into a backup
    pub async fn save(&self, store: &InventoryStore) -> Result<()> {
        self.ensure_snapshot_dir().await?;

        let path = self.snapshot_path();
        let backup = self.backup_path();

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
            tracing::debug!("Rotated previous snapshot to backup");
        }

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            store: store.clone(),
        };
        let content = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, content).await?;

        tracing::debug!("Saved snapshot with {} objects", store.object_count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServiceEnvironment;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_snapshot_save_load() {
        let temp_dir = tempdir().unwrap();
        let manager = SnapshotManager::new(temp_dir.path());

        let mut store = InventoryStore::new();
        let id = store.create_object(None, Some(ServiceEnvironment::new("search", "prod")));
        store.claim_ip("192.0.2.1".parse().unwrap(), id).unwrap();

        manager.save(&store).await.unwrap();

        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.object_count(), 1);
        assert_eq!(loaded.ips_owned_by(id).len(), 1);
    }

    #[tokio::test]
    async fn test_missing_snapshot_is_empty_store() {
        let temp_dir = tempdir().unwrap();
        let manager = SnapshotManager::new(temp_dir.path());

        let store = manager.load().await.unwrap();
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn test_save_rotates_backup() {
        let temp_dir = tempdir().unwrap();
        let manager = SnapshotManager::new(temp_dir.path());

        let store = InventoryStore::new();
        manager.save(&store).await.unwrap();
        manager.save(&store).await.unwrap();

        assert!(temp_dir.path().join(".rackbase/inventory.json").exists());
        assert!(temp_dir.path().join(".rackbase/inventory.json.backup").exists());
    }

    #[tokio::test]
    async fn test_newer_version_rejected() {
        let temp_dir = tempdir().unwrap();
        let manager = SnapshotManager::new(temp_dir.path());
        manager.save(&InventoryStore::new()).await.unwrap();

        let path = temp_dir.path().join(".rackbase/inventory.json");
        let content = std::fs::read_to_string(&path).unwrap();
        let bumped = content.replace("\"version\": 1", "\"version\": 99");
        std::fs::write(&path, bumped).unwrap();

        let err = manager.load().await.unwrap_err();
        assert!(matches!(err, CoreError::Snapshot(_)));
    }
}
