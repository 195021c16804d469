//! Snapshot: save/load full collection state to/from disk.

use crate::error::Result;
use crate::persistence::serialization::{self, CollectionSnapshot, Manifest};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Manages the snapshot and manifest files of one collection directory.
pub struct SnapshotManager {
    dir: PathBuf,
}

impl SnapshotManager {
    /// Create a snapshot manager for the given directory.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn snapshot_path(&self) -> PathBuf {
        self.dir.join("snapshot.bin")
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join("manifest.json")
    }

    /// Save a snapshot, then refresh the manifest to describe it.
    pub fn save(&self, snapshot: &CollectionSnapshot, manifest: &Manifest) -> Result<()> {
        let data = serialization::to_bincode(snapshot)?;
        write_atomic(&self.snapshot_path(), &data)?;
        self.save_manifest(manifest)
    }

    /// Load a snapshot from disk, or return None if no snapshot exists.
    pub fn load(&self) -> Result<Option<CollectionSnapshot>> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read(&path)?;
        Ok(Some(serialization::from_bincode(&data)?))
    }

    pub fn save_manifest(&self, manifest: &Manifest) -> Result<()> {
        let bytes = serialization::to_json(manifest)?;
        write_atomic(&self.manifest_path(), &bytes)
    }

    pub fn load_manifest(&self) -> Result<Option<Manifest>> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        Ok(Some(serialization::from_json(&bytes)?))
    }
}

/// Write through a sibling temp file so readers never see a half-written file.
///
/// The temp file is synced before the rename and the directory after it, so
/// a crash leaves either the old contents or the new ones.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    sync_parent_dir(path)
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()?;
    Ok(())
}

// Directories cannot be opened for syncing here.
#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> Result<()> {
    Ok(())
}
