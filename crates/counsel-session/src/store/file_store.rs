use crate::{KeyValueStore, StoreError, StoreResult};

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, info, warn};

const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Key-value store persisted as one JSON object on disk.
///
/// The whole map is rewritten on every change using the atomic write pattern
/// (temp file, fsync, rename), so a crash mid-write leaves the previous file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store. A file that is not a JSON
    /// string map is moved aside to `<name>.corrupted.<timestamp>` and the
    /// store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let entries = if path.exists() {
            let contents =
                fs::read_to_string(&path).map_err(|e| StoreError::file_read(path.clone(), e))?;

            match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => {
                    debug!("Loaded {} store entries from {path:?}", entries.len());
                    entries
                }
                Err(e) => {
                    warn!("Store file corrupted at {path:?}: {e}");
                    backup_corrupted(&path)?;
                    BTreeMap::new()
                }
            }
        } else {
            info!("No store file at {path:?} (starting empty)");
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        fs::create_dir_all(&dir).map_err(|e| StoreError::dir_creation(dir.clone(), e))?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store.json".to_string());
        let temp_path = dir.join(format!("{file_name}.tmp.{}", std::process::id()));

        let json = serde_json::to_string_pretty(entries)?;

        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| StoreError::file_write(temp_path.clone(), e))?;

            file.write_all(json.as_bytes())
                .map_err(|e| StoreError::file_write(temp_path.clone(), e))?;

            file.sync_all()
                .map_err(|e| StoreError::file_write(temp_path.clone(), e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StoreError::atomic_rename(temp_path, self.path.clone(), e)
        })?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries)
    }
}

/// Renames a corrupted store file to `<name>.corrupted.{timestamp}`.
fn backup_corrupted(path: &Path) -> StoreResult<PathBuf> {
    let timestamp = chrono::Utc::now().format(DATE_FORMAT);
    let mut backup = path.as_os_str().to_owned();
    backup.push(format!(".corrupted.{timestamp}"));
    let backup_path = PathBuf::from(backup);

    fs::rename(path, &backup_path).map_err(|e| StoreError::BackupFailed {
        source: e,
        location: error_location::ErrorLocation::from(std::panic::Location::caller()),
    })?;

    warn!("Backed up corrupted store to {backup_path:?}");
    Ok(backup_path)
}
