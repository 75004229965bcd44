// components/download_settings/src/lib.rs
mod error;
mod record;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use video_primitives::Quality;

pub use error::{Result, SettingsError};
pub use record::SettingsRecord;

/// Reads and writes the user's [`SettingsRecord`].
///
/// The store holds no record itself; callers keep the record they loaded
/// and hand it back for every change.
pub struct SettingsStore {
    path: PathBuf,
    defaults: SettingsRecord,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>, defaults: SettingsRecord) -> Self {
        Self {
            path: path.into(),
            defaults,
        }
    }

    /// Store at `~/.ytdl_cli/config.json`, downloading to `~/Downloads/YouTube`
    pub fn for_user() -> Result<Self> {
        let home = dirs::home_dir().ok_or(SettingsError::HomeNotFound)?;
        Ok(Self::new(
            home.join(".ytdl_cli").join("config.json"),
            SettingsRecord::new(home.join("Downloads").join("YouTube")),
        ))
    }

    /// Same defaults as [`SettingsStore::for_user`], stored at `path`
    pub fn at(path: impl Into<PathBuf>) -> Result<Self> {
        let home = dirs::home_dir().ok_or(SettingsError::HomeNotFound)?;
        Ok(Self::new(
            path,
            SettingsRecord::new(home.join("Downloads").join("YouTube")),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn defaults(&self) -> &SettingsRecord {
        &self.defaults
    }

    /// Load the stored record.
    ///
    /// Never fails: a missing file is replaced by the defaults, a damaged
    /// one is ignored until the next save overwrites it.
    pub fn load(&self) -> SettingsRecord {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let record = self.defaults.clone();
                if let Err(e) = self.save(&record) {
                    tracing::warn!("could not create default settings: {e}");
                }
                return record;
            }
            Err(e) => {
                tracing::warn!(
                    "could not read settings from {}: {e}; using defaults",
                    self.path.display()
                );
                return self.defaults.clone();
            }
        };

        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(document) if document.is_object() => {
                SettingsRecord::merge_from(&document, &self.defaults)
            }
            Ok(_) => {
                tracing::warn!(
                    "settings file {} is not an object; using defaults",
                    self.path.display()
                );
                self.defaults.clone()
            }
            Err(e) => {
                tracing::warn!(
                    "settings file {} is corrupt ({e}); using defaults",
                    self.path.display()
                );
                self.defaults.clone()
            }
        }
    }

    /// Write the record through a temporary file renamed over the old one,
    /// so an interrupted save leaves the previous file intact.
    pub fn save(&self, record: &SettingsRecord) -> Result<()> {
        let mut bytes = serde_json::to_vec_pretty(&record.to_document())?;
        bytes.push(b'\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| SettingsError::save(&self.path, e))?;

        let mut temp =
            NamedTempFile::new_in(&dir).map_err(|e| SettingsError::save(&self.path, e))?;
        temp.write_all(&bytes)
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| SettingsError::save(&self.path, e))?;
        temp.persist(&self.path)
            .map_err(|e| SettingsError::save(&self.path, e.error))?;

        tracing::debug!("saved settings to {}", self.path.display());
        Ok(())
    }

    /// Make `path` the default download directory.
    ///
    /// The old default is remembered as the previous custom directory.
    /// On any failure `record` is left untouched.
    pub fn set_download_directory(
        &self,
        record: &mut SettingsRecord,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let dir = prepare_directory(path.as_ref())?;

        let mut updated = record.clone();
        if updated.download_dir != dir {
            let previous = std::mem::replace(&mut updated.download_dir, dir);
            updated.previous_custom_dir = Some(previous);
        }

        self.save(&updated)?;
        *record = updated;
        Ok(())
    }

    /// Validate a one-off download location without changing the default.
    ///
    /// The location is remembered for the "previous" shortcut.
    pub fn use_custom_directory(
        &self,
        record: &mut SettingsRecord,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        let dir = prepare_directory(path.as_ref())?;

        if record.previous_custom_dir.as_ref() != Some(&dir) {
            let mut updated = record.clone();
            updated.previous_custom_dir = Some(dir.clone());
            self.save(&updated)?;
            *record = updated;
        }
        Ok(dir)
    }

    /// Previous custom directory, if it differs from the default
    pub fn previous_directory<'a>(&self, record: &'a SettingsRecord) -> Option<&'a Path> {
        record
            .previous_custom_dir
            .as_deref()
            .filter(|dir| *dir != record.download_dir.as_path())
    }

    pub fn set_last_quality(&self, record: &mut SettingsRecord, quality: Quality) -> Result<()> {
        if record.last_quality == quality {
            return Ok(());
        }
        let updated = SettingsRecord {
            last_quality: quality,
            ..record.clone()
        };
        self.save(&updated)?;
        *record = updated;
        Ok(())
    }

    /// Replace `record` with the defaults
    pub fn reset(&self, record: &mut SettingsRecord) -> Result<()> {
        let defaults = self.defaults.clone();
        self.save(&defaults)?;
        *record = defaults;
        Ok(())
    }
}

/// Create the directory if needed and check that it accepts new files.
/// Returns its absolute path.
fn prepare_directory(path: &Path) -> Result<PathBuf> {
    let path = match path.to_str() {
        Some(s) => PathBuf::from(s.trim()),
        None => path.to_path_buf(),
    };
    if path.as_os_str().is_empty() {
        return Err(SettingsError::EmptyDirectory);
    }

    fs::create_dir_all(&path).map_err(|e| SettingsError::directory(&path, e))?;
    tempfile::tempfile_in(&path).map_err(|e| SettingsError::directory(&path, e))?;
    dunce::canonicalize(&path).map_err(|e| SettingsError::directory(&path, e))
}
