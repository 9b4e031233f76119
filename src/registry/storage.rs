//! Settings persistence backend.
//!
//! The registry serializes to one document (see
//! [`super::document::SettingsDocument`]); where that document lives is a
//! collaborator concern behind [`SettingsStore`]. [`FileStore`] is the
//! default file-backed implementation.

use super::{Registry, SettingsDocument};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors raised while loading or saving the settings document.
#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the backing store failed.
    Io(std::io::Error),

    /// The document could not be serialized or parsed.
    Serialization(serde_json::Error),

    /// No home/config directory could be determined for the default path.
    MissingConfigDir,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "settings storage error: {}", err),
            StorageError::Serialization(err) => {
                write!(f, "settings document error: {}", err)
            }
            StorageError::MissingConfigDir => {
                write!(f, "could not determine a configuration directory")
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err)
    }
}

/// Key-value persistence collaborator for the settings document.
pub trait SettingsStore {
    /// Loads the stored document; `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SettingsDocument>, StorageError>;

    /// Persists the document, replacing any previous one.
    fn save(&self, document: &SettingsDocument) -> Result<(), StorageError>;
}

/// File-backed settings store holding the document as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store over an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store at the default per-user location,
    /// `<config>/url-loader/settings.json`.
    pub fn at_default_path() -> Result<Self, StorageError> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Resolves the default settings path from the platform's home
    /// directory conventions.
    pub fn default_path() -> Result<PathBuf, StorageError> {
        let config_dir = if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home).join(".config")
        } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
            PathBuf::from(user_profile).join("AppData").join("Roaming")
        } else {
            return Err(StorageError::MissingConfigDir);
        };

        Ok(config_dir.join("url-loader").join("settings.json"))
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn load(&self) -> Result<Option<SettingsDocument>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        let document = serde_json::from_str(&text)?;
        Ok(Some(document))
    }

    fn save(&self, document: &SettingsDocument) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl Registry {
    /// Loads a registry from a settings store, starting empty when the
    /// store has no document yet.
    pub fn load_from(store: &dyn SettingsStore) -> Result<Self, StorageError> {
        Ok(store
            .load()?
            .map(Registry::from_document)
            .unwrap_or_default())
    }

    /// Saves the registry's document into a settings store.
    pub fn save_to(&self, store: &dyn SettingsStore) -> Result<(), StorageError> {
        store.save(&self.to_document())
    }
}
