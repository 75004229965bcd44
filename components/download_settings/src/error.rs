// components/download_settings/src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("download directory must not be empty")]
    EmptyDirectory,

    #[error("cannot use {path} as download directory")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to save settings to {path}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("could not determine the home directory")]
    HomeNotFound,
}

impl SettingsError {
    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::Directory {
            path: path.into(),
            source,
        }
    }

    pub fn save(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::Save {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;
