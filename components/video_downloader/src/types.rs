// components/video_downloader/src/types.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Required dependency not found: {0}")]
    DependencyNotFound(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Could not read video information: {0}")]
    Metadata(String),

    #[error("Download archive {path} is not usable")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create output directory {path}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DownloadError {
    pub fn archive(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DownloadError::Archive {
            path: path.into(),
            source,
        }
    }

    pub fn directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DownloadError::Directory {
            path: path.into(),
            source,
        }
    }
}

/// A single downloadable video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable video identifier, e.g. the YouTube video id
    pub id: String,

    /// Lowercase extractor name used as the archive key prefix
    pub extractor: String,

    /// Where the engine should fetch the video from
    pub url: String,

    pub title: String,

    /// 1-based position in the playlist this item was picked from
    pub position: Option<usize>,

    /// Human readable duration, e.g. "3:45"
    pub duration: Option<String>,
}

impl Item {
    pub fn youtube(id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extractor: "youtube".to_string(),
            url: url.into(),
            title: title.into(),
            position: None,
            duration: None,
        }
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// What a URL points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaInfo {
    Video(Item),
    Playlist { title: String, entries: Vec<Item> },
}

impl MediaInfo {
    pub fn is_playlist(&self) -> bool {
        matches!(self, MediaInfo::Playlist { .. })
    }

    pub fn title(&self) -> &str {
        match self {
            MediaInfo::Video(item) => &item.title,
            MediaInfo::Playlist { title, .. } => title,
        }
    }
}

/// Everything the engine needs for one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,

    /// Engine format selector, see `Quality::format_selector`
    pub format: String,

    /// Output path template in yt-dlp syntax
    pub output_template: String,

    pub archive_path: PathBuf,
}
