// components/download_settings/src/record.rs
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use video_primitives::Quality;

/// User preferences carried between sessions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRecord {
    /// Quality picked in the last download or set in the settings menu
    pub last_quality: Quality,

    /// Default download location
    pub download_dir: PathBuf,

    /// Last custom location, offered as a "previous" shortcut
    pub previous_custom_dir: Option<PathBuf>,
}

impl SettingsRecord {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            last_quality: Quality::default(),
            download_dir: download_dir.into(),
            previous_custom_dir: None,
        }
    }

    /// Build a record from a parsed settings document.
    ///
    /// Each field falls back to `defaults` on its own, so a hand-edited file
    /// with one bad value keeps the rest.
    pub(crate) fn merge_from(document: &Value, defaults: &SettingsRecord) -> Self {
        let last_quality = match document.get("last_quality") {
            Some(Value::String(s)) => s.parse().ok(),
            Some(Value::Number(n)) => n.to_string().parse().ok(),
            _ => None,
        }
        .unwrap_or(defaults.last_quality);

        let download_dir = non_empty_path(document.get("download_dir"))
            .unwrap_or_else(|| defaults.download_dir.clone());

        let previous_custom_dir = non_empty_path(document.get("last_used_dir"))
            .or_else(|| defaults.previous_custom_dir.clone());

        Self {
            last_quality,
            download_dir,
            previous_custom_dir,
        }
    }

    pub(crate) fn to_document(&self) -> StoredSettings<'_> {
        StoredSettings {
            last_quality: self.last_quality.config_key(),
            download_dir: &self.download_dir,
            last_used_dir: self.previous_custom_dir.as_deref(),
        }
    }
}

fn non_empty_path(value: Option<&Value>) -> Option<PathBuf> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// On-disk layout of the settings file
#[derive(Serialize)]
pub(crate) struct StoredSettings<'a> {
    last_quality: String,
    download_dir: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_used_dir: Option<&'a Path>,
}
