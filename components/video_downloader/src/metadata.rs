// components/video_downloader/src/metadata.rs
use crate::types::{DownloadError, Item, MediaInfo};
use serde::Deserialize;

/// Subset of `yt-dlp --dump-single-json --flat-playlist` output we use
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    #[serde(rename = "_type")]
    kind: Option<String>,
    id: Option<String>,
    title: Option<String>,
    webpage_url: Option<String>,
    url: Option<String>,
    extractor_key: Option<String>,
    ie_key: Option<String>,
    duration_string: Option<String>,
    #[serde(default)]
    entries: Vec<Option<YtDlpInfo>>,
}

impl YtDlpInfo {
    fn into_item(self) -> Item {
        let id = self.id.unwrap_or_default();
        let url = self
            .webpage_url
            .or(self.url)
            .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={id}"));
        let extractor = self
            .extractor_key
            .or(self.ie_key)
            .map(|key| key.to_lowercase())
            .unwrap_or_else(|| "youtube".to_string());

        Item {
            id,
            extractor,
            url,
            title: self.title.unwrap_or_else(|| "Unknown".to_string()),
            position: None,
            duration: self.duration_string,
        }
    }
}

/// Turn the engine's JSON dump into a [`MediaInfo`]
pub fn parse_info(json: &[u8]) -> Result<MediaInfo, DownloadError> {
    let info: YtDlpInfo =
        serde_json::from_slice(json).map_err(|e| DownloadError::Metadata(e.to_string()))?;

    if info.kind.as_deref() != Some("playlist") {
        return Ok(MediaInfo::Video(info.into_item()));
    }

    let title = info
        .title
        .clone()
        .unwrap_or_else(|| "Playlist".to_string());
    // Unavailable videos show up as null entries; they still take a position
    let entries = info
        .entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| entry.map(|e| e.into_item().at_position(index + 1)))
        .collect();

    Ok(MediaInfo::Playlist { title, entries })
}
