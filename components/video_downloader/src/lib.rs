// components/video_downloader/src/lib.rs
mod archive;
mod metadata;
mod summary;
mod types;
mod utils;
mod ytdlp;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;
use video_primitives::Quality;

pub use archive::{Archive, ArchiveEntries};
pub use metadata::parse_info;
pub use summary::{Outcome, OutcomeStatus, Summary};
pub use types::{DownloadError, DownloadRequest, Item, MediaInfo};
pub use utils::{output_template, sanitize_filename};
pub use ytdlp::{Downloader, YtDlp};

const YOUTUBE_HOSTS: [&str; 5] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
    "youtu.be",
];

/// Drives the download engine over a batch of videos
pub struct VideoDownloader {
    downloader: Arc<dyn Downloader + Send + Sync>,
}

impl VideoDownloader {
    /// Create a VideoDownloader backed by yt-dlp
    pub async fn new() -> Result<Self, DownloadError> {
        Self::new_with_downloader(Arc::new(YtDlp)).await
    }

    /// Create a VideoDownloader with a specific downloader implementation
    pub async fn new_with_downloader(
        downloader: Arc<dyn Downloader + Send + Sync>,
    ) -> Result<Self, DownloadError> {
        downloader.check_available().await?;
        Ok(Self { downloader })
    }

    /// Look up a video or playlist
    pub async fn fetch_info(&self, url: &str) -> Result<MediaInfo, DownloadError> {
        let url = validate_url(url)?;
        self.downloader.fetch_info(&url).await
    }

    /// Download `items` in order into `directory`.
    ///
    /// Items already in the archive are skipped without calling the engine,
    /// and a failed item never stops the rest of the batch. Only problems
    /// with `directory` or the archive itself abort the run.
    pub async fn run(
        &self,
        items: &[Item],
        directory: impl AsRef<Path>,
        quality: Quality,
        archive_path: impl Into<PathBuf>,
    ) -> Result<Summary, DownloadError> {
        let directory = directory.as_ref();
        tokio::fs::create_dir_all(directory)
            .await
            .map_err(|e| DownloadError::directory(directory, e))?;
        let archive = Archive::open(archive_path).await?;

        let mut summary = Summary::start();
        for item in items {
            // Re-read every time: the engine appends as it goes
            let already_done = match archive.entries().await {
                Ok(entries) => entries.contains(item),
                Err(e) => {
                    tracing::warn!("could not read archive, downloading anyway: {e}");
                    false
                }
            };
            if already_done {
                tracing::info!(id = %item.id, "already downloaded, skipping {}", item.title);
                summary.record(item.clone(), OutcomeStatus::Skipped);
                continue;
            }

            let request = DownloadRequest {
                url: item.url.clone(),
                format: quality.format_selector(),
                output_template: output_template(directory, item.position),
                archive_path: archive.path().to_path_buf(),
            };

            tracing::info!(id = %item.id, "downloading {}", item.title);
            let status = match self.downloader.download(&request).await {
                Ok(path) => OutcomeStatus::Succeeded { path },
                Err(e) => {
                    tracing::warn!(id = %item.id, "download of {} failed: {e}", item.title);
                    OutcomeStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            summary.record(item.clone(), status);
        }

        Ok(summary.finish())
    }
}

/// Accept only http(s) YouTube links
pub fn validate_url(url: &str) -> Result<Url, DownloadError> {
    let parsed = Url::parse(url.trim()).map_err(|e| DownloadError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DownloadError::InvalidUrl(format!(
            "unsupported scheme: {}",
            parsed.scheme()
        )));
    }
    match parsed.host_str() {
        Some(host) if YOUTUBE_HOSTS.contains(&host.to_lowercase().as_str()) => Ok(parsed),
        _ => Err(DownloadError::InvalidUrl(format!(
            "not a YouTube link: {url}"
        ))),
    }
}

/// Folder for a playlist inside `base`, named after its (sanitized) title
pub fn playlist_directory(base: impl AsRef<Path>, title: &str) -> PathBuf {
    let name = sanitize_filename(title);
    let name = if name.is_empty() { "Playlist".to_string() } else { name };
    base.as_ref().join(name)
}
