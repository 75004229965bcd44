// components/video_downloader/src/ytdlp.rs
use crate::metadata::parse_info;
use crate::types::{DownloadError, DownloadRequest, MediaInfo};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use url::Url;

/// The external engine that actually fetches videos
#[async_trait]
pub trait Downloader {
    /// Check if the downloader is available and has all required dependencies
    async fn check_available(&self) -> Result<(), DownloadError>;

    /// Describe what `url` points at without downloading anything
    async fn fetch_info(&self, url: &Url) -> Result<MediaInfo, DownloadError>;

    /// Download one video, returning the path of the finished file.
    ///
    /// Implementations append the video to `request.archive_path` once the
    /// file is complete, never before.
    async fn download(&self, request: &DownloadRequest) -> Result<PathBuf, DownloadError>;
}

pub struct YtDlp;

const YT_DLP: &str = "yt-dlp";

#[async_trait]
impl Downloader for YtDlp {
    async fn check_available(&self) -> Result<(), DownloadError> {
        which::which(YT_DLP)
            .map(|_| ())
            .map_err(|_| DownloadError::DependencyNotFound(YT_DLP))
    }

    async fn fetch_info(&self, url: &Url) -> Result<MediaInfo, DownloadError> {
        tracing::debug!("fetching info for {url}");

        let output = Command::new(YT_DLP)
            .arg("--dump-single-json")
            .arg("--flat-playlist")
            .arg("--no-warnings")
            .arg(url.as_str())
            .output()
            .await?;

        if !output.status.success() {
            return Err(DownloadError::Metadata(error_lines(&output.stderr)));
        }

        parse_info(&output.stdout)
    }

    async fn download(&self, request: &DownloadRequest) -> Result<PathBuf, DownloadError> {
        let args = download_args(request);
        tracing::debug!("running {YT_DLP} {}", args.join(" "));

        let output = Command::new(YT_DLP).args(&args).output().await?;

        if !output.status.success() {
            return Err(DownloadError::DownloadFailed(format!(
                "{YT_DLP} exited with {}: {}",
                output.status,
                error_lines(&output.stderr)
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(PathBuf::from)
            // Nothing printed: yt-dlp found the video in its archive
            .unwrap_or_else(|| template_directory(&request.output_template));
        Ok(path)
    }
}

/// Command line for a single download. Resuming partial files is always on.
pub(crate) fn download_args(request: &DownloadRequest) -> Vec<String> {
    vec![
        "-f".to_string(),
        request.format.clone(),
        "--merge-output-format".to_string(),
        "mp4".to_string(),
        "--continue".to_string(),
        "--concurrent-fragments".to_string(),
        "4".to_string(),
        "--no-warnings".to_string(),
        "--no-playlist".to_string(),
        "--download-archive".to_string(),
        request.archive_path.to_string_lossy().into_owned(),
        "-o".to_string(),
        request.output_template.clone(),
        "--print".to_string(),
        "after_move:filepath".to_string(),
        "--no-simulate".to_string(),
        request.url.clone(),
    ]
}

fn template_directory(template: &str) -> PathBuf {
    Path::new(template)
        .parent()
        .map(|dir| PathBuf::from(dir.to_string_lossy().replace("%%", "%")))
        .unwrap_or_default()
}

/// Last few `ERROR` lines of the engine's stderr, or its tail if none
fn error_lines(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let errors: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|l| l.to_uppercase().contains("ERROR"))
        .collect();
    let chosen = if errors.is_empty() { &lines } else { &errors };
    let start = chosen.len().saturating_sub(5);
    chosen[start..].join("\n")
}
