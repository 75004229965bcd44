// components/video_downloader/src/archive.rs
use crate::types::{DownloadError, Item};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use video_primitives::Quality;

/// Ledger of videos already downloaded into one directory.
///
/// Uses yt-dlp's `--download-archive` format, one `"<extractor> <id>"` per
/// line, so the engine and this crate read and append the same file.
#[derive(Debug, Clone)]
pub struct Archive {
    path: PathBuf,
}

/// Snapshot of the archive contents
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchiveEntries(HashSet<(String, String)>);

impl ArchiveEntries {
    pub fn contains(&self, item: &Item) -> bool {
        self.0
            .contains(&(item.extractor.to_lowercase(), item.id.clone()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Only newline-terminated lines count. A trailing partial line is an
    /// append that never finished.
    fn parse(contents: &str) -> Self {
        let complete = match contents.rfind('\n') {
            Some(end) => &contents[..=end],
            None => "",
        };

        let mut entries = HashSet::new();
        for line in complete.lines() {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(extractor), Some(id), None) => {
                    entries.insert((extractor.to_lowercase(), id.to_string()));
                }
                (None, _, _) => {}
                _ => tracing::debug!("ignoring malformed archive line: {line:?}"),
            }
        }
        ArchiveEntries(entries)
    }
}

impl Archive {
    /// Archive location for downloads of `quality` into `directory`.
    ///
    /// Each quality gets its own file so a video can be fetched again in a
    /// different quality.
    pub fn path_for(directory: impl AsRef<Path>, quality: Quality) -> PathBuf {
        directory
            .as_ref()
            .join(format!("downloads_{}.archive", quality.archive_tag()))
    }

    /// Open the archive, creating it if needed.
    ///
    /// Fails if the file cannot be created or appended to.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DownloadError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DownloadError::archive(&path, e))?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DownloadError::archive(&path, e))?;

        let archive = Self { path };
        archive.drop_partial_line().await?;
        Ok(archive)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn entries(&self) -> Result<ArchiveEntries, DownloadError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(ArchiveEntries::parse(&String::from_utf8_lossy(&bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ArchiveEntries::default()),
            Err(e) => Err(DownloadError::archive(&self.path, e)),
        }
    }

    pub async fn contains(&self, item: &Item) -> Result<bool, DownloadError> {
        Ok(self.entries().await?.contains(item))
    }

    /// Append `item`. Call only once its file is complete.
    pub async fn record(&self, item: &Item) -> Result<(), DownloadError> {
        self.drop_partial_line().await?;

        let line = format!("{} {}\n", item.extractor.to_lowercase(), item.id);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| DownloadError::archive(&self.path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| DownloadError::archive(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| DownloadError::archive(&self.path, e))?;
        Ok(())
    }

    /// Cut an unterminated last line left by an interrupted append, so the
    /// next append cannot glue onto it.
    async fn drop_partial_line(&self) -> Result<(), DownloadError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(DownloadError::archive(&self.path, e)),
        };
        if bytes.last().map_or(true, |b| *b == b'\n') {
            return Ok(());
        }

        let keep = bytes.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1);
        tracing::warn!(
            "dropping incomplete last line of {}",
            self.path.display()
        );
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .await
            .map_err(|e| DownloadError::archive(&self.path, e))?;
        file.set_len(keep as u64)
            .await
            .map_err(|e| DownloadError::archive(&self.path, e))?;
        Ok(())
    }
}
