use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QualityError {
    #[error("Unknown quality: {0}")]
    Unknown(String),
}

/// Maximum video height offered to the download engine.
///
/// Persisted by its bare height (`"720"`), shown in menus with its label
/// (`"720p (HD)"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Quality {
    Uhd2160,
    Qhd1440,
    Fhd1080,
    #[default]
    Hd720,
    Sd480,
    P360,
    P240,
    P144,
}

impl Quality {
    /// All qualities, highest first (menu order)
    pub const ALL: [Quality; 8] = [
        Quality::Uhd2160,
        Quality::Qhd1440,
        Quality::Fhd1080,
        Quality::Hd720,
        Quality::Sd480,
        Quality::P360,
        Quality::P240,
        Quality::P144,
    ];

    pub fn height(&self) -> u32 {
        match self {
            Quality::Uhd2160 => 2160,
            Quality::Qhd1440 => 1440,
            Quality::Fhd1080 => 1080,
            Quality::Hd720 => 720,
            Quality::Sd480 => 480,
            Quality::P360 => 360,
            Quality::P240 => 240,
            Quality::P144 => 144,
        }
    }

    /// Menu label, e.g. "1080p (FHD)"
    pub fn label(&self) -> &'static str {
        match self {
            Quality::Uhd2160 => "2160p (4K)",
            Quality::Qhd1440 => "1440p (2K)",
            Quality::Fhd1080 => "1080p (FHD)",
            Quality::Hd720 => "720p (HD)",
            Quality::Sd480 => "480p (SD)",
            Quality::P360 => "360p",
            Quality::P240 => "240p",
            Quality::P144 => "144p",
        }
    }

    /// Key stored in the settings file
    pub fn config_key(&self) -> String {
        self.height().to_string()
    }

    /// Short tag used in archive file names, e.g. "720p"
    pub fn archive_tag(&self) -> String {
        format!("{}p", self.height())
    }

    /// Position in [`Quality::ALL`], handy for preselecting a menu entry
    pub fn menu_index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|q| q == self)
            .unwrap_or_default()
    }

    /// yt-dlp format selector capped at this height.
    ///
    /// Prefers separate mp4/m4a streams, then any separate streams, then
    /// progressive formats, and finally whatever is best.
    pub fn format_selector(&self) -> String {
        let h = self.height();
        format!(
            "bestvideo[height<={h}][ext=mp4]+bestaudio[ext=m4a]/\
             bestvideo[height<={h}]+bestaudio/\
             best[height<={h}][ext=mp4]/\
             best[height<={h}]/\
             best"
        )
    }
}

impl FromStr for Quality {
    type Err = QualityError;

    /// Accepts "720", "720p" and "720p (HD)"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || QualityError::Unknown(s.to_string());
        let head = s.split_whitespace().next().ok_or_else(unknown)?;
        let digits = head
            .strip_suffix('p')
            .or_else(|| head.strip_suffix('P'))
            .unwrap_or(head);
        let height: u32 = digits.parse().map_err(|_| unknown())?;

        let quality = Self::ALL
            .into_iter()
            .find(|q| q.height() == height)
            .ok_or_else(unknown)?;

        // Anything after the height has to be the matching label suffix
        let rest = s.trim()[head.len()..].trim();
        if !rest.is_empty() && !quality.label().to_lowercase().ends_with(&rest.to_lowercase()) {
            return Err(unknown());
        }
        Ok(quality)
    }
}

impl TryFrom<String> for Quality {
    type Error = QualityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quality> for String {
    fn from(quality: Quality) -> Self {
        quality.config_key()
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
