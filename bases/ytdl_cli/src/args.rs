// bases/ytdl_cli/src/args.rs
use clap::Parser;
use std::path::PathBuf;
use video_primitives::Quality;

/// Download YouTube videos and playlists with yt-dlp
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Video or playlist URL; skips the main menu
    #[arg(short, long)]
    pub url: Option<String>,

    /// Download into this directory instead of asking
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Quality to download, e.g. 1080 or 720p
    #[arg(short, long)]
    pub quality: Option<Quality>,

    /// Playlist entries to download, e.g. "1-5,8" or "all"
    #[arg(short, long)]
    pub select: Option<String>,

    /// Do not ask for confirmation before downloading
    #[arg(short, long)]
    pub yes: bool,

    /// Settings file to use instead of ~/.ytdl_cli/config.json
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_non_interactive_invocation() {
        let args = Args::try_parse_from([
            "ytdl",
            "--url",
            "https://youtu.be/abc",
            "-q",
            "1080p",
            "--select",
            "1-3",
            "-y",
        ])
        .unwrap();

        assert_eq!(args.url.as_deref(), Some("https://youtu.be/abc"));
        assert_eq!(args.quality, Some(Quality::Fhd1080));
        assert_eq!(args.select.as_deref(), Some("1-3"));
        assert!(args.yes);
        assert!(!args.verbose);
    }

    #[rstest]
    #[case("720", Quality::Hd720)]
    #[case("720p", Quality::Hd720)]
    #[case("2160p", Quality::Uhd2160)]
    #[case("144", Quality::P144)]
    fn accepts_quality_spellings(#[case] flag: &str, #[case] expected: Quality) {
        let args = Args::try_parse_from(["ytdl", "--quality", flag]).unwrap();
        assert_eq!(args.quality, Some(expected));
    }

    #[rstest]
    #[case("8k")]
    #[case("720i")]
    #[case("")]
    fn rejects_unknown_quality(#[case] flag: &str) {
        assert!(Args::try_parse_from(["ytdl", "--quality", flag]).is_err());
    }

    #[test]
    fn interactive_by_default() {
        let args = Args::try_parse_from(["ytdl"]).unwrap();
        assert!(args.url.is_none());
        assert!(args.output_dir.is_none());
        assert!(!args.yes);
    }
}
