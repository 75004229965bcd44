// components/video_downloader/src/utils.rs
use std::path::Path;

const MAX_NAME_LEN: usize = 200;

/// Make a playlist title usable as a folder name on every platform
pub fn sanitize_filename(name: &str) -> String {
    let options = sanitize_filename::Options {
        windows: true,
        truncate: true,
        replacement: "_",
    };
    let is_edge = |c: char| c == '.' || c.is_whitespace();
    // Trailing dots and spaces would otherwise be replaced, not removed
    let sanitized = sanitize_filename::sanitize_with_options(name.trim_matches(is_edge), options);
    let truncated: String = sanitized.chars().take(MAX_NAME_LEN).collect();
    truncated.trim_matches(is_edge).to_string()
}

/// yt-dlp output template for a video stored in `directory`.
///
/// Playlist entries are prefixed with their two-digit position so the
/// folder lists them in playlist order.
pub fn output_template(directory: &Path, position: Option<usize>) -> String {
    let name = match position {
        Some(position) => format!("{:02}_%(title)s.%(ext)s", position),
        None => "%(title)s.%(ext)s".to_string(),
    };
    let directory = escape_template(&directory.to_string_lossy());
    Path::new(&directory).join(name).to_string_lossy().into_owned()
}

/// Escape literal `%` so yt-dlp does not read it as a template field
pub fn escape_template(text: &str) -> String {
    text.replace('%', "%%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(
            sanitize_filename(r#"a test/file:with*invalid?chars"#),
            "a test_file_with_invalid_chars"
        );
    }

    #[test]
    fn sanitize_trims_dots_and_spaces() {
        assert_eq!(sanitize_filename("  ..My Mix.. "), "My Mix");
    }

    #[test]
    fn sanitize_caps_length() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_filename(&long).len(), MAX_NAME_LEN);
    }

    #[test]
    fn single_video_template() {
        let template = output_template(Path::new("/videos"), None);
        assert_eq!(template, "/videos/%(title)s.%(ext)s");
    }

    #[test]
    fn playlist_template_is_numbered() {
        let template = output_template(Path::new("/videos/Mix"), Some(7));
        assert_eq!(template, "/videos/Mix/07_%(title)s.%(ext)s");

        let template = output_template(Path::new("/videos/Mix"), Some(123));
        assert_eq!(template, "/videos/Mix/123_%(title)s.%(ext)s");
    }

    #[test]
    fn percent_in_directory_is_escaped() {
        let template = output_template(Path::new("/videos/100% hits"), None);
        assert_eq!(template, "/videos/100%% hits/%(title)s.%(ext)s");
    }
}
