// bases/ytdl_cli/src/app.rs
use crate::args::Args;
use crate::output::OutputHandler;
use crate::prompts::{DirectoryChoice, DownloadPlan, MainMenuChoice, Prompter, SettingsChoice};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use download_settings::{SettingsRecord, SettingsStore};
use std::path::PathBuf;
use video_downloader::{playlist_directory, validate_url, Archive, MediaInfo, VideoDownloader};
use video_primitives::Selection;

/// How a workflow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Cancelled,
    Failed,
}

pub struct App<P: Prompter> {
    args: Args,
    output: OutputHandler,
    store: SettingsStore,
    record: SettingsRecord,
    downloader: VideoDownloader,
    prompter: P,
}

impl<P: Prompter> App<P> {
    pub fn new(args: Args, store: SettingsStore, downloader: VideoDownloader, prompter: P) -> Self {
        let output = OutputHandler::new(args.verbose);
        let record = store.load();
        Self {
            args,
            output,
            store,
            record,
            downloader,
            prompter,
        }
    }

    pub fn record(&self) -> &SettingsRecord {
        &self.record
    }

    /// A single download when a URL was given, the main menu otherwise
    pub async fn run(&mut self) -> Result<RunStatus> {
        if self.args.url.is_some() {
            return self.download().await;
        }

        loop {
            self.output.print_banner();
            match self.prompter.main_menu()? {
                MainMenuChoice::Download => {
                    let status = self.download().await?;
                    if status == RunStatus::Failed && !self.prompter.return_to_menu()? {
                        return Ok(status);
                    }
                }
                MainMenuChoice::Settings => self.settings()?,
                MainMenuChoice::Exit => {
                    println!("Thank you for using YouTube Downloader CLI!");
                    return Ok(RunStatus::Completed);
                }
            }
        }
    }

    /// Ask for everything a download needs, then run it
    pub async fn download(&mut self) -> Result<RunStatus> {
        let url = match self.args.url.clone() {
            Some(url) => url,
            None => self.prompter.url()?,
        };
        let url = url.trim().to_string();
        if url.is_empty() {
            self.output.print_error(&"No URL provided");
            return Ok(RunStatus::Failed);
        }
        if let Err(e) = validate_url(&url) {
            self.output.print_error(&e);
            return Ok(RunStatus::Failed);
        }

        let base_dir = self.choose_directory()?;
        tracing::info!(%url, directory = %base_dir.display(), "starting download");

        self.output.print_info("Fetching video information...");
        let info = match self.downloader.fetch_info(&url).await {
            Ok(info) => info,
            Err(e) => {
                self.output.print_error(&e);
                return Ok(RunStatus::Failed);
            }
        };

        let (items, directory) = match info {
            MediaInfo::Video(item) => {
                self.output.print_info("Detected single video");
                (vec![item], base_dir)
            }
            MediaInfo::Playlist { title, entries } => {
                if entries.is_empty() {
                    self.output.print_error(&"Playlist has no downloadable videos");
                    return Ok(RunStatus::Failed);
                }
                self.output
                    .print_info(&format!("Detected playlist with {} videos", entries.len()));
                self.output.print_playlist(&title, &entries);

                let folder = self.prompter.folder_name(&title)?;
                let directory = playlist_directory(&base_dir, &folder);
                let selection = self.choose_selection(entries.len())?;
                let items = selection.iter().map(|i| entries[i - 1].clone()).collect();
                (items, directory)
            }
        };
        if items.is_empty() {
            self.output.print_error(&"No videos selected");
            return Ok(RunStatus::Failed);
        }

        let quality = match self.args.quality {
            Some(quality) => quality,
            None => self.prompter.quality(self.record.last_quality)?,
        };

        let plan = DownloadPlan {
            videos: items.len(),
            quality,
            directory: &directory,
        };
        if !self.args.yes && !self.prompter.confirm_download(&plan)? {
            self.output.print_info("Download cancelled");
            return Ok(RunStatus::Cancelled);
        }

        if let Err(e) = self.store.set_last_quality(&mut self.record, quality) {
            self.output
                .print_warning(&format!("Could not remember quality preference: {e}"));
        }

        tracing::info!(videos = items.len(), %quality, "download confirmed");
        self.output.print_download_start(items.len(), &directory);
        let archive = Archive::path_for(&directory, quality);
        let summary = self
            .downloader
            .run(&items, &directory, quality, archive)
            .await
            .wrap_err("download aborted")?;
        self.output.print_summary(&summary);

        if summary.is_success() {
            self.output
                .print_success(&format!("Finished {} video(s)", summary.total()));
            Ok(RunStatus::Completed)
        } else {
            Ok(RunStatus::Failed)
        }
    }

    /// Default, previous or a custom directory.
    ///
    /// A custom directory that cannot be used is reported, and the user may
    /// retry or fall back to the default.
    fn choose_directory(&mut self) -> Result<PathBuf> {
        if let Some(dir) = self.args.output_dir.clone() {
            return self
                .store
                .use_custom_directory(&mut self.record, &dir)
                .wrap_err_with(|| format!("cannot download into {}", dir.display()));
        }

        let default_dir = self.record.download_dir.clone();
        let previous = self
            .store
            .previous_directory(&self.record)
            .map(|p| p.to_path_buf());

        match self
            .prompter
            .directory_choice(&default_dir, previous.as_deref())?
        {
            DirectoryChoice::Default => return Ok(default_dir),
            DirectoryChoice::Previous => {
                if let Some(previous) = previous {
                    match self.store.use_custom_directory(&mut self.record, &previous) {
                        Ok(dir) => return Ok(dir),
                        Err(e) => {
                            self.output.print_error(&e);
                            self.output.print_warning("Using default directory");
                            return Ok(default_dir);
                        }
                    }
                }
                return Ok(default_dir);
            }
            DirectoryChoice::Custom => {}
        }

        loop {
            let raw = self.prompter.custom_directory(&default_dir)?;
            let raw = raw.trim();
            if raw.is_empty() || PathBuf::from(raw) == default_dir {
                self.output.print_warning("Using default directory");
                return Ok(default_dir);
            }

            match self.store.use_custom_directory(&mut self.record, raw) {
                Ok(dir) => {
                    self.output
                        .print_success(&format!("Will download to: {}", dir.display()));
                    return Ok(dir);
                }
                Err(e) => {
                    self.output.print_error(&e);
                    if !self.prompter.retry_directory()? {
                        self.output.print_warning("Using default directory");
                        return Ok(default_dir);
                    }
                }
            }
        }
    }

    /// Entries to download, re-asking until the selection parses
    fn choose_selection(&mut self, total: usize) -> Result<Selection> {
        if let Some(text) = self.args.select.clone() {
            match Selection::parse(&text, total) {
                Ok(selection) => return Ok(selection),
                Err(e) => self.output.print_error(&e),
            }
        } else if self.prompter.download_all(total)? {
            return Ok(Selection::all(total));
        }

        loop {
            let text = self.prompter.selection()?;
            match Selection::parse(&text, total) {
                Ok(selection) => {
                    self.output
                        .print_success(&format!("Selected {} video(s)", selection.len()));
                    return Ok(selection);
                }
                Err(e) => {
                    self.output.print_error(&e);
                    self.output.print_warning("Please try again.");
                }
            }
        }
    }

    pub fn settings(&mut self) -> Result<()> {
        loop {
            match self.prompter.settings_menu(&self.record)? {
                SettingsChoice::Quality => {
                    let quality = self.prompter.quality(self.record.last_quality)?;
                    match self.store.set_last_quality(&mut self.record, quality) {
                        Ok(()) => self
                            .output
                            .print_success(&format!("Default quality changed to {quality}")),
                        Err(e) => self.output.print_error(&e),
                    }
                }
                SettingsChoice::Directory => {
                    let current = self.record.download_dir.clone();
                    let raw = self.prompter.custom_directory(&current)?;
                    let raw = raw.trim();
                    if raw.is_empty() || PathBuf::from(raw) == current {
                        continue;
                    }
                    match self.store.set_download_directory(&mut self.record, raw) {
                        Ok(()) => self.output.print_success("Download directory changed"),
                        Err(e) => self.output.print_error(&e),
                    }
                }
                SettingsChoice::Reset => {
                    if self.prompter.confirm_reset()? {
                        match self.store.reset(&mut self.record) {
                            Ok(()) => self.output.print_success("Settings reset to defaults"),
                            Err(e) => self.output.print_error(&e),
                        }
                    }
                }
                SettingsChoice::Back => return Ok(()),
            }
        }
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_report(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use url::Url;
    use video_downloader::{DownloadError, DownloadRequest, Downloader, Item};
    use video_primitives::Quality;

    const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=PL123";
    const VIDEO_URL: &str = "https://www.youtube.com/watch?v=solo";

    /// Scripted answers, consumed in order
    #[derive(Debug)]
    enum Answer {
        Menu(MainMenuChoice),
        Text(String),
        Directory(DirectoryChoice),
        Yes,
        No,
        Quality(Quality),
        Settings(SettingsChoice),
    }

    fn text(value: impl Into<String>) -> Answer {
        Answer::Text(value.into())
    }

    struct ScriptedPrompter {
        answers: VecDeque<Answer>,
    }

    impl ScriptedPrompter {
        fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
            Self {
                answers: answers.into_iter().collect(),
            }
        }

        fn next(&mut self, asked: &str) -> Answer {
            self.answers
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted answer for {asked}"))
        }

        fn text(&mut self, asked: &str) -> Result<String> {
            match self.next(asked) {
                Answer::Text(text) => Ok(text),
                other => panic!("{asked}: expected text, got {other:?}"),
            }
        }

        fn yes_no(&mut self, asked: &str) -> Result<bool> {
            match self.next(asked) {
                Answer::Yes => Ok(true),
                Answer::No => Ok(false),
                other => panic!("{asked}: expected yes/no, got {other:?}"),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn main_menu(&mut self) -> Result<MainMenuChoice> {
            match self.next("main menu") {
                Answer::Menu(choice) => Ok(choice),
                other => panic!("main menu: got {other:?}"),
            }
        }

        fn url(&mut self) -> Result<String> {
            self.text("url")
        }

        fn directory_choice(
            &mut self,
            _default: &Path,
            _previous: Option<&Path>,
        ) -> Result<DirectoryChoice> {
            match self.next("directory") {
                Answer::Directory(choice) => Ok(choice),
                other => panic!("directory: got {other:?}"),
            }
        }

        fn custom_directory(&mut self, _default: &Path) -> Result<String> {
            self.text("custom directory")
        }

        fn retry_directory(&mut self) -> Result<bool> {
            self.yes_no("retry directory")
        }

        fn folder_name(&mut self, detected: &str) -> Result<String> {
            match self.next("folder name") {
                Answer::Yes => Ok(detected.to_string()),
                Answer::Text(name) => Ok(name),
                other => panic!("folder name: got {other:?}"),
            }
        }

        fn download_all(&mut self, _total: usize) -> Result<bool> {
            self.yes_no("download all")
        }

        fn selection(&mut self) -> Result<String> {
            self.text("selection")
        }

        fn quality(&mut self, _current: Quality) -> Result<Quality> {
            match self.next("quality") {
                Answer::Quality(quality) => Ok(quality),
                other => panic!("quality: got {other:?}"),
            }
        }

        fn confirm_download(&mut self, _plan: &DownloadPlan<'_>) -> Result<bool> {
            self.yes_no("confirm download")
        }

        fn return_to_menu(&mut self) -> Result<bool> {
            self.yes_no("return to menu")
        }

        fn settings_menu(&mut self, _record: &SettingsRecord) -> Result<SettingsChoice> {
            match self.next("settings") {
                Answer::Settings(choice) => Ok(choice),
                other => panic!("settings: got {other:?}"),
            }
        }

        fn confirm_reset(&mut self) -> Result<bool> {
            self.yes_no("confirm reset")
        }
    }

    /// Engine that records requests and writes the archive like yt-dlp
    #[derive(Default)]
    struct FakeEngine {
        info: HashMap<String, MediaInfo>,
        failing: HashSet<String>,
        calls: Mutex<Vec<DownloadRequest>>,
    }

    impl FakeEngine {
        fn urls(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|c| c.url.clone()).collect()
        }
    }

    #[async_trait]
    impl Downloader for FakeEngine {
        async fn check_available(&self) -> Result<(), DownloadError> {
            Ok(())
        }

        async fn fetch_info(&self, url: &Url) -> Result<MediaInfo, DownloadError> {
            self.info
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| DownloadError::Metadata("Video unavailable".to_string()))
        }

        async fn download(&self, request: &DownloadRequest) -> Result<PathBuf, DownloadError> {
            self.calls.lock().unwrap().push(request.clone());
            if self.failing.contains(&request.url) {
                return Err(DownloadError::DownloadFailed("ERROR: HTTP Error 403".to_string()));
            }
            let id = request.url.rsplit('=').next().unwrap_or_default();
            let archive = Archive::open(&request.archive_path).await?;
            archive.record(&Item::youtube(id, &request.url, id)).await?;
            Ok(PathBuf::from(format!("{id}.mp4")))
        }
    }

    fn playlist(count: usize) -> MediaInfo {
        let entries = (1..=count)
            .map(|n| {
                let id = format!("v{n}");
                Item::youtube(
                    &id,
                    format!("https://www.youtube.com/watch?v={id}"),
                    format!("Episode {n}"),
                )
                .at_position(n)
            })
            .collect();
        MediaInfo::Playlist {
            title: "Road/Trip: Mix".to_string(),
            entries,
        }
    }

    fn engine() -> FakeEngine {
        let mut engine = FakeEngine::default();
        engine.info.insert(PLAYLIST_URL.to_string(), playlist(5));
        engine.info.insert(
            VIDEO_URL.to_string(),
            MediaInfo::Video(Item::youtube("solo", VIDEO_URL, "Solo")),
        );
        engine
    }

    async fn app(
        temp: &TempDir,
        args: Args,
        engine: Arc<FakeEngine>,
        answers: Vec<Answer>,
    ) -> App<ScriptedPrompter> {
        let store = SettingsStore::new(
            temp.path().join("config.json"),
            SettingsRecord::new(temp.path().join("Downloads")),
        );
        let downloader = VideoDownloader::new_with_downloader(engine).await.unwrap();
        App::new(args, store, downloader, ScriptedPrompter::new(answers))
    }

    #[tokio::test]
    async fn playlist_selection_downloads_in_first_mention_order() {
        let temp = TempDir::new().unwrap();
        let engine = Arc::new(engine());
        let mut app = app(
            &temp,
            Args::default(),
            engine.clone(),
            vec![
                text(PLAYLIST_URL),
                Answer::Directory(DirectoryChoice::Default),
                Answer::Yes, // keep detected folder name
                Answer::No,  // not all videos
                text("9"),
                text("4,1-2"),
                Answer::Quality(Quality::Fhd1080),
                Answer::Yes,
            ],
        )
        .await;

        let status = app.download().await.unwrap();

        assert_eq!(status, RunStatus::Completed);
        assert_eq!(
            engine.urls(),
            [
                "https://www.youtube.com/watch?v=v4",
                "https://www.youtube.com/watch?v=v1",
                "https://www.youtube.com/watch?v=v2",
            ]
        );
        let folder = temp.path().join("Downloads").join("Road_Trip_ Mix");
        assert!(Archive::path_for(&folder, Quality::Fhd1080).exists());
        assert_eq!(app.record().last_quality, Quality::Fhd1080);
    }

    #[tokio::test]
    async fn rerun_skips_archived_videos() {
        let temp = TempDir::new().unwrap();
        let engine = Arc::new(engine());
        let args = Args {
            url: Some(PLAYLIST_URL.to_string()),
            output_dir: Some(temp.path().join("out")),
            quality: Some(Quality::Hd720),
            select: Some("all".to_string()),
            yes: true,
            ..Args::default()
        };

        let mut first = app(&temp, args.clone(), engine.clone(), vec![Answer::Yes]).await;
        assert_eq!(first.run().await.unwrap(), RunStatus::Completed);
        assert_eq!(engine.urls().len(), 5);

        let mut second = app(&temp, args, engine.clone(), vec![Answer::Yes]).await;
        assert_eq!(second.run().await.unwrap(), RunStatus::Completed);
        assert_eq!(engine.urls().len(), 5, "nothing new should reach the engine");
    }

    #[tokio::test]
    async fn failed_item_marks_run_failed_but_finishes_batch() {
        let temp = TempDir::new().unwrap();
        let mut engine = engine();
        engine
            .failing
            .insert("https://www.youtube.com/watch?v=v3".to_string());
        let engine = Arc::new(engine);
        let args = Args {
            url: Some(PLAYLIST_URL.to_string()),
            output_dir: Some(temp.path().join("out")),
            quality: Some(Quality::Sd480),
            select: Some("1-5".to_string()),
            yes: true,
            ..Args::default()
        };

        let mut app = app(&temp, args, engine.clone(), vec![Answer::Yes]).await;

        assert_eq!(app.run().await.unwrap(), RunStatus::Failed);
        assert_eq!(engine.urls().len(), 5);
    }

    #[tokio::test]
    async fn cancelling_leaves_quality_untouched() {
        let temp = TempDir::new().unwrap();
        let engine = Arc::new(engine());
        let mut app = app(
            &temp,
            Args::default(),
            engine.clone(),
            vec![
                text(VIDEO_URL),
                Answer::Directory(DirectoryChoice::Default),
                Answer::Quality(Quality::P144),
                Answer::No,
            ],
        )
        .await;

        assert_eq!(app.download().await.unwrap(), RunStatus::Cancelled);
        assert!(engine.urls().is_empty());
        assert_eq!(app.record().last_quality, Quality::Hd720);
    }

    #[tokio::test]
    async fn invalid_url_is_reported_without_fetching() {
        let temp = TempDir::new().unwrap();
        let engine = Arc::new(engine());
        let mut app = app(
            &temp,
            Args::default(),
            engine.clone(),
            vec![text("https://example.com/video")],
        )
        .await;

        assert_eq!(app.download().await.unwrap(), RunStatus::Failed);
        assert!(engine.urls().is_empty());
    }

    #[tokio::test]
    async fn bad_custom_directory_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let bad = blocker.join("videos");

        let engine = Arc::new(engine());
        let mut app = app(
            &temp,
            Args::default(),
            engine.clone(),
            vec![
                text(VIDEO_URL),
                Answer::Directory(DirectoryChoice::Custom),
                text(bad.to_string_lossy()),
                Answer::No, // do not retry
                Answer::Quality(Quality::Hd720),
                Answer::Yes,
            ],
        )
        .await;

        assert_eq!(app.download().await.unwrap(), RunStatus::Completed);
        let calls = engine.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        let default_dir = temp.path().join("Downloads");
        assert_eq!(
            calls[0].archive_path,
            Archive::path_for(&default_dir, Quality::Hd720)
        );
        assert_eq!(app.record().previous_custom_dir, None);
    }

    #[tokio::test]
    async fn settings_menu_changes_are_persisted() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("library");
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let bad = blocker.join("x");

        let mut app = app(
            &temp,
            Args::default(),
            Arc::new(engine()),
            vec![
                Answer::Settings(SettingsChoice::Quality),
                Answer::Quality(Quality::Qhd1440),
                Answer::Settings(SettingsChoice::Directory),
                text(target.to_string_lossy()),
                Answer::Settings(SettingsChoice::Directory),
                text(bad.to_string_lossy()),
                Answer::Settings(SettingsChoice::Back),
            ],
        )
        .await;

        app.settings().unwrap();

        let reloaded = app.store.load();
        assert_eq!(reloaded.last_quality, Quality::Qhd1440);
        assert_eq!(reloaded.download_dir, target.canonicalize().unwrap());
        assert_eq!(
            reloaded.previous_custom_dir,
            Some(temp.path().join("Downloads"))
        );
        assert_eq!(app.record(), &reloaded);
    }

    #[tokio::test]
    async fn main_menu_exit() {
        let temp = TempDir::new().unwrap();
        let mut app = app(
            &temp,
            Args::default(),
            Arc::new(engine()),
            vec![Answer::Menu(MainMenuChoice::Exit)],
        )
        .await;

        assert_eq!(app.run().await.unwrap(), RunStatus::Completed);
    }
}
