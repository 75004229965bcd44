// bases/ytdl_cli/src/main.rs
mod app;
mod args;
mod output;
mod prompts;

use app::{App, RunStatus};
use args::Args;
use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use download_settings::SettingsStore;
use output::OutputHandler;
use prompts::DialoguerPrompter;
use video_downloader::VideoDownloader;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let default_filter = if args.verbose {
        "ytdl=info,video_downloader=info,download_settings=info"
    } else {
        "ytdl=warn,video_downloader=warn,download_settings=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let status = match build_app(args.clone()).await {
        Ok(mut app) => match app.run().await {
            Ok(status) => status,
            Err(error) => {
                app.print_error(&error);
                RunStatus::Failed
            }
        },
        Err(error) => {
            OutputHandler::new(args.verbose).print_report(&error);
            RunStatus::Failed
        }
    };

    if status == RunStatus::Failed {
        std::process::exit(1);
    }
    Ok(())
}

async fn build_app(args: Args) -> Result<App<DialoguerPrompter>> {
    let store = match &args.config {
        Some(path) => SettingsStore::at(path)?,
        None => SettingsStore::for_user()?,
    };
    let downloader = VideoDownloader::new()
        .await
        .wrap_err("yt-dlp is required; install it and make sure it is on PATH")?;

    Ok(App::new(args, store, downloader, DialoguerPrompter::new()))
}
