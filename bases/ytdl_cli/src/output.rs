// bases/ytdl_cli/src/output.rs
use console::style;
use std::path::Path;
use video_downloader::{Item, OutcomeStatus, Summary};

pub struct OutputHandler {
    verbose: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print_banner(&self) {
        println!();
        println!("{}", style("YouTube Downloader CLI").cyan().bold());
        println!("{}", style("Powered by yt-dlp").dim());
        println!();
    }

    pub fn print_info(&self, message: &str) {
        println!("{} {}", style("ℹ").cyan().bold(), style(message).cyan());
    }

    pub fn print_success(&self, message: &str) {
        println!("{} {}", style("✓").green().bold(), style(message).green());
    }

    pub fn print_warning(&self, message: &str) {
        println!("{} {}", style("!").yellow().bold(), style(message).yellow());
    }

    pub fn print_playlist(&self, title: &str, entries: &[Item]) {
        println!();
        println!("{} {}", style("Playlist:").green().bold(), title);
        println!("{} {}", style("Total videos:").bold(), entries.len());
        println!();
        println!(
            "{:>4}  {:<70}  {:^10}",
            style("#").magenta().bold(),
            style("Title").magenta().bold(),
            style("Duration").magenta().bold()
        );
        for (index, entry) in entries.iter().enumerate() {
            let title = if entry.title.chars().count() > 70 {
                let short: String = entry.title.chars().take(67).collect();
                format!("{short}...")
            } else {
                entry.title.clone()
            };
            println!(
                "{:>4}  {:<70}  {:^10}",
                style(index + 1).cyan(),
                title,
                style(entry.duration.as_deref().unwrap_or("N/A")).yellow()
            );
        }
        println!();
    }

    pub fn print_download_start(&self, videos: usize, directory: &Path) {
        println!();
        println!("{} {} video(s) to:", style("Downloading").cyan(), videos);
        println!("{}", directory.display());
        println!();
    }

    pub fn print_summary(&self, summary: &Summary) {
        println!();
        for outcome in &summary.outcomes {
            match &outcome.status {
                OutcomeStatus::Succeeded { path } => {
                    if self.verbose {
                        println!(
                            "  {} {} → {}",
                            style("✓").green(),
                            outcome.item.title,
                            path.display()
                        );
                    } else {
                        println!("  {} {}", style("✓").green(), outcome.item.title);
                    }
                }
                OutcomeStatus::Skipped => {
                    println!(
                        "  {} {} (already downloaded)",
                        style("↷").dim(),
                        outcome.item.title
                    );
                }
                OutcomeStatus::Failed { .. } => {
                    println!("  {} {}", style("✗").red(), outcome.item.title);
                }
            }
        }

        println!();
        println!(
            "{} succeeded, {} skipped, {} failed in {}s",
            style(summary.succeeded()).green().bold(),
            style(summary.skipped()).dim().bold(),
            style(summary.failed()).red().bold(),
            summary.elapsed().num_seconds()
        );

        if summary.failed() > 0 {
            eprintln!();
            eprintln!("{}", style("Failed downloads:").red().bold());
            for failure in summary.failures() {
                if let OutcomeStatus::Failed { reason } = &failure.status {
                    eprintln!("  {} ({})", failure.item.title, failure.item.url);
                    for line in reason.lines() {
                        eprintln!("    {}", style(line).red());
                    }
                }
            }
        }
        println!();
    }

    pub fn print_error(&self, error: &dyn std::fmt::Display) {
        eprintln!("{} {}", style("✗ Error:").red().bold(), error);
    }

    pub fn print_report(&self, error: &color_eyre::Report) {
        eprintln!("{} {}", style("Error:").red().bold(), error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }
}
