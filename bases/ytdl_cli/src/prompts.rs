// bases/ytdl_cli/src/prompts.rs
use color_eyre::Result;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use download_settings::SettingsRecord;
use std::path::Path;
use video_primitives::Quality;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuChoice {
    Download,
    Settings,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryChoice {
    Default,
    Previous,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChoice {
    Quality,
    Directory,
    Reset,
    Back,
}

/// What gets downloaded, shown before asking to proceed
pub struct DownloadPlan<'a> {
    pub videos: usize,
    pub quality: Quality,
    pub directory: &'a Path,
}

/// Source of user decisions.
///
/// The workflow only sees plain values, so it can run against a script as
/// well as a terminal.
pub trait Prompter {
    fn main_menu(&mut self) -> Result<MainMenuChoice>;
    fn url(&mut self) -> Result<String>;
    fn directory_choice(&mut self, default: &Path, previous: Option<&Path>)
        -> Result<DirectoryChoice>;
    fn custom_directory(&mut self, default: &Path) -> Result<String>;
    fn retry_directory(&mut self) -> Result<bool>;
    /// Returns the folder name to use, `detected` if the user keeps it
    fn folder_name(&mut self, detected: &str) -> Result<String>;
    fn download_all(&mut self, total: usize) -> Result<bool>;
    fn selection(&mut self) -> Result<String>;
    fn quality(&mut self, current: Quality) -> Result<Quality>;
    fn confirm_download(&mut self, plan: &DownloadPlan<'_>) -> Result<bool>;
    fn return_to_menu(&mut self) -> Result<bool>;
    fn settings_menu(&mut self, record: &SettingsRecord) -> Result<SettingsChoice>;
    fn confirm_reset(&mut self) -> Result<bool>;
}

/// Arrow-key menus on the terminal
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn select(&self, prompt: &str, items: &[String], default: usize) -> Result<Option<usize>> {
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact_opt()?;
        Ok(choice)
    }

    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_opt()?;
        Ok(answer.unwrap_or(false))
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn main_menu(&mut self) -> Result<MainMenuChoice> {
        let items = [
            "Download video/playlist".to_string(),
            "Change settings".to_string(),
            "Exit".to_string(),
        ];
        let choice = self.select("What would you like to do?", &items, 0)?;
        Ok(match choice {
            Some(0) => MainMenuChoice::Download,
            Some(1) => MainMenuChoice::Settings,
            _ => MainMenuChoice::Exit,
        })
    }

    fn url(&mut self) -> Result<String> {
        let url: String = Input::with_theme(&self.theme)
            .with_prompt("Paste YouTube URL")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("URL cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        Ok(url.trim().to_string())
    }

    fn directory_choice(
        &mut self,
        default: &Path,
        previous: Option<&Path>,
    ) -> Result<DirectoryChoice> {
        let mut items = vec![format!("Default ({})", default.display())];
        let mut choices = vec![DirectoryChoice::Default];
        if let Some(previous) = previous {
            items.push(format!("Previous ({})", previous.display()));
            choices.push(DirectoryChoice::Previous);
        }
        items.push("Custom directory...".to_string());
        choices.push(DirectoryChoice::Custom);

        let choice = self.select("Download directory", &items, 0)?;
        Ok(choice
            .map(|index| choices[index])
            .unwrap_or(DirectoryChoice::Default))
    }

    fn custom_directory(&mut self, default: &Path) -> Result<String> {
        let path: String = Input::with_theme(&self.theme)
            .with_prompt("Enter download path")
            .default(default.display().to_string())
            .interact_text()?;
        Ok(path)
    }

    fn retry_directory(&mut self) -> Result<bool> {
        self.confirm("Try again?", true)
    }

    fn folder_name(&mut self, detected: &str) -> Result<String> {
        let short: String = detected.chars().take(40).collect();
        let items = [
            format!("Use playlist name ({short})"),
            "Enter custom folder name".to_string(),
        ];
        if self.select("Playlist folder name", &items, 0)? != Some(1) {
            return Ok(detected.to_string());
        }

        let name: String = Input::with_theme(&self.theme)
            .with_prompt("Enter folder name")
            .default(detected.to_string())
            .interact_text()?;
        Ok(name)
    }

    fn download_all(&mut self, total: usize) -> Result<bool> {
        let items = [
            format!("All videos ({total} videos)"),
            "Select specific videos".to_string(),
        ];
        let choice = self.select("Which videos do you want to download?", &items, 0)?;
        Ok(choice != Some(1))
    }

    fn selection(&mut self) -> Result<String> {
        println!();
        println!("{}", style("Selection examples:").yellow().bold());
        println!("  • 'all' for every video");
        println!("  • ranges: '1-10'");
        println!("  • specific videos: '1,3,7'");
        println!("  • combined: '1-5,7,10-12'");
        let text: String = Input::with_theme(&self.theme)
            .with_prompt("Enter your selection")
            .allow_empty(true)
            .interact_text()?;
        Ok(text)
    }

    fn quality(&mut self, current: Quality) -> Result<Quality> {
        let items: Vec<String> = Quality::ALL.iter().map(|q| q.label().to_string()).collect();
        let choice = self.select("Select video quality", &items, current.menu_index())?;
        Ok(choice.map(|index| Quality::ALL[index]).unwrap_or(current))
    }

    fn confirm_download(&mut self, plan: &DownloadPlan<'_>) -> Result<bool> {
        println!();
        println!("{}", style("Download Summary").yellow().bold());
        println!("  • Videos: {}", plan.videos);
        println!("  • Quality: {}", plan.quality);
        println!("  • Directory: {}", plan.directory.display());
        self.confirm("Proceed with download?", true)
    }

    fn return_to_menu(&mut self) -> Result<bool> {
        self.confirm("Return to main menu?", true)
    }

    fn settings_menu(&mut self, record: &SettingsRecord) -> Result<SettingsChoice> {
        let items = [
            format!("Default Quality: {}", record.last_quality),
            format!("Download Directory: {}", record.download_dir.display()),
            "Reset to defaults".to_string(),
            "Back to main menu".to_string(),
        ];
        let choice = self.select("What would you like to change?", &items, 0)?;
        Ok(match choice {
            Some(0) => SettingsChoice::Quality,
            Some(1) => SettingsChoice::Directory,
            Some(2) => SettingsChoice::Reset,
            _ => SettingsChoice::Back,
        })
    }

    fn confirm_reset(&mut self) -> Result<bool> {
        self.confirm("Reset all settings to defaults?", false)
    }
}
