use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use socialgrab::{
    client::{
        FileStorage, History, ThemePreference, render_summary, theme_label,
        thumbnail_or_placeholder,
    },
    config::ServerConfig,
    extractor::{Extractor, HttpUpstream},
};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract downloadable media from social media posts", long_about = None)]
struct Args {
    /// Path to the client state file (history and theme)
    #[arg(short, long, env = "SOCIALGRAB_STATE")]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract media from a post URL and remember it in the history
    Extract { url: String },
    /// List recently extracted URLs, newest first
    History,
    /// Forget every history entry
    ClearHistory,
    /// Show or change the theme preference
    Theme { mode: Option<ThemeMode> },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeMode {
    Dark,
    Light,
    Toggle,
}

fn state_path(args: &Args) -> Result<PathBuf> {
    if let Some(path) = &args.state {
        return Ok(path.clone());
    }

    dirs::data_local_dir()
        .map(|dir| dir.join("socialgrab").join("state.json"))
        .context("Could not determine a data directory; pass --state")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let path = state_path(&args)?;

    match args.command {
        Command::Extract { url } => {
            let config = ServerConfig::from_env();
            let upstream = HttpUpstream::new(config.user_agent)
                .context("Failed to build the HTTP client")?;
            let extractor = Extractor::new(Arc::new(upstream));

            let result = extractor
                .extract(&url)
                .await
                .with_context(|| format!("Could not extract media from {url}"))?;

            for line in render_summary(&result) {
                println!("{line}");
            }
            println!("thumbnail: {}", thumbnail_or_placeholder(&result.thumbnail));

            History::new(FileStorage::new(&path))
                .add(url.trim(), &result.title, &result.thumbnail)
                .await
                .with_context(|| format!("Failed to update history in {}", path.display()))?;
        }
        Command::History => {
            let entries = History::new(FileStorage::new(&path))
                .entries()
                .await
                .with_context(|| format!("Failed to read history from {}", path.display()))?;

            if entries.is_empty() {
                println!("No download history");
            }
            for entry in entries {
                let title = if entry.title.is_empty() {
                    "Social media post"
                } else {
                    entry.title.as_str()
                };
                println!(
                    "{}  {title}\n    {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.url
                );
            }
        }
        Command::ClearHistory => {
            History::new(FileStorage::new(&path))
                .clear()
                .await
                .with_context(|| format!("Failed to clear history in {}", path.display()))?;
            println!("History cleared");
        }
        Command::Theme { mode } => {
            let theme = ThemePreference::new(FileStorage::new(&path));
            let dark = match mode {
                Some(ThemeMode::Dark) => {
                    theme.set_dark(true).await?;
                    true
                }
                Some(ThemeMode::Light) => {
                    theme.set_dark(false).await?;
                    false
                }
                Some(ThemeMode::Toggle) => theme.toggle().await?,
                None => theme.is_dark().await?,
            };

            println!(
                "Theme: {} (switch with: {})",
                if dark { "dark" } else { "light" },
                theme_label(dark)
            );
        }
    }

    Ok(())
}
