pub mod console;

use crate::config::Config;
use crate::core::{ErrorKind, JsonStore, Result, VideoApi, VideoFetcher};
use crate::extractors::YouTubeClient;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::AsyncBufRead;
use tracing::{info, warn};

pub use console::Console;

const USAGE: &str = "Commands: creator <handle> | url <video URL> | stop";

#[derive(Parser)]
#[command(name = "video-fetch")]
#[command(about = "Collect YouTube video ids into a local JSON list")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Video list to read and update (overrides the config file)
    #[arg(short, long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        Ok(config)
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let mut console = Console::stdin();

        println!("Please enter a YouTube Data API key");
        let Some(api_key) = console.read_line().await? else {
            return Ok(());
        };
        let api_key = api_key.trim();
        if api_key.is_empty() {
            anyhow::bail!("An API key is required");
        }

        let client = YouTubeClient::new(api_key, &config)?;
        info!("Using video list {}", config.store_path.display());
        println!("Client initialized. You may now use commands to fetch videos.");
        println!("{}", USAGE);

        let fetcher = VideoFetcher::new(client, JsonStore::new(&config.store_path));
        Session::new(fetcher, console).run().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Creator(String),
    Url(String),
    Stop,
    Empty,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Command::Empty;
        };
        match (name, words.next()) {
            ("stop", _) => Command::Stop,
            ("creator", Some(handle)) => Command::Creator(handle.to_string()),
            ("url", Some(url)) => Command::Url(url.to_string()),
            ("creator", None) => Command::Invalid("usage: creator <handle>".to_string()),
            ("url", None) => Command::Invalid("usage: url <video URL>".to_string()),
            (other, _) => Command::Invalid(format!("unknown command {other:?}. {USAGE}")),
        }
    }
}

/// Sequential read-dispatch loop. Owns the fetcher (and so the API client)
/// for the whole session.
pub struct Session<A, R> {
    fetcher: VideoFetcher<A>,
    console: Console<R>,
}

impl<A, R> Session<A, R>
where
    A: VideoApi,
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(fetcher: VideoFetcher<A>, console: Console<R>) -> Self {
        Self { fetcher, console }
    }

    pub fn fetcher(&self) -> &VideoFetcher<A> {
        &self.fetcher
    }

    /// Runs commands until `stop` or end of input.
    ///
    /// Workflow failures are reported and the loop continues; only a broken
    /// console ends the session with an error.
    pub async fn run(&mut self) -> Result<()> {
        while let Some(line) = self.console.read_line().await? {
            if !self.execute(Command::parse(&line)).await? {
                break;
            }
        }
        info!("Session ended");
        Ok(())
    }

    /// Returns `false` once the session should stop.
    pub async fn execute(&mut self, command: Command) -> Result<bool> {
        let result = match command {
            Command::Stop => return Ok(false),
            Command::Empty => return Ok(true),
            Command::Invalid(message) => {
                println!("{}", message);
                return Ok(true);
            }
            Command::Creator(handle) => {
                self.fetcher.fetch_channel(&handle, &mut self.console).await
            }
            Command::Url(url) => self.fetcher.fetch_video_url(&url, &mut self.console).await,
        };

        match result {
            Ok(outcome) => println!("{}", outcome),
            Err(e) if e.kind() == ErrorKind::Console => return Err(e),
            Err(e) => {
                warn!("{:?} error: {}", e.kind(), e);
                println!("error: {}", e);
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("creator  GoogleDevelopers"),
            Command::Creator("GoogleDevelopers".to_string())
        );
        assert_eq!(
            Command::parse("url https://youtu.be/dQw4w9WgXcQ"),
            Command::Url("https://youtu.be/dQw4w9WgXcQ".to_string())
        );
        assert_eq!(Command::parse("stop"), Command::Stop);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert!(matches!(Command::parse("creator"), Command::Invalid(_)));
        assert!(matches!(Command::parse("url"), Command::Invalid(_)));
        assert!(matches!(Command::parse("download x"), Command::Invalid(_)));
    }

    #[test]
    fn test_store_flag_overrides_config() {
        let cli = Cli::parse_from(["video-fetch", "--store", "other.json"]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.store_path, PathBuf::from("other.json"));

        let cli = Cli::parse_from(["video-fetch"]);
        assert_eq!(cli.load_config().unwrap().store_path, PathBuf::from("videos.json"));
    }
}
