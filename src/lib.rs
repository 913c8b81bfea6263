pub mod cli;
pub mod config;
pub mod core;
pub mod extractors;
pub mod utils;

pub use crate::core::{
    Error, FetchOutcome, JsonStore, Result, VideoFetcher, VideoRecord, VideoStore,
};
pub use extractors::YouTubeClient;
