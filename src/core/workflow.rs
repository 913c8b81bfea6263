use crate::core::api::{playlist_pages, VideoApi};
use crate::core::error::{Error, Result};
use crate::core::store::{JsonStore, VideoRecord, VideoStore};
use crate::utils::parse_video_id;
use async_trait::async_trait;
use futures::TryStreamExt;
use std::fmt;
use tracing::{debug, info};

/// What a workflow found, shown to the operator before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staged {
    Channel { fetched: usize, duplicates: usize },
    Video { title: String },
}

impl Staged {
    pub fn question(&self) -> &'static str {
        match self {
            Staged::Channel { .. } => "Would you like to add all videos to the saved list? (y/n)",
            Staged::Video { .. } => "Would you like to add this video to the saved list? (y/n)",
        }
    }
}

impl fmt::Display for Staged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staged::Channel {
                fetched,
                duplicates,
            } => write!(
                f,
                "{} duplicate videos ignored\n{} videos fetched",
                duplicates, fetched
            ),
            Staged::Video { title } => write!(f, "{} fetched", title),
        }
    }
}

/// Asks the operator whether staged videos should be written to the store.
#[async_trait]
pub trait Confirm: Send {
    async fn confirm(&mut self, staged: &Staged) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The channel lookup returned no results; the store was not touched.
    NoVideos { handle: String },
    /// The video is already in the store; the API was not called.
    AlreadyAdded { video_id: String },
    Added { added: usize, duplicates: usize },
    Cancelled { staged: usize, duplicates: usize },
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::NoVideos { handle } => {
                write!(f, "No videos found for channel {}, cancelling task.", handle)
            }
            FetchOutcome::AlreadyAdded { video_id } => {
                write!(f, "Video {} has already been added, cancelling task.", video_id)
            }
            FetchOutcome::Added { added: 1, .. } => write!(f, "1 video added"),
            FetchOutcome::Added { added, .. } => write!(f, "{} videos added", added),
            FetchOutcome::Cancelled { .. } => write!(f, "Task cancelled"),
        }
    }
}

/// Runs the fetch-and-merge workflows against one API client and one store file.
///
/// The store is reloaded from disk on every call and only written back when
/// the operator confirms.
pub struct VideoFetcher<A> {
    api: A,
    store: JsonStore,
}

impl<A: VideoApi> VideoFetcher<A> {
    pub fn new(api: A, store: JsonStore) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Collects every upload of the channel behind `handle`.
    pub async fn fetch_channel<C>(&self, handle: &str, gate: &mut C) -> Result<FetchOutcome>
    where
        C: Confirm + ?Sized,
    {
        info!("Fetching videos from channel {} via {}", handle, self.api.name());

        let channel = self.api.channel_uploads(handle).await?;
        if channel.total_results == 0 {
            return Ok(FetchOutcome::NoVideos {
                handle: handle.to_string(),
            });
        }
        if channel.uploads_playlists.is_empty() {
            return Err(Error::ChannelNotFound(handle.to_string()));
        }

        let mut store = self.store.load().await?;
        let prev_count = store.len();
        let mut duplicates = 0;

        for playlist_id in &channel.uploads_playlists {
            let mut pages = std::pin::pin!(playlist_pages(&self.api, playlist_id));
            while let Some(page) = pages.try_next().await? {
                debug!("{}: page with {} items", playlist_id, page.entries.len());
                for entry in page.entries {
                    if !store.insert(VideoRecord::new(entry.video_id, entry.owner_channel_id)) {
                        duplicates += 1;
                    }
                }
            }
        }

        let fetched = store.len() - prev_count;
        info!("{}: {} new videos, {} duplicates", handle, fetched, duplicates);
        self.commit(&store, Staged::Channel { fetched, duplicates }, gate).await
    }

    /// Adds the single video `url` points at.
    pub async fn fetch_video_url<C>(&self, url: &str, gate: &mut C) -> Result<FetchOutcome>
    where
        C: Confirm + ?Sized,
    {
        info!("Fetching video from {}", url);

        let video_id = parse_video_id(url)?;
        let mut store = self.store.load().await?;
        if store.contains(&video_id) {
            return Ok(FetchOutcome::AlreadyAdded { video_id });
        }

        let video = self
            .api
            .videos(&video_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::VideoNotFound(video_id.clone()))?;

        store.insert(VideoRecord::new(video_id, video.channel_id));
        self.commit(&store, Staged::Video { title: video.title }, gate).await
    }

    async fn commit<C>(
        &self,
        store: &VideoStore,
        staged: Staged,
        gate: &mut C,
    ) -> Result<FetchOutcome>
    where
        C: Confirm + ?Sized,
    {
        let (added, duplicates) = match &staged {
            Staged::Channel {
                fetched,
                duplicates,
            } => (*fetched, *duplicates),
            Staged::Video { .. } => (1, 0),
        };

        if !gate.confirm(&staged).await? {
            debug!("Operator declined, discarding {} staged videos", added);
            return Ok(FetchOutcome::Cancelled {
                staged: added,
                duplicates,
            });
        }

        self.store.save(store).await?;
        info!("Saved {} new videos to {}", added, self.store.path().display());
        Ok(FetchOutcome::Added { added, duplicates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_summary_lines() {
        let staged = Staged::Channel {
            fetched: 3,
            duplicates: 2,
        };
        assert_eq!(staged.to_string(), "2 duplicate videos ignored\n3 videos fetched");
        assert!(staged.question().contains("all videos"));

        let staged = Staged::Video {
            title: "Big Buck Bunny".to_string(),
        };
        assert_eq!(staged.to_string(), "Big Buck Bunny fetched");
        assert!(staged.question().contains("this video"));
    }

    #[test]
    fn test_outcome_lines() {
        assert_eq!(
            FetchOutcome::Added {
                added: 1,
                duplicates: 0
            }
            .to_string(),
            "1 video added"
        );
        assert_eq!(
            FetchOutcome::Added {
                added: 12,
                duplicates: 4
            }
            .to_string(),
            "12 videos added"
        );
        assert_eq!(
            FetchOutcome::Cancelled {
                staged: 3,
                duplicates: 0
            }
            .to_string(),
            "Task cancelled"
        );
        assert!(FetchOutcome::NoVideos {
            handle: "nobody".to_string()
        }
        .to_string()
        .contains("No videos found"));
    }
}
