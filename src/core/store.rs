use crate::core::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One known video and the channel that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(rename = "VideoID")]
    pub video_id: String,
    #[serde(rename = "CreatorID", default, deserialize_with = "null_as_empty")]
    pub creator_id: String,
}

impl VideoRecord {
    pub fn new(video_id: impl Into<String>, creator_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            creator_id: creator_id.into(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// On-disk shape: `{ "Videos": [ ... ] }`.
#[derive(Serialize, Deserialize)]
struct StoreDocument {
    #[serde(rename = "Videos", default)]
    videos: Option<Vec<VideoRecord>>,
}

/// Ordered list of known videos with a lookup index on `video_id`.
///
/// Records are kept in insertion order so the file reflects fetch order.
/// The index is derived from the list and never serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "StoreDocument", into = "StoreDocument")]
pub struct VideoStore {
    videos: Vec<VideoRecord>,
    index: HashSet<String>,
}

impl From<StoreDocument> for VideoStore {
    fn from(document: StoreDocument) -> Self {
        let videos = document.videos.unwrap_or_default();
        let index = videos.iter().map(|v| v.video_id.clone()).collect();
        Self { videos, index }
    }
}

impl From<VideoStore> for StoreDocument {
    fn from(store: VideoStore) -> Self {
        Self {
            videos: Some(store.videos),
        }
    }
}

impl PartialEq for VideoStore {
    fn eq(&self, other: &Self) -> bool {
        self.videos == other.videos
    }
}

impl Eq for VideoStore {}

impl VideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn videos(&self) -> &[VideoRecord] {
        &self.videos
    }

    pub fn contains(&self, video_id: &str) -> bool {
        self.index.contains(video_id)
    }

    /// Appends `record` unless its id is already known. Returns whether it was added.
    pub fn insert(&mut self, record: VideoRecord) -> bool {
        if !self.index.insert(record.video_id.clone()) {
            return false;
        }
        self.videos.push(record);
        true
    }
}

impl FromIterator<VideoRecord> for VideoStore {
    fn from_iter<I: IntoIterator<Item = VideoRecord>>(iter: I) -> Self {
        let mut store = VideoStore::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

/// JSON file backing a [`VideoStore`]. Every load reads the whole file and
/// every save rewrites it.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<VideoStore> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet, starting empty", self.path.display());
                return Ok(VideoStore::new());
            }
            Err(source) => {
                return Err(Error::Storage {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let store = parse_store(&contents).map_err(|source| Error::CorruptStore {
            path: self.path.clone(),
            source,
        })?;
        debug!("Loaded {} videos from {}", store.len(), self.path.display());
        Ok(store)
    }

    // No temp-file swap: a crash mid-write can truncate the list.
    pub async fn save(&self, store: &VideoStore) -> Result<()> {
        let json = serde_json::to_string_pretty(store).map_err(|source| Error::EncodeStore {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| Error::Storage {
                path: self.path.clone(),
                source,
            })?;
        debug!("Saved {} videos to {}", store.len(), self.path.display());
        Ok(())
    }
}

/// Empty content, `null` and `{}` all mean "no videos yet".
pub fn parse_store(contents: &str) -> serde_json::Result<VideoStore> {
    if contents.trim().is_empty() {
        return Ok(VideoStore::new());
    }
    let store: Option<VideoStore> = serde_json::from_str(contents)?;
    Ok(store.unwrap_or_default())
}
