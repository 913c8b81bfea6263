use crate::config::Config;
use crate::core::{
    ChannelUploads, Error, PlaylistEntry, PlaylistPage, Result, VideoApi, VideoDetails,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Maximum `maxResults` accepted by `playlistItems.list`.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Client for the three read-only YouTube Data API v3 endpoints the
/// workflows use. Authenticates every request with a plain API key.
pub struct YouTubeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>, config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| Error::Request(e.without_url()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            page_size: config.page_size.clamp(1, MAX_PAGE_SIZE),
        })
    }

    async fn get<T: DeserializeOwned>(&self, resource: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, resource);
        // The key is appended separately and stripped from transport errors so it
        // never reaches logs or operator output.
        tracing::debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| Error::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
            tracing::debug!("{} failed with HTTP {}: {}", resource, status, message);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Request(e.without_url()))
    }
}

#[async_trait]
impl VideoApi for YouTubeClient {
    fn name(&self) -> &'static str {
        "youtube"
    }

    async fn channel_uploads(&self, handle: &str) -> Result<ChannelUploads> {
        // `@name` handles and legacy usernames are looked up through different filters.
        let filter = if handle.starts_with('@') {
            "forHandle"
        } else {
            "forUsername"
        };
        let response: ChannelListResponse = self
            .get("channels", &[("part", "contentDetails"), (filter, handle)])
            .await?;
        Ok(response.into())
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistPage> {
        let max_results = self.page_size.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token.filter(|t| !t.is_empty()) {
            params.push(("pageToken", token));
        }

        let response: PlaylistItemListResponse = self.get("playlistItems", &params).await?;
        Ok(response.into())
    }

    async fn videos(&self, video_id: &str) -> Result<Vec<VideoDetails>> {
        let response: VideoListResponse = self
            .get("videos", &[("part", "snippet"), ("id", video_id)])
            .await?;
        Ok(response.into())
    }
}

/// Pulls `error.message` out of Google's JSON error envelope.
fn api_error_message(body: &str) -> Option<String> {
    let envelope: ApiErrorEnvelope = serde_json::from_str(body).ok()?;
    Some(envelope.error.message).filter(|m| !m.is_empty())
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    total_results: u64,
}

/// `channels.list` response. `items` is omitted entirely when nothing matches.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelListResponse {
    #[serde(default)]
    page_info: PageInfo,
    #[serde(default)]
    items: Vec<Channel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Channel {
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

impl From<ChannelListResponse> for ChannelUploads {
    fn from(response: ChannelListResponse) -> Self {
        let uploads_playlists = response
            .items
            .into_iter()
            .filter_map(|c| c.content_details?.related_playlists.uploads)
            .filter(|id| !id.is_empty())
            .collect();

        ChannelUploads {
            total_results: response.page_info.total_results,
            uploads_playlists,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemListResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: Option<PlaylistItemSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    channel_id: Option<String>,
    resource_id: Option<ResourceId>,
    video_owner_channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

impl From<PlaylistItemListResponse> for PlaylistPage {
    fn from(response: PlaylistItemListResponse) -> Self {
        let entries = response
            .items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet?;
                let video_id = snippet.resource_id?.video_id?;
                // Private and deleted uploads carry no owner; the playlist's channel owns them.
                let owner_channel_id = snippet
                    .video_owner_channel_id
                    .or(snippet.channel_id)
                    .unwrap_or_default();
                Some(PlaylistEntry {
                    video_id,
                    owner_channel_id,
                })
            })
            .collect();

        PlaylistPage {
            entries,
            next_page_token: response.next_page_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    id: String,
    snippet: Option<VideoSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_id: String,
}

impl From<VideoListResponse> for Vec<VideoDetails> {
    fn from(response: VideoListResponse) -> Self {
        response
            .items
            .into_iter()
            .filter_map(|video| {
                let snippet = video.snippet?;
                Some(VideoDetails {
                    video_id: video.id,
                    title: snippet.title,
                    channel_id: snippet.channel_id,
                })
            })
            .collect()
    }
}
