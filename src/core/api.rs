use crate::core::error::{Error, Result};
use async_trait::async_trait;
use futures::stream::{self, Stream};

/// Result of resolving a channel handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelUploads {
    /// `pageInfo.totalResults` as reported by the platform.
    pub total_results: u64,
    /// Uploads collection id of every matching channel, in response order.
    pub uploads_playlists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub video_id: String,
    pub owner_channel_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPage {
    pub entries: Vec<PlaylistEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
}

/// Read operations the fetch workflows need from the video platform.
#[async_trait]
pub trait VideoApi: Send + Sync {
    fn name(&self) -> &'static str;

    async fn channel_uploads(&self, handle: &str) -> Result<ChannelUploads>;

    async fn playlist_page(&self, playlist_id: &str, page_token: Option<&str>)
        -> Result<PlaylistPage>;

    async fn videos(&self, video_id: &str) -> Result<Vec<VideoDetails>>;
}

/// Pages of a playlist, requested one at a time as the stream is polled.
///
/// The stream ends after the first page whose continuation token is absent or
/// empty. A failed request is yielded once and ends the stream.
pub fn playlist_pages<'a, A>(
    api: &'a A,
    playlist_id: &'a str,
) -> impl Stream<Item = Result<PlaylistPage>> + 'a
where
    A: VideoApi + ?Sized + 'a,
{
    // `Some(token)` means another page is due; `None` means the walk is over.
    stream::try_unfold(Some(None::<String>), move |cursor| async move {
        let Some(token) = cursor else {
            return Ok::<_, Error>(None);
        };
        let page = api.playlist_page(playlist_id, token.as_deref()).await?;
        let next = page
            .next_page_token
            .clone()
            .filter(|t| !t.is_empty())
            .map(Some);
        Ok(Some((page, next)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use std::sync::Mutex;

    struct Paged {
        pages: Vec<PlaylistPage>,
        fail_at: Option<usize>,
        requested: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl VideoApi for Paged {
        fn name(&self) -> &'static str {
            "paged"
        }

        async fn channel_uploads(&self, _handle: &str) -> Result<ChannelUploads> {
            unreachable!()
        }

        async fn playlist_page(
            &self,
            _playlist_id: &str,
            page_token: Option<&str>,
        ) -> Result<PlaylistPage> {
            let mut requested = self.requested.lock().unwrap();
            let n = requested.len();
            requested.push(page_token.map(str::to_string));
            if self.fail_at == Some(n) {
                return Err(Error::Api {
                    status: 500,
                    message: "backend error".to_string(),
                });
            }
            Ok(self.pages[n].clone())
        }

        async fn videos(&self, _video_id: &str) -> Result<Vec<VideoDetails>> {
            unreachable!()
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> PlaylistPage {
        PlaylistPage {
            entries: ids
                .iter()
                .map(|id| PlaylistEntry {
                    video_id: id.to_string(),
                    owner_channel_id: "UC1".to_string(),
                })
                .collect(),
            next_page_token: next.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_pages_follow_tokens_until_exhausted() {
        let api = Paged {
            pages: vec![
                page(&["a", "b"], Some("t1")),
                page(&["c"], Some("t2")),
                page(&["d"], None),
            ],
            fail_at: None,
            requested: Mutex::new(Vec::new()),
        };

        let pages: Vec<_> = playlist_pages(&api, "UU1").try_collect().await.unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(
            *api.requested.lock().unwrap(),
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_token_ends_stream() {
        let api = Paged {
            pages: vec![page(&["a"], Some(""))],
            fail_at: None,
            requested: Mutex::new(Vec::new()),
        };
        let pages: Vec<_> = playlist_pages(&api, "UU1").try_collect().await.unwrap();
        assert_eq!(pages.len(), 1);
    }

    #[tokio::test]
    async fn test_pages_are_requested_lazily() {
        let api = Paged {
            pages: vec![page(&["a"], Some("t1")), page(&["b"], None)],
            fail_at: None,
            requested: Mutex::new(Vec::new()),
        };
        let mut pages = std::pin::pin!(playlist_pages(&api, "UU1"));
        assert!(api.requested.lock().unwrap().is_empty());

        pages.try_next().await.unwrap();
        assert_eq!(api.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_error_is_yielded_then_stream_ends() {
        let api = Paged {
            pages: vec![page(&["a"], Some("t1"))],
            fail_at: Some(1),
            requested: Mutex::new(Vec::new()),
        };
        let mut pages = std::pin::pin!(playlist_pages(&api, "UU1"));
        assert!(pages.try_next().await.unwrap().is_some());
        assert!(pages.try_next().await.is_err());
        assert!(futures::StreamExt::next(&mut pages).await.is_none());
    }
}
