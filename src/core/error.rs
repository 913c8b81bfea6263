use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access video store {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("video store {} is not valid JSON: {source}", path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode video store for {}: {source}", path.display())]
    EncodeStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to the video API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("video API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("no channel found for handle {0:?}")]
    ChannelNotFound(String),

    #[error("no video found with id {0:?}")]
    VideoNotFound(String),

    #[error("cannot extract a video id from {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("console I/O failed: {0}")]
    Console(#[source] std::io::Error),
}

/// Coarse classification used when reporting failures to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Storage,
    Fetch,
    NotFound,
    Parse,
    Console,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Storage { .. } | Error::CorruptStore { .. } | Error::EncodeStore { .. } => {
                ErrorKind::Storage
            }
            Error::Request(_) | Error::Api { .. } | Error::ChannelNotFound(_) => ErrorKind::Fetch,
            Error::VideoNotFound(_) => ErrorKind::NotFound,
            Error::InvalidUrl { .. } => ErrorKind::Parse,
            Error::Console(_) => ErrorKind::Console,
        }
    }

    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Error::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let storage = Error::Storage {
            path: PathBuf::from("videos.json"),
            source: io,
        };
        assert_eq!(storage.kind(), ErrorKind::Storage);
        assert_eq!(
            Error::Api {
                status: 403,
                message: "quotaExceeded".to_string()
            }
            .kind(),
            ErrorKind::Fetch
        );
        assert_eq!(Error::ChannelNotFound("x".into()).kind(), ErrorKind::Fetch);
        assert_eq!(Error::VideoNotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(Error::invalid_url("u", "bad").kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_encode_failure_is_not_reported_as_corrupt_file() {
        let source = serde_json::from_str::<u8>("x").unwrap_err();
        let err = Error::EncodeStore {
            path: PathBuf::from("videos.json"),
            source,
        };
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.to_string().starts_with("cannot encode video store for videos.json"));
        assert!(!err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_storage_message_names_path() {
        let err = Error::Storage {
            path: PathBuf::from("data/videos.json"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
        };
        let message = err.to_string();
        assert!(message.contains("data/videos.json"));
        assert!(message.contains("disk on fire"));
    }
}
