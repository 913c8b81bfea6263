pub mod api;
pub mod error;
pub mod store;
pub mod workflow;

pub use api::{
    playlist_pages, ChannelUploads, PlaylistEntry, PlaylistPage, VideoApi, VideoDetails,
};
pub use error::{Error, ErrorKind, Result};
pub use store::{JsonStore, VideoRecord, VideoStore};
pub use workflow::{Confirm, FetchOutcome, Staged, VideoFetcher};
