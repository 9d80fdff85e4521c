//! Collaborator traits the sync pipeline is written against.
//!
//! Production implementations live next to the service they talk to
//! (`listenbrainz`, `ytmusic`, `download`, `tagger`); tests use the
//! generated mocks or small fakes.

use std::time::Duration;

use uuid::Uuid;

use crate::download::{DownloadedMedia, TransferOutcome, TransferRequest};
use crate::error::Result;
use crate::listenbrainz::{RemotePlaylist, TrackDescriptor};
use crate::ytmusic::{CandidateKind, SearchCandidate};

/// Remote playlist metadata (ListenBrainz).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaylistSource: Send + Sync {
    async fn playlists_created_for(&self, username: &str) -> Result<Vec<RemotePlaylist>>;
    async fn tracks(&self, playlist_id: Uuid) -> Result<Vec<TrackDescriptor>>;
}

/// Relevance-ranked search, best result first.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MusicSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        kind: CandidateKind,
        limit: usize,
    ) -> Result<Vec<SearchCandidate>>;
}

/// Audio extraction transport (yt-dlp).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaTransfer: Send + Sync {
    async fn transfer(&self, request: &TransferRequest) -> Result<Vec<TransferOutcome>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CoverFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Suspends the pipeline before a download.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Writes metadata into a downloaded audio file in place.
#[cfg_attr(test, mockall::automock)]
pub trait TagWriter: Send + Sync {
    fn fill_tags(&self, media: &DownloadedMedia, track: &TrackDescriptor) -> Result<()>;
}

/// Default `Pause`, backed by the tokio timer.
pub struct TokioPause;

#[async_trait::async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
