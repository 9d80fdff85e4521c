pub mod m3u;
pub mod writer;

use std::path::PathBuf;

use crate::listenbrainz::TrackDescriptor;

pub use m3u::M3uPlaylist;
pub use writer::PlaylistWriter;

/// A track that was matched, downloaded and tagged.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedItem {
    pub track: TrackDescriptor,
    pub audio_path: PathBuf,
}

/// Successful items of one remote playlist, in remote order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaylistResult {
    pub title: String,
    pub items: Vec<ProcessedItem>,
}
