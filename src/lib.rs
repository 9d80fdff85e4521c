pub mod config;
pub mod download;
pub mod error;
pub mod listenbrainz;
pub mod matcher;
pub mod playlist;
pub mod ports;
pub mod sanitize;
pub mod sync;
pub mod tagger;
pub mod ytmusic;

pub use config::Config;
pub use error::{AppError, Result, TrackFailure};
pub use listenbrainz::{ListenBrainzClient, RemotePlaylist, TrackDescriptor};
pub use matcher::TrackMatcher;
pub use playlist::{M3uPlaylist, PlaylistWriter};
pub use sync::{PlaylistStatus, PlaylistSync, SyncReport};
pub use ytmusic::{CandidateKind, SearchCandidate, YtMusicClient};
