pub mod client;
pub mod models;

pub use client::ListenBrainzClient;
pub use models::{RemotePlaylist, TrackDescriptor};
