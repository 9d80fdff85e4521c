pub mod client;
pub mod models;

pub use client::YtMusicClient;
pub use models::{CandidateKind, SearchCandidate, Thumbnail};
