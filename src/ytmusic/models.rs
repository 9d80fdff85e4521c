use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateKind {
    Song,
    Video,
    Album,
    Artist,
    Playlist,
}

impl CandidateKind {
    /// Search filter params understood by the YouTube Music search endpoint.
    pub fn filter_params(self) -> &'static str {
        match self {
            CandidateKind::Song => "EgWKAQIIAWoMEA4QChADEAQQCRAF",
            CandidateKind::Video => "EgWKAQIQAWoMEA4QChADEAQQCRAF",
            CandidateKind::Album => "EgWKAQIYAWoMEA4QChADEAQQCRAF",
            CandidateKind::Artist => "EgWKAQIgAWoMEA4QChADEAQQCRAF",
            CandidateKind::Playlist => "EgWKAQIoAWoMEA4QChADEAQQCRAF",
        }
    }
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateKind::Song => write!(f, "song"),
            CandidateKind::Video => write!(f, "video"),
            CandidateKind::Album => write!(f, "album"),
            CandidateKind::Artist => write!(f, "artist"),
            CandidateKind::Playlist => write!(f, "playlist"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// The fields of a search result the pipeline actually reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub kind: CandidateKind,
    pub title: String,
    /// Primary artist display name; empty when the result has none.
    pub artist: String,
    pub video_id: String,
    pub thumbnails: Vec<Thumbnail>,
}

impl SearchCandidate {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

#[cfg(test)]
impl SearchCandidate {
    pub fn mock(kind: CandidateKind, title: &str, artist: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            artist: artist.to_string(),
            video_id: "dQw4w9WgXcQ".to_string(),
            thumbnails: Vec::new(),
        }
    }

    pub fn song(title: &str, artist: &str) -> Self {
        Self::mock(CandidateKind::Song, title, artist)
    }
}
