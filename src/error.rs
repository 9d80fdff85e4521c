use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ListenBrainz API error: {0}")]
    ListenBrainzApi(String),

    #[error("YouTube Music API error: {0}")]
    YtMusicApi(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Tagging failed: {0}")]
    Tag(String),

    #[error("Playlist generation failed: {0}")]
    Generation(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Why the matcher rejected a candidate list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchFailure {
    #[error("search returned no candidates")]
    NotFound,

    #[error("none of {scanned} candidates matched")]
    Mismatch {
        scanned: usize,
        /// Closest scanned candidate as "artist - title" with its similarity score.
        closest: Option<(String, f64)>,
    },
}

/// Outcome of a single track that did not make it into the playlist.
#[derive(Error, Debug)]
pub enum TrackFailure {
    #[error("track not found")]
    NotFound,

    #[error("mismatched track ({scanned} candidates scanned)")]
    Mismatch {
        scanned: usize,
        closest: Option<(String, f64)>,
    },

    #[error("could not download track: {0}")]
    Download(String),

    #[error("could not tag track: {0}")]
    Tag(String),

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl TrackFailure {
    /// Short label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            TrackFailure::NotFound => "not_found",
            TrackFailure::Mismatch { .. } => "mismatch",
            TrackFailure::Download(_) => "download",
            TrackFailure::Tag(_) => "tag",
            TrackFailure::Unknown(_) => "unknown",
        }
    }
}

impl From<MatchFailure> for TrackFailure {
    fn from(failure: MatchFailure) -> Self {
        match failure {
            MatchFailure::NotFound => TrackFailure::NotFound,
            MatchFailure::Mismatch { scanned, closest } => TrackFailure::Mismatch { scanned, closest },
        }
    }
}

impl From<AppError> for TrackFailure {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Download(detail) => TrackFailure::Download(detail),
            AppError::Tag(detail) => TrackFailure::Tag(detail),
            other => TrackFailure::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_maps_to_track_failure_kind() {
        let download: TrackFailure = AppError::Download("HTTP 403".into()).into();
        assert!(matches!(download, TrackFailure::Download(ref d) if d == "HTTP 403"));

        let tag: TrackFailure = AppError::Tag("bad frame".into()).into();
        assert_eq!(tag.kind(), "tag");

        let other: TrackFailure = AppError::YtMusicApi("503".into()).into();
        assert_eq!(other.kind(), "unknown");
    }

    #[test]
    fn test_match_failure_keeps_diagnostics() {
        let failure: TrackFailure = MatchFailure::Mismatch {
            scanned: 3,
            closest: Some(("Queen - Bohemian Rhapsody (Live)".into(), 0.91)),
        }
        .into();

        match failure {
            TrackFailure::Mismatch { scanned, closest } => {
                assert_eq!(scanned, 3);
                assert!(closest.is_some());
            }
            other => panic!("unexpected failure: {other}"),
        }
    }
}
