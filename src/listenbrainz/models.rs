use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub artist: String,
    pub album: String,
    pub title: String,
}

impl TrackDescriptor {
    pub fn new(
        artist: impl Into<String>,
        album: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for TrackDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

#[derive(Debug, Clone)]
pub struct RemotePlaylist {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<FixedOffset>,
    /// Generation algorithm that produced the playlist, e.g. `weekly-jams`.
    pub source_patch: Option<String>,
}

// Wire types for the JSPF payloads returned by the ListenBrainz API.

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedForResponse {
    #[serde(default)]
    pub playlists: Vec<PlaylistEnvelope>,
    #[serde(default)]
    pub playlist_count: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistEnvelope {
    pub playlist: JspfPlaylist,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JspfPlaylist {
    pub identifier: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub extension: Option<JspfPlaylistExtension>,
    #[serde(default)]
    pub track: Vec<JspfTrack>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JspfPlaylistExtension {
    #[serde(rename = "https://musicbrainz.org/doc/jspf#playlist")]
    pub musicbrainz: Option<MusicBrainzPlaylistExtension>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MusicBrainzPlaylistExtension {
    pub additional_metadata: Option<AdditionalMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdditionalMetadata {
    pub algorithm_metadata: Option<AlgorithmMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AlgorithmMetadata {
    pub source_patch: Option<String>,
}

impl JspfPlaylist {
    pub fn source_patch(&self) -> Option<String> {
        self.extension
            .as_ref()?
            .musicbrainz
            .as_ref()?
            .additional_metadata
            .as_ref()?
            .algorithm_metadata
            .as_ref()?
            .source_patch
            .clone()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct JspfTrack {
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub title: String,
}

impl From<JspfTrack> for TrackDescriptor {
    fn from(track: JspfTrack) -> Self {
        Self {
            artist: track.creator,
            album: track.album,
            title: track.title,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistResponse {
    pub playlist: JspfPlaylist,
}

#[cfg(test)]
impl TrackDescriptor {
    pub fn mock(artist: &str, title: &str) -> Self {
        Self::new(artist, "Mock Album", title)
    }
}

#[cfg(test)]
impl RemotePlaylist {
    pub fn mock(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            created_at: DateTime::parse_from_rfc3339("2024-06-03T00:00:00+00:00").unwrap(),
            source_patch: Some("weekly-jams".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_search_query() {
        let track = TrackDescriptor::new("John Lennon", "Imagine", "Imagine");
        assert_eq!(track.to_string(), "John Lennon - Imagine");
    }

    #[test]
    fn test_decode_playlist_with_extension() {
        let json = r#"{
            "playlist": {
                "identifier": "https://listenbrainz.org/playlist/4a5b3b06-3d8a-4b41-9d5c-0a4a1f6a3a53",
                "title": "Weekly Jams for rob, week of 2024-06-03 Mon",
                "annotation": "<p>Jams</p>",
                "date": "2024-06-03T04:13:11.160712+00:00",
                "extension": {
                    "https://musicbrainz.org/doc/jspf#playlist": {
                        "additional_metadata": {
                            "algorithm_metadata": { "source_patch": "weekly-jams" }
                        }
                    }
                },
                "track": [
                    {
                        "identifier": ["https://musicbrainz.org/recording/8f3471b5-7e6a-48da-86a9-c1c07a0f47ae"],
                        "creator": "Portishead",
                        "album": "Dummy",
                        "title": "Roads"
                    }
                ]
            }
        }"#;

        let response: PlaylistResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.playlist.source_patch().as_deref(), Some("weekly-jams"));

        let tracks: Vec<TrackDescriptor> = response
            .playlist
            .track
            .into_iter()
            .map(TrackDescriptor::from)
            .collect();
        assert_eq!(tracks, vec![TrackDescriptor::new("Portishead", "Dummy", "Roads")]);
    }

    #[test]
    fn test_decode_playlist_without_extension() {
        let json = r#"{
            "identifier": "https://listenbrainz.org/playlist/4a5b3b06-3d8a-4b41-9d5c-0a4a1f6a3a53",
            "title": "Plain"
        }"#;

        let playlist: JspfPlaylist = serde_json::from_str(json).unwrap();
        assert!(playlist.source_patch().is_none());
        assert!(playlist.track.is_empty());
    }
}
