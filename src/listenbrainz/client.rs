use chrono::DateTime;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::listenbrainz::models::{
    CreatedForResponse, JspfPlaylist, PlaylistResponse, RemotePlaylist, TrackDescriptor,
};
use crate::ports::PlaylistSource;

const LISTENBRAINZ_API_BASE: &str = "https://api.listenbrainz.org/1";
const PAGE_SIZE: usize = 25;

pub struct ListenBrainzClient {
    http_client: Client,
    base_url: String,
}

impl ListenBrainzClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(LISTENBRAINZ_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("listenbrainz-dl/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!("GET {}", url);

        let response = self.http_client.get(url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ListenBrainzApi(format!(
                "{} returned {}: {}",
                url, status, error_text
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl PlaylistSource for ListenBrainzClient {
    async fn playlists_created_for(&self, username: &str) -> Result<Vec<RemotePlaylist>> {
        let url = format!(
            "{}/user/{}/playlists/createdfor",
            self.base_url,
            urlencoding::encode(username)
        );

        let mut playlists = Vec::new();
        let mut offset = 0;

        loop {
            let page: CreatedForResponse = self
                .get_json(
                    &url,
                    &[
                        ("count", PAGE_SIZE.to_string()),
                        ("offset", offset.to_string()),
                    ],
                )
                .await?;

            let page_len = page.playlists.len();
            for envelope in page.playlists {
                playlists.push(to_remote_playlist(envelope.playlist)?);
            }

            offset += page_len;
            if page_len == 0 || offset >= page.playlist_count {
                break;
            }
        }

        info!("Found {} playlists created for {}", playlists.len(), username);
        Ok(playlists)
    }

    async fn tracks(&self, playlist_id: Uuid) -> Result<Vec<TrackDescriptor>> {
        let url = format!("{}/playlist/{}", self.base_url, playlist_id);
        let response: PlaylistResponse = self.get_json(&url, &[]).await?;

        let tracks: Vec<TrackDescriptor> = response
            .playlist
            .track
            .into_iter()
            .map(TrackDescriptor::from)
            .collect();

        debug!("Fetched {} tracks for playlist {}", tracks.len(), playlist_id);
        Ok(tracks)
    }
}

fn to_remote_playlist(playlist: JspfPlaylist) -> Result<RemotePlaylist> {
    let id = parse_trailing_uuid(&playlist.identifier)?;
    let source_patch = playlist.source_patch();

    let date = playlist.date.as_deref().ok_or_else(|| {
        AppError::ListenBrainzApi(format!("Playlist {} has no creation date", id))
    })?;
    let created_at = DateTime::parse_from_rfc3339(date).map_err(|e| {
        AppError::ListenBrainzApi(format!("Invalid creation date '{}': {}", date, e))
    })?;

    Ok(RemotePlaylist {
        id,
        name: playlist.title,
        description: playlist.annotation.unwrap_or_default(),
        created_at,
        source_patch,
    })
}

/// Extracts the MBID from identifiers such as
/// `https://listenbrainz.org/playlist/4a5b3b06-3d8a-4b41-9d5c-0a4a1f6a3a53`.
pub fn parse_trailing_uuid(identifier: &str) -> Result<Uuid> {
    let last_segment = match Url::parse(identifier) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string),
        Err(_) => identifier.rsplit('/').next().map(str::to_string),
    };

    let candidate = last_segment
        .ok_or_else(|| AppError::ListenBrainzApi(format!("No id in '{}'", identifier)))?;

    Uuid::parse_str(&candidate).map_err(|e| {
        AppError::ListenBrainzApi(format!("Invalid playlist id '{}': {}", identifier, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listenbrainz::models::PlaylistEnvelope;

    #[test]
    fn test_parse_trailing_uuid_from_url() {
        let id = parse_trailing_uuid(
            "https://listenbrainz.org/playlist/4a5b3b06-3d8a-4b41-9d5c-0a4a1f6a3a53",
        )
        .unwrap();
        assert_eq!(id.to_string(), "4a5b3b06-3d8a-4b41-9d5c-0a4a1f6a3a53");
    }

    #[test]
    fn test_parse_trailing_uuid_with_trailing_slash_and_bare_id() {
        let id = parse_trailing_uuid(
            "https://listenbrainz.org/playlist/4a5b3b06-3d8a-4b41-9d5c-0a4a1f6a3a53/",
        )
        .unwrap();
        assert_eq!(id.to_string(), "4a5b3b06-3d8a-4b41-9d5c-0a4a1f6a3a53");

        assert!(parse_trailing_uuid("4a5b3b06-3d8a-4b41-9d5c-0a4a1f6a3a53").is_ok());
    }

    #[test]
    fn test_parse_trailing_uuid_rejects_garbage() {
        let result = parse_trailing_uuid("https://listenbrainz.org/playlist/not-a-uuid");
        assert!(matches!(result, Err(AppError::ListenBrainzApi(_))));
    }

    #[test]
    fn test_to_remote_playlist() {
        let json = r#"{
            "playlist": {
                "identifier": "https://listenbrainz.org/playlist/4a5b3b06-3d8a-4b41-9d5c-0a4a1f6a3a53",
                "title": "Weekly Exploration for rob",
                "annotation": "Fresh picks",
                "date": "2024-06-03T04:13:11.160712+00:00"
            }
        }"#;

        let envelope: PlaylistEnvelope = serde_json::from_str(json).unwrap();
        let playlist = to_remote_playlist(envelope.playlist).unwrap();

        assert_eq!(playlist.name, "Weekly Exploration for rob");
        assert_eq!(playlist.description, "Fresh picks");
        assert_eq!(playlist.created_at.timestamp(), 1717387991);
        assert!(playlist.source_patch.is_none());
    }

    #[test]
    fn test_to_remote_playlist_requires_date() {
        let json = r#"{
            "playlist": {
                "identifier": "https://listenbrainz.org/playlist/4a5b3b06-3d8a-4b41-9d5c-0a4a1f6a3a53",
                "title": "Undated"
            }
        }"#;

        let envelope: PlaylistEnvelope = serde_json::from_str(json).unwrap();
        assert!(to_remote_playlist(envelope.playlist).is_err());
    }
}
