use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::ports::MusicSearch;
use crate::ytmusic::models::{CandidateKind, SearchCandidate, Thumbnail};

const YTMUSIC_API_BASE: &str = "https://music.youtube.com/youtubei/v1";
const YTMUSIC_ORIGIN: &str = "https://music.youtube.com";
const YTMUSIC_CLIENT_NAME: &str = "WEB_REMIX";
const YTMUSIC_CLIENT_VERSION: &str = "1.20240918.01.00";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

const SHELVES_POINTER: &str =
    "/contents/tabbedSearchResultsRenderer/tabs/0/tabRenderer/content/sectionListRenderer/contents";
const PAGE_TYPE_POINTER: &str =
    "/navigationEndpoint/browseEndpoint/browseEndpointContextSupportedConfigs/browseEndpointContextMusicConfig/pageType";
const PLAY_ENDPOINT_POINTER: &str =
    "/overlay/musicItemThumbnailOverlayRenderer/content/musicPlayButtonRenderer/playNavigationEndpoint/watchEndpoint";
const VIDEO_TYPE_POINTER: &str =
    "/watchEndpointMusicSupportedConfigs/watchEndpointMusicConfig/musicVideoType";

pub struct YtMusicClient {
    http_client: Client,
    base_url: String,
}

impl YtMusicClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(YTMUSIC_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http_client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl MusicSearch for YtMusicClient {
    async fn search(
        &self,
        query: &str,
        kind: CandidateKind,
        limit: usize,
    ) -> Result<Vec<SearchCandidate>> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": YTMUSIC_CLIENT_NAME,
                    "clientVersion": YTMUSIC_CLIENT_VERSION,
                    "hl": "en",
                }
            },
            "query": query,
            "params": kind.filter_params(),
        });

        let response = self
            .http_client
            .post(format!("{}/search", self.base_url))
            .query(&[("alt", "json"), ("prettyPrint", "false")])
            .header("Origin", YTMUSIC_ORIGIN)
            .header("Referer", format!("{}/", YTMUSIC_ORIGIN))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("YouTube Music search failed ({}): {}", status, error_text);
            return Err(AppError::YtMusicApi(format!(
                "search for '{}' returned {}",
                query, status
            )));
        }

        let payload: Value = response.json().await?;
        let mut candidates = parse_search_response(&payload, kind);
        candidates.truncate(limit);

        debug!("Search '{}' returned {} candidates", query, candidates.len());
        Ok(candidates)
    }
}

/// Flattens every shelf of a search response into candidates, in display order.
pub fn parse_search_response(payload: &Value, requested: CandidateKind) -> Vec<SearchCandidate> {
    let Some(shelves) = payload.pointer(SHELVES_POINTER).and_then(Value::as_array) else {
        return Vec::new();
    };

    shelves
        .iter()
        .filter_map(|shelf| shelf.pointer("/musicShelfRenderer/contents"))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(|item| item.get("musicResponsiveListItemRenderer"))
        .filter_map(|renderer| parse_list_item(renderer, requested))
        .collect()
}

fn parse_list_item(renderer: &Value, requested: CandidateKind) -> Option<SearchCandidate> {
    let title = flex_column_runs(renderer, 0)?
        .first()?
        .get("text")?
        .as_str()?
        .to_string();

    let detail_runs = flex_column_runs(renderer, 1).cloned().unwrap_or_default();
    let artist = primary_artist(&detail_runs).unwrap_or_default();

    let play_endpoint = renderer.pointer(PLAY_ENDPOINT_POINTER);
    let video_id = renderer
        .pointer("/playlistItemData/videoId")
        .or_else(|| play_endpoint.and_then(|endpoint| endpoint.get("videoId")))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let kind = match play_endpoint
        .and_then(|endpoint| endpoint.pointer(VIDEO_TYPE_POINTER))
        .and_then(Value::as_str)
    {
        Some("MUSIC_VIDEO_TYPE_ATV") => CandidateKind::Song,
        Some(_) => CandidateKind::Video,
        None => match renderer.pointer(PAGE_TYPE_POINTER).and_then(Value::as_str) {
            Some("MUSIC_PAGE_TYPE_ALBUM") => CandidateKind::Album,
            Some("MUSIC_PAGE_TYPE_ARTIST") => CandidateKind::Artist,
            Some("MUSIC_PAGE_TYPE_PLAYLIST") => CandidateKind::Playlist,
            _ => requested,
        },
    };

    let thumbnails: Vec<Thumbnail> = renderer
        .pointer("/thumbnail/musicThumbnailRenderer/thumbnail/thumbnails")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    Some(SearchCandidate {
        kind,
        title,
        artist,
        video_id,
        thumbnails,
    })
}

fn flex_column_runs(renderer: &Value, column: usize) -> Option<&Vec<Value>> {
    renderer
        .get("flexColumns")?
        .get(column)?
        .pointer("/musicResponsiveListItemFlexColumnRenderer/text/runs")?
        .as_array()
}

/// First run linking to an artist page; falls back to the first run's text.
fn primary_artist(runs: &[Value]) -> Option<String> {
    let linked = runs.iter().find(|run| {
        matches!(
            run.pointer(PAGE_TYPE_POINTER).and_then(Value::as_str),
            Some("MUSIC_PAGE_TYPE_ARTIST") | Some("MUSIC_PAGE_TYPE_USER_CHANNEL")
        )
    });

    linked
        .or_else(|| runs.first())
        .and_then(|run| run.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song_item(title: &str, artist: &str, video_id: &str, video_type: &str) -> Value {
        json!({
            "musicResponsiveListItemRenderer": {
                "thumbnail": {
                    "musicThumbnailRenderer": {
                        "thumbnail": {
                            "thumbnails": [
                                { "url": "https://lh3.googleusercontent.com/a=w60-h60", "width": 60, "height": 60 },
                                { "url": "https://lh3.googleusercontent.com/a=w120-h120", "width": 120, "height": 120 }
                            ]
                        }
                    }
                },
                "overlay": {
                    "musicItemThumbnailOverlayRenderer": {
                        "content": {
                            "musicPlayButtonRenderer": {
                                "playNavigationEndpoint": {
                                    "watchEndpoint": {
                                        "videoId": video_id,
                                        "watchEndpointMusicSupportedConfigs": {
                                            "watchEndpointMusicConfig": { "musicVideoType": video_type }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "flexColumns": [
                    { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [ { "text": title } ] } } },
                    { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [
                        {
                            "text": artist,
                            "navigationEndpoint": { "browseEndpoint": { "browseEndpointContextSupportedConfigs": {
                                "browseEndpointContextMusicConfig": { "pageType": "MUSIC_PAGE_TYPE_ARTIST" }
                            } } }
                        },
                        { "text": " • " },
                        { "text": "3:05" }
                    ] } } }
                ],
                "playlistItemData": { "videoId": video_id }
            }
        })
    }

    fn response_with(items: Vec<Value>) -> Value {
        json!({
            "contents": {
                "tabbedSearchResultsRenderer": {
                    "tabs": [ { "tabRenderer": { "content": { "sectionListRenderer": {
                        "contents": [ { "musicShelfRenderer": { "contents": items } } ]
                    } } } } ]
                }
            }
        })
    }

    #[test]
    fn test_parse_song_results_in_order() {
        let payload = response_with(vec![
            song_item("Roads", "Portishead", "abc123", "MUSIC_VIDEO_TYPE_ATV"),
            song_item("Roads (Live)", "Portishead", "def456", "MUSIC_VIDEO_TYPE_OMV"),
        ]);

        let candidates = parse_search_response(&payload, CandidateKind::Song);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].kind, CandidateKind::Song);
        assert_eq!(candidates[0].title, "Roads");
        assert_eq!(candidates[0].artist, "Portishead");
        assert_eq!(candidates[0].video_id, "abc123");
        assert_eq!(candidates[0].thumbnails.len(), 2);
        assert_eq!(candidates[0].watch_url(), "https://www.youtube.com/watch?v=abc123");
        assert_eq!(candidates[1].kind, CandidateKind::Video);
    }

    #[test]
    fn test_parse_album_result_without_video() {
        let payload = response_with(vec![json!({
            "musicResponsiveListItemRenderer": {
                "navigationEndpoint": { "browseEndpoint": { "browseEndpointContextSupportedConfigs": {
                    "browseEndpointContextMusicConfig": { "pageType": "MUSIC_PAGE_TYPE_ALBUM" }
                } } },
                "flexColumns": [
                    { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [ { "text": "Dummy" } ] } } },
                    { "musicResponsiveListItemFlexColumnRenderer": { "text": { "runs": [ { "text": "Portishead" } ] } } }
                ]
            }
        })]);

        let candidates = parse_search_response(&payload, CandidateKind::Song);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, CandidateKind::Album);
        assert_eq!(candidates[0].artist, "Portishead");
        assert!(candidates[0].video_id.is_empty());
        assert!(candidates[0].thumbnails.is_empty());
    }

    #[test]
    fn test_parse_empty_or_unexpected_payload() {
        assert!(parse_search_response(&json!({}), CandidateKind::Song).is_empty());
        assert!(parse_search_response(&response_with(vec![]), CandidateKind::Song).is_empty());
    }
}
