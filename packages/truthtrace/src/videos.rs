//! YouTube video search client.

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::YOUTUBE_WATCH_URL;
use crate::error::{Result, TruthTraceError};
use crate::http::send_json;
use crate::types::Video;

const SERVICE: &str = "YouTube";

/// A video search provider.
pub trait VideoSearch: Send + Sync {
    /// Search for at most `max_results` videos, in provider order.
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<Video>>;
}

/// YouTube Data API v3 search client.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
pub struct YoutubeClient {
    http: Client,
    api_key: String,
    url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct YoutubeResponse {
    #[serde(default)]
    items: Vec<YoutubeItem>,
}

#[derive(Debug, Deserialize)]
struct YoutubeItem {
    #[serde(default)]
    id: Option<YoutubeId>,
    #[serde(default)]
    snippet: Option<YoutubeSnippet>,
}

#[derive(Debug, Deserialize)]
struct YoutubeId {
    #[serde(default, rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YoutubeSnippet {
    title: Option<String>,
    #[serde(default)]
    thumbnails: Option<YoutubeThumbnails>,
}

#[derive(Debug, Deserialize)]
struct YoutubeThumbnails {
    #[serde(default)]
    default: Option<YoutubeThumbnail>,
}

#[derive(Debug, Deserialize)]
struct YoutubeThumbnail {
    url: Option<String>,
}

impl YoutubeClient {
    pub fn new(http: Client, api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            url: url.into(),
        }
    }
}

impl VideoSearch for YoutubeClient {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<Video>> {
        debug!(query, max_results, "YouTube search");

        let max_results = max_results.to_string();
        let request = self.http.get(&self.url).query(&[
            ("part", "snippet"),
            ("q", query),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("key", self.api_key.as_str()),
        ]);

        let response: YoutubeResponse = send_json(SERVICE, request)?;
        let videos = collect_videos(response)?;

        info!(query, count = videos.len(), "YouTube search complete");
        Ok(videos)
    }
}

/// Build videos from a raw search response.
///
/// Items without a video id (channels, playlists) are skipped. A video item
/// without a title or default thumbnail makes the whole response malformed.
pub(crate) fn collect_videos(response: YoutubeResponse) -> Result<Vec<Video>> {
    let mut videos = Vec::new();

    for item in response.items {
        let Some(video_id) = item.id.and_then(|id| id.video_id) else {
            continue;
        };

        let snippet = item.snippet.ok_or_else(|| malformed(&video_id, "snippet"))?;
        let title = snippet
            .title
            .ok_or_else(|| malformed(&video_id, "snippet.title"))?;
        let thumbnail = snippet
            .thumbnails
            .and_then(|t| t.default)
            .and_then(|t| t.url)
            .ok_or_else(|| malformed(&video_id, "snippet.thumbnails.default.url"))?;

        videos.push(Video {
            title,
            url: format!("{YOUTUBE_WATCH_URL}{video_id}"),
            thumbnail,
        });
    }

    Ok(videos)
}

fn malformed(video_id: &str, field: &str) -> TruthTraceError {
    TruthTraceError::MalformedResponse {
        service: SERVICE,
        message: format!("video {video_id} is missing {field}"),
    }
}
