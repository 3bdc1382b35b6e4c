//! Serper web search client.
//!
//! One search request yields both the grounding sources for the verdict and
//! a first batch of inline images for the image aggregator.

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{SEARCH_COUNTRY, SEARCH_LANGUAGE};
use crate::error::Result;
use crate::http::send_json;
use crate::types::{SearchResults, Source};

const SERVICE: &str = "Serper";

/// A web search provider.
pub trait SourceSearch: Send + Sync {
    /// Search the web and keep at most `top_n` organic results.
    fn search(&self, query: &str, top_n: usize) -> Result<SearchResults>;
}

/// Serper (Google Search) API client.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
pub struct SerperClient {
    http: Client,
    api_key: String,
    url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
    #[serde(default)]
    images: Option<Vec<SerperImage>>,
}

#[derive(Debug, Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerperImage {
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl SerperClient {
    pub fn new(http: Client, api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            url: url.into(),
        }
    }
}

impl SourceSearch for SerperClient {
    fn search(&self, query: &str, top_n: usize) -> Result<SearchResults> {
        debug!(query, top_n, "Serper search");

        let body = serde_json::json!({
            "q": query,
            "gl": SEARCH_COUNTRY,
            "hl": SEARCH_LANGUAGE,
        });

        let request = self
            .http
            .post(&self.url)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body);

        let response: SerperResponse = send_json(SERVICE, request)?;
        let results = collect_results(response, top_n);

        info!(
            query,
            sources = results.sources.len(),
            images = results.images.len(),
            "Serper search complete"
        );
        Ok(results)
    }
}

/// Turn a raw Serper response into sources and image URLs.
///
/// Images prefer the thumbnail over the full-size URL; entries with neither
/// are skipped.
pub(crate) fn collect_results(response: SerperResponse, top_n: usize) -> SearchResults {
    let sources = response
        .organic
        .into_iter()
        .take(top_n)
        .map(|r| {
            Source::new(
                r.title.unwrap_or_default(),
                r.link.unwrap_or_default(),
                r.snippet.unwrap_or_default(),
            )
        })
        .collect();

    let images = response
        .images
        .unwrap_or_default()
        .into_iter()
        .filter_map(|img| non_empty(img.thumbnail).or_else(|| non_empty(img.url)))
        .collect();

    SearchResults { sources, images }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
