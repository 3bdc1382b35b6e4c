//! Image aggregation across providers.
//!
//! Images come from three places, tried in a fixed order until enough are
//! collected:
//!
//! 1. the inline images of the web search response,
//! 2. infobox thumbnails of Wikipedia pages among the sources,
//! 3. a Pixabay stock-photo search for the keyword.
//!
//! Failures of steps 2 and 3 are logged and otherwise ignored. An empty
//! result is not an error.

use std::collections::BTreeMap;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::WIKIPEDIA_THUMB_SIZE;
use crate::error::Result;
use crate::http::send_json;
use crate::types::Source;

/// Looks up the infobox thumbnail of an encyclopedia page.
pub trait InfoboxLookup: Send + Sync {
    /// Thumbnail URL for the page with this title, if it has one.
    fn thumbnail(&self, title: &str) -> Result<Option<String>>;
}

/// Searches a stock-photo library.
pub trait StockPhotoSearch: Send + Sync {
    /// Up to `needed` photo URLs for `query`.
    fn search(&self, query: &str, needed: usize) -> Result<Vec<String>>;
}

/// Collect up to `min_images` distinct image URLs.
///
/// Stops as soon as `min_images` URLs are collected; later providers are not
/// contacted at all in that case.
pub fn gather_images(
    keyword: &str,
    search_images: &[String],
    sources: &[Source],
    min_images: usize,
    infobox: &dyn InfoboxLookup,
    stock: &dyn StockPhotoSearch,
) -> Vec<String> {
    let mut images = ImageSet::new(min_images);
    if images.is_full() {
        return images.into_vec();
    }

    for url in search_images {
        images.push(url);
        if images.is_full() {
            return images.into_vec();
        }
    }

    for source in sources.iter().filter(|s| s.is_wikipedia()) {
        let title = wiki_page_title(&source.link);
        match infobox.thumbnail(&title) {
            Ok(Some(url)) => {
                images.push(&url);
                if images.is_full() {
                    return images.into_vec();
                }
            }
            Ok(None) => debug!(title = %title, "no infobox thumbnail"),
            Err(e) => debug!(title = %title, error = %e, "infobox lookup failed"),
        }
    }

    let needed = images.remaining();
    match stock.search(keyword, needed) {
        Ok(urls) => {
            for url in &urls {
                images.push(url);
                if images.is_full() {
                    break;
                }
            }
        }
        Err(e) => warn!(keyword, error = %e, "stock photo search failed"),
    }

    images.into_vec()
}

/// Ordered, duplicate-free, capped list of image URLs.
struct ImageSet {
    urls: Vec<String>,
    cap: usize,
}

impl ImageSet {
    fn new(cap: usize) -> Self {
        Self {
            urls: Vec::new(),
            cap,
        }
    }

    fn push(&mut self, url: &str) {
        if !url.is_empty() && !self.is_full() && !self.urls.iter().any(|u| u == url) {
            self.urls.push(url.to_string());
        }
    }

    fn is_full(&self) -> bool {
        self.urls.len() >= self.cap
    }

    fn remaining(&self) -> usize {
        self.cap.saturating_sub(self.urls.len())
    }

    fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

/// Derive a Wikipedia page title from an article URL.
///
/// # Examples
/// ```
/// use truthtrace::images::wiki_page_title;
///
/// assert_eq!(
///     wiki_page_title("https://en.wikipedia.org/wiki/Eiffel_Tower"),
///     "Eiffel Tower"
/// );
/// ```
#[must_use]
pub fn wiki_page_title(url: &str) -> String {
    let segment = url.rsplit("/wiki/").next().unwrap_or(url);
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    decoded.replace('_', " ")
}

/// Wikipedia `pageimages` client.
pub struct WikipediaClient {
    http: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct WikiResponse {
    #[serde(default)]
    query: Option<WikiQuery>,
}

#[derive(Debug, Deserialize)]
struct WikiQuery {
    #[serde(default)]
    pages: BTreeMap<String, WikiPage>,
}

#[derive(Debug, Deserialize)]
struct WikiPage {
    #[serde(default)]
    thumbnail: Option<WikiThumbnail>,
}

#[derive(Debug, Deserialize)]
struct WikiThumbnail {
    #[serde(default)]
    source: Option<String>,
}

impl WikipediaClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

impl InfoboxLookup for WikipediaClient {
    fn thumbnail(&self, title: &str) -> Result<Option<String>> {
        let thumb_size = WIKIPEDIA_THUMB_SIZE.to_string();
        let request = self.http.get(&self.url).query(&[
            ("action", "query"),
            ("titles", title),
            ("prop", "pageimages"),
            ("format", "json"),
            ("pithumbsize", thumb_size.as_str()),
        ]);

        let response: WikiResponse = send_json("Wikipedia", request)?;
        let thumbnail = response
            .query
            .into_iter()
            .flat_map(|q| q.pages.into_values())
            .filter_map(|page| page.thumbnail.and_then(|t| t.source))
            .find(|source| !source.is_empty());

        Ok(thumbnail)
    }
}

/// Pixabay stock-photo client.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
pub struct PixabayClient {
    http: Client,
    api_key: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct PixabayResponse {
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(Debug, Deserialize)]
struct PixabayHit {
    #[serde(default, rename = "webformatURL")]
    webformat_url: Option<String>,
}

impl PixabayClient {
    pub fn new(http: Client, api_key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            url: url.into(),
        }
    }
}

impl StockPhotoSearch for PixabayClient {
    /// `per_page` is the exact shortfall; Pixabay answers 400 below 3, which
    /// the aggregator logs and skips.
    fn search(&self, query: &str, needed: usize) -> Result<Vec<String>> {
        let per_page = needed.to_string();
        let request = self.http.get(&self.url).query(&[
            ("key", self.api_key.as_str()),
            ("q", query),
            ("image_type", "photo"),
            ("safesearch", "true"),
            ("per_page", per_page.as_str()),
        ]);

        let response: PixabayResponse = send_json("Pixabay", request)?;
        Ok(response
            .hits
            .into_iter()
            .filter_map(|hit| hit.webformat_url.filter(|u| !u.is_empty()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TruthTraceError;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Infobox fake that answers from a fixed table and counts calls.
    struct FakeInfobox {
        answers: Vec<(&'static str, Option<&'static str>)>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeInfobox {
        fn new(answers: Vec<(&'static str, Option<&'static str>)>) -> Self {
            Self {
                answers,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                answers: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl InfoboxLookup for FakeInfobox {
        fn thumbnail(&self, title: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TruthTraceError::Config("offline".into()));
            }
            Ok(self
                .answers
                .iter()
                .find(|(t, _)| *t == title)
                .and_then(|(_, url)| url.map(String::from)))
        }
    }

    /// Stock-photo fake that records the requested counts.
    struct FakeStock {
        urls: Vec<&'static str>,
        fail: bool,
        requested: Mutex<Vec<usize>>,
    }

    impl FakeStock {
        fn new(urls: Vec<&'static str>) -> Self {
            Self {
                urls,
                fail: false,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                urls: Vec::new(),
                fail: true,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<usize> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl StockPhotoSearch for FakeStock {
        fn search(&self, _query: &str, needed: usize) -> Result<Vec<String>> {
            self.requested.lock().unwrap().push(needed);
            if self.fail {
                return Err(TruthTraceError::Config("offline".into()));
            }
            Ok(self.urls.iter().map(|u| u.to_string()).collect())
        }
    }

    fn strings(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| u.to_string()).collect()
    }

    fn wiki_source(page: &str) -> Source {
        Source::new(page, format!("https://en.wikipedia.org/wiki/{page}"), "")
    }

    #[test]
    fn test_search_images_alone_meet_minimum() {
        let infobox = FakeInfobox::new(vec![("Eiffel Tower", Some("https://wiki/eiffel.jpg"))]);
        let stock = FakeStock::new(vec!["https://pixabay/1.jpg"]);

        let images = gather_images(
            "The Eiffel Tower",
            &strings(&["https://s/1.jpg", "https://s/2.jpg", "https://s/3.jpg", "https://s/4.jpg"]),
            &[wiki_source("Eiffel_Tower")],
            3,
            &infobox,
            &stock,
        );

        assert_eq!(images, strings(&["https://s/1.jpg", "https://s/2.jpg", "https://s/3.jpg"]));
        assert_eq!(infobox.calls(), 0);
        assert!(stock.requested().is_empty());
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let infobox = FakeInfobox::new(vec![("Eiffel Tower", Some("https://s/1.jpg"))]);
        let stock = FakeStock::new(vec!["https://s/2.jpg", "https://p/1.jpg", "https://p/2.jpg"]);

        let images = gather_images(
            "Eiffel",
            &strings(&["https://s/1.jpg", "https://s/1.jpg", "https://s/2.jpg"]),
            &[wiki_source("Eiffel_Tower")],
            3,
            &infobox,
            &stock,
        );

        assert_eq!(images, strings(&["https://s/1.jpg", "https://s/2.jpg", "https://p/1.jpg"]));
        assert_eq!(infobox.calls(), 1);
        assert_eq!(stock.requested(), vec![1]);
    }

    #[test]
    fn test_wikipedia_fills_before_stock() {
        let infobox = FakeInfobox::new(vec![
            ("Eiffel Tower", Some("https://wiki/eiffel.jpg")),
            ("Berlin", Some("https://wiki/berlin.jpg")),
        ]);
        let stock = FakeStock::new(vec!["https://p/1.jpg"]);
        let sources = vec![
            wiki_source("Eiffel_Tower"),
            Source::new("News", "https://news.example/eiffel", ""),
            wiki_source("Berlin"),
            wiki_source("Paris"),
        ];

        let images = gather_images(
            "Eiffel",
            &strings(&["https://s/1.jpg"]),
            &sources,
            3,
            &infobox,
            &stock,
        );

        assert_eq!(
            images,
            strings(&["https://s/1.jpg", "https://wiki/eiffel.jpg", "https://wiki/berlin.jpg"])
        );
        // Stopped before looking up "Paris".
        assert_eq!(infobox.calls(), 2);
        assert!(stock.requested().is_empty());
    }

    #[test]
    fn test_stock_requests_exact_shortfall() {
        let infobox = FakeInfobox::new(vec![]);
        let stock = FakeStock::new(vec!["https://p/1.jpg", "https://p/2.jpg", "https://p/3.jpg"]);

        let images = gather_images(
            "Penguins",
            &strings(&["https://s/1.jpg"]),
            &[],
            3,
            &infobox,
            &stock,
        );

        assert_eq!(images, strings(&["https://s/1.jpg", "https://p/1.jpg", "https://p/2.jpg"]));
        assert_eq!(stock.requested(), vec![2]);
    }

    #[test]
    fn test_failing_providers_degrade_silently() {
        let infobox = FakeInfobox::failing();
        let stock = FakeStock::failing();

        let images = gather_images(
            "Eiffel",
            &[],
            &[wiki_source("Eiffel_Tower")],
            3,
            &infobox,
            &stock,
        );

        assert!(images.is_empty());
        assert_eq!(infobox.calls(), 1);
        assert_eq!(stock.requested(), vec![3]);
    }

    #[test]
    fn test_zero_minimum_contacts_nobody() {
        let infobox = FakeInfobox::new(vec![]);
        let stock = FakeStock::new(vec!["https://p/1.jpg"]);

        let images = gather_images(
            "Eiffel",
            &strings(&["https://s/1.jpg"]),
            &[wiki_source("Eiffel_Tower")],
            0,
            &infobox,
            &stock,
        );

        assert!(images.is_empty());
        assert_eq!(infobox.calls(), 0);
        assert!(stock.requested().is_empty());
    }

    #[test]
    fn test_huge_minimum_does_not_preallocate() {
        let infobox = FakeInfobox::new(vec![]);
        let stock = FakeStock::new(vec!["https://p/1.jpg"]);

        let images = gather_images(
            "k",
            &strings(&["https://s/1.jpg"]),
            &[],
            usize::MAX,
            &infobox,
            &stock,
        );

        assert_eq!(images, vec!["https://s/1.jpg", "https://p/1.jpg"]);
        assert_eq!(stock.requested(), vec![usize::MAX - 1]);
    }

    #[test]
    fn test_output_bounded_and_unique_for_mixed_inputs() {
        let search_sets: [&[&str]; 4] = [
            &[],
            &["https://a.jpg"],
            &["https://a.jpg", "https://a.jpg", "https://b.jpg"],
            &["https://a.jpg", "https://b.jpg", "https://c.jpg", "https://d.jpg"],
        ];
        let stock_sets: [&[&'static str]; 3] = [
            &[],
            &["https://a.jpg", "https://e.jpg"],
            &["https://f.jpg", "https://f.jpg", "https://g.jpg", "https://h.jpg", "https://i.jpg"],
        ];

        for min_images in 0..5 {
            for search in search_sets {
                for stock_urls in stock_sets {
                    let infobox = FakeInfobox::new(vec![("A", Some("https://b.jpg"))]);
                    let stock = FakeStock::new(stock_urls.to_vec());
                    let images = gather_images(
                        "k",
                        &strings(search),
                        &[wiki_source("A")],
                        min_images,
                        &infobox,
                        &stock,
                    );

                    assert!(images.len() <= min_images);
                    let mut deduped = images.clone();
                    deduped.sort();
                    deduped.dedup();
                    assert_eq!(deduped.len(), images.len(), "duplicates in {images:?}");
                }
            }
        }
    }

    #[test]
    fn test_wiki_page_title() {
        assert_eq!(
            wiki_page_title("https://en.wikipedia.org/wiki/Eiffel_Tower"),
            "Eiffel Tower"
        );
        assert_eq!(
            wiki_page_title("https://en.wikipedia.org/wiki/Caf%C3%A9_de_Flore"),
            "Café de Flore"
        );
        // No /wiki/ segment: the whole link is used.
        assert_eq!(
            wiki_page_title("https://de.wikipedia.org/index_php"),
            "https://de.wikipedia.org/index php"
        );
    }
}
