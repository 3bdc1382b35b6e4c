//! Fact-check pipeline that ties all components together.

use tracing::{info, warn};

use crate::config::{Settings, DEFAULT_MAX_VIDEOS, DEFAULT_MIN_IMAGES, DEFAULT_TOP_SOURCES};
use crate::error::Result;
use crate::http::create_client;
use crate::images::{gather_images, InfoboxLookup, PixabayClient, StockPhotoSearch, WikipediaClient};
use crate::keyword::extract_main_keyword;
use crate::llm::{ChatCompletionsClient, LlmClient};
use crate::search::{SerperClient, SourceSearch};
use crate::types::{SearchResults, Source, VerdictOutcome, Video};
use crate::verdict::generate_verdict;
use crate::videos::{VideoSearch, YoutubeClient};

/// Limits applied to a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Organic search results kept as sources.
    pub max_sources: usize,

    /// Images the aggregator tries to collect.
    pub min_images: usize,

    /// Videos requested from the video search.
    pub max_videos: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            max_sources: DEFAULT_TOP_SOURCES,
            min_images: DEFAULT_MIN_IMAGES,
            max_videos: DEFAULT_MAX_VIDEOS,
        }
    }
}

/// Pipeline stage about to run, reported to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Sources,
    Images,
    Videos,
    Verdict,
}

impl Stage {
    /// Human readable progress message.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::Sources => "Searching sources...",
            Self::Images => "Gathering images...",
            Self::Videos => "Searching videos...",
            Self::Verdict => "Fact-checking claim...",
        }
    }
}

/// Everything a single check produced.
///
/// Fallible stages keep their own result so that a failure in one section is
/// rendered as an error there while the other sections still show data.
#[derive(Debug)]
pub struct FactCheckReport {
    pub claim: String,
    pub keyword: String,
    pub sources: Result<Vec<Source>>,
    pub images: Vec<String>,
    pub videos: Result<Vec<Video>>,
    pub verdict: Result<VerdictOutcome>,
}

/// Runs the fact-check stages against injected providers.
///
/// Holds no per-request state, so one instance can serve any number of
/// checks, including from several threads at once.
pub struct FactChecker {
    search: Box<dyn SourceSearch>,
    infobox: Box<dyn InfoboxLookup>,
    stock: Box<dyn StockPhotoSearch>,
    videos: Box<dyn VideoSearch>,
    llm: Box<dyn LlmClient>,
}

impl FactChecker {
    pub fn new(
        search: Box<dyn SourceSearch>,
        infobox: Box<dyn InfoboxLookup>,
        stock: Box<dyn StockPhotoSearch>,
        videos: Box<dyn VideoSearch>,
        llm: Box<dyn LlmClient>,
    ) -> Self {
        Self {
            search,
            infobox,
            stock,
            videos,
            llm,
        }
    }

    /// Build a checker backed by the real HTTP services.
    ///
    /// All clients share one connection pool.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = create_client(settings.timeout_secs)?;

        Ok(Self::new(
            Box::new(SerperClient::new(
                http.clone(),
                &settings.serper_api_key,
                &settings.serper_url,
            )),
            Box::new(WikipediaClient::new(http.clone(), &settings.wikipedia_api_url)),
            Box::new(PixabayClient::new(
                http.clone(),
                &settings.pixabay_api_key,
                &settings.pixabay_url,
            )),
            Box::new(YoutubeClient::new(
                http.clone(),
                &settings.youtube_api_key,
                &settings.youtube_url,
            )),
            Box::new(ChatCompletionsClient::new(
                http,
                &settings.llm_endpoint,
                &settings.llm_api_key,
                &settings.model,
            )),
        ))
    }

    /// Check a claim.
    pub fn check(&self, claim: &str, options: &CheckOptions) -> FactCheckReport {
        self.check_with_progress(claim, options, |_| {})
    }

    /// Check a claim, calling `on_stage` before each stage starts.
    ///
    /// The web search uses the full claim, image and video searches use the
    /// extracted keyword. No stage failure stops the stages after it.
    pub fn check_with_progress<F>(
        &self,
        claim: &str,
        options: &CheckOptions,
        mut on_stage: F,
    ) -> FactCheckReport
    where
        F: FnMut(Stage),
    {
        let keyword = extract_main_keyword(claim);
        info!(keyword = %keyword, "checking claim");

        on_stage(Stage::Sources);
        let (sources, search_images) = match self.search.search(claim, options.max_sources) {
            Ok(SearchResults { sources, images }) => (Ok(sources), images),
            Err(e) => {
                warn!(error = %e, "source search failed");
                (Err(e), Vec::new())
            }
        };
        let found: &[Source] = sources.as_deref().unwrap_or(&[]);

        on_stage(Stage::Images);
        let images = gather_images(
            &keyword,
            &search_images,
            found,
            options.min_images,
            self.infobox.as_ref(),
            self.stock.as_ref(),
        );

        on_stage(Stage::Videos);
        let videos = self.videos.search(&keyword, options.max_videos);
        if let Err(e) = &videos {
            warn!(error = %e, "video search failed");
        }

        on_stage(Stage::Verdict);
        let verdict = generate_verdict(self.llm.as_ref(), claim, found);
        if let Err(e) = &verdict {
            warn!(error = %e, "verdict generation failed");
        }

        FactCheckReport {
            claim: claim.to_string(),
            keyword,
            sources,
            images,
            videos,
            verdict,
        }
    }
}
