//! Configuration constants, settings loading, and input validation.

use crate::error::{Result, TruthTraceError};

/// Serper web search endpoint.
pub const SERPER_URL: &str = "https://google.serper.dev/search";

/// Wikipedia action API endpoint used for infobox thumbnails.
pub const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Pixabay image search endpoint.
pub const PIXABAY_URL: &str = "https://pixabay.com/api/";

/// YouTube Data API v3 search endpoint.
pub const YOUTUBE_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// Base URL for YouTube watch links.
pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// API version sent to the chat completions endpoint.
pub const LLM_API_VERSION: &str = "2024-05-01-preview";

/// Upper bound on tokens generated for a verdict.
pub const LLM_MAX_TOKENS: u32 = 800;

/// Sampling temperature for verdicts. Kept low so answers stay stable.
pub const LLM_TEMPERATURE: f64 = 0.2;

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Number of organic search results kept as sources.
pub const DEFAULT_TOP_SOURCES: usize = 4;

/// Number of images the aggregator tries to collect.
pub const DEFAULT_MIN_IMAGES: usize = 3;

/// Number of videos requested from YouTube.
pub const DEFAULT_MAX_VIDEOS: usize = 3;

/// Largest count accepted for any report section on the command line.
/// YouTube caps `maxResults` at 50.
pub const MAX_SECTION_ITEMS: u64 = 50;

/// Thumbnail width requested from Wikipedia.
pub const WIKIPEDIA_THUMB_SIZE: u32 = 500;

/// Text wrap width for explanations printed to the terminal.
pub const TEXT_WRAP_WIDTH: usize = 100;

/// Search locale sent to Serper.
pub const SEARCH_COUNTRY: &str = "us";

/// Search language sent to Serper.
pub const SEARCH_LANGUAGE: &str = "en";

/// Validate that a claim has something to check.
///
/// # Examples
/// ```
/// use truthtrace::config::validate_claim;
///
/// assert!(validate_claim("The Eiffel Tower is in Berlin").is_ok());
/// assert!(validate_claim("   ").is_err());
/// ```
pub fn validate_claim(claim: &str) -> Result<()> {
    if claim.trim().is_empty() {
        Err(TruthTraceError::EmptyClaim)
    } else {
        Ok(())
    }
}

/// Endpoints, model and credentials for every external service.
///
/// NOTE: Do NOT derive `Debug` on this struct, the API keys would be exposed.
#[derive(Clone)]
pub struct Settings {
    pub llm_endpoint: String,
    pub model: String,
    pub llm_api_key: String,
    pub serper_api_key: String,
    pub pixabay_api_key: String,
    pub youtube_api_key: String,
    pub serper_url: String,
    pub wikipedia_api_url: String,
    pub pixabay_url: String,
    pub youtube_url: String,
    pub timeout_secs: u64,
}

impl Settings {
    /// Load settings from environment variables.
    ///
    /// All four API keys, the LLM endpoint and the model name are required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let require = |name: &str| {
            get(name).ok_or_else(|| TruthTraceError::Config(format!("{name} not set")))
        };

        let timeout_secs = get("TRUTHTRACE_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(HTTP_TIMEOUT_SECS);

        Ok(Self {
            llm_endpoint: require("AZURE_ENDPOINT")?,
            model: require("MODEL_NAME")?,
            llm_api_key: require("AZURE_API_KEY")?,
            serper_api_key: require("SERPER_API_KEY")?,
            pixabay_api_key: require("PIXABAY_API_KEY")?,
            youtube_api_key: require("YOUTUBE_API_KEY")?,
            serper_url: get("SERPER_URL").unwrap_or_else(|| SERPER_URL.into()),
            wikipedia_api_url: get("WIKIPEDIA_API_URL")
                .unwrap_or_else(|| WIKIPEDIA_API_URL.into()),
            pixabay_url: get("PIXABAY_URL").unwrap_or_else(|| PIXABAY_URL.into()),
            youtube_url: get("YOUTUBE_URL").unwrap_or_else(|| YOUTUBE_URL.into()),
            timeout_secs,
        })
    }

    /// Create a settings builder for testing.
    pub fn builder(llm_endpoint: impl Into<String>) -> SettingsBuilder {
        SettingsBuilder {
            settings: Settings {
                llm_endpoint: llm_endpoint.into(),
                model: "DeepSeek-R1".into(),
                llm_api_key: "test-llm-key".into(),
                serper_api_key: "test-serper-key".into(),
                pixabay_api_key: "test-pixabay-key".into(),
                youtube_api_key: "test-youtube-key".into(),
                serper_url: SERPER_URL.into(),
                wikipedia_api_url: WIKIPEDIA_API_URL.into(),
                pixabay_url: PIXABAY_URL.into(),
                youtube_url: YOUTUBE_URL.into(),
                timeout_secs: HTTP_TIMEOUT_SECS,
            },
        }
    }
}

/// Builder for constructing `Settings` in tests.
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.settings.model = model.into();
        self
    }

    pub fn llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.settings.llm_api_key = key.into();
        self
    }

    pub fn serper_url(mut self, url: impl Into<String>) -> Self {
        self.settings.serper_url = url.into();
        self
    }

    pub fn wikipedia_api_url(mut self, url: impl Into<String>) -> Self {
        self.settings.wikipedia_api_url = url.into();
        self
    }

    pub fn pixabay_url(mut self, url: impl Into<String>) -> Self {
        self.settings.pixabay_url = url.into();
        self
    }

    pub fn youtube_url(mut self, url: impl Into<String>) -> Self {
        self.settings.youtube_url = url.into();
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.settings.timeout_secs = timeout_secs;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}
