//! Core data types for a fact check.
//!
//! Everything here lives for a single check: produced by one stage and read
//! by the next stage or by the renderer.

use serde::Serialize;

/// A web search result used as grounding context for the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Result title.
    pub title: String,

    /// Result URL as returned by the provider.
    pub link: String,

    /// Text snippet shown by the provider.
    pub snippet: String,

    /// Lower-cased `link`, used for domain matching.
    pub link_lower: String,
}

impl Source {
    /// Build a source, deriving the lower-cased link.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        let link = link.into();
        let link_lower = link.to_lowercase();
        Self {
            title: title.into(),
            link,
            snippet: snippet.into(),
            link_lower,
        }
    }

    /// Whether this source points at a Wikipedia article.
    #[must_use]
    pub fn is_wikipedia(&self) -> bool {
        self.link_lower.contains("wikipedia.org")
    }
}

/// Output of the source search stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// Top organic results, in provider order.
    pub sources: Vec<Source>,

    /// Inline image URLs from the same search response.
    pub images: Vec<String>,
}

/// A related video clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    pub title: String,
    pub url: String,
    pub thumbnail: String,
}

/// Categorical judgment on a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The sources support the claim.
    Real,

    /// The sources contradict the claim.
    Fake,

    /// The claim mixes true and false elements or lacks context.
    Misleading,

    /// The LLM answer did not contain a recognizable verdict line.
    Unknown,
}

impl Verdict {
    /// Get the display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "REAL",
            Self::Fake => "FAKE",
            Self::Misleading => "MISLEADING",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a label, ignoring case. Anything unrecognized is `Unknown`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "REAL" => Self::Real,
            "FAKE" => Self::Fake,
            "MISLEADING" => Self::Misleading,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict label plus the LLM's full explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictOutcome {
    pub verdict: Verdict,
    pub explanation: String,
}
