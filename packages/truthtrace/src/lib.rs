//! TruthTrace - Fact-check claims against web sources and an LLM verdict.
//!
//! For a claim this crate gathers the top web search results, related
//! images and videos, then asks a chat-completion model for an explanation
//! and a REAL / FAKE / MISLEADING verdict grounded in those results.
//!
//! # Example
//!
//! ```
//! use truthtrace::keyword::extract_main_keyword;
//! use truthtrace::verdict::parse_verdict;
//! use truthtrace::Verdict;
//!
//! assert_eq!(extract_main_keyword("The Eiffel Tower is in Berlin"), "The Eiffel Tower");
//! assert_eq!(parse_verdict("Summary:\nVerdict: FAKE"), Verdict::Fake);
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Constants, settings from the environment, claim validation
//! - [`error`]: Error types and Result alias
//! - [`types`]: Sources, videos and verdicts
//! - [`http`]: Shared blocking HTTP client
//! - [`keyword`]: Main keyword extraction
//! - [`search`]: Serper web search
//! - [`images`]: Image aggregation over search, Wikipedia and Pixabay
//! - [`videos`]: YouTube video search
//! - [`llm`]: Chat completion client
//! - [`verdict`]: Prompt building and verdict parsing
//! - [`checker`]: The pipeline that runs one check
//! - [`cli`]: Command-line interface

pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod images;
pub mod keyword;
pub mod llm;
pub mod search;
pub mod types;
pub mod verdict;
pub mod videos;

// Re-export commonly used items
pub use checker::{CheckOptions, FactCheckReport, FactChecker, Stage};
pub use config::{validate_claim, Settings};
pub use error::{Result, TruthTraceError};
pub use types::{SearchResults, Source, Verdict, VerdictOutcome, Video};
