//! HTTP client wrapper shared by every external service.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{Result, TruthTraceError};

/// User agent string identifying this tool.
const USER_AGENT: &str = concat!("truthtrace/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in a `Status` error.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Create a configured HTTP client.
///
/// # Returns
/// A `reqwest::blocking::Client` configured with the given timeout and user agent.
pub fn create_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Send a request and decode its JSON body.
///
/// A single attempt is made. Transport failures become
/// `TruthTraceError::Request`, non-2xx statuses become
/// `TruthTraceError::Status` and undecodable bodies become
/// `TruthTraceError::MalformedResponse`, all tagged with `service`.
pub fn send_json<T: DeserializeOwned>(service: &'static str, request: RequestBuilder) -> Result<T> {
    let response = request
        .send()
        .map_err(|source| TruthTraceError::Request { service, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        tracing::debug!(service, status = %status, "request rejected");
        return Err(TruthTraceError::Status {
            service,
            status: status.as_u16(),
            message: truncate(&body, MAX_ERROR_BODY_CHARS),
        });
    }

    let body = response
        .text()
        .map_err(|source| TruthTraceError::Request { service, source })?;

    serde_json::from_str(&body).map_err(|e| TruthTraceError::MalformedResponse {
        service,
        message: e.to_string(),
    })
}

/// Shorten a string to at most `max_chars` characters.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
