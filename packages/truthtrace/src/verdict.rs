//! Verdict generation: prompt construction, the LLM call, and label parsing.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::config::{LLM_MAX_TOKENS, LLM_TEMPERATURE};
use crate::error::Result;
use crate::llm::{LlmClient, LlmRequest, Message};
use crate::types::{Source, Verdict, VerdictOutcome};

/// Persona sent as the system message.
pub const SYSTEM_PROMPT: &str = "You are TruthTrace, an AI fact-checking assistant. \
Always respond factually, neutrally, and in the requested format.";

/// Context used when the search stage produced nothing.
pub const NO_SOURCES_CONTEXT: &str = "No sources available.";

/// Verdict line pattern: `Verdict:` followed by one of the three labels.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static VERDICT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Verdict:\s*(REAL|FAKE|MISLEADING)").expect("valid regex")
});

/// Build the grounding context block from the sources.
pub fn build_context(sources: &[Source]) -> String {
    if sources.is_empty() {
        return NO_SOURCES_CONTEXT.to_string();
    }

    sources
        .iter()
        .map(|s| format!("{}: {}", s.title, s.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the user prompt for a claim.
pub fn build_prompt(claim: &str, sources: &[Source]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Based strictly and only on the sources below, provide a clear, rewritten explanation \
         for the claim in your own words (do not copy source text or this instruction). \
         Then, provide a short plain-language answer, and finally output a summary verdict line.\n\n",
    );

    prompt.push_str("Format:\nExplanation/Reasoning:\n<your reasoning>\n\n");
    prompt.push_str("Short Answer:\n<one-sentence answer>\n\n");
    prompt.push_str("Summary:\nVerdict: REAL|FAKE|MISLEADING\n\n");

    prompt.push_str(&format!("Sources:\n{}\n\n", build_context(sources)));
    prompt.push_str(&format!("Claim: {claim}"));

    prompt
}

/// Build the full chat request for a claim.
pub fn build_request(claim: &str, sources: &[Source]) -> LlmRequest {
    LlmRequest {
        messages: vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(build_prompt(claim, sources)),
        ],
        max_tokens: LLM_MAX_TOKENS,
        temperature: LLM_TEMPERATURE,
    }
}

/// Extract the verdict label from free LLM text.
///
/// # Examples
/// ```
/// use truthtrace::types::Verdict;
/// use truthtrace::verdict::parse_verdict;
///
/// assert_eq!(parse_verdict("Summary:\nverdict: fake"), Verdict::Fake);
/// assert_eq!(parse_verdict("I am not sure."), Verdict::Unknown);
/// ```
#[must_use]
pub fn parse_verdict(text: &str) -> Verdict {
    VERDICT_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(Verdict::Unknown, |m| Verdict::from_label(m.as_str()))
}

/// Ask the LLM for an explanation and verdict on `claim`.
///
/// A single attempt is made; any failure is returned as-is.
pub fn generate_verdict(
    llm: &dyn LlmClient,
    claim: &str,
    sources: &[Source],
) -> Result<VerdictOutcome> {
    let request = build_request(claim, sources);
    debug!(sources = sources.len(), "requesting verdict");

    let response = llm.complete(&request)?;
    let explanation = response.content.trim().to_string();
    let verdict = parse_verdict(&explanation);

    info!(verdict = %verdict, "verdict generated");
    Ok(VerdictOutcome {
        verdict,
        explanation,
    })
}
