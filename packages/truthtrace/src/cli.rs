//! Command-line interface for the fact checker.

use std::io::{self, Write};

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{json, Value};

use crate::checker::{CheckOptions, FactCheckReport, FactChecker};
use crate::config::{
    validate_claim, Settings, DEFAULT_MAX_VIDEOS, DEFAULT_MIN_IMAGES, DEFAULT_TOP_SOURCES,
    MAX_SECTION_ITEMS, TEXT_WRAP_WIDTH,
};
use crate::error::Result;
use crate::keyword::extract_main_keyword;
use crate::types::Verdict;

/// TruthTrace - Fact-check claims with web sources, images, videos and an LLM verdict.
#[derive(Parser)]
#[command(name = "truthtrace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a claim and print sources, images, videos and a verdict.
    Check {
        /// The claim to verify (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        claim: Vec<String>,

        /// Number of web sources to use
        #[arg(
            long,
            default_value_t = DEFAULT_TOP_SOURCES,
            value_parser = RangedU64ValueParser::<usize>::new().range(..=MAX_SECTION_ITEMS)
        )]
        sources: usize,

        /// Number of related images to collect
        #[arg(
            long,
            default_value_t = DEFAULT_MIN_IMAGES,
            value_parser = RangedU64ValueParser::<usize>::new().range(..=MAX_SECTION_ITEMS)
        )]
        images: usize,

        /// Number of related videos to list
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_VIDEOS,
            value_parser = RangedU64ValueParser::<usize>::new().range(..=MAX_SECTION_ITEMS)
        )]
        videos: usize,

        /// Print the report as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Print the search keyword extracted from a claim (no network access).
    Keyword {
        /// The claim to analyse
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        claim: Vec<String>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            claim,
            sources,
            images,
            videos,
            json,
        } => {
            let options = CheckOptions {
                max_sources: sources,
                min_images: images,
                max_videos: videos,
            };
            check_command(&claim.join(" "), &options, json)
        }
        Commands::Keyword { claim } => keyword_command(&claim.join(" ")),
    }
}

/// Execute the keyword command.
fn keyword_command(claim: &str) -> Result<()> {
    validate_claim(claim)?;
    println!("{}", extract_main_keyword(claim));
    Ok(())
}

/// Execute the check command.
fn check_command(claim: &str, options: &CheckOptions, as_json: bool) -> Result<()> {
    // Validate input and configuration before making HTTP requests
    validate_claim(claim)?;
    let settings = Settings::from_env()?;
    let checker = FactChecker::from_settings(&settings)?;

    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let report = checker.check_with_progress(claim, options, |stage| {
        pb.set_message(stage.message());
    });

    pb.finish_and_clear();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
    } else {
        print_report(&mut io::stdout().lock(), &report)?;
    }

    Ok(())
}

/// Write a report as formatted terminal output.
///
/// Each section shows either its items, a dim note when nothing was found,
/// or a red error line when the lookup failed.
pub fn print_report(out: &mut impl Write, report: &FactCheckReport) -> io::Result<()> {
    writeln!(
        out,
        "{} {}",
        style("Claim:").bold(),
        style(&report.claim).cyan()
    )?;
    writeln!(out, "  Keyword: {}", style(&report.keyword).green())?;
    writeln!(out)?;

    heading(out, "Top Sources")?;
    match &report.sources {
        Ok(sources) if sources.is_empty() => info(out, "No relevant sources found.")?,
        Ok(sources) => {
            for source in sources {
                writeln!(out, "  - {} ({})", style(&source.title).bold(), source.link)?;
                if !source.snippet.is_empty() {
                    writeln!(out, "    {}", style(&source.snippet).dim())?;
                }
            }
        }
        Err(e) => error(out, &format!("Failed to fetch search results: {e}"))?,
    }
    writeln!(out)?;

    heading(out, "Related Images")?;
    if report.images.is_empty() {
        info(out, "No related images found.")?;
    } else {
        for url in &report.images {
            writeln!(out, "  - {url}")?;
        }
    }
    writeln!(out)?;

    heading(out, "Related Videos")?;
    match &report.videos {
        Ok(videos) if videos.is_empty() => info(out, "No related videos found.")?,
        Ok(videos) => {
            for video in videos {
                writeln!(out, "  - {}", style(&video.title).bold())?;
                writeln!(out, "    {}", video.url)?;
                writeln!(out, "    Thumbnail: {}", style(&video.thumbnail).dim())?;
            }
        }
        Err(e) => error(out, &format!("Failed to fetch videos: {e}"))?,
    }
    writeln!(out)?;

    match &report.verdict {
        Ok(outcome) => {
            writeln!(
                out,
                "{} {}",
                style("Final Verdict:").bold(),
                verdict_style(outcome.verdict)
            )?;
            writeln!(out)?;
            writeln!(out, "{}", textwrap::fill(&outcome.explanation, TEXT_WRAP_WIDTH))?;
        }
        Err(e) => error(out, &format!("Could not get fact-check result: {e}"))?,
    }

    Ok(())
}

fn heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "{}", style(title).bold().underlined())
}

fn info(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "  {}", style(message).dim())
}

fn error(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "  {} {}", style("✗").red().bold(), style(message).red())
}

fn verdict_style(verdict: Verdict) -> StyledObject<&'static str> {
    let label = style(verdict.as_str()).bold();
    match verdict {
        Verdict::Real => label.green(),
        Verdict::Fake => label.red(),
        Verdict::Misleading => label.yellow(),
        Verdict::Unknown => label.dim(),
    }
}

/// Build the JSON form of a report.
///
/// Every section carries a `status` of `ok`, `empty` or `error` so that
/// consumers can tell "nothing found" apart from "lookup failed".
pub fn report_json(report: &FactCheckReport) -> Value {
    let sources = match &report.sources {
        Ok(sources) if sources.is_empty() => json!({ "status": "empty", "items": [] }),
        Ok(sources) => json!({ "status": "ok", "items": sources }),
        Err(e) => json!({ "status": "error", "error": e.to_string(), "items": [] }),
    };

    let images = if report.images.is_empty() {
        json!({ "status": "empty", "items": [] })
    } else {
        json!({ "status": "ok", "items": report.images })
    };

    let videos = match &report.videos {
        Ok(videos) if videos.is_empty() => json!({ "status": "empty", "items": [] }),
        Ok(videos) => json!({ "status": "ok", "items": videos }),
        Err(e) => json!({ "status": "error", "error": e.to_string(), "items": [] }),
    };

    let verdict = match &report.verdict {
        Ok(outcome) => json!({
            "status": "ok",
            "verdict": outcome.verdict,
            "explanation": outcome.explanation,
        }),
        Err(e) => json!({ "status": "error", "error": e.to_string() }),
    };

    json!({
        "claim": report.claim,
        "keyword": report.keyword,
        "sources": sources,
        "images": images,
        "videos": videos,
        "verdict": verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TruthTraceError;
    use crate::types::{Source, VerdictOutcome, Video};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_parse_check_defaults() {
        let cli = Cli::parse_from(["truthtrace", "check", "The Eiffel Tower is in Berlin"]);

        let Commands::Check {
            claim,
            sources,
            images,
            videos,
            json,
        } = cli.command
        else {
            panic!("expected check command");
        };
        assert_eq!(claim, vec!["The Eiffel Tower is in Berlin"]);
        assert_eq!(sources, 4);
        assert_eq!(images, 3);
        assert_eq!(videos, 3);
        assert!(!json);
    }

    #[test]
    fn test_cli_parse_check_with_options() {
        let cli = Cli::parse_from([
            "truthtrace",
            "check",
            "Penguins",
            "can",
            "fly",
            "--sources",
            "2",
            "--images",
            "5",
            "--json",
        ]);

        let Commands::Check {
            claim,
            sources,
            images,
            json,
            ..
        } = cli.command
        else {
            panic!("expected check command");
        };
        assert_eq!(claim.join(" "), "Penguins can fly");
        assert_eq!(sources, 2);
        assert_eq!(images, 5);
        assert!(json);
    }

    #[test]
    fn test_cli_parse_keyword() {
        let cli = Cli::parse_from(["truthtrace", "keyword", "Messi won the World Cup"]);
        let Commands::Keyword { claim } = cli.command else {
            panic!("expected keyword command");
        };
        assert_eq!(claim, vec!["Messi won the World Cup"]);
    }

    #[test]
    fn test_cli_requires_claim() {
        assert!(Cli::try_parse_from(["truthtrace", "check"]).is_err());
    }

    #[test]
    fn test_cli_parse_claim_starting_with_negative_number() {
        let cli = Cli::parse_from(["truthtrace", "check", "-5", "degrees", "is", "cold", "--json"]);

        let Commands::Check { claim, json, .. } = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(claim.join(" "), "-5 degrees is cold");
        assert!(json);
    }

    #[test]
    fn test_cli_parse_claim_after_separator() {
        let cli = Cli::parse_from(["truthtrace", "keyword", "--", "-x", "marks", "the", "spot"]);
        let Commands::Keyword { claim } = cli.command else {
            panic!("expected keyword command");
        };
        assert_eq!(claim.join(" "), "-x marks the spot");
    }

    #[test]
    fn test_cli_bounds_section_counts() {
        let parse = |flag: &str, value: &str| {
            Cli::try_parse_from(["truthtrace", "check", "Penguins", "can", "fly", flag, value])
        };

        assert!(parse("--images", "50").is_ok());
        assert!(parse("--images", "51").is_err());
        assert!(parse("--images", "18446744073709551615").is_err());
        assert!(parse("--sources", "100").is_err());
        assert!(parse("--videos", "0").is_ok());
    }

    fn render(report: &FactCheckReport) -> String {
        console::set_colors_enabled(false);
        let mut out = Vec::new();
        print_report(&mut out, report).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_print_report_separates_empty_from_failed() {
        let report = FactCheckReport {
            claim: "Penguins can fly".into(),
            keyword: "Penguins can fly".into(),
            sources: Ok(vec![]),
            images: vec![],
            videos: Err(TruthTraceError::Status {
                service: "YouTube",
                status: 403,
                message: "quotaExceeded".into(),
            }),
            verdict: Err(TruthTraceError::LlmEmptyResponse),
        };

        let text = render(&report);

        assert!(text.contains("Claim: Penguins can fly"));
        assert!(text.contains("  No relevant sources found.\n"));
        assert!(text.contains("  No related images found.\n"));
        assert!(!text.contains("No related videos found."));
        assert!(text.contains(
            "  ✗ Failed to fetch videos: YouTube returned status 403: quotaExceeded\n"
        ));
        assert!(text.contains("  ✗ Could not get fact-check result: LLM returned empty response\n"));
        assert!(!text.contains("Final Verdict:"));
    }

    #[test]
    fn test_print_report_lists_items_and_verdict() {
        let report = FactCheckReport {
            claim: "The Eiffel Tower is in Berlin".into(),
            keyword: "The Eiffel Tower".into(),
            sources: Err(TruthTraceError::Config("SERPER_API_KEY not set".into())),
            images: vec!["https://img.example/1.jpg".into()],
            videos: Ok(vec![Video {
                title: "Inside the Eiffel Tower".into(),
                url: "https://www.youtube.com/watch?v=abc123".into(),
                thumbnail: "https://i.ytimg.com/vi/abc123/default.jpg".into(),
            }]),
            verdict: Ok(VerdictOutcome {
                verdict: Verdict::Fake,
                explanation: "The tower is in Paris.\n\nVerdict: FAKE".into(),
            }),
        };

        let text = render(&report);

        assert!(text.contains(
            "  ✗ Failed to fetch search results: configuration error: SERPER_API_KEY not set\n"
        ));
        assert!(!text.contains("No relevant sources found."));
        assert!(text.contains("  - https://img.example/1.jpg\n"));
        assert!(text.contains(
            "  - Inside the Eiffel Tower\n    https://www.youtube.com/watch?v=abc123\n    Thumbnail: https://i.ytimg.com/vi/abc123/default.jpg\n"
        ));
        assert!(text.contains("Final Verdict: FAKE\n"));
        assert!(text.contains("The tower is in Paris."));
    }

    #[test]
    fn test_report_json_sections() {
        let report = FactCheckReport {
            claim: "The Eiffel Tower is in Berlin".into(),
            keyword: "The Eiffel Tower".into(),
            sources: Ok(vec![Source::new("Eiffel Tower", "https://e.example", "Paris")]),
            images: vec![],
            videos: Err(TruthTraceError::Status {
                service: "YouTube",
                status: 403,
                message: "quota".into(),
            }),
            verdict: Ok(VerdictOutcome {
                verdict: Verdict::Fake,
                explanation: "Verdict: FAKE".into(),
            }),
        };

        let value = report_json(&report);
        assert_eq!(value["keyword"], "The Eiffel Tower");
        assert_eq!(value["sources"]["status"], "ok");
        assert_eq!(value["sources"]["items"][0]["link"], "https://e.example");
        assert_eq!(value["images"]["status"], "empty");
        assert_eq!(value["videos"]["status"], "error");
        assert_eq!(value["videos"]["error"], "YouTube returned status 403: quota");
        assert_eq!(value["verdict"]["verdict"], "FAKE");
    }
}
