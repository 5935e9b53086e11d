//! Fixed substitute payloads returned when a flow fails.
//!
//! Three message families exist per flow: rate limited (mentions high demand),
//! empty output, and everything else (generic, never mentions demand).

use super::error::AiError;
use super::flows::{ArticleSuggestions, Summary, SuggestedReply};
use crate::support::{Priority, Sentiment, Urgency};

/// Wording that marks a rate-limit fallback
pub const HIGH_DEMAND_MARKER: &str = "high demand";

pub const SUMMARY_FALLBACK: &str = "Could not generate summary.";
const SUMMARY_RATE_LIMITED: &str =
    "Could not generate summary. The AI Assistant is temporarily unavailable due to high demand.";

const PRIORITY_GENERIC: &str =
    "AI Assistant encountered an unexpected error. Priority could not be determined.";
const PRIORITY_RATE_LIMITED: &str = "AI Assistant is temporarily unavailable due to high demand (rate limit exceeded). Priority could not be determined at this time.";
const PRIORITY_EMPTY: &str =
    "AI Assistant could not determine priority at this time. Please try again.";

const ARTICLES_GENERIC: &str = "Could not load article suggestions due to an unexpected error.";
const ARTICLES_RATE_LIMITED: &str =
    "Article suggestions temporarily unavailable due to high demand. Please try again later.";
const ARTICLES_EMPTY: &str = "AI could not find relevant articles at this time.";

const REPLY_GENERIC: &str =
    "AI Assistant encountered an unexpected error. Please try again or proceed manually.";
const REPLY_RATE_LIMITED: &str = "AI Assistant is temporarily unavailable due to high demand (rate limit exceeded). Please check your API quota or try again later.";
const REPLY_EMPTY: &str =
    "AI Assistant could not generate a response at this time. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureClass {
    RateLimited,
    Empty,
    Other,
}

fn classify(err: &AiError) -> FailureClass {
    if err.is_rate_limited() {
        FailureClass::RateLimited
    } else if matches!(err, AiError::EmptyResponse) {
        FailureClass::Empty
    } else {
        FailureClass::Other
    }
}

/// A response type with a well-formed value for every failure
pub trait Fallback: Sized {
    fn fallback(err: &AiError) -> Self;
}

impl Fallback for Summary {
    fn fallback(err: &AiError) -> Self {
        let summary = match classify(err) {
            FailureClass::RateLimited => SUMMARY_RATE_LIMITED,
            FailureClass::Empty | FailureClass::Other => SUMMARY_FALLBACK,
        };
        Self {
            summary: summary.to_string(),
        }
    }
}

impl Fallback for Priority {
    fn fallback(err: &AiError) -> Self {
        let reason = match classify(err) {
            FailureClass::RateLimited => PRIORITY_RATE_LIMITED,
            FailureClass::Empty => PRIORITY_EMPTY,
            FailureClass::Other => PRIORITY_GENERIC,
        };
        Self {
            sentiment: Sentiment::Neutral,
            urgency: Urgency::Low,
            priority_score: 0.0,
            reason: reason.to_string(),
        }
    }
}

impl Fallback for ArticleSuggestions {
    fn fallback(err: &AiError) -> Self {
        let error = match classify(err) {
            FailureClass::RateLimited => ARTICLES_RATE_LIMITED,
            FailureClass::Empty => ARTICLES_EMPTY,
            FailureClass::Other => ARTICLES_GENERIC,
        };
        Self {
            suggested_articles: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

impl Fallback for SuggestedReply {
    fn fallback(err: &AiError) -> Self {
        let text = match classify(err) {
            FailureClass::RateLimited => REPLY_RATE_LIMITED,
            FailureClass::Empty => REPLY_EMPTY,
            FailureClass::Other => REPLY_GENERIC,
        };
        Self {
            suggested_response: text.to_string(),
        }
    }
}
