use std::time::Duration;

use thiserror::Error;

/// Every way a model call can fail. Flows never surface these to the user
/// directly; they pick a fallback payload based on the variant.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI features are not configured (no API key)")]
    NotConfigured,

    #[error("request to model API failed: {0}")]
    Transport(String),

    #[error("model API rate limit exceeded [429 Too Many Requests]: {0}")]
    RateLimited(String),

    #[error("model API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("model returned no output")]
    EmptyResponse,

    #[error("model response failed schema validation: {0}")]
    Malformed(String),
}

impl AiError {
    /// Whether the provider signalled rate limiting. Providers sometimes wrap
    /// the 429 inside another error body, so the message text is checked too.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::RateLimited(_) => true,
            Self::Status { status, body } => *status == 429 || mentions_rate_limit(body),
            Self::Transport(msg) => mentions_rate_limit(msg),
            _ => false,
        }
    }

    /// Short stable name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Transport(_) => "transport",
            Self::RateLimited(_) => "rate_limited",
            Self::Status { .. } => "status",
            Self::Timeout(_) => "timeout",
            Self::EmptyResponse => "empty",
            Self::Malformed(_) => "malformed",
        }
    }
}

fn mentions_rate_limit(text: &str) -> bool {
    text.to_ascii_lowercase().contains("too many requests") || has_status_code(text, "429")
}

/// `code` appearing on its own, not as part of a longer number such as a
/// port in a URL
fn has_status_code(text: &str, code: &str) -> bool {
    let bytes = text.as_bytes();
    text.match_indices(code).any(|(start, _)| {
        let end = start + code.len();
        let before = start.checked_sub(1).map(|i| bytes[i]);
        let after = bytes.get(end).copied();
        !before.is_some_and(|b| b.is_ascii_digit() || b == b':')
            && !after.is_some_and(|b| b.is_ascii_digit())
    })
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.status().is_some_and(|s| s.as_u16() == 429) {
            Self::RateLimited(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
