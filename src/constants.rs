//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Key-value store entry holding submitted product queries not yet merged
/// into the inbox. Shared with the submission form.
pub const PENDING_QUERIES_KEY: &str = "newProductQueries";

/// Default timeout for a single model call in seconds.
/// Expiry is reported like any other failure and yields the fallback.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 20;

/// Maximum number of article suggestions kept from a model response.
pub const MAX_SUGGESTED_ARTICLES: usize = 3;

/// Number of characters from a suggested title used to match it against
/// knowledge base titles.
pub const ARTICLE_MATCH_PREFIX_CHARS: usize = 15;

/// Lowest and highest priority score accepted from the model.
pub const MIN_MODEL_PRIORITY_SCORE: f64 = 1.0;
pub const MAX_MODEL_PRIORITY_SCORE: f64 = 10.0;

/// Capacity of the AI actor's command and event channels.
pub const AI_COMMAND_CHANNEL_SIZE: usize = 16;
pub const AI_EVENT_CHANNEL_SIZE: usize = 64;

// === Product query form limits ===

pub const QUERY_NAME_MIN_CHARS: usize = 2;
pub const QUERY_MESSAGE_MIN_CHARS: usize = 10;
pub const QUERY_MESSAGE_MAX_CHARS: usize = 5000;
