//! AI features module for inquiry triage and reply assistance
//!
//! This module wraps an OpenRouter-compatible chat completions API:
//! - Inquiry summarization
//! - Sentiment/urgency prioritization
//! - Knowledge base article suggestions
//! - Agent reply drafting
//!
//! Every flow is total: failures are mapped to fixed fallback payloads.

mod actor;
mod client;
mod error;
mod fallback;
mod flows;
mod prompts;
#[cfg(test)]
pub mod testing;

use std::sync::Arc;
use std::time::Duration;

pub use actor::{AiActorHandle, AiCommand, AiEvent, RequestTicket, spawn_ai_actor};
pub use client::{CompletionBackend, CompletionRequest, DisabledBackend, OpenRouterClient};
pub use error::AiError;
pub use fallback::{Fallback, HIGH_DEMAND_MARKER};
pub use flows::{
    AiFlows, ArticleSuggestions, FlowLimits, GenerateResponseRequest, PrioritizeRequest,
    SuggestArticlesRequest, SuggestedReply, Summary, SummarizeRequest,
};

#[cfg(test)]
pub use prompts::{GENERATE_RESPONSE_SYSTEM, PRIORITIZE_SYSTEM, SUGGEST_ARTICLES_SYSTEM, SUMMARIZE_SYSTEM};

use crate::config::AiConfig;

/// Build the flows for the configured provider. Without an API key every
/// flow answers with its fallback.
pub fn flows_from_config(config: &AiConfig, api_key: Option<String>) -> AiFlows {
    let backend: Arc<dyn CompletionBackend> = match api_key {
        Some(key) => Arc::new(OpenRouterClient::new(
            key,
            config.model.clone(),
            config.base_url.clone(),
        )),
        None => {
            tracing::warn!("No AI API key configured; AI assistance will show fallbacks");
            Arc::new(DisabledBackend)
        }
    };

    AiFlows::new(
        backend,
        Duration::from_secs(config.timeout_secs),
        FlowLimits {
            summary_max_tokens: config.summary_max_tokens,
            priority_max_tokens: config.priority_max_tokens,
            articles_max_tokens: config.articles_max_tokens,
            response_max_tokens: config.response_max_tokens,
        },
    )
}
