//! Typed wrappers around the four prompt templates.
//!
//! Each flow makes exactly one model call, validates the JSON it gets back and
//! returns a typed value. The `try_*` methods expose the failure; the plain
//! methods are total and substitute the flow's fallback.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::client::{CompletionBackend, CompletionRequest};
use super::error::AiError;
use super::fallback::Fallback;
use super::prompts;
use crate::constants::{MAX_MODEL_PRIORITY_SCORE, MAX_SUGGESTED_ARTICLES, MIN_MODEL_PRIORITY_SCORE};
use crate::support::{Priority, Sentiment, Urgency};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarizeRequest {
    pub inquiry_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrioritizeRequest {
    pub inquiry_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestArticlesRequest {
    pub inquiry_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResponseRequest {
    pub thread_text: String,
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleSuggestions {
    pub suggested_articles: Vec<String>,
    /// Set only on the fallback path
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedReply {
    pub suggested_response: String,
}

/// Token budgets per flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowLimits {
    pub summary_max_tokens: u32,
    pub priority_max_tokens: u32,
    pub articles_max_tokens: u32,
    pub response_max_tokens: u32,
}

impl Default for FlowLimits {
    fn default() -> Self {
        Self {
            summary_max_tokens: 300,
            priority_max_tokens: 300,
            articles_max_tokens: 300,
            response_max_tokens: 1200,
        }
    }
}

/// Model output schema: deserialize the wire shape, then validate it into
/// the public type.
trait FlowOutput: Sized {
    type Wire: DeserializeOwned;
    fn validate(wire: Self::Wire) -> Result<Self, AiError>;
}

#[derive(Deserialize)]
struct SummaryWire {
    summary: String,
}

impl FlowOutput for Summary {
    type Wire = SummaryWire;

    fn validate(wire: SummaryWire) -> Result<Self, AiError> {
        let summary = wire.summary.trim();
        if summary.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(Self {
            summary: summary.to_string(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriorityWire {
    sentiment: String,
    urgency: String,
    priority_score: f64,
    #[serde(default)]
    reason: String,
}

impl FlowOutput for Priority {
    type Wire = PriorityWire;

    fn validate(wire: PriorityWire) -> Result<Self, AiError> {
        let sentiment = match wire.sentiment.trim().to_ascii_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "neutral" => Sentiment::Neutral,
            "negative" => Sentiment::Negative,
            other => return Err(AiError::Malformed(format!("unknown sentiment {other:?}"))),
        };
        let urgency = match wire.urgency.trim().to_ascii_lowercase().as_str() {
            "low" => Urgency::Low,
            "medium" => Urgency::Medium,
            "high" => Urgency::High,
            other => return Err(AiError::Malformed(format!("unknown urgency {other:?}"))),
        };
        if !wire.priority_score.is_finite() {
            return Err(AiError::Malformed("priorityScore is not finite".into()));
        }

        Ok(Self {
            sentiment,
            urgency,
            priority_score: wire
                .priority_score
                .clamp(MIN_MODEL_PRIORITY_SCORE, MAX_MODEL_PRIORITY_SCORE),
            reason: wire.reason.trim().to_string(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticlesWire {
    suggested_articles: Vec<String>,
}

impl FlowOutput for ArticleSuggestions {
    type Wire = ArticlesWire;

    fn validate(wire: ArticlesWire) -> Result<Self, AiError> {
        let mut titles: Vec<String> = Vec::new();
        for title in wire.suggested_articles {
            let title = title.trim();
            if !title.is_empty() && !titles.iter().any(|t| t.eq_ignore_ascii_case(title)) {
                titles.push(title.to_string());
            }
        }
        titles.truncate(MAX_SUGGESTED_ARTICLES);

        if titles.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(Self {
            suggested_articles: titles,
            error: None,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyWire {
    suggested_response: String,
}

impl FlowOutput for SuggestedReply {
    type Wire = ReplyWire;

    fn validate(wire: ReplyWire) -> Result<Self, AiError> {
        let text = wire.suggested_response.trim();
        if text.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(Self {
            suggested_response: text.to_string(),
        })
    }
}

/// Strip an optional markdown code fence and any chatter around the JSON object
fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start <= end => &trimmed[start..=end],
        _ => trimmed,
    }
}

fn parse_output<T: FlowOutput>(raw: &str) -> Result<T, AiError> {
    if raw.trim().is_empty() {
        return Err(AiError::EmptyResponse);
    }
    let wire: T::Wire = serde_json::from_str(extract_json(raw))?;
    T::validate(wire)
}

/// The four prompt flows sharing one backend
#[derive(Clone)]
pub struct AiFlows {
    backend: Arc<dyn CompletionBackend>,
    timeout: Duration,
    limits: FlowLimits,
}

impl AiFlows {
    pub fn new(backend: Arc<dyn CompletionBackend>, timeout: Duration, limits: FlowLimits) -> Self {
        Self {
            backend,
            timeout,
            limits,
        }
    }

    async fn run<T: FlowOutput>(
        &self,
        flow: &'static str,
        system: &str,
        user: String,
        max_tokens: u32,
    ) -> Result<T, AiError> {
        tracing::debug!("{} flow: sending {} chars", flow, user.len());

        let request = CompletionRequest {
            system: system.to_string(),
            user,
            max_tokens,
        };
        let raw = tokio::time::timeout(self.timeout, self.backend.complete(request))
            .await
            .map_err(|_| AiError::Timeout(self.timeout))??;

        parse_output(&raw)
    }

    fn settle<T: Fallback>(flow: &'static str, result: Result<T, AiError>) -> T {
        result.unwrap_or_else(|e| {
            tracing::warn!("{} flow failed ({}): {}. Using fallback", flow, e.kind(), e);
            T::fallback(&e)
        })
    }

    pub async fn try_summarize(&self, request: &SummarizeRequest) -> Result<Summary, AiError> {
        self.run(
            "summarize",
            prompts::SUMMARIZE_SYSTEM,
            prompts::summarize_user(&request.inquiry_text),
            self.limits.summary_max_tokens,
        )
        .await
    }

    pub async fn summarize(&self, request: &SummarizeRequest) -> Summary {
        Self::settle("summarize", self.try_summarize(request).await)
    }

    pub async fn try_prioritize(&self, request: &PrioritizeRequest) -> Result<Priority, AiError> {
        self.run(
            "prioritize",
            prompts::PRIORITIZE_SYSTEM,
            prompts::prioritize_user(&request.inquiry_text),
            self.limits.priority_max_tokens,
        )
        .await
    }

    pub async fn prioritize(&self, request: &PrioritizeRequest) -> Priority {
        Self::settle("prioritize", self.try_prioritize(request).await)
    }

    pub async fn try_suggest_articles(
        &self,
        request: &SuggestArticlesRequest,
    ) -> Result<ArticleSuggestions, AiError> {
        self.run(
            "suggest_articles",
            prompts::SUGGEST_ARTICLES_SYSTEM,
            prompts::suggest_articles_user(&request.inquiry_text),
            self.limits.articles_max_tokens,
        )
        .await
    }

    pub async fn suggest_articles(&self, request: &SuggestArticlesRequest) -> ArticleSuggestions {
        Self::settle("suggest_articles", self.try_suggest_articles(request).await)
    }

    pub async fn try_generate_response(
        &self,
        request: &GenerateResponseRequest,
    ) -> Result<SuggestedReply, AiError> {
        self.run(
            "generate_response",
            prompts::GENERATE_RESPONSE_SYSTEM,
            prompts::generate_response_user(&request.thread_text, request.customer_name.as_deref()),
            self.limits.response_max_tokens,
        )
        .await
    }

    pub async fn generate_response(&self, request: &GenerateResponseRequest) -> SuggestedReply {
        Self::settle("generate_response", self.try_generate_response(request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::fallback::{HIGH_DEMAND_MARKER, SUMMARY_FALLBACK};
    use crate::ai::testing::ScriptedBackend;

    fn flows(backend: ScriptedBackend) -> AiFlows {
        AiFlows::new(
            Arc::new(backend),
            Duration::from_millis(200),
            FlowLimits::default(),
        )
    }

    fn prioritize_req(text: &str) -> PrioritizeRequest {
        PrioritizeRequest {
            inquiry_text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_prioritize_parses_valid_output() {
        let backend = ScriptedBackend::new().reply_with(
            r#"{"sentiment":"negative","urgency":"high","priorityScore":8,"reason":"Order lost"}"#,
        );
        let p = flows(backend).try_prioritize(&prioritize_req("x")).await.unwrap();
        assert_eq!(p.sentiment, Sentiment::Negative);
        assert_eq!(p.urgency, Urgency::High);
        assert_eq!(p.priority_score, 8.0);
        assert_eq!(p.reason, "Order lost");
    }

    #[tokio::test]
    async fn test_prioritize_accepts_code_fence_and_case() {
        let backend = ScriptedBackend::new().reply_with(
            "```json\n{\"sentiment\":\"Neutral\",\"urgency\":\"LOW\",\"priorityScore\":3.5,\"reason\":\"ok\"}\n```",
        );
        let p = flows(backend).try_prioritize(&prioritize_req("x")).await.unwrap();
        assert_eq!(p.sentiment, Sentiment::Neutral);
        assert_eq!(p.urgency, Urgency::Low);
        assert_eq!(p.priority_score, 3.5);
    }

    #[tokio::test]
    async fn test_prioritize_clamps_score() {
        let backend = ScriptedBackend::new().reply_with(
            r#"{"sentiment":"negative","urgency":"high","priorityScore":42,"reason":""}"#,
        );
        let p = flows(backend).try_prioritize(&prioritize_req("x")).await.unwrap();
        assert_eq!(p.priority_score, 10.0);
    }

    #[tokio::test]
    async fn test_prioritize_rejects_unknown_enum() {
        let backend = ScriptedBackend::new().reply_with(
            r#"{"sentiment":"furious","urgency":"high","priorityScore":9,"reason":"x"}"#,
        );
        let err = flows(backend)
            .try_prioritize(&prioritize_req("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_malformed_output_falls_back_like_transport_failure() {
        let malformed = flows(ScriptedBackend::new().reply_with("not json at all"))
            .prioritize(&prioritize_req("x"))
            .await;
        let transport = flows(ScriptedBackend::new().fail_with(|| AiError::Transport("reset".into())))
            .prioritize(&prioritize_req("x"))
            .await;
        assert_eq!(malformed, transport);
        assert_eq!(malformed.priority_score, 0.0);
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let backend = ScriptedBackend::new().reply_with(r#"{"sentiment":"neutral"}"#);
        let err = flows(backend)
            .try_prioritize(&prioritize_req("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_reply_fallback_mentions_demand() {
        let backend = ScriptedBackend::new().fail_with(|| AiError::Status {
            status: 429,
            body: "[429 Too Many Requests]".into(),
        });
        let reply = flows(backend)
            .generate_response(&GenerateResponseRequest {
                thread_text: "Customer: hi".into(),
                customer_name: None,
            })
            .await;
        assert!(reply.suggested_response.contains(HIGH_DEMAND_MARKER));
    }

    #[tokio::test]
    async fn test_timeout_uses_fallback() {
        let backend = ScriptedBackend::new().hang();
        let summary = flows(backend)
            .summarize(&SummarizeRequest {
                inquiry_text: "slow".into(),
            })
            .await;
        assert_eq!(summary.summary, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_suggest_articles_dedupes_and_caps() {
        let backend = ScriptedBackend::new().reply_with(
            r#"{"suggestedArticles":["Track Order"," track order ","Billing","","Passwords","Settings"]}"#,
        );
        let result = flows(backend)
            .suggest_articles(&SuggestArticlesRequest {
                inquiry_text: "x".into(),
            })
            .await;
        assert_eq!(
            result.suggested_articles,
            vec!["Track Order", "Billing", "Passwords"]
        );
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_empty_article_list_is_fallback() {
        let backend = ScriptedBackend::new().reply_with(r#"{"suggestedArticles":[]}"#);
        let result = flows(backend)
            .suggest_articles(&SuggestArticlesRequest {
                inquiry_text: "x".into(),
            })
            .await;
        assert!(result.suggested_articles.is_empty());
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn test_generate_response_sends_customer_name() {
        let backend = ScriptedBackend::new()
            .reply_with(r#"{"suggestedResponse":"Hi Alice, sorry about that."}"#);
        let recorded = backend.recorder();
        let reply = flows(backend)
            .generate_response(&GenerateResponseRequest {
                thread_text: "Alice: my order".into(),
                customer_name: Some("Alice".into()),
            })
            .await;
        assert_eq!(reply.suggested_response, "Hi Alice, sorry about that.");

        let requests = recorded.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].user.contains("The customer's name is Alice."));
        assert_eq!(requests[0].max_tokens, FlowLimits::default().response_max_tokens);
    }

    #[test]
    fn test_extract_json_without_braces_passthrough() {
        assert_eq!(extract_json("  nothing here "), "nothing here");
    }
}
