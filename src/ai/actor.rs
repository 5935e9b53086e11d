//! AI actor for async processing of per-inquiry suggestion requests

use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::flows::{
    AiFlows, ArticleSuggestions, GenerateResponseRequest, SuggestArticlesRequest,
    SuggestedReply, Summary, SummarizeRequest,
};
use crate::constants::{AI_COMMAND_CHANNEL_SIZE, AI_EVENT_CHANNEL_SIZE};
use crate::support::InquiryId;

/// Identifies which conversation session a request belongs to. Results are
/// only applied while the session that issued them is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub inquiry_id: InquiryId,
    pub generation: u64,
}

/// Commands that can be sent to the AI actor
#[derive(Debug)]
pub enum AiCommand {
    SuggestReply {
        ticket: RequestTicket,
        request: GenerateResponseRequest,
        cancel: CancellationToken,
    },
    Summarize {
        ticket: RequestTicket,
        request: SummarizeRequest,
        cancel: CancellationToken,
    },
    SuggestArticles {
        ticket: RequestTicket,
        request: SuggestArticlesRequest,
        cancel: CancellationToken,
    },
    /// Shutdown the actor
    Shutdown,
}

/// Events emitted by the AI actor. Flows are total, so there is no error
/// event: failures arrive as fallback payloads.
#[derive(Debug, Clone)]
pub enum AiEvent {
    ReplySuggested {
        ticket: RequestTicket,
        reply: SuggestedReply,
    },
    Summarized {
        ticket: RequestTicket,
        summary: Summary,
    },
    ArticlesSuggested {
        ticket: RequestTicket,
        articles: ArticleSuggestions,
    },
}

impl AiEvent {
    pub fn ticket(&self) -> &RequestTicket {
        match self {
            Self::ReplySuggested { ticket, .. }
            | Self::Summarized { ticket, .. }
            | Self::ArticlesSuggested { ticket, .. } => ticket,
        }
    }
}

/// Handle for communicating with the AI actor
pub struct AiActorHandle {
    pub cmd_tx: mpsc::Sender<AiCommand>,
    pub event_rx: mpsc::Receiver<AiEvent>,
}

/// Spawn the AI actor task
pub fn spawn_ai_actor(flows: AiFlows) -> AiActorHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(AI_COMMAND_CHANNEL_SIZE);
    let (event_tx, event_rx) = mpsc::channel(AI_EVENT_CHANNEL_SIZE);

    tokio::spawn(ai_actor_loop(flows, cmd_rx, event_tx));

    AiActorHandle { cmd_tx, event_rx }
}

async fn ai_actor_loop(
    flows: AiFlows,
    mut cmd_rx: mpsc::Receiver<AiCommand>,
    event_tx: mpsc::Sender<AiEvent>,
) {
    // Every request runs in its own task so a slow reply draft never delays
    // the summary or article panels.
    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            AiCommand::SuggestReply {
                ticket,
                request,
                cancel,
            } => {
                let flows = flows.clone();
                spawn_job(cancel, event_tx.clone(), async move {
                    let reply = flows.generate_response(&request).await;
                    AiEvent::ReplySuggested { ticket, reply }
                });
            }

            AiCommand::Summarize {
                ticket,
                request,
                cancel,
            } => {
                let flows = flows.clone();
                spawn_job(cancel, event_tx.clone(), async move {
                    let summary = flows.summarize(&request).await;
                    AiEvent::Summarized { ticket, summary }
                });
            }

            AiCommand::SuggestArticles {
                ticket,
                request,
                cancel,
            } => {
                let flows = flows.clone();
                spawn_job(cancel, event_tx.clone(), async move {
                    let articles = flows.suggest_articles(&request).await;
                    AiEvent::ArticlesSuggested { ticket, articles }
                });
            }

            AiCommand::Shutdown => {
                break;
            }
        }
    }
}

fn spawn_job<F>(cancel: CancellationToken, event_tx: mpsc::Sender<AiEvent>, job: F)
where
    F: Future<Output = AiEvent> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("AI actor: request cancelled before completion");
            }
            event = job => {
                if event_tx.send(event).await.is_err() {
                    tracing::warn!("AI actor: event receiver dropped");
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::flows::FlowLimits;
    use crate::ai::testing::ScriptedBackend;
    use std::sync::Arc;
    use std::time::Duration;

    fn ticket(id: &str, generation: u64) -> RequestTicket {
        RequestTicket {
            inquiry_id: id.to_string(),
            generation,
        }
    }

    fn actor(backend: ScriptedBackend) -> AiActorHandle {
        spawn_ai_actor(AiFlows::new(
            Arc::new(backend),
            Duration::from_secs(1),
            FlowLimits::default(),
        ))
    }

    #[tokio::test]
    async fn test_actor_returns_ticketed_summary() {
        let mut handle = actor(ScriptedBackend::new().reply_with(r#"{"summary":"Lost parcel"}"#));
        handle
            .cmd_tx
            .send(AiCommand::Summarize {
                ticket: ticket("inq_1", 3),
                request: SummarizeRequest {
                    inquiry_text: "Customer: where is it".into(),
                },
                cancel: CancellationToken::new(),
            })
            .await
            .unwrap();

        let event = handle.event_rx.recv().await.unwrap();
        assert_eq!(event.ticket(), &ticket("inq_1", 3));
        match event {
            AiEvent::Summarized { summary, .. } => assert_eq!(summary.summary, "Lost parcel"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_request_emits_nothing() {
        let mut handle = actor(ScriptedBackend::new().hang());
        let cancel = CancellationToken::new();
        handle
            .cmd_tx
            .send(AiCommand::SuggestReply {
                ticket: ticket("inq_1", 1),
                request: GenerateResponseRequest {
                    thread_text: "Customer: hi".into(),
                    customer_name: None,
                },
                cancel: cancel.clone(),
            })
            .await
            .unwrap();
        cancel.cancel();
        handle.cmd_tx.send(AiCommand::Shutdown).await.unwrap();

        let next = tokio::time::timeout(Duration::from_millis(100), handle.event_rx.recv()).await;
        // Either nothing arrives in time, or the channel closes without an event
        assert!(matches!(next, Err(_) | Ok(None)));
    }
}
