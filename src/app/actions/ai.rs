//! AI assistance requests for the selected inquiry

use crate::ai::{
    AiCommand, AiError, ArticleSuggestions, Fallback, GenerateResponseRequest, RequestTicket,
    SuggestArticlesRequest, SuggestedReply, Summary, SummarizeRequest,
};
use crate::support::serialize_thread;

use super::super::{ActionError, App};

/// The three AI-backed panels of the conversation view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Reply,
    Summary,
    Articles,
}

impl PanelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reply => "reply",
            Self::Summary => "summary",
            Self::Articles => "articles",
        }
    }
}

impl App {
    /// Issue a fresh request for one panel of the current session. Any
    /// earlier request for the same panel becomes stale.
    pub(crate) async fn request_panel(&mut self, kind: PanelKind) -> Result<(), ActionError> {
        let Some(session) = self.session.as_ref() else {
            return Err(ActionError::NoSelection);
        };
        let inquiry_id = session.inquiry_id.clone();
        let cancel = session.cancel.clone();

        // Extract needed data first to avoid borrow conflicts
        let (thread_text, customer_name) = {
            let inquiry = self
                .inquiry(&inquiry_id)
                .ok_or_else(|| ActionError::UnknownInquiry(inquiry_id.clone()))?;
            if kind == PanelKind::Summary && inquiry.messages().is_empty() {
                return Err(ActionError::EmptyThread);
            }
            let name = self.customers.display_name(inquiry);
            (serialize_thread(inquiry.messages(), name.as_deref()), name)
        };

        let generation = self.next_generation();
        let ticket = RequestTicket {
            inquiry_id,
            generation,
        };

        let cmd = match kind {
            PanelKind::Reply => AiCommand::SuggestReply {
                ticket,
                request: GenerateResponseRequest {
                    thread_text,
                    customer_name,
                },
                cancel,
            },
            PanelKind::Summary => AiCommand::Summarize {
                ticket,
                request: SummarizeRequest {
                    inquiry_text: thread_text,
                },
                cancel,
            },
            PanelKind::Articles => AiCommand::SuggestArticles {
                ticket,
                request: SuggestArticlesRequest {
                    inquiry_text: thread_text,
                },
                cancel,
            },
        };

        let Some(session) = self.session.as_mut() else {
            return Err(ActionError::NoSelection);
        };
        match kind {
            PanelKind::Reply => session.reply.start(generation),
            PanelKind::Summary => session.summary.start(generation),
            PanelKind::Articles => session.articles.start(generation),
        }

        tracing::debug!(
            "Requesting {} for {} (generation {})",
            kind.as_str(),
            session.inquiry_id,
            generation
        );

        if self.ai.cmd_tx.send(cmd).await.is_err() {
            tracing::warn!("AI actor is gone; showing {} fallback", kind.as_str());
            self.settle_without_actor(kind, generation);
        }
        Ok(())
    }

    /// Resolve a panel locally when its request never reached the actor
    fn settle_without_actor(&mut self, kind: PanelKind, generation: u64) {
        let err = AiError::Transport("AI worker stopped".to_string());
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match kind {
            PanelKind::Reply => {
                session.reply.accept(generation, SuggestedReply::fallback(&err));
            }
            PanelKind::Summary => {
                session.summary.accept(generation, Summary::fallback(&err));
            }
            PanelKind::Articles => {
                session
                    .articles
                    .accept(generation, ArticleSuggestions::fallback(&err));
            }
        }
    }

    pub async fn refresh_reply(&mut self) -> Result<(), ActionError> {
        self.request_panel(PanelKind::Reply).await
    }

    pub async fn refresh_summary(&mut self) -> Result<(), ActionError> {
        self.request_panel(PanelKind::Summary).await
    }

    pub async fn refresh_articles(&mut self) -> Result<(), ActionError> {
        self.request_panel(PanelKind::Articles).await
    }
}
