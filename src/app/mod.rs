//! Application core - owns the inquiry working set and the conversation session

mod actions;
mod event_loop;
pub mod state;
mod terminal;
#[cfg(test)]
pub(crate) mod testing;
pub mod view;

use chrono::{DateTime, Utc};

use crate::ai::{AiActorHandle, AiCommand, AiFlows, spawn_ai_actor};
use crate::config::InboxConfig;
use crate::support::{CustomerDirectory, Inquiry, KnowledgeArticle, QuickResponse, seed};
use crate::triage::PriorityLabel;
use state::{Session, SessionPhase, ViewState};
use view::{ArticlePanel, InquiryView, resolve_articles};

pub use actions::PanelKind;

/// Rejected operator actions. Nothing is changed when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("no inquiry with id {0}")]
    UnknownInquiry(String),
    #[error("no inquiry is selected")]
    NoSelection,
    #[error("cannot send an empty reply")]
    EmptyDraft,
    #[error("no suggested reply is available yet")]
    NoSuggestion,
    #[error("no quick response with id {0}")]
    UnknownQuickResponse(String),
    #[error("the conversation has no messages to work from")]
    EmptyThread,
    #[error("\"{0}\" has no knowledge base link")]
    NoLink(String),
}

/// Reference data and the initial inquiry set
pub struct SupportData {
    pub inquiries: Vec<Inquiry>,
    pub customers: CustomerDirectory,
    pub knowledge_base: Vec<KnowledgeArticle>,
    pub generic_help: Vec<KnowledgeArticle>,
    pub quick_responses: Vec<QuickResponse>,
}

impl SupportData {
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            inquiries: seed::inquiries(now),
            customers: CustomerDirectory::new(seed::customers()),
            knowledge_base: seed::knowledge_articles(),
            generic_help: seed::generic_help_articles(),
            quick_responses: seed::quick_responses(),
        }
    }
}

pub struct App {
    pub(crate) inbox: InboxConfig,
    pub(crate) inquiries: Vec<Inquiry>,
    pub(crate) customers: CustomerDirectory,
    pub(crate) knowledge_base: Vec<KnowledgeArticle>,
    pub(crate) generic_help: Vec<KnowledgeArticle>,
    pub(crate) quick_responses: Vec<QuickResponse>,
    /// Used directly for triage; conversation requests go through the actor
    pub(crate) flows: AiFlows,
    pub(crate) ai: AiActorHandle,
    /// The selected inquiry, if any
    pub(crate) session: Option<Session>,
    /// Source of request generations; never reused
    pub(crate) generation: u64,
    pub(crate) view: ViewState,
}

impl App {
    /// Must be called inside a tokio runtime (spawns the AI actor)
    pub fn new(inbox: InboxConfig, flows: AiFlows, data: SupportData) -> Self {
        let ai = spawn_ai_actor(flows.clone());
        Self {
            inbox,
            inquiries: data.inquiries,
            customers: data.customers,
            knowledge_base: data.knowledge_base,
            generic_help: data.generic_help,
            quick_responses: data.quick_responses,
            flows,
            ai,
            session: None,
            generation: 0,
            view: ViewState::default(),
        }
    }

    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn inquiries(&self) -> &[Inquiry] {
        &self.inquiries
    }

    pub fn inquiry(&self, id: &str) -> Option<&Inquiry> {
        self.inquiries.iter().find(|i| i.id == id)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Label for agent messages in the conversation view
    pub fn agent_name(&self) -> &str {
        &self.inbox.agent_name
    }

    pub fn quick_responses(&self) -> &[QuickResponse] {
        &self.quick_responses
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        self.session
            .as_ref()
            .map(Session::phase)
            .unwrap_or(SessionPhase::Idle)
    }

    fn view_of<'a>(&'a self, inquiry: &'a Inquiry) -> InquiryView<'a> {
        let draft = self
            .session
            .as_ref()
            .filter(|s| s.inquiry_id == inquiry.id)
            .map(|s| s.draft.as_str());

        InquiryView {
            inquiry,
            customer: self.customers.resolve(inquiry),
            priority: inquiry.priority.as_ref(),
            loading_priority: inquiry.loading_priority,
            label: PriorityLabel::from_score(inquiry.priority_score()),
            preview: inquiry.preview(self.inbox.preview_length),
            draft,
        }
    }

    /// Inbox rows in ranked order
    pub fn views(&self) -> Vec<InquiryView<'_>> {
        self.inquiries.iter().map(|i| self.view_of(i)).collect()
    }

    pub fn selected_view(&self) -> Option<InquiryView<'_>> {
        let session = self.session.as_ref()?;
        self.inquiry(&session.inquiry_id).map(|i| self.view_of(i))
    }

    /// Knowledge base links for the selected inquiry, once suggestions
    /// have arrived
    pub fn article_panel(&self) -> Option<ArticlePanel> {
        let suggestions = self.session.as_ref()?.articles.value()?;
        Some(resolve_articles(
            suggestions,
            &self.knowledge_base,
            &self.generic_help,
        ))
    }

    pub async fn shutdown(&mut self) {
        self.session = None;
        let _ = self.ai.cmd_tx.send(AiCommand::Shutdown).await;
    }
}
