//! Selection, draft editing and sending

use crate::support::{Message, Sender};

use super::super::state::Session;
use super::super::{ActionError, App};
use super::PanelKind;

impl App {
    /// Open an inquiry. The previous session is dropped, which cancels its
    /// in-flight requests, and everything shown starts blank.
    pub async fn select(&mut self, id: &str) -> Result<(), ActionError> {
        let inquiry = self
            .inquiry(id)
            .ok_or_else(|| ActionError::UnknownInquiry(id.to_string()))?;
        let has_messages = !inquiry.messages().is_empty();

        if let Some(previous) = self.session.take() {
            tracing::debug!("Leaving {}", previous.inquiry_id);
        }
        self.session = Some(Session::new(id.to_string()));

        self.request_panel(PanelKind::Reply).await?;
        if has_messages {
            self.request_panel(PanelKind::Summary).await?;
        }
        self.request_panel(PanelKind::Articles).await?;
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.session = None;
    }

    fn session_mut(&mut self) -> Result<&mut Session, ActionError> {
        self.session.as_mut().ok_or(ActionError::NoSelection)
    }

    /// Replace the draft with whatever the operator typed
    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), ActionError> {
        self.session_mut()?.draft = text.into();
        Ok(())
    }

    /// Copy the suggested reply into the draft verbatim
    pub fn accept_suggestion(&mut self) -> Result<(), ActionError> {
        let session = self.session_mut()?;
        let text = session
            .reply
            .value()
            .map(|r| r.suggested_response.clone())
            .ok_or(ActionError::NoSuggestion)?;
        session.draft = text;
        Ok(())
    }

    /// Canned responses replace the draft rather than append to it
    pub fn apply_quick_response(&mut self, id: &str) -> Result<(), ActionError> {
        let content = self
            .quick_responses
            .iter()
            .find(|q| q.id == id)
            .map(|q| q.content.clone())
            .ok_or_else(|| ActionError::UnknownQuickResponse(id.to_string()))?;
        self.session_mut()?.draft = content;
        Ok(())
    }

    /// Append the draft to the thread as an agent message and clear it
    pub fn send(&mut self) -> Result<&Message, ActionError> {
        let avatar = self.inbox.agent_avatar.clone();
        let session = self.session.as_mut().ok_or(ActionError::NoSelection)?;
        let content = session.draft.trim();
        if content.is_empty() {
            return Err(ActionError::EmptyDraft);
        }
        let message = Message::new(Sender::Agent, content).with_avatar(avatar);

        let inquiry_id = session.inquiry_id.clone();
        let inquiry = self
            .inquiries
            .iter_mut()
            .find(|i| i.id == inquiry_id)
            .ok_or_else(|| ActionError::UnknownInquiry(inquiry_id.clone()))?;

        inquiry.push_message(message);
        if let Some(session) = self.session.as_mut() {
            session.draft.clear();
        }
        tracing::info!("Sent reply on {}", inquiry_id);

        self.inquiry(&inquiry_id)
            .and_then(|i| i.messages().last())
            .ok_or(ActionError::UnknownInquiry(inquiry_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::ai::testing::{Script, ScriptedBackend};
    use crate::ai::GENERATE_RESPONSE_SYSTEM;
    use crate::app::state::SessionPhase;
    use crate::app::testing::{app_with, backend_with_defaults, quick_wait};
    use crate::app::ActionError;
    use crate::support::Sender;

    #[tokio::test]
    async fn test_phase_transitions() {
        let mut app = app_with(backend_with_defaults(ScriptedBackend::new()));
        assert_eq!(app.phase(), SessionPhase::Idle);

        app.select("inq_a").await.unwrap();
        assert_eq!(app.phase(), SessionPhase::Loading);

        assert!(app.wait_for_session(quick_wait()).await);
        assert_eq!(app.phase(), SessionPhase::Ready);

        app.deselect();
        assert_eq!(app.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_select_unknown_inquiry() {
        let mut app = app_with(backend_with_defaults(ScriptedBackend::new()));
        assert_eq!(
            app.select("nope").await,
            Err(ActionError::UnknownInquiry("nope".into()))
        );
        assert_eq!(app.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_send_appends_one_agent_message_and_clears_draft() {
        let mut app = app_with(backend_with_defaults(ScriptedBackend::new()));
        app.select("inq_a").await.unwrap();
        let before = app.inquiry("inq_a").unwrap().messages().len();

        app.set_draft("  Thanks, looking into it now.  ").unwrap();
        let sent = app.send().unwrap().clone();
        assert_eq!(sent.sender, Sender::Agent);
        assert_eq!(sent.content, "Thanks, looking into it now.");

        let messages = app.inquiry("inq_a").unwrap().messages();
        assert_eq!(messages.len(), before + 1);
        assert_eq!(messages.last().unwrap().id, sent.id);
        assert_eq!(app.session().unwrap().draft, "");
    }

    #[tokio::test]
    async fn test_send_rejects_blank_draft() {
        let mut app = app_with(backend_with_defaults(ScriptedBackend::new()));
        app.select("inq_a").await.unwrap();
        let before = app.inquiry("inq_a").unwrap().messages().len();

        app.set_draft("   \n").unwrap();
        assert_eq!(app.send().map(|_| ()), Err(ActionError::EmptyDraft));
        assert_eq!(app.inquiry("inq_a").unwrap().messages().len(), before);
    }

    #[tokio::test]
    async fn test_quick_response_replaces_draft() {
        let mut app = app_with(backend_with_defaults(ScriptedBackend::new()));
        app.select("inq_a").await.unwrap();
        app.set_draft("something else").unwrap();

        app.apply_quick_response("qr_001").unwrap();
        let expected = app.quick_responses()[0].content.clone();
        assert_eq!(app.session().unwrap().draft, expected);

        assert_eq!(
            app.apply_quick_response("qr_999"),
            Err(ActionError::UnknownQuickResponse("qr_999".into()))
        );
        assert_eq!(app.session().unwrap().draft, expected);
    }

    #[tokio::test]
    async fn test_accept_suggestion_copies_reply() {
        let backend = backend_with_defaults(ScriptedBackend::new().on_flow(
            GENERATE_RESPONSE_SYSTEM,
            Script::reply(r#"{"suggestedResponse":"We are on it."}"#),
        ));
        let mut app = app_with(backend);
        app.select("inq_a").await.unwrap();
        assert_eq!(app.accept_suggestion(), Err(ActionError::NoSuggestion));

        assert!(app.wait_for_session(quick_wait()).await);
        app.accept_suggestion().unwrap();
        assert_eq!(app.session().unwrap().draft, "We are on it.");
        assert_eq!(app.selected_view().unwrap().draft, Some("We are on it."));
    }

    #[tokio::test]
    async fn test_switching_clears_draft() {
        let mut app = app_with(backend_with_defaults(ScriptedBackend::new()));
        app.select("inq_a").await.unwrap();
        app.set_draft("for a").unwrap();

        app.select("inq_b").await.unwrap();
        let session = app.session().unwrap();
        assert_eq!(session.inquiry_id, "inq_b");
        assert_eq!(session.draft, "");
        assert!(session.reply.value().is_none());
    }

    #[tokio::test]
    async fn test_empty_thread_skips_summary() {
        let mut app = app_with(backend_with_defaults(ScriptedBackend::new()));
        app.select("inq_empty").await.unwrap();
        assert!(!app.session().unwrap().summary.is_loading());
        assert_eq!(app.refresh_summary().await, Err(ActionError::EmptyThread));
        assert!(app.wait_for_session(quick_wait()).await);
        assert!(app.session().unwrap().summary.value().is_none());
    }
}
