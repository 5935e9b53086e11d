//! Front-end actions: cursor movement, screen changes and key dispatch

use crate::input::Action;

use super::super::state::Screen;
use super::super::{ActionError, App};

impl App {
    /// Run one front-end action. Rejected actions are reported in the
    /// error bar rather than returned.
    pub async fn handle_action(&mut self, action: Action) {
        let result = match action {
            Action::Up => {
                self.move_cursor(-1);
                Ok(())
            }
            Action::Down => {
                self.move_cursor(1);
                Ok(())
            }
            Action::Open => match self.inquiries.get(self.view.cursor).map(|i| i.id.clone()) {
                Some(id) => self.open_inquiry(&id).await,
                None => Ok(()),
            },
            Action::Back => {
                self.close_inquiry();
                Ok(())
            }
            Action::Retriage => self.retriage_current().await,
            Action::EditDraft => {
                self.view.editing = self.session.is_some();
                Ok(())
            }
            Action::StopEditing => {
                self.view.editing = false;
                Ok(())
            }
            Action::AcceptSuggestion => self.accept_suggestion(),
            Action::QuickResponse(index) => {
                match self.quick_responses.get(index).map(|q| q.id.clone()) {
                    Some(id) => self.apply_quick_response(&id),
                    None => Ok(()),
                }
            }
            Action::ClearDraft => self.set_draft(""),
            Action::Send => self.send().map(|_| ()),
            Action::RefreshReply => self.refresh_reply().await,
            Action::RefreshSummary => self.refresh_summary().await,
            Action::RefreshArticles => {
                self.view.link_cursor = 0;
                self.refresh_articles().await
            }
            Action::NextLink => {
                let count = self.article_panel().map(|p| p.articles.len()).unwrap_or(0);
                if count > 0 {
                    self.view.link_cursor = (self.view.link_cursor + 1) % count;
                }
                Ok(())
            }
            Action::OpenLink => self.open_link(),
            Action::ScrollUp => {
                self.view.scroll = self.view.scroll.saturating_sub(1);
                Ok(())
            }
            Action::ScrollDown => {
                self.view.scroll = self.view.scroll.saturating_add(1);
                Ok(())
            }
        };

        match result {
            Ok(()) if action == Action::Send => {
                self.view.editing = false;
                self.view.status = Some("Reply sent".to_string());
            }
            Ok(()) => {}
            Err(e) => self.view.error = Some(e.to_string()),
        }
    }

    /// Typed character while the draft has focus
    pub fn handle_char(&mut self, c: char) {
        if !self.view.editing {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.draft.push(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if !self.view.editing {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.draft.pop();
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.inquiries.len();
        if len == 0 {
            self.view.cursor = 0;
            return;
        }
        self.view.cursor = self
            .view
            .cursor
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    fn cursor_to(&mut self, id: &str) {
        if let Some(index) = self.inquiries.iter().position(|i| i.id == id) {
            self.view.cursor = index;
        }
    }

    /// Select an inquiry and switch to its conversation
    pub async fn open_inquiry(&mut self, id: &str) -> Result<(), ActionError> {
        self.select(id).await?;
        self.cursor_to(id);
        self.view.screen = Screen::Conversation;
        self.view.editing = false;
        self.view.link_cursor = 0;
        self.view.scroll = 0;
        Ok(())
    }

    pub fn close_inquiry(&mut self) {
        self.deselect();
        self.view.screen = Screen::Inbox;
        self.view.editing = false;
    }

    /// Re-score the open inquiry, or the highlighted row in the inbox. The
    /// cursor follows the inquiry to its new rank.
    async fn retriage_current(&mut self) -> Result<(), ActionError> {
        let id = match (&self.session, self.view.screen) {
            (Some(session), Screen::Conversation) => session.inquiry_id.clone(),
            _ => match self.inquiries.get(self.view.cursor) {
                Some(inquiry) => inquiry.id.clone(),
                None => return Ok(()),
            },
        };

        let priority = self
            .reprioritize(&id)
            .await
            .ok_or_else(|| ActionError::UnknownInquiry(id.clone()))?;
        self.cursor_to(&id);
        self.view.status = Some(format!(
            "Priority {} - {}",
            priority.priority_score, priority.reason
        ));
        Ok(())
    }

    fn open_link(&mut self) -> Result<(), ActionError> {
        let Some(panel) = self.article_panel() else {
            return Ok(());
        };
        let Some(article) = panel.articles.get(self.view.link_cursor) else {
            return Ok(());
        };
        let Some(url) = article.url.as_deref() else {
            return Err(ActionError::NoLink(article.title.clone()));
        };

        if let Err(e) = open::that(url) {
            tracing::warn!("Failed to open {}: {}", url, e);
            self.view.error = Some(format!("Could not open {}", url));
        }
        Ok(())
    }
}
