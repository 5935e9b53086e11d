//! Conversation session state for the selected inquiry

use tokio_util::sync::CancellationToken;

use crate::ai::{ArticleSuggestions, SuggestedReply, Summary};
use crate::support::InquiryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No inquiry selected
    Idle,
    /// Reply suggestion in flight
    Loading,
    /// Suggestion (or its fallback) available
    Ready,
}

/// Which screen the terminal front end shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Inbox,
    Conversation,
}

/// Front-end state: cursors, focus and transient messages
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub screen: Screen,
    /// Highlighted inbox row
    pub cursor: usize,
    /// Keystrokes go to the draft
    pub editing: bool,
    /// Highlighted knowledge base entry
    pub link_cursor: usize,
    /// Conversation scroll offset in lines
    pub scroll: u16,
    pub status: Option<String>,
    pub error: Option<String>,
}

impl ViewState {
    /// Clear transient messages once the operator does something new
    pub fn acknowledge(&mut self) {
        self.status = None;
        self.error = None;
    }
}

/// One AI-backed panel. `pending` holds the generation of the request the
/// panel is waiting for; any other result is stale.
#[derive(Debug, Clone)]
pub struct Panel<T> {
    value: Option<T>,
    pending: Option<u64>,
}

impl<T> Default for Panel<T> {
    fn default() -> Self {
        Self {
            value: None,
            pending: None,
        }
    }
}

impl<T> Panel<T> {
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> Option<u64> {
        self.pending
    }

    pub(crate) fn start(&mut self, generation: u64) {
        self.value = None;
        self.pending = Some(generation);
    }

    /// Store a result if it answers the outstanding request
    pub(crate) fn accept(&mut self, generation: u64, value: T) -> bool {
        if self.pending != Some(generation) {
            return false;
        }
        self.value = Some(value);
        self.pending = None;
        true
    }
}

/// Everything tied to the selected inquiry. Dropped wholesale on switch, so
/// nothing leaks from one inquiry to the next.
#[derive(Debug)]
pub struct Session {
    pub inquiry_id: InquiryId,
    pub(crate) cancel: CancellationToken,
    pub draft: String,
    pub reply: Panel<SuggestedReply>,
    pub summary: Panel<Summary>,
    pub articles: Panel<ArticleSuggestions>,
}

impl Session {
    pub(crate) fn new(inquiry_id: InquiryId) -> Self {
        Self {
            inquiry_id,
            cancel: CancellationToken::new(),
            draft: String::new(),
            reply: Panel::default(),
            summary: Panel::default(),
            articles: Panel::default(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.reply.is_loading() {
            SessionPhase::Loading
        } else {
            SessionPhase::Ready
        }
    }

    /// Any panel still waiting for a result
    pub fn is_busy(&self) -> bool {
        self.reply.is_loading() || self.summary.is_loading() || self.articles.is_loading()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
