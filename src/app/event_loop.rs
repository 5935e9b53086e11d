//! Main event loop and AI result processing

use anyhow::Result;
use crossterm::event;
use std::time::Duration;

use crate::ai::AiEvent;
use crate::input::{InputResult, handle_input};

use super::App;
use super::terminal::{TerminalGuard, Tui};

impl App {
    /// Take over the terminal until the operator quits
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalGuard::enter()?;
        let result = self.event_loop(&mut terminal).await;
        drop(terminal);

        self.shutdown().await;
        result
    }

    async fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut dirty = true;

        loop {
            // Process AI events first (non-blocking)
            if self.process_ai_events() {
                dirty = true;
            }

            // Spinners need a redraw while anything is loading
            let busy = self.is_loading();
            if dirty || busy {
                let app: &App = self;
                terminal.draw(|frame| crate::ui::render(frame, app))?;
                dirty = false;
            }

            let poll_timeout = if busy { 50 } else { 150 };
            if event::poll(Duration::from_millis(poll_timeout))? {
                let evt = event::read()?;
                // Any input event (including resize) requires re-render
                dirty = true;
                match handle_input(evt, &self.view) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => {
                        self.view.acknowledge();
                        self.handle_action(action).await;
                    }
                    InputResult::Char(c) => self.handle_char(c),
                    InputResult::Backspace => self.handle_backspace(),
                    InputResult::Continue => {}
                }
            }
        }

        Ok(())
    }

    /// Any AI panel or triage call still outstanding
    pub fn is_loading(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_busy())
            || self.inquiries.iter().any(|i| i.loading_priority)
    }

    /// Drain pending AI events without blocking. Returns true if any event
    /// changed what is shown.
    pub fn process_ai_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.ai.event_rx.try_recv() {
            changed |= self.apply_ai_event(event);
        }
        changed
    }

    /// Store a result if it belongs to the current session and answers the
    /// request its panel is waiting for. Anything else is discarded.
    pub(crate) fn apply_ai_event(&mut self, event: AiEvent) -> bool {
        let ticket = event.ticket().clone();
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("Discarding AI result for {}: nothing selected", ticket.inquiry_id);
            return false;
        };
        if session.inquiry_id != ticket.inquiry_id {
            tracing::warn!(
                "Discarding stale AI result for {} (now viewing {})",
                ticket.inquiry_id,
                session.inquiry_id
            );
            return false;
        }

        let accepted = match event {
            AiEvent::ReplySuggested { reply, .. } => session.reply.accept(ticket.generation, reply),
            AiEvent::Summarized { summary, .. } => session.summary.accept(ticket.generation, summary),
            AiEvent::ArticlesSuggested { articles, .. } => {
                session.articles.accept(ticket.generation, articles)
            }
        };

        if !accepted {
            tracing::warn!(
                "Discarding superseded AI result for {} (generation {})",
                ticket.inquiry_id,
                ticket.generation
            );
        }
        accepted
    }

    /// Wait until every panel of the current session has its result, or
    /// `limit` elapses. Returns false on timeout or if the actor is gone.
    pub async fn wait_for_session(&mut self, limit: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + limit;
        while self.session.as_ref().is_some_and(|s| s.is_busy()) {
            match tokio::time::timeout_at(deadline, self.ai.event_rx.recv()).await {
                Ok(Some(event)) => {
                    self.apply_ai_event(event);
                }
                Ok(None) => {
                    tracing::warn!("AI actor closed its event channel");
                    return false;
                }
                Err(_) => return false,
            }
        }
        true
    }
}
