//! Terminal rendering

mod conversation;
mod inbox;
pub mod theme;
pub mod widgets;

use ratatui::Frame;

use crate::app::App;
use crate::app::state::Screen;

pub fn render(frame: &mut Frame, app: &App) {
    match app.view().screen {
        Screen::Inbox => inbox::render_inbox(frame, app),
        Screen::Conversation => conversation::render_conversation(frame, app),
    }
}
