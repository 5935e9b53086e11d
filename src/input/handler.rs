use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::state::{Screen, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Open,
    Back,
    Retriage,
    EditDraft,
    StopEditing,
    AcceptSuggestion,
    /// Zero-based index into the quick responses
    QuickResponse(usize),
    ClearDraft,
    Send,
    RefreshReply,
    RefreshSummary,
    RefreshArticles,
    NextLink,
    OpenLink,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
    Char(char),
    Backspace,
}

pub fn handle_input(event: Event, view: &ViewState) -> InputResult {
    match event {
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            handle_key(key_event, view)
        }
        _ => InputResult::Continue,
    }
}

fn handle_key(key: KeyEvent, view: &ViewState) -> InputResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputResult::Quit;
    }

    if view.editing {
        return handle_draft_input(key);
    }

    match view.screen {
        Screen::Inbox => handle_inbox_input(key),
        Screen::Conversation => handle_conversation_input(key),
    }
}

fn handle_draft_input(key: KeyEvent) -> InputResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') => InputResult::Action(Action::Send),
            _ => InputResult::Continue,
        };
    }

    match key.code {
        KeyCode::Esc => InputResult::Action(Action::StopEditing),
        KeyCode::Enter => InputResult::Char('\n'),
        KeyCode::Tab => InputResult::Char('\t'),
        KeyCode::Backspace => InputResult::Backspace,
        KeyCode::Char(c) => InputResult::Char(c),
        _ => InputResult::Continue,
    }
}

fn handle_inbox_input(key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Char('q') => InputResult::Quit,
        KeyCode::Char('j') | KeyCode::Down => InputResult::Action(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => InputResult::Action(Action::Up),
        KeyCode::Enter => InputResult::Action(Action::Open),
        KeyCode::Char('t') => InputResult::Action(Action::Retriage),
        _ => InputResult::Continue,
    }
}

fn handle_conversation_input(key: KeyEvent) -> InputResult {
    let action = match key.code {
        KeyCode::Char('q') => return InputResult::Quit,
        KeyCode::Esc => Action::Back,
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        KeyCode::Char('i') | KeyCode::Enter => Action::EditDraft,
        KeyCode::Char('a') => Action::AcceptSuggestion,
        KeyCode::Char('c') => Action::ClearDraft,
        KeyCode::Char('s') => Action::Send,
        KeyCode::Char('r') => Action::RefreshReply,
        KeyCode::Char('u') => Action::RefreshSummary,
        KeyCode::Char('f') => Action::RefreshArticles,
        KeyCode::Char('t') => Action::Retriage,
        KeyCode::Tab => Action::NextLink,
        KeyCode::Char('o') => Action::OpenLink,
        KeyCode::Char(c @ '1'..='9') => Action::QuickResponse(c as usize - '1' as usize),
        _ => return InputResult::Continue,
    };
    InputResult::Action(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn conversation(editing: bool) -> ViewState {
        ViewState {
            screen: Screen::Conversation,
            editing,
            ..ViewState::default()
        }
    }

    #[test]
    fn test_inbox_keys() {
        let view = ViewState::default();
        assert_eq!(handle_input(key(KeyCode::Char('j')), &view), InputResult::Action(Action::Down));
        assert_eq!(handle_input(key(KeyCode::Enter), &view), InputResult::Action(Action::Open));
        assert_eq!(handle_input(key(KeyCode::Char('q')), &view), InputResult::Quit);
        assert_eq!(handle_input(key(KeyCode::Char('x')), &view), InputResult::Continue);
    }

    #[test]
    fn test_quick_response_digits_are_zero_based() {
        let view = conversation(false);
        assert_eq!(
            handle_input(key(KeyCode::Char('1')), &view),
            InputResult::Action(Action::QuickResponse(0))
        );
        assert_eq!(
            handle_input(key(KeyCode::Char('4')), &view),
            InputResult::Action(Action::QuickResponse(3))
        );
    }

    #[test]
    fn test_editing_captures_letters() {
        let view = conversation(true);
        assert_eq!(handle_input(key(KeyCode::Char('q')), &view), InputResult::Char('q'));
        assert_eq!(handle_input(key(KeyCode::Char('s')), &view), InputResult::Char('s'));
        assert_eq!(handle_input(key(KeyCode::Enter), &view), InputResult::Char('\n'));
        assert_eq!(handle_input(key(KeyCode::Backspace), &view), InputResult::Backspace);
        assert_eq!(
            handle_input(key(KeyCode::Esc), &view),
            InputResult::Action(Action::StopEditing)
        );

        let send = Event::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(handle_input(send, &view), InputResult::Action(Action::Send));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(handle_input(ctrl_c.clone(), &conversation(true)), InputResult::Quit);
        assert_eq!(handle_input(ctrl_c, &ViewState::default()), InputResult::Quit);
    }
}
