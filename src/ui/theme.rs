//! Colors and pre-composed styles

use ratatui::style::{Color, Modifier, Style};

use crate::triage::PriorityLabel;

mod colors {
    use ratatui::style::Color;

    pub const FG_PRIMARY: Color = Color::Rgb(220, 223, 228);
    pub const FG_SECONDARY: Color = Color::Rgb(171, 178, 191);
    pub const FG_MUTED: Color = Color::Rgb(110, 118, 129);
    pub const FG_ACCENT: Color = Color::Rgb(97, 175, 239);
    pub const FG_WARNING: Color = Color::Rgb(229, 192, 123);
    pub const BG_SELECTION: Color = Color::Rgb(44, 49, 60);
    pub const BG_STATUS: Color = Color::Rgb(33, 37, 43);
    pub const BG_ERROR: Color = Color::Rgb(120, 30, 40);
    pub const BORDER: Color = Color::Rgb(62, 68, 81);
}

pub struct Theme;

impl Theme {
    pub fn selected() -> Style {
        Style::default()
            .bg(colors::BG_SELECTION)
            .fg(colors::FG_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(colors::FG_PRIMARY)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(colors::FG_SECONDARY)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(colors::FG_MUTED)
    }

    pub fn text_accent() -> Style {
        Style::default().fg(colors::FG_ACCENT)
    }

    pub fn label() -> Style {
        Style::default()
            .fg(colors::FG_SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar() -> Style {
        Style::default().bg(colors::BG_STATUS).fg(colors::FG_PRIMARY)
    }

    pub fn error_bar() -> Style {
        Style::default().bg(colors::BG_ERROR).fg(colors::FG_PRIMARY)
    }

    pub fn help_key() -> Style {
        Style::default().bg(colors::BG_STATUS).fg(colors::FG_WARNING)
    }

    pub fn help_desc() -> Style {
        Style::default().bg(colors::BG_STATUS).fg(colors::FG_MUTED)
    }

    pub fn border() -> Style {
        Style::default().fg(colors::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(colors::FG_ACCENT)
    }

    /// Inbox priority badge
    pub fn priority(label: PriorityLabel) -> Style {
        let fg = match label {
            PriorityLabel::Urgent => Color::Rgb(224, 108, 117),
            PriorityLabel::High => colors::FG_WARNING,
            PriorityLabel::Medium => colors::FG_ACCENT,
            PriorityLabel::Low => colors::FG_SECONDARY,
            PriorityLabel::Unscored => colors::FG_MUTED,
        };
        let style = Style::default().fg(fg);
        if label == PriorityLabel::Urgent {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}
