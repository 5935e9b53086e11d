//! Common UI widgets and utilities

use chrono::{DateTime, Datelike, Local, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use super::theme::Theme;

const SPINNER_FRAME_MS: u128 = 80;

pub fn error_bar(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(format!(" Error: {} ", message)).style(Theme::error_bar());
    frame.render_widget(paragraph, area);
}

/// One-line bar with a title on the left and status text on the right
pub fn status_bar(frame: &mut Frame, area: Rect, left: &str, right: &str) {
    let right_width = (right.width() as u16 + 1).min(area.width);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_width)])
        .split(area);

    frame.render_widget(
        Paragraph::new(format!(" {}", left)).style(Theme::status_bar()),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(format!("{} ", right)).style(Theme::status_bar()),
        chunks[1],
    );
}

pub fn help_bar(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let available_width = area.width as usize;

    // Format: " key desc │" (separator between hints)
    let mut total_width = 0;
    let mut hints_to_show = 0;
    for (i, (key, desc)) in hints.iter().enumerate() {
        let separator = if i + 1 < hints.len() { 3 } else { 1 };
        let width = key.width() + 2 + desc.width() + separator;
        if total_width + width > available_width {
            break;
        }
        total_width += width;
        hints_to_show += 1;
    }
    // Show at least one hint if possible
    let hints_to_show = hints_to_show.max(1).min(hints.len());

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().take(hints_to_show).enumerate() {
        spans.push(Span::styled(format!(" {} ", key), Theme::help_key()));
        spans.push(Span::styled(desc.to_string(), Theme::help_desc()));
        if i + 1 < hints_to_show {
            spans.push(Span::styled(" │ ", Theme::help_desc()));
        }
    }
    spans.push(Span::styled(" ", Theme::help_desc()));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Theme::status_bar()),
        area,
    );
}

/// Animated spinner character for loading states
pub fn spinner_char() -> char {
    let spinner = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let idx = (millis / SPINNER_FRAME_MS) as usize % spinner.chars().count();

    spinner.chars().nth(idx).unwrap_or('*')
}

pub fn format_date(dt: DateTime<Utc>) -> String {
    let dt = dt.with_timezone(&Local);
    let today = Local::now().date_naive();
    let date = dt.date_naive();

    if date == today {
        dt.format("%H:%M").to_string()
    } else if (today - date).num_days() < 7 {
        dt.format("%a %H:%M").to_string()
    } else if date.year() == today.year() {
        dt.format("%b %d").to_string()
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// Sanitize text for display: remove control characters and ANSI escape sequences
pub fn sanitize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Skip until the letter that ends the sequence
            while let Some(&ch) = chars.peek() {
                chars.next();
                if ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        if c == '\t' {
            result.push_str("    ");
        } else if c.is_control() && c != '\n' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}
