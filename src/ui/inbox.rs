//! Inbox list: one row per inquiry in ranked order

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use super::theme::Theme;
use super::widgets::{error_bar, format_date, help_bar, sanitize_text, spinner_char, status_bar};
use crate::app::App;
use crate::app::view::InquiryView;

const INBOX_HINTS: &[(&str, &str)] = &[
    ("j/k", "nav"),
    ("Enter", "open"),
    ("t", "re-triage"),
    ("q", "quit"),
];

pub fn render_inbox(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(0),    // Inquiry table
            Constraint::Length(1), // Help bar or error
        ])
        .split(frame.area());

    let views = app.views();
    let triaging = views.iter().filter(|v| v.loading_priority).count();
    let right = match (&app.view().status, triaging) {
        (Some(status), _) => status.clone(),
        (None, 0) => format!("{} inquiries", views.len()),
        (None, n) => format!("{} triaging {}", spinner_char(), n),
    };
    status_bar(frame, chunks[0], "SupportPal | Inbox", &right);

    render_table(frame, chunks[1], &views, app.view().cursor);

    match &app.view().error {
        Some(error) => error_bar(frame, chunks[2], error),
        None => help_bar(frame, chunks[2], INBOX_HINTS),
    }
}

fn priority_cell(view: &InquiryView<'_>) -> Cell<'static> {
    if view.loading_priority {
        Cell::from(Span::styled(format!("{} ...", spinner_char()), Theme::text_muted()))
    } else {
        Cell::from(Span::styled(view.label.as_str(), Theme::priority(view.label)))
    }
}

fn render_table(frame: &mut Frame, area: Rect, views: &[InquiryView<'_>], cursor: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(" Inquiries ");

    if views.is_empty() {
        let empty = Paragraph::new("No inquiries.")
            .style(Theme::text_muted())
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["PRIORITY", "CUSTOMER", "SUBJECT", "CHANNEL", "RECEIVED"])
        .style(Theme::label());

    let rows: Vec<Row> = views
        .iter()
        .map(|view| {
            let subject = Text::from(vec![
                Line::styled(sanitize_text(&view.inquiry.subject), Theme::text()),
                Line::styled(sanitize_text(&view.preview), Theme::text_muted()),
            ]);
            Row::new(vec![
                priority_cell(view),
                Cell::from(sanitize_text(view.customer_name())).style(Theme::text_secondary()),
                Cell::from(subject),
                Cell::from(view.inquiry.channel.as_str()).style(Theme::text_muted()),
                Cell::from(format_date(view.inquiry.timestamp)).style(Theme::text_muted()),
            ])
            .height(2)
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Length(20),
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Theme::selected())
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(cursor.min(views.len() - 1)));
    frame.render_stateful_widget(table, area, &mut state);
}
