//! Conversation view for the selected inquiry

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme::Theme;
use super::widgets::{error_bar, format_date, help_bar, sanitize_text, spinner_char, status_bar};
use crate::app::App;
use crate::app::state::Session;
use crate::app::view::{ArticlePanel, InquiryView};
use crate::support::{Sender, thread::sender_label};

const READING_HINTS: &[(&str, &str)] = &[
    ("Esc", "back"),
    ("i", "write"),
    ("a", "accept"),
    ("1-9", "quick"),
    ("s", "send"),
    ("r/u/f", "refresh"),
    ("Tab/o", "links"),
    ("t", "re-triage"),
    ("q", "quit"),
];

const EDITING_HINTS: &[(&str, &str)] = &[("Esc", "done"), ("Ctrl+S", "send")];

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(format!(" {} ", title))
}

fn loading_line(text: &str) -> Line<'static> {
    Line::styled(format!("{} {}", spinner_char(), text), Theme::text_muted())
}

fn text_lines(text: &str, style: Style) -> Vec<Line<'static>> {
    sanitize_text(text)
        .lines()
        .map(|line| Line::styled(line.to_string(), style))
        .collect()
}

pub fn render_conversation(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Thread and panels
            Constraint::Length(5), // Draft
            Constraint::Length(1), // Help bar or error
        ])
        .split(frame.area());

    let view = app.view();
    let hints = if view.editing { EDITING_HINTS } else { READING_HINTS };
    match &view.error {
        Some(error) => error_bar(frame, chunks[4], error),
        None => help_bar(frame, chunks[4], hints),
    }

    let (Some(inquiry), Some(session)) = (app.selected_view(), app.session()) else {
        status_bar(frame, chunks[0], "SupportPal", "");
        frame.render_widget(
            Paragraph::new("No inquiry selected.").style(Theme::text_muted()),
            chunks[2],
        );
        return;
    };

    let right = match &view.status {
        Some(status) => status.clone(),
        None if session.is_busy() => format!("{} working", spinner_char()),
        None => String::new(),
    };
    status_bar(frame, chunks[0], "SupportPal | Conversation", &right);

    render_header(frame, chunks[1], &inquiry);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    render_thread(frame, body[0], app, &inquiry);
    render_side_panels(frame, body[1], app, session);

    render_draft(frame, chunks[3], &session.draft, view.editing);
}

fn render_header(frame: &mut Frame, area: Rect, view: &InquiryView<'_>) {
    let inquiry = view.inquiry;
    let email = view
        .customer
        .as_ref()
        .map(|c| c.email.as_str())
        .unwrap_or("N/A");

    let mut lines = vec![
        Line::from(vec![
            Span::styled(sanitize_text(&inquiry.subject), Theme::label()),
            Span::styled(format!(" [{}]", inquiry.status.as_str()), Theme::text_muted()),
        ]),
        Line::from(vec![
            Span::styled("From: ", Theme::text_muted()),
            Span::styled(
                format!("{} <{}>", sanitize_text(view.customer_name()), email),
                Theme::text_secondary(),
            ),
            Span::styled(
                format!(
                    " | {} | {} | ",
                    inquiry.channel.as_str(),
                    format_date(inquiry.timestamp)
                ),
                Theme::text_muted(),
            ),
            Span::styled(view.label.as_str(), Theme::priority(view.label)),
        ]),
    ];
    if view.loading_priority {
        lines.push(loading_line("Re-triaging"));
    } else if let Some(priority) = view.priority
        && !priority.reason.is_empty()
    {
        lines.push(Line::styled(
            format!("Triage: {}", sanitize_text(&priority.reason)),
            Theme::text_muted(),
        ));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_thread(frame: &mut Frame, area: Rect, app: &App, view: &InquiryView<'_>) {
    let customer_name = view.customer.as_ref().map(|c| c.name.as_str());
    let messages = view.inquiry.messages();

    let mut lines: Vec<Line> = Vec::new();
    if messages.is_empty() {
        lines.push(Line::styled("No messages yet.", Theme::text_muted()));
    }
    for message in messages {
        let label = match message.sender {
            Sender::Agent => app.agent_name(),
            other => sender_label(other, customer_name),
        };
        let label_style = if message.sender == Sender::Agent {
            Theme::text_accent()
        } else {
            Theme::label()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}:", sanitize_text(label)), label_style),
            Span::styled(format!(" {}", format_date(message.timestamp)), Theme::text_muted()),
        ]));
        lines.extend(text_lines(&message.content, Theme::text()));
        lines.push(Line::raw(""));
    }

    let thread = Paragraph::new(lines)
        .block(panel("Conversation"))
        .wrap(Wrap { trim: false })
        .scroll((app.view().scroll, 0));
    frame.render_widget(thread, area);
}

fn render_side_panels(frame: &mut Frame, area: Rect, app: &App, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ])
        .split(area);

    let empty_thread = app
        .selected_view()
        .is_some_and(|v| v.inquiry.messages().is_empty());
    let summary = if session.summary.is_loading() {
        vec![loading_line("Summarizing...")]
    } else {
        match session.summary.value() {
            Some(summary) => text_lines(&summary.summary, Theme::text_secondary()),
            None if empty_thread => {
                vec![Line::styled("No messages to summarize.", Theme::text_muted())]
            }
            None => vec![Line::styled("Press u to summarize", Theme::text_muted())],
        }
    };
    frame.render_widget(
        Paragraph::new(summary)
            .block(panel("AI Summary"))
            .wrap(Wrap { trim: true }),
        chunks[0],
    );

    let reply = if session.reply.is_loading() {
        vec![loading_line("Generating...")]
    } else {
        match session.reply.value() {
            Some(reply) => text_lines(&reply.suggested_response, Theme::text()),
            None => vec![Line::styled("Press r to suggest a reply", Theme::text_muted())],
        }
    };
    frame.render_widget(
        Paragraph::new(reply)
            .block(panel("Suggested Reply"))
            .wrap(Wrap { trim: false }),
        chunks[1],
    );

    let articles = if session.articles.is_loading() {
        vec![loading_line("Searching...")]
    } else {
        match app.article_panel() {
            Some(panel) => article_lines(&panel, app.view().link_cursor),
            None => vec![Line::styled("Press f to find articles", Theme::text_muted())],
        }
    };
    frame.render_widget(
        Paragraph::new(articles)
            .block(panel("Knowledge Base"))
            .wrap(Wrap { trim: true }),
        chunks[2],
    );

    let quick: Vec<Line> = app
        .quick_responses()
        .iter()
        .take(9)
        .enumerate()
        .map(|(i, q)| {
            Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Theme::help_key()),
                Span::styled(q.title.as_str(), Theme::text_secondary()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(quick).block(panel("Quick Responses")), chunks[3]);
}

fn article_lines(panel: &ArticlePanel, link_cursor: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(error) = &panel.error {
        lines.push(Line::styled(sanitize_text(error), Theme::text_muted()));
    }
    if panel.generic {
        lines.push(Line::styled("General help:", Theme::label()));
    }

    for (i, article) in panel.articles.iter().enumerate() {
        let style = if i == link_cursor {
            Theme::selected()
        } else if article.url.is_some() {
            Theme::text_accent()
        } else {
            Theme::text()
        };
        let mut title = vec![Span::styled(sanitize_text(&article.title), style)];
        if article.url.is_none() {
            title.push(Span::styled(" (no link)", Theme::text_muted()));
        }
        lines.push(Line::from(title));
        if let Some(summary) = &article.summary {
            lines.push(Line::styled(
                format!("  {}", sanitize_text(summary)),
                Theme::text_muted(),
            ));
        }
    }
    lines
}

fn render_draft(frame: &mut Frame, area: Rect, draft: &str, editing: bool) {
    let (title, border) = if editing {
        (" Draft (editing) ", Theme::border_focused())
    } else {
        (" Draft ", Theme::border())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title);

    let content = if draft.is_empty() && !editing {
        vec![Line::styled("Press i to write a reply", Theme::text_muted())]
    } else {
        text_lines(draft, Theme::text())
    };
    frame.render_widget(
        Paragraph::new(content).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
