//! Shared fixtures for orchestrator tests

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use ratatui::{Terminal, backend::TestBackend};

use super::{App, SupportData};
use crate::ai::testing::{Script, ScriptedBackend};
use crate::ai::{
    AiFlows, FlowLimits, GENERATE_RESPONSE_SYSTEM, PRIORITIZE_SYSTEM, SUGGEST_ARTICLES_SYSTEM,
    SUMMARIZE_SYSTEM,
};
use crate::config::InboxConfig;
use crate::support::{Channel, CustomerDirectory, CustomerRef, Inquiry, Message, Sender, seed};

pub fn quick_wait() -> Duration {
    Duration::from_secs(2)
}

/// Append catch-all answers for every flow. Rules added before this call
/// take precedence.
pub fn backend_with_defaults(backend: ScriptedBackend) -> ScriptedBackend {
    backend
        .on_flow(
            GENERATE_RESPONSE_SYSTEM,
            Script::reply(r#"{"suggestedResponse":"Default reply"}"#),
        )
        .on_flow(SUMMARIZE_SYSTEM, Script::reply(r#"{"summary":"Default summary"}"#))
        .on_flow(
            SUGGEST_ARTICLES_SYSTEM,
            Script::reply(r#"{"suggestedArticles":["How to Track Your Order"]}"#),
        )
        .on_flow(
            PRIORITIZE_SYSTEM,
            Script::reply(
                r#"{"sentiment":"neutral","urgency":"medium","priorityScore":5,"reason":"Default"}"#,
            ),
        )
}

fn inquiry(id: &str, subject: &str, minutes: i64, body: Option<&str>) -> Inquiry {
    let at = Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap() + chrono::Duration::minutes(minutes);
    let messages = body
        .map(|b| vec![Message::at(Sender::Customer, b, at)])
        .unwrap_or_default();
    Inquiry::new(
        id,
        CustomerRef::Known("cust_001".into()),
        subject,
        Channel::Email,
        at,
    )
    .with_messages(messages)
}

pub fn app_with(backend: ScriptedBackend) -> App {
    app_with_config(backend, InboxConfig::default())
}

pub fn app_with_config(backend: ScriptedBackend, inbox: InboxConfig) -> App {
    let flows = AiFlows::new(
        Arc::new(backend),
        Duration::from_millis(500),
        FlowLimits::default(),
    );
    let data = SupportData {
        inquiries: vec![
            inquiry("inq_a", "First", 0, Some("MARKER-A my parcel never arrived")),
            inquiry("inq_b", "Second", 10, Some("MARKER-B I was charged twice")),
            inquiry("inq_empty", "Empty", 20, None),
        ],
        customers: CustomerDirectory::new(seed::customers()),
        knowledge_base: seed::knowledge_articles(),
        generic_help: seed::generic_help_articles(),
        quick_responses: seed::quick_responses(),
    };
    App::new(inbox, flows, data)
}

/// Draw one frame and return the screen as text, one line per row
pub fn render_to_string(app: &App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| crate::ui::render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..height {
        for x in 0..width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}
