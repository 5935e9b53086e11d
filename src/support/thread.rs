//! Plain-text rendering of inquiry threads for prompt input

use super::types::{Inquiry, Message, Sender};

/// Label used in front of each message when a thread is flattened to text
pub fn sender_label<'a>(sender: Sender, customer_name: Option<&'a str>) -> &'a str {
    match sender {
        Sender::Customer => customer_name.unwrap_or("Customer"),
        Sender::Agent => "Agent",
        Sender::System => "System",
    }
}

/// Flatten messages to `"<Label>: <content>"` blocks separated by blank lines,
/// oldest first.
pub fn serialize_thread(messages: &[Message], customer_name: Option<&str>) -> String {
    messages
        .iter()
        .map(|m| {
            format!(
                "{}: {}",
                sender_label(m.sender, customer_name),
                m.content.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Text scored by the prioritize prompt: the subject line followed by the thread
pub fn prioritization_text(inquiry: &Inquiry, customer_name: Option<&str>) -> String {
    let thread = serialize_thread(inquiry.messages(), customer_name);
    if thread.is_empty() {
        format!("Subject: {}", inquiry.subject)
    } else {
        format!("Subject: {}\n\n{}", inquiry.subject, thread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::types::{Channel, CustomerRef};
    use chrono::{Duration, Utc};

    fn sample_messages() -> Vec<Message> {
        let t0 = Utc::now() - Duration::minutes(10);
        vec![
            Message::at(Sender::Customer, "Where is my parcel?", t0),
            Message::at(Sender::Agent, "Checking now.", t0 + Duration::minutes(1)),
            Message::at(Sender::System, "Ticket escalated", t0 + Duration::minutes(2)),
        ]
    }

    #[test]
    fn test_serialize_thread_labels_and_separators() {
        let text = serialize_thread(&sample_messages(), Some("Alice"));
        assert_eq!(
            text,
            "Alice: Where is my parcel?\n\nAgent: Checking now.\n\nSystem: Ticket escalated"
        );
    }

    #[test]
    fn test_serialize_thread_without_customer_name() {
        let text = serialize_thread(&sample_messages()[..1], None);
        assert_eq!(text, "Customer: Where is my parcel?");
    }

    #[test]
    fn test_prioritization_text_includes_subject() {
        let inq = Inquiry::new(
            "inq_1",
            CustomerRef::Known("c".into()),
            "Lost parcel",
            Channel::Email,
            Utc::now(),
        )
        .with_messages(sample_messages());
        let text = prioritization_text(&inq, None);
        assert!(text.starts_with("Subject: Lost parcel\n\nCustomer: Where is my parcel?"));
    }

    #[test]
    fn test_prioritization_text_empty_thread() {
        let inq = Inquiry::new(
            "inq_2",
            CustomerRef::Known("c".into()),
            "Hello",
            Channel::Chat,
            Utc::now(),
        );
        assert_eq!(prioritization_text(&inq, None), "Subject: Hello");
    }
}
