//! Built-in reference data: demo customers and inquiries, the knowledge base
//! and canned quick responses.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::types::{
    Channel, Customer, CustomerRef, Inquiry, InquiryStatus, KnowledgeArticle, Message,
    QuickResponse, Sender,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn customer(
    id: &str,
    name: &str,
    email: &str,
    joined: NaiveDate,
    seen: NaiveDate,
    tags: &[&str],
) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar_url: Some("https://placehold.co/80x80.png".to_string()),
        join_date: joined,
        last_contacted: seen,
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn customers() -> Vec<Customer> {
    vec![
        customer(
            "cust_001",
            "Alice Wonderland",
            "alice.w@example.com",
            date(2023, 1, 15),
            date(2024, 7, 20),
            &["premium", "active"],
        ),
        customer(
            "cust_002",
            "Bob The Builder",
            "bob.b@example.com",
            date(2022, 11, 1),
            date(2024, 7, 18),
            &["new", "feedback_provided"],
        ),
        customer(
            "cust_003",
            "Charlie Brown",
            "charlie.b@example.com",
            date(2023, 5, 10),
            date(2024, 6, 25),
            &["churn_risk"],
        ),
    ]
}

/// Demo inquiries with timestamps relative to `now`
pub fn inquiries(now: DateTime<Utc>) -> Vec<Inquiry> {
    let hour = Duration::hours(1);
    let minute = Duration::minutes(1);
    let day = Duration::days(1);
    let known = |id: &str| CustomerRef::Known(id.to_string());

    vec![
        Inquiry::new(
            "inq_001",
            known("cust_001"),
            "Issue with my recent order #12345",
            Channel::Email,
            now - hour,
        )
        .with_messages(vec![
            Message::at(
                Sender::Customer,
                "Hi, I'm having trouble with the tracking for my recent order #12345. The website says it's shipped but the tracking number doesn't work.",
                now - hour - minute * 5,
            ),
            Message::at(
                Sender::Agent,
                "Hello Alice, I'm sorry to hear you're having trouble. Let me check that for you. Can you confirm the tracking number?",
                now - hour,
            ),
        ]),
        Inquiry::new(
            "inq_002",
            known("cust_002"),
            "Billing question - incorrect charge",
            Channel::Chat,
            now - hour * 2,
        )
        .with_messages(vec![Message::at(
            Sender::Customer,
            "I think I was overcharged on my last bill. The amount is $50 but it should be $30.",
            now - hour * 2,
        )]),
        Inquiry::new(
            "inq_003",
            known("cust_003"),
            "Feature request: Dark mode",
            Channel::Email,
            now - day,
        )
        .with_status(InquiryStatus::Pending)
        .with_messages(vec![
            Message::at(
                Sender::Customer,
                "It would be great if your app had a dark mode. My eyes would thank you!",
                now - day,
            ),
            Message::at(
                Sender::Agent,
                "Thanks for the suggestion, Charlie! We'll pass this on to our product team.",
                now - hour * 23,
            ),
        ]),
        Inquiry::new(
            "inq_004",
            known("cust_001"),
            "How to reset password?",
            Channel::Chat,
            now - day * 2,
        )
        .with_status(InquiryStatus::Resolved)
        .with_messages(vec![
            Message::at(
                Sender::Customer,
                "I've forgotten my password and can't seem to find the reset link.",
                now - day * 2,
            ),
            Message::at(
                Sender::Agent,
                "Hi Alice, you can reset your password by visiting example.com/reset-password. Let me know if that works!",
                now - day * 2 + minute * 5,
            ),
            Message::at(
                Sender::Customer,
                "Perfect, that worked! Thanks.",
                now - day * 2 + minute * 10,
            ),
        ]),
    ]
}

fn article(id: &str, title: &str, url: &str, summary: &str) -> KnowledgeArticle {
    KnowledgeArticle {
        id: id.to_string(),
        title: title.to_string(),
        url: url.to_string(),
        summary: Some(summary.to_string()),
    }
}

pub fn knowledge_articles() -> Vec<KnowledgeArticle> {
    vec![
        article(
            "ka_001",
            "How to Track Your Order",
            "https://help.supportpal.ai/articles/track-order",
            "Learn how to find your tracking number and check your order status.",
        ),
        article(
            "ka_002",
            "Understanding Your Bill",
            "https://help.supportpal.ai/articles/understanding-your-bill",
            "A guide to reading your monthly statement and common charges.",
        ),
        article(
            "ka_003",
            "Resetting Your Password",
            "https://help.supportpal.ai/articles/reset-password",
            "Step-by-step instructions for resetting your account password.",
        ),
        article(
            "ka_004",
            "Managing Account Settings",
            "https://help.supportpal.ai/articles/account-settings",
            "Update your profile, notification preferences, and more.",
        ),
    ]
}

/// Shown in the article panel when no model suggestion is available
pub fn generic_help_articles() -> Vec<KnowledgeArticle> {
    vec![
        article(
            "help_faq",
            "Frequently Asked Questions",
            "https://help.supportpal.ai/faq",
            "Answers to the most common customer questions.",
        ),
        article(
            "help_contact",
            "Contacting Support",
            "https://help.supportpal.ai/contact",
            "Ways to reach the support team and expected response times.",
        ),
    ]
}

fn quick(id: &str, title: &str, content: &str) -> QuickResponse {
    QuickResponse {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
    }
}

pub fn quick_responses() -> Vec<QuickResponse> {
    vec![
        quick(
            "qr_001",
            "Greeting & Intro",
            "Hello! Thanks for contacting SupportPal. How can I help you today?",
        ),
        quick(
            "qr_002",
            "Password Reset Info",
            "You can reset your password by visiting [YourApp.com/reset]. Let me know if you need further assistance!",
        ),
        quick(
            "qr_003",
            "Order Tracking Info",
            "To track your order, please visit [YourApp.com/tracking] and enter your order number. It may take up to 24 hours for tracking information to update.",
        ),
        quick(
            "qr_004",
            "Escalation",
            "I understand this is frustrating. Let me escalate this to my supervisor who can better assist you. Please hold on a moment.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_inquiries_reference_known_customers() {
        let customers = customers();
        for inq in inquiries(Utc::now()) {
            let CustomerRef::Known(id) = &inq.customer else {
                panic!("seed inquiry {} should reference a customer", inq.id);
            };
            assert!(customers.iter().any(|c| &c.id == id));
            assert!(!inq.messages().is_empty());
        }
    }

    #[test]
    fn test_seed_messages_are_chronological() {
        for inq in inquiries(Utc::now()) {
            let times: Vec<_> = inq.messages().iter().map(|m| m.timestamp).collect();
            let mut sorted = times.clone();
            sorted.sort();
            assert_eq!(times, sorted, "{} out of order", inq.id);
        }
    }
}
