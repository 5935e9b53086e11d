//! Product query submissions: form validation and conversion into inquiries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{QUERY_MESSAGE_MAX_CHARS, QUERY_MESSAGE_MIN_CHARS, QUERY_NAME_MIN_CHARS};
use crate::support::{Channel, CustomerRef, Inquiry, Message, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryTopic {
    Billing,
    TechnicalSupport,
    ProductFeedback,
    AccountAccess,
    Other,
}

impl QueryTopic {
    pub const ALL: [QueryTopic; 5] = [
        Self::Billing,
        Self::TechnicalSupport,
        Self::ProductFeedback,
        Self::AccountAccess,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Billing => "billing",
            Self::TechnicalSupport => "technical_support",
            Self::ProductFeedback => "product_feedback",
            Self::AccountAccess => "account_access",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Billing => "Billing Issue",
            Self::TechnicalSupport => "Technical Support",
            Self::ProductFeedback => "Product Feedback",
            Self::AccountAccess => "Account Access",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s) || t.label().eq_ignore_ascii_case(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Not time sensitive",
            Self::Medium => "Affecting my work",
            Self::High => "Urgent, blocking issue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(s))
    }
}

/// A submitted query as persisted in the pending queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub submitter_name: String,
    pub submitter_email: String,
    pub query_topic: QueryTopic,
    pub urgency_level: UrgencyLevel,
    pub message: String,
}

impl ProductQuery {
    /// Synthetic inquiry with an anonymous customer and the message as its
    /// only customer message
    pub fn into_inquiry(self) -> Inquiry {
        let subject = format!("Product Query: {}", self.query_topic.label());
        let message = Message::at(Sender::Customer, self.message, self.timestamp);

        Inquiry::new(
            self.id,
            CustomerRef::Anonymous {
                name: self.submitter_name,
                email: self.submitter_email,
            },
            subject,
            Channel::ProductQuery,
            self.timestamp,
        )
        .with_messages(vec![message])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    QueryTopic,
    UrgencyLevel,
    Message,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::QueryTopic => "queryTopic",
            Self::UrgencyLevel => "urgencyLevel",
            Self::Message => "message",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Field-level problems found before anything is queued
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid product query: {}", summarize(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field.as_str(), e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn for_field(&self, field: Field) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }
}

/// Raw form input, as typed
#[derive(Debug, Clone, Default)]
pub struct QueryForm {
    pub name: String,
    pub email: String,
    pub query_topic: String,
    pub urgency_level: String,
    pub message: String,
}

impl QueryForm {
    pub fn validate(&self) -> Result<ProductQuery, ValidationErrors> {
        self.validate_at(Utc::now())
    }

    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<ProductQuery, ValidationErrors> {
        let mut errors = Vec::new();
        let mut fail = |field, message| errors.push(FieldError { field, message });

        let name = self.name.trim();
        if name.chars().count() < QUERY_NAME_MIN_CHARS {
            fail(Field::Name, "Name must be at least 2 characters.");
        }

        let email = self.email.trim();
        if !is_valid_email(email) {
            fail(Field::Email, "Please enter a valid email address.");
        }

        let topic = QueryTopic::parse(&self.query_topic);
        if topic.is_none() {
            fail(Field::QueryTopic, "Please select a query topic.");
        }

        let urgency = UrgencyLevel::parse(&self.urgency_level);
        if urgency.is_none() {
            fail(Field::UrgencyLevel, "Please select an urgency level.");
        }

        let message = self.message.trim();
        let len = message.chars().count();
        if len < QUERY_MESSAGE_MIN_CHARS {
            fail(Field::Message, "Message must be at least 10 characters.");
        } else if len > QUERY_MESSAGE_MAX_CHARS {
            fail(Field::Message, "Message must be at most 5000 characters.");
        }

        match (topic, urgency) {
            (Some(query_topic), Some(urgency_level)) if errors.is_empty() => Ok(ProductQuery {
                id: format!("prod_inq_{}", uuid::Uuid::new_v4().simple()),
                timestamp: now,
                submitter_name: name.to_string(),
                submitter_email: email.to_string(),
                query_topic,
                urgency_level,
                message: message.to_string(),
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.')
}

impl fmt::Display for QueryTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> QueryForm {
        QueryForm {
            name: "Jane Doe".into(),
            email: "jane.doe@example.com".into(),
            query_topic: "billing".into(),
            urgency_level: "High".into(),
            message: "I was charged twice this month.".into(),
        }
    }

    #[test]
    fn test_valid_form_produces_query() {
        let query = valid_form().validate().unwrap();
        assert!(query.id.starts_with("prod_inq_"));
        assert_eq!(query.query_topic, QueryTopic::Billing);
        assert_eq!(query.urgency_level, UrgencyLevel::High);
        assert_eq!(query.submitter_name, "Jane Doe");
    }

    #[test]
    fn test_each_field_reports_its_own_message() {
        let form = QueryForm {
            name: "J".into(),
            email: "not-an-email".into(),
            query_topic: "".into(),
            urgency_level: "whenever".into(),
            message: "short".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.0.len(), 5);
        assert_eq!(
            errors.for_field(Field::Name),
            Some("Name must be at least 2 characters.")
        );
        assert_eq!(
            errors.for_field(Field::Email),
            Some("Please enter a valid email address.")
        );
        assert_eq!(
            errors.for_field(Field::QueryTopic),
            Some("Please select a query topic.")
        );
        assert_eq!(
            errors.for_field(Field::UrgencyLevel),
            Some("Please select an urgency level.")
        );
        assert!(errors.for_field(Field::Message).is_some());
        assert!(errors.to_string().contains("email:"));
    }

    #[test]
    fn test_message_length_bounds() {
        let mut form = valid_form();
        form.message = "x".repeat(QUERY_MESSAGE_MAX_CHARS);
        assert!(form.validate().is_ok());
        form.message.push('x');
        assert!(form.validate().is_err());
        form.message = "x".repeat(QUERY_MESSAGE_MIN_CHARS);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("a@.com"));
    }

    #[test]
    fn test_topic_accepts_value_or_label() {
        assert_eq!(QueryTopic::parse("technical_support"), Some(QueryTopic::TechnicalSupport));
        assert_eq!(QueryTopic::parse("Account Access"), Some(QueryTopic::AccountAccess));
        assert_eq!(QueryTopic::parse("shipping"), None);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let query = valid_form().validate().unwrap();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["submitterEmail"], "jane.doe@example.com");
        assert_eq!(json["queryTopic"], "billing");
        assert_eq!(json["urgencyLevel"], "High");
    }

    #[test]
    fn test_into_inquiry() {
        let query = valid_form().validate().unwrap();
        let id = query.id.clone();
        let inquiry = query.into_inquiry();

        assert_eq!(inquiry.id, id);
        assert_eq!(inquiry.channel, Channel::ProductQuery);
        assert_eq!(inquiry.subject, "Product Query: Billing Issue");
        assert_eq!(
            inquiry.customer,
            CustomerRef::Anonymous {
                name: "Jane Doe".into(),
                email: "jane.doe@example.com".into()
            }
        );
        assert_eq!(inquiry.messages().len(), 1);
        assert_eq!(inquiry.messages()[0].sender, Sender::Customer);
        assert!(inquiry.priority.is_none());
    }
}
