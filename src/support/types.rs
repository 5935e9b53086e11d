use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type InquiryId = String;
pub type CustomerId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    Email,
    Chat,
    Phone,
    ProductQuery,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Chat => "chat",
            Self::Phone => "phone",
            Self::ProductQuery => "product-query",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    #[default]
    Open,
    Pending,
    Resolved,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Customer,
    Agent,
    System,
}

/// A single entry in an inquiry thread. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Message {
    /// Create a message stamped with the current time
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self::at(sender, content, Utc::now())
    }

    pub fn at(sender: Sender, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
            sender,
            content: content.into(),
            timestamp,
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = avatar;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

/// Model-derived triage annotation for one inquiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    pub sentiment: Sentiment,
    pub urgency: Urgency,
    pub priority_score: f64,
    pub reason: String,
}

/// Who an inquiry came from. Product queries have no customer record, only
/// the name and email typed into the submission form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerRef {
    Known(CustomerId),
    Anonymous { name: String, email: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inquiry {
    pub id: InquiryId,
    pub customer: CustomerRef,
    pub subject: String,
    pub channel: Channel,
    pub status: InquiryStatus,
    pub timestamp: DateTime<Utc>,
    /// Chronological; only grows through `push_message`
    messages: Vec<Message>,
    pub priority: Option<Priority>,
    pub loading_priority: bool,
}

impl Inquiry {
    pub fn new(
        id: impl Into<InquiryId>,
        customer: CustomerRef,
        subject: impl Into<String>,
        channel: Channel,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            customer,
            subject: subject.into(),
            channel,
            status: InquiryStatus::Open,
            timestamp,
            messages: Vec::new(),
            priority: None,
            loading_priority: false,
        }
    }

    pub fn with_status(mut self, status: InquiryStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn priority_score(&self) -> Option<f64> {
        self.priority.as_ref().map(|p| p.priority_score)
    }

    /// Short single-line excerpt of the first customer message for list display
    pub fn preview(&self, max_chars: usize) -> String {
        let source = self
            .messages
            .iter()
            .find(|m| m.sender == Sender::Customer)
            .or_else(|| self.messages.first())
            .map(|m| m.content.as_str())
            .unwrap_or("");

        let flat = source.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= max_chars {
            flat
        } else {
            let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{}...", cut.trim_end())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub join_date: NaiveDate,
    pub last_contacted: NaiveDate,
    pub tags: Vec<String>,
}

impl Customer {
    /// Customer-like record for a submitter without an account
    pub fn anonymous(inquiry_id: &str, name: &str, email: &str, seen: DateTime<Utc>) -> Self {
        let day = seen.date_naive();
        Self {
            id: format!("anon_{}", inquiry_id),
            name: name.to_string(),
            email: email.to_string(),
            avatar_url: None,
            join_date: day,
            last_contacted: day,
            tags: vec!["anonymous".to_string(), "product-query".to_string()],
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.tags.iter().any(|t| t == "anonymous")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeArticle {
    pub id: String,
    pub title: String,
    pub url: String,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickResponse {
    pub id: String,
    pub title: String,
    pub content: String,
}
