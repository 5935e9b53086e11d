pub mod customers;
pub mod seed;
pub mod thread;
pub mod types;

pub use customers::CustomerDirectory;
pub use thread::{prioritization_text, serialize_thread};
pub use types::{
    Channel, Customer, CustomerRef, Inquiry, InquiryId, InquiryStatus, KnowledgeArticle, Message,
    Priority, QuickResponse, Sender, Sentiment, Urgency,
};
