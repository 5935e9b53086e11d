//! Customer support inbox with AI-assisted triage and reply drafting

pub mod ai;
pub mod app;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod input;
pub mod query;
pub mod store;
pub mod support;
pub mod triage;
pub mod ui;

pub use app::{ActionError, App, SupportData};
pub use config::Config;
