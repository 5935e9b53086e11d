//! Operator and lifecycle actions, split by concern

mod ai;
mod conversation;
mod inbox;
mod navigation;

pub use ai::PanelKind;
