mod handler;

pub use handler::{Action, InputResult, handle_input};
