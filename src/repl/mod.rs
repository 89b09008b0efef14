//! Interactive session loop

pub mod interactive;

pub use interactive::{format_prompt, is_help_shortcut, InputLoop, StatementBuffers};
