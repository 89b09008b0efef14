//! Lexical statement scanner
//!
//! Tracks quoting, comments and paren nesting across input lines to decide
//! when a statement is complete. The scanner is lexical only; it knows
//! nothing about SQL grammar.

pub mod slash;
pub mod state;

pub use slash::OptionKind;
pub use state::{PromptStatus, QuoteMode, ScanResult, ScanState, DEFAULT_TERMINATOR};
