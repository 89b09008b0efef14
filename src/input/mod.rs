//! Line input and history

pub mod completer;
pub mod editor;
pub mod history;

use std::path::Path;

use crate::error::Result;

pub use completer::SqlHelper;
pub use editor::RustylineReader;
pub use history::HistoryBuffer;

/// Result of asking for one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The read was cancelled (Ctrl-C); the pending statement is kept
    Interrupted,
    /// No more input
    Eof,
}

/// Source of input lines with a persistent history
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;

    /// Record a completed history entry
    fn add_history(&mut self, entry: &str);

    /// Load history; a missing file is not an error
    fn load_history(&mut self, path: &Path) -> Result<()>;

    fn save_history(&mut self, path: &Path) -> Result<()>;
}
