//! rustyline-backed line reader

use std::io::ErrorKind;
use std::path::Path;

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use tracing::{debug, warn};

use super::completer::SqlHelper;
use super::{LineReader, ReadOutcome};
use crate::error::{FbsqlError, Result};

pub struct RustylineReader {
    editor: Editor<SqlHelper, DefaultHistory>,
}

impl RustylineReader {
    pub fn new() -> Result<Self> {
        // De-duplication is applied by the session history buffer
        let config = Config::builder()
            .auto_add_history(false)
            .history_ignore_dups(false)?
            .history_ignore_space(false)
            .build();

        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(SqlHelper));
        Ok(Self { editor })
    }
}

impl LineReader for RustylineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(e) => Err(e.into()),
        }
    }

    fn add_history(&mut self, entry: &str) {
        if let Err(e) = self.editor.add_history_entry(entry) {
            warn!(error = %e, "could not add history entry");
        }
    }

    fn load_history(&mut self, path: &Path) -> Result<()> {
        match self.editor.load_history(path) {
            Ok(()) => {
                debug!(path = %path.display(), "history loaded");
                Ok(())
            }
            Err(ReadlineError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FbsqlError::History(format!(
                "could not read \"{}\": {}",
                path.display(),
                e
            ))),
        }
    }

    fn save_history(&mut self, path: &Path) -> Result<()> {
        self.editor.save_history(path).map_err(|e| {
            FbsqlError::History(format!("could not save \"{}\": {}", path.display(), e))
        })
    }
}
