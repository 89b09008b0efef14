//! Interactive input loop
//!
//! Reads physical lines, feeds them through the statement scanner and
//! acts on each boundary the scanner reports: complete statements are
//! sent to the server, slash commands are dispatched. Two statement
//! buffers are kept so that `\g` on an empty line can repeat the last
//! statement.

use std::mem;

use tracing::{debug, trace};

use crate::command::help::print_help_banner;
use crate::command::{handle_slash_command, DispatchStatus};
use crate::db::send_query;
use crate::error::Result;
use crate::input::{HistoryBuffer, LineReader, ReadOutcome};
use crate::scanner::{PromptStatus, ScanResult, ScanState};
use crate::session::Session;
use crate::settings::HistControl;

/// Statement being accumulated and the last one sent
#[derive(Debug, Default)]
pub struct StatementBuffers {
    current: String,
    previous: String,
}

impl StatementBuffers {
    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut String {
        &mut self.current
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }

    /// Move the current statement into the previous slot, leaving current empty
    pub fn swap(&mut self) {
        mem::swap(&mut self.current, &mut self.previous);
        self.current.clear();
    }
}

/// Prompt shown before reading the next line
pub fn format_prompt(status: PromptStatus, in_transaction: bool) -> String {
    let marker = match status {
        PromptStatus::Ready if in_transaction => "*",
        PromptStatus::Ready => "",
        PromptStatus::Continue => "-",
        PromptStatus::Comment => "/",
        PromptStatus::SingleQuote => "'",
        PromptStatus::DoubleQuote => "\"",
        PromptStatus::DollarQuote => "$",
        PromptStatus::Paren => "(",
    };
    format!("SQL{}> ", marker)
}

/// A line starting with `help`, in any case
pub fn is_help_shortcut(line: &str) -> bool {
    line.get(..4)
        .map_or(false, |head| head.eq_ignore_ascii_case("help"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineOutcome {
    Continue,
    Quit,
}

pub struct InputLoop {
    scan: ScanState,
    buffers: StatementBuffers,
    history: HistoryBuffer,
}

impl InputLoop {
    pub fn new(histcontrol: HistControl) -> Self {
        Self {
            scan: ScanState::default(),
            buffers: StatementBuffers::default(),
            history: HistoryBuffer::new(histcontrol),
        }
    }

    pub fn buffers(&self) -> &StatementBuffers {
        &self.buffers
    }

    /// Read and process lines until `\q` or end of input
    pub fn run(&mut self, session: &mut Session, reader: &mut dyn LineReader) -> Result<()> {
        loop {
            // a cancel raised while a query ran has already done its job
            session.take_cancel();
            session.flush();

            let status = self.scan.prompt_status(self.buffers.current());
            let prompt = format_prompt(status, session.in_transaction());

            let line = match reader.read_line(&prompt)? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => {
                    trace!("line entry interrupted");
                    continue;
                }
                ReadOutcome::Eof => {
                    session.println("\\q");
                    break;
                }
            };

            if self.buffers.current().is_empty() && is_help_shortcut(&line) {
                print_help_banner(session);
                continue;
            }

            if self.process_line(&line, session, reader) == LineOutcome::Quit {
                break;
            }
        }

        self.flush_history(reader);
        session.flush();
        Ok(())
    }

    fn process_line(
        &mut self,
        line: &str,
        session: &mut Session,
        reader: &mut dyn LineReader,
    ) -> LineOutcome {
        let mut added_nl_pos = if self.buffers.current().is_empty() {
            None
        } else {
            self.buffers.current_mut().push('\n');
            Some(self.buffers.current().len())
        };

        self.scan.setup(line);
        let mut saved_in_history = false;
        let mut outcome = LineOutcome::Continue;

        loop {
            let result = self.scan.scan(self.buffers.current_mut());
            trace!(?result, "scanned");

            match result {
                ScanResult::Semicolon => {
                    if !saved_in_history {
                        self.history.append(line);
                        self.flush_history(reader);
                        saved_in_history = true;
                    }
                    if self.buffers.current().trim().is_empty() {
                        // a bare terminator sends nothing but still completes a statement
                        self.buffers.swap();
                    } else {
                        self.send_current(session);
                    }
                    added_nl_pos = None;
                }
                ScanResult::Backslash => {
                    // a command-only line leaves the statement untouched
                    if added_nl_pos.take() == Some(self.buffers.current().len()) {
                        self.buffers.current_mut().pop();
                        self.flush_history(reader);
                    }

                    if !saved_in_history {
                        self.history.append(line);
                        self.flush_history(reader);
                        saved_in_history = true;
                    }

                    match handle_slash_command(&mut self.scan, session) {
                        DispatchStatus::Send => {
                            self.send_current(session);
                            self.scan.reset();
                        }
                        DispatchStatus::Terminate => {
                            outcome = LineOutcome::Quit;
                            break;
                        }
                        DispatchStatus::Unknown
                        | DispatchStatus::SkipLine
                        | DispatchStatus::Error => {}
                    }
                }
                ScanResult::Incomplete | ScanResult::Eol => break,
            }
        }

        if !saved_in_history {
            self.history.append(line);
        }
        self.scan.finish();
        outcome
    }

    /// Send the current statement, or repeat the previous one when
    /// nothing has been entered since
    fn send_current(&mut self, session: &mut Session) {
        if self.buffers.current().trim().is_empty() {
            self.buffers.current_mut().clear();
            let previous = self.buffers.previous().to_string();
            if !previous.trim().is_empty() {
                debug!("resending previous statement");
                send_query(session, &previous);
            }
            return;
        }

        let query = self.buffers.current().to_string();
        send_query(session, &query);
        self.buffers.swap();
    }

    fn flush_history(&mut self, reader: &mut dyn LineReader) {
        if let Some(entry) = self.history.take_entry() {
            reader.add_history(&entry);
        }
    }
}
