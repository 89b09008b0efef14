//! Session context threaded through the input loop, the command
//! dispatcher and query execution.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::db::Connection;
use crate::settings::Settings;

pub struct Session {
    pub conn: Box<dyn Connection>,
    pub settings: Settings,
    pub dbpath: String,
    pub username: String,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    cancel: Arc<AtomicBool>,
}

impl Session {
    /// Session writing to the process's stdout and stderr
    pub fn new(
        conn: Box<dyn Connection>,
        settings: Settings,
        dbpath: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self::with_writers(
            conn,
            settings,
            dbpath,
            username,
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        )
    }

    pub fn with_writers(
        conn: Box<dyn Connection>,
        settings: Settings,
        dbpath: impl Into<String>,
        username: impl Into<String>,
        out: Box<dyn Write>,
        err: Box<dyn Write>,
    ) -> Self {
        Self {
            conn,
            settings,
            dbpath: dbpath.into(),
            username: username.into(),
            out,
            err,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag raised by the SIGINT handler outside of line reads. The same
    /// handler hands the interrupt to the connection's
    /// [`Canceller`](crate::db::Canceller); the loop clears the flag
    /// before each prompt.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Clear a pending cancel request, returning whether one was set
    pub fn take_cancel(&self) -> bool {
        self.cancel.swap(false, Ordering::SeqCst)
    }

    /// Write text to the result stream as is
    pub fn write(&mut self, text: &str) {
        // Nowhere left to report a failed write to stdout.
        let _ = self.out.write_all(text.as_bytes());
    }

    /// Write a line to the result stream
    pub fn println(&mut self, line: impl Display) {
        let _ = writeln!(self.out, "{}", line);
    }

    /// Write a line to the error stream
    pub fn eprintln(&mut self, line: impl Display) {
        let _ = writeln!(self.err, "{}", line);
    }

    pub fn flush(&mut self) {
        let _ = self.out.flush();
        let _ = self.err.flush();
    }

    pub fn in_transaction(&self) -> bool {
        self.conn.is_in_active_transaction()
    }
}
