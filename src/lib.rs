//! fbsql - an interactive command-line client for Firebird
//!
//! The crate is split along the path a line of input takes: the
//! [`scanner`] finds statement and command boundaries, the [`command`]
//! dispatcher runs slash commands, [`db`] sends statements to the server
//! and [`output`] renders the results. [`repl`] ties them together around
//! a [`session::Session`].
//!
//! # Example
//!
//! ```no_run
//! use fbsql::db::{connect, ConnectParams};
//! use fbsql::input::RustylineReader;
//! use fbsql::repl::InputLoop;
//! use fbsql::session::Session;
//! use fbsql::settings::Settings;
//!
//! let params = ConnectParams {
//!     dbpath: "employee.fdb".to_string(),
//!     username: "sysdba".to_string(),
//!     password: None,
//!     client_encoding: "UTF-8".to_string(),
//! };
//! let conn = connect(&params).unwrap();
//! let settings = Settings::default();
//! let mut input = InputLoop::new(settings.histcontrol);
//! let mut session = Session::new(conn, settings, &params.dbpath, &params.username);
//! let mut reader = RustylineReader::new().unwrap();
//! input.run(&mut session, &mut reader).unwrap();
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod db;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;
pub mod repl;
pub mod scanner;
pub mod session;
pub mod settings;

#[cfg(test)]
mod test_support;

pub use db::{connect, ConnectParams, Connection, ResultSet, ResultStatus};
pub use error::{FbsqlError, Result};
pub use output::{render, FormatOptions};
pub use repl::InputLoop;
pub use session::Session;
pub use settings::Settings;
