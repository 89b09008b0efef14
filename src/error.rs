//! Error types for fbsql

use thiserror::Error;

/// Process exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_BADCONN: i32 = 2;
pub const EXIT_USER: i32 = 3;

#[derive(Error, Debug)]
pub enum FbsqlError {
    #[error("{0}")]
    Usage(String),

    #[error("Error connecting to '{dbpath}' as '{username}'\n{message}")]
    Connection {
        dbpath: String,
        username: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("History error: {0}")]
    History(String),

    #[error("Input error: {0}")]
    Readline(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FbsqlError {
    /// Exit code reported to the shell when this error ends the process
    pub fn exit_code(&self) -> i32 {
        match self {
            FbsqlError::Usage(_) => EXIT_USER,
            FbsqlError::Connection { .. } => EXIT_BADCONN,
            _ => EXIT_FAILURE,
        }
    }
}

impl From<rustyline::error::ReadlineError> for FbsqlError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        match err {
            rustyline::error::ReadlineError::Io(e) => FbsqlError::IoError(e),
            other => FbsqlError::Readline(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FbsqlError>;
