//! Database connection boundary

use std::sync::Arc;

use super::result::ResultSet;

/// Aborts the statement currently running on a connection. Safe to call
/// from a signal handler thread.
pub type Canceller = Arc<dyn Fn() + Send + Sync>;

/// Parameters used to open a connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub dbpath: String,
    pub username: String,
    pub password: Option<String>,
    pub client_encoding: String,
}

/// A live connection to the database server.
///
/// Failures are reported through the status of the returned [`ResultSet`],
/// never by panicking or unwinding.
pub trait Connection {
    /// Execute a statement and return its result
    fn execute(&mut self, query: &str) -> ResultSet;

    /// Execution plan for a statement, if the server can provide one
    fn explain_plan(&mut self, query: &str) -> Option<String>;

    /// Start a transaction explicitly
    fn begin_transaction(&mut self) -> ResultSet;

    fn is_in_active_transaction(&self) -> bool;

    fn set_autocommit(&mut self, autocommit: bool);

    /// Human-readable server version
    fn server_version(&self) -> String;

    /// Handle that cancels a running statement, if the backend supports it
    fn canceller(&self) -> Option<Canceller> {
        None
    }

    /// Roll back anything uncommitted and release the connection
    fn close(&mut self);
}
