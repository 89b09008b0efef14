//! Database collaborator: connection boundary and result sets

pub mod connection;
pub mod query;
pub mod result;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use connection::{Canceller, ConnectParams, Connection};
pub use query::{exec_internal, exec_print, report_error, send_query};
pub use result::{Cell, CellValue, Column, ColumnType, QueryError, ResultSet, ResultStatus};

use crate::error::Result;

/// Open a connection with the backend compiled into this build
#[cfg(feature = "sqlite")]
pub fn connect(params: &ConnectParams) -> Result<Box<dyn Connection>> {
    let conn = sqlite::SqliteConnection::open(params)?;
    Ok(Box::new(conn))
}

#[cfg(not(feature = "sqlite"))]
pub fn connect(params: &ConnectParams) -> Result<Box<dyn Connection>> {
    Err(crate::error::FbsqlError::Connection {
        dbpath: params.dbpath.clone(),
        username: params.username.clone(),
        message: "no database driver enabled. Rebuild with --features sqlite".to_string(),
    })
}
