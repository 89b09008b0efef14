//! Embedded SQLite backend
//!
//! Lets the client run against a local database file without a server.
//! Catalog commands (`\dt`, `\d` ...) query Firebird system tables and
//! report an error against this backend; plain SQL works as usual.

use std::sync::Arc;

use rusqlite::types::ValueRef;
use rusqlite::OpenFlags;
use tracing::debug;

use super::connection::{Canceller, ConnectParams, Connection};
use super::result::{Cell, Column, ColumnType, QueryError, ResultSet, ResultStatus};
use crate::error::{FbsqlError, Result};

pub struct SqliteConnection {
    conn: rusqlite::Connection,
    autocommit: bool,
}

impl SqliteConnection {
    /// Open an existing database file
    pub fn open(params: &ConnectParams) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI;
        let conn = rusqlite::Connection::open_with_flags(&params.dbpath, flags).map_err(|e| {
            FbsqlError::Connection {
                dbpath: params.dbpath.clone(),
                username: params.username.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            conn,
            autocommit: true,
        })
    }

    fn run(&self, query: &str) -> rusqlite::Result<ResultSet> {
        let mut stmt = self.conn.prepare(query)?;

        // comments and whitespace prepare to no statement at all
        if stmt.column_count() == 0 && stmt.expanded_sql().is_none() {
            return Ok(empty_query());
        }

        if stmt.column_count() == 0 {
            stmt.execute([])?;
            return Ok(ResultSet::command_ok());
        }

        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut types: Vec<Option<ColumnType>> = vec![None; names.len()];
        let mut data = Vec::new();

        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(names.len());
            for (i, slot) in types.iter_mut().enumerate() {
                let (cell, column_type) = match row.get_ref(i)? {
                    ValueRef::Null => (Cell::null(), None),
                    ValueRef::Integer(v) => (Cell::text(v.to_string()), Some(ColumnType::Integer)),
                    ValueRef::Real(v) => (Cell::text(v.to_string()), Some(ColumnType::Float)),
                    ValueRef::Text(t) => (
                        Cell::text(String::from_utf8_lossy(t).into_owned()),
                        Some(ColumnType::Text),
                    ),
                    ValueRef::Blob(b) => (Cell::binary(b.to_vec()), Some(ColumnType::Blob)),
                };
                if slot.is_none() {
                    *slot = column_type;
                }
                cells.push(cell);
            }
            data.push(cells);
        }

        let columns = names
            .into_iter()
            .zip(types)
            .map(|(name, column_type)| Column::new(name, column_type.unwrap_or(ColumnType::Text)))
            .collect();

        Ok(ResultSet::tuples(columns, data))
    }
}

impl Connection for SqliteConnection {
    fn execute(&mut self, query: &str) -> ResultSet {
        if query.trim().is_empty() {
            return empty_query();
        }

        let keyword = leading_keyword(query);
        let was_autocommit = self.conn.is_autocommit();

        if !self.autocommit && was_autocommit && !is_transaction_keyword(&keyword) {
            debug!("starting implicit transaction");
            if let Err(e) = self.conn.execute_batch("BEGIN") {
                return query_error(e);
            }
        }

        let result = match self.run(query) {
            Ok(result) => result,
            Err(e) => return query_error(e),
        };

        if result.status() != ResultStatus::CommandOk {
            return result;
        }

        let now_autocommit = self.conn.is_autocommit();
        match (was_autocommit, now_autocommit) {
            (true, false) if keyword == "BEGIN" => {
                ResultSet::with_status(ResultStatus::TransactionStart)
            }
            (false, true) if keyword == "ROLLBACK" => {
                ResultSet::with_status(ResultStatus::TransactionRollback)
            }
            (false, true) => ResultSet::with_status(ResultStatus::TransactionCommit),
            _ => result,
        }
    }

    fn explain_plan(&mut self, query: &str) -> Option<String> {
        let sql = format!("EXPLAIN QUERY PLAN {}", query);
        let mut stmt = self.conn.prepare(&sql).ok()?;
        let details = stmt
            .query_map([], |row| row.get::<_, String>(3))
            .ok()?
            .collect::<rusqlite::Result<Vec<String>>>()
            .ok()?;

        if details.is_empty() {
            return None;
        }

        let mut plan = String::from("PLAN");
        for detail in details {
            plan.push_str("\n  ");
            plan.push_str(&detail);
        }
        Some(plan)
    }

    fn begin_transaction(&mut self) -> ResultSet {
        match self.conn.execute_batch("BEGIN") {
            Ok(()) => ResultSet::with_status(ResultStatus::TransactionStart),
            Err(e) => query_error(e),
        }
    }

    fn is_in_active_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn set_autocommit(&mut self, autocommit: bool) {
        self.autocommit = autocommit;
    }

    fn server_version(&self) -> String {
        format!("SQLite {}", rusqlite::version())
    }

    fn canceller(&self) -> Option<Canceller> {
        let handle = self.conn.get_interrupt_handle();
        Some(Arc::new(move || handle.interrupt()))
    }

    fn close(&mut self) {
        if self.is_in_active_transaction() {
            let _ = self.conn.execute_batch("ROLLBACK");
        }
    }
}

fn empty_query() -> ResultSet {
    ResultSet::error(ResultStatus::EmptyQuery, QueryError::new("empty query"))
}

fn query_error(err: rusqlite::Error) -> ResultSet {
    let mut detail = QueryError::new(err.to_string());
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        detail = detail
            .with_field("code", format!("{:?}", failure.code))
            .with_field("extended code", failure.extended_code.to_string());
    }
    ResultSet::error(ResultStatus::FatalError, detail)
}

fn leading_keyword(query: &str) -> String {
    query
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_uppercase()
}

fn is_transaction_keyword(keyword: &str) -> bool {
    matches!(keyword, "BEGIN" | "COMMIT" | "END" | "ROLLBACK")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;
    use tempfile::NamedTempFile;

    fn open_temp() -> (NamedTempFile, SqliteConnection) {
        let file = NamedTempFile::new().unwrap();
        let params = ConnectParams {
            dbpath: file.path().to_string_lossy().to_string(),
            username: "sysdba".to_string(),
            password: None,
            client_encoding: "UTF-8".to_string(),
        };
        let conn = SqliteConnection::open(&params).unwrap();
        (file, conn)
    }

    #[test]
    fn test_select_returns_typed_columns() {
        let (_file, mut conn) = open_temp();
        let result = conn.execute("SELECT 1 AS n, 'x' AS s, NULL AS z");

        assert_eq!(result.status(), ResultStatus::TuplesOk);
        assert_eq!(result.columns()[0].column_type, ColumnType::Integer);
        assert_eq!(result.columns()[1].column_type, ColumnType::Text);
        assert!(result.cell(0, 2).unwrap().is_null());
    }

    #[test]
    fn test_error_is_a_status_not_a_panic() {
        let (_file, mut conn) = open_temp();
        let result = conn.execute("SELECT * FROM no_such_table");

        assert_eq!(result.status(), ResultStatus::FatalError);
        assert!(result.error_detail().unwrap().message.contains("no_such_table"));
    }

    #[test]
    fn test_transaction_statuses() {
        let (_file, mut conn) = open_temp();

        assert_eq!(conn.execute("BEGIN").status(), ResultStatus::TransactionStart);
        assert!(conn.is_in_active_transaction());
        assert_eq!(conn.execute("ROLLBACK").status(), ResultStatus::TransactionRollback);
        assert!(!conn.is_in_active_transaction());
    }

    #[test]
    fn test_autocommit_off_opens_transaction() {
        let (_file, mut conn) = open_temp();
        conn.set_autocommit(false);

        assert_eq!(conn.execute("CREATE TABLE t (a INTEGER)").status(), ResultStatus::CommandOk);
        assert!(conn.is_in_active_transaction());
        assert_eq!(conn.execute("COMMIT").status(), ResultStatus::TransactionCommit);
    }

    #[test]
    fn test_empty_query() {
        let (_file, mut conn) = open_temp();
        assert_eq!(conn.execute("   ").status(), ResultStatus::EmptyQuery);
    }

    #[test]
    fn test_comment_only_statement_is_empty() {
        let (_file, mut conn) = open_temp();

        let result = conn.execute("-- note\n");
        assert_eq!(result.status(), ResultStatus::EmptyQuery);
        assert_eq!(result.error_detail().unwrap().message, "empty query");
        assert_eq!(conn.execute("/* c */").status(), ResultStatus::EmptyQuery);

        // a statement after a comment still runs
        let result = conn.execute("/* c */ SELECT 1");
        assert_eq!(result.status(), ResultStatus::TuplesOk);
    }

    #[test]
    fn test_blob_column_renders_as_hex() {
        let (_file, mut conn) = open_temp();
        let result = conn.execute("SELECT x'00ff10' AS b");

        assert_eq!(result.columns()[0].column_type, ColumnType::Blob);
        let out = crate::output::render(&result, &crate::output::FormatOptions::default());
        assert!(out.contains(" 00ff10 "));
    }

    #[test]
    fn test_canceller_interrupts_running_query() {
        let (_file, mut conn) = open_temp();
        let cancel = conn.canceller().unwrap();
        let done = Arc::new(AtomicBool::new(false));

        let stop = Arc::clone(&done);
        let interrupter = thread::spawn(move || {
            while !stop.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(20));
                cancel();
            }
        });

        let result = conn.execute(
            "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c) \
             SELECT count(*) FROM c",
        );
        done.store(true, Ordering::SeqCst);
        interrupter.join().unwrap();

        assert_eq!(result.status(), ResultStatus::FatalError);
        assert!(result.error_detail().unwrap().message.contains("interrupt"));
    }
}
