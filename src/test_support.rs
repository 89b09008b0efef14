//! Shared fixtures for unit tests

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::db::{Connection, ResultSet, ResultStatus};
use crate::session::Session;
use crate::settings::Settings;

/// Writer whose contents stay readable after being boxed into a session
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Connection returning canned results for queries containing a key
#[derive(Clone, Default)]
pub struct MockConnection {
    responses: Rc<RefCell<Vec<(String, ResultSet)>>>,
    pub executed: Rc<RefCell<Vec<String>>>,
    in_transaction: Rc<RefCell<bool>>,
    pub autocommit: Rc<RefCell<bool>>,
    pub plan: Option<String>,
}

impl MockConnection {
    pub fn respond(&self, key: &str, result: ResultSet) {
        self.responses.borrow_mut().push((key.to_string(), result));
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }
}

impl Connection for MockConnection {
    fn execute(&mut self, query: &str) -> ResultSet {
        self.executed.borrow_mut().push(query.to_string());

        let result = self
            .responses
            .borrow()
            .iter()
            .find(|(key, _)| query.contains(key.as_str()))
            .map(|(_, result)| result.clone())
            .unwrap_or_else(ResultSet::command_ok);

        match result.status() {
            ResultStatus::TransactionStart => *self.in_transaction.borrow_mut() = true,
            ResultStatus::TransactionCommit | ResultStatus::TransactionRollback => {
                *self.in_transaction.borrow_mut() = false
            }
            _ => {}
        }
        result
    }

    fn explain_plan(&mut self, _query: &str) -> Option<String> {
        self.plan.clone()
    }

    fn begin_transaction(&mut self) -> ResultSet {
        *self.in_transaction.borrow_mut() = true;
        ResultSet::with_status(ResultStatus::TransactionStart)
    }

    fn is_in_active_transaction(&self) -> bool {
        *self.in_transaction.borrow()
    }

    fn set_autocommit(&mut self, autocommit: bool) {
        *self.autocommit.borrow_mut() = autocommit;
    }

    fn server_version(&self) -> String {
        "Mock 1.0".to_string()
    }

    fn close(&mut self) {}
}

/// Session over `conn` with captured output and timing disabled
pub fn session_with(conn: MockConnection) -> (Session, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let settings = Settings {
        timing: false,
        history_file: None,
        ..Settings::default()
    };
    let session = Session::with_writers(
        Box::new(conn),
        settings,
        "employee.fdb",
        "sysdba",
        Box::new(out.clone()),
        Box::new(err.clone()),
    );
    (session, out, err)
}
