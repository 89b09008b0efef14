//! Statement execution and result reporting

use std::time::Instant;

use tracing::{debug, trace};

use super::result::{ResultSet, ResultStatus};
use crate::output::{render, FormatOptions};
use crate::session::Session;
use crate::settings::PlanDisplay;

/// Execute a user statement and report its outcome.
///
/// Returns `false` if the statement failed. Failures leave any open
/// transaction exactly as the server left it.
pub fn send_query(session: &mut Session, query: &str) -> bool {
    let started = Instant::now();
    debug!(query, "sending query");

    let result = session.conn.execute(query);
    trace!(status = ?result.status(), rows = result.ntuples(), "query finished");

    if result.status().is_error() {
        report_error(session, &result);
        return false;
    }

    match result.status() {
        ResultStatus::TuplesOk => {
            let plan_display = session.settings.plan_display;
            if plan_display != PlanDisplay::Only {
                let table = render(&result, &session.settings.format);
                session.write(&table);
                session.println(format!("({} rows)", result.ntuples()));
            }
            if plan_display != PlanDisplay::Off {
                if let Some(plan) = session.conn.explain_plan(query) {
                    session.println(plan);
                }
            }
        }
        ResultStatus::TransactionStart => session.println("START"),
        ResultStatus::TransactionCommit => session.println("COMMIT"),
        ResultStatus::TransactionRollback => session.println("ROLLBACK"),
        _ => session.println(""),
    }

    if session.settings.timing {
        let elapsed = started.elapsed().as_secs_f64() * 1000.0;
        session.println(format!("Time: {:.3} ms", elapsed));
    }

    true
}

/// Run an internally generated catalog query.
///
/// Echoed first when echo-hidden is enabled.
pub fn exec_internal(session: &mut Session, query: &str) -> ResultSet {
    if session.settings.echo_hidden {
        session.println(query);
    }
    debug!(query, "internal query");
    session.conn.execute(query)
}

/// Run a catalog query and print its rows under the given options.
///
/// An empty result prints `No items found`.
pub fn exec_print(session: &mut Session, query: &str, opts: &FormatOptions) {
    let result = exec_internal(session, query);

    if result.status() != ResultStatus::TuplesOk {
        report_error(session, &result);
        return;
    }

    if result.ntuples() > 0 {
        let table = render(&result, opts);
        session.write(&table);
        session.println("");
    } else {
        session.println("No items found");
    }
}

/// Print a failed result's message and diagnostic fields
pub fn report_error(session: &mut Session, result: &ResultSet) {
    match result.error_detail() {
        Some(detail) => {
            session.eprintln(&detail.message);
            for (name, value) in &detail.fields {
                session.eprintln(format!("{}: {}", name, value));
            }
        }
        None => session.eprintln(format!("unexpected result status {:?}", result.status())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Cell, Column, ColumnType, QueryError};
    use crate::test_support::{session_with, MockConnection};

    fn two_rows() -> ResultSet {
        ResultSet::tuples(
            vec![Column::new("ID", ColumnType::Integer)],
            vec![vec![Cell::text("1")], vec![Cell::text("2")]],
        )
    }

    #[test]
    fn test_tuples_print_table_and_count() {
        let conn = MockConnection::default();
        conn.respond("SELECT", two_rows());
        let (mut session, out, _err) = session_with(conn);

        assert!(send_query(&mut session, "SELECT id FROM t"));
        assert_eq!(out.contents(), " id \n----\n  1 \n  2 \n(2 rows)\n");
    }

    #[test]
    fn test_error_prints_fields_and_fails() {
        let conn = MockConnection::default();
        conn.respond(
            "SELEC",
            ResultSet::error(
                ResultStatus::FatalError,
                QueryError::new("Dynamic SQL Error").with_field("SQLSTATE", "42000"),
            ),
        );
        let (mut session, out, err) = session_with(conn);

        assert!(!send_query(&mut session, "SELEC 1"));
        assert_eq!(err.contents(), "Dynamic SQL Error\nSQLSTATE: 42000\n");
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn test_plan_only_suppresses_rows() {
        let mut conn = MockConnection::default();
        conn.plan = Some("PLAN (T NATURAL)".to_string());
        conn.respond("SELECT", two_rows());
        let (mut session, out, _err) = session_with(conn);
        session.settings.plan_display = PlanDisplay::Only;

        assert!(send_query(&mut session, "SELECT id FROM t"));
        assert_eq!(out.contents(), "PLAN (T NATURAL)\n");
    }

    #[test]
    fn test_transaction_and_timing_lines() {
        let conn = MockConnection::default();
        conn.respond("COMMIT", ResultSet::with_status(ResultStatus::TransactionCommit));
        let (mut session, out, _err) = session_with(conn);
        session.settings.timing = true;

        assert!(send_query(&mut session, "COMMIT"));
        let text = out.contents();
        assert!(text.starts_with("COMMIT\nTime: "));
        assert!(text.trim_end().ends_with(" ms"));
    }

    #[test]
    fn test_exec_print_empty_result() {
        let conn = MockConnection::default();
        conn.respond(
            "rdb$relations",
            ResultSet::tuples(vec![Column::new("Name", ColumnType::Text)], Vec::new()),
        );
        let (mut session, out, _err) = session_with(conn);
        session.settings.echo_hidden = true;

        let opts = session.settings.format.titled("List of tables");
        exec_print(&mut session, "SELECT 1 FROM rdb$relations", &opts);

        assert_eq!(out.contents(), "SELECT 1 FROM rdb$relations\nNo items found\n");
    }
}
