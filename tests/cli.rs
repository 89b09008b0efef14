//! Binary-level tests: argument handling, exit codes and a full session
//! against the embedded SQLite backend.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir};

fn fbsql(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fbsql").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("ISC_DATABASE")
        .env_remove("ISC_USER")
        .env_remove("ISC_PASSWORD")
        .env_remove("FBSQL_CONFIG")
        .env_remove("FBSQL_LOG");
    cmd
}

#[test]
fn test_missing_database_is_usage_error() {
    let home = TempDir::new().unwrap();
    fbsql(&home)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("need -d dbpath"));
}

#[test]
fn test_missing_username_is_usage_error() {
    let home = TempDir::new().unwrap();
    fbsql(&home)
        .args(["-d", "employee.fdb"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("need -u username"));
}

#[test]
fn test_environment_supplies_parameters() {
    let home = TempDir::new().unwrap();
    let db = NamedTempFile::new().unwrap();
    fbsql(&home)
        .env("ISC_DATABASE", db.path())
        .env("ISC_USER", "sysdba")
        .write_stdin("\\conninfo\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("connected as user 'sysdba'"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    fbsql(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("fbsql (Firebird) "));
}

#[test]
fn test_connection_failure_exit_code() {
    let home = TempDir::new().unwrap();
    fbsql(&home)
        .args(["-d", "/nonexistent/dir/employee.fdb", "-u", "sysdba"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error connecting to"));
}

#[test]
fn test_invalid_config_rejected() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("fbsql.json");
    std::fs::write(&config, r#"{"border": "double"}"#).unwrap();

    fbsql(&home)
        .args(["--config", config.to_str().unwrap(), "-d", "x.fdb", "-u", "sysdba"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("border"));
}

#[test]
fn test_sql_session() {
    let home = TempDir::new().unwrap();
    let db = NamedTempFile::new().unwrap();

    fbsql(&home)
        .arg("-d")
        .arg(db.path())
        .args(["-u", "sysdba"])
        .write_stdin(
            "CREATE TABLE t (a INTEGER, b TEXT);\n\
             INSERT INTO t VALUES (1, 'one');\n\
             INSERT INTO t VALUES (22, NULL);\n\
             SELECT a, b\n\
             FROM t ORDER BY a;\n\
             \\q\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Connected to SQLite"))
        .stdout(predicate::str::contains("  a | b    \n"))
        .stdout(predicate::str::contains("  1 | one  \n"))
        .stdout(predicate::str::contains(" 22 | NULL \n"))
        .stdout(predicate::str::contains("(2 rows)"));
}

#[test]
fn test_config_and_history_file() {
    let home = TempDir::new().unwrap();
    let db = NamedTempFile::new().unwrap();
    let history = home.path().join("history");
    let config = home.path().join("fbsql.json");
    std::fs::write(
        &config,
        format!(
            r#"{{"timing": false, "null_display": "<null>", "history_file": "{}"}}"#,
            history.display()
        ),
    )
    .unwrap();

    fbsql(&home)
        .arg("--config")
        .arg(&config)
        .arg(db.path())
        .arg("sysdba")
        .write_stdin("SELECT NULL AS x;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("<null>"))
        .stdout(predicate::str::contains("Time:").not())
        .stdout(predicate::str::ends_with("\\q\n"));

    let saved = std::fs::read_to_string(&history).unwrap();
    assert!(saved.contains("SELECT NULL AS x;"));
}

#[test]
fn test_query_error_keeps_session_alive() {
    let home = TempDir::new().unwrap();
    let db = NamedTempFile::new().unwrap();

    fbsql(&home)
        .arg(db.path())
        .arg("sysdba")
        .write_stdin("SELECT * FROM missing;\n\\bogus\nSELECT 7 AS n;\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("no such table: missing"))
        .stderr(predicate::str::contains("Invalid command \\bogus. Try \\? for help."))
        .stdout(predicate::str::contains("(1 rows)"));
}

#[test]
fn test_open_transaction_rolled_back_on_exit() {
    let home = TempDir::new().unwrap();
    let db = NamedTempFile::new().unwrap();

    fbsql(&home)
        .arg(db.path())
        .arg("sysdba")
        .write_stdin("BEGIN;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("START"))
        .stdout(predicate::str::contains("Rolling back uncommitted transaction"));
}
