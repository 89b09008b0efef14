//! Catalog listing commands
//!
//! Each `\d?` command builds a query against the Firebird system tables,
//! runs it and prints the rows under a title.

use crate::db::{exec_print, ResultStatus};
use crate::session::Session;

/// Options understood by `\util`
pub const UTIL_OPTIONS: &[&str] = &["set_index_statistics"];

/// Quote `value` for use inside a single-quoted SQL literal
pub fn quote_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Filter clause for an object name pattern.
///
/// `*` alone matches everything and yields no clause; a trailing `*` is a
/// prefix match; anything else must match exactly. Comparisons ignore case
/// and surrounding blanks.
pub fn wildcard_pattern_clause(pattern: &str, field: &str) -> Option<String> {
    if pattern == "*" {
        return None;
    }

    let clause = match pattern.strip_suffix('*') {
        Some(prefix) => format!(
            "      AND TRIM(LOWER({})) LIKE TRIM(LOWER('{}%'))\n",
            field,
            quote_literal(prefix)
        ),
        None => format!(
            "      AND TRIM(LOWER({})) = TRIM(LOWER('{}'))\n",
            field,
            quote_literal(pattern)
        ),
    };
    Some(clause)
}

/// Append either the pattern clause or, without a pattern, the
/// system-object filter unless system objects were requested
fn filter(sql: &mut String, pattern: Option<&str>, field: &str, hide_system: bool) {
    match pattern {
        Some(pattern) => {
            if let Some(clause) = wildcard_pattern_clause(pattern, field) {
                sql.push_str(&clause);
            }
        }
        None if hide_system => sql.push_str("      AND rdb$system_flag = 0\n"),
        None => {}
    }
}

pub fn functions_query(pattern: Option<&str>) -> String {
    let mut sql = String::from(
        "   SELECT TRIM(LOWER(rdb$function_name)) AS \"Name\",
          TRIM(rdb$module_name) AS \"Module\",
          COALESCE(CAST(rdb$description AS VARCHAR(80)), '') AS \"Description\"
     FROM rdb$functions
    WHERE rdb$system_flag = 0
",
    );
    filter(&mut sql, pattern, "rdb$function_name", false);
    sql.push_str(" ORDER BY 1");
    sql
}

pub fn indexes_query(pattern: Option<&str>, show_system: bool, show_extended: bool) -> String {
    let mut sql = String::from(
        "   SELECT TRIM(LOWER(rdb$index_name)) AS \"Name\",
          TRIM(LOWER(rdb$relation_name)) AS \"Table\",
          COALESCE(CAST(rdb$description AS VARCHAR(80)), '') AS \"Description\"
",
    );
    if show_extended {
        sql.push_str("        , rdb$statistics AS \"Statistics\"\n");
    }
    sql.push_str(
        "     FROM rdb$indices
    WHERE 1 = 1
",
    );
    filter(&mut sql, pattern, "rdb$index_name", !show_system);
    sql.push_str(" ORDER BY 1");
    sql
}

pub fn procedures_query(pattern: Option<&str>) -> String {
    let mut sql = String::from(
        "   SELECT TRIM(LOWER(rdb$procedure_name)) AS \"Name\",
          rdb$procedure_id AS \"Id\",
          TRIM(LOWER(rdb$owner_name)) AS \"Owner\",
          CASE rdb$procedure_type
            WHEN 1 THEN TRIM('Selectable')
            WHEN 2 THEN TRIM('Executable')
            ELSE TRIM('Legacy')
          END AS \"Type\",
          COALESCE(CAST(rdb$description AS VARCHAR(80)), '') AS \"Description\"
     FROM rdb$procedures
    WHERE 1 = 1
",
    );
    filter(&mut sql, pattern, "rdb$procedure_name", false);
    sql.push_str(" ORDER BY 1");
    sql
}

pub fn sequences_query(pattern: Option<&str>, show_system: bool) -> String {
    let mut sql = String::from(
        "   SELECT TRIM(LOWER(rdb$generator_name)) AS \"Name\",
          rdb$generator_id AS \"Id\",
          COALESCE(CAST(rdb$description AS VARCHAR(80)), '') AS \"Description\"
     FROM rdb$generators
    WHERE 1 = 1
",
    );
    filter(&mut sql, pattern, "rdb$generator_name", !show_system);
    sql.push_str(" ORDER BY 1");
    sql
}

pub fn tables_query(pattern: Option<&str>, show_system: bool) -> String {
    let mut sql = String::from(
        "   SELECT TRIM(LOWER(rdb$relation_name)) AS \"Name\",
          TRIM(LOWER(rdb$owner_name)) AS \"Owner\",
          COALESCE(CAST(rdb$description AS VARCHAR(80)), '') AS \"Description\"
     FROM rdb$relations
    WHERE rdb$view_blr IS NULL
",
    );
    filter(&mut sql, pattern, "rdb$relation_name", !show_system);
    sql.push_str(" ORDER BY 1");
    sql
}

pub fn views_query(pattern: Option<&str>) -> String {
    let mut sql = String::from(
        "   SELECT TRIM(LOWER(rdb$relation_name)) AS \"Name\",
          TRIM(LOWER(rdb$owner_name)) AS \"Owner\",
          COALESCE(CAST(rdb$description AS VARCHAR(80)), '') AS \"Description\"
     FROM rdb$relations
    WHERE rdb$view_blr IS NOT NULL
",
    );
    filter(&mut sql, pattern, "rdb$relation_name", false);
    sql.push_str(" ORDER BY 1");
    sql
}

const USERS_QUERY: &str = "    SELECT DISTINCT TRIM(rdb$user) AS \"User\"
      FROM rdb$user_privileges
  ORDER BY 1";

const ACTIVITY_QUERY: &str = "    SELECT TRIM(mon$user) AS \"User\",
           mon$timestamp AS \"Connection start\",
           mon$remote_address AS \"Client address\",
           COALESCE(mon$remote_process, '-') AS \"Client application\",
           TRIM(mon$role) AS \"Role\",
           mon$state AS \"State\",
           mon$server_pid AS \"Server PID\",
           mon$remote_pid AS \"Client PID\",
           TRIM(rdb$character_set_name) AS \"Client encoding\"
      FROM mon$attachments
INNER JOIN rdb$character_sets
        ON mon$character_set_id = rdb$character_set_id";

const DATABASE_INFO_QUERY: &str = " SELECT mon$database_name AS \"Name\",
        mon$sql_dialect AS \"SQL Dialect\",
        mon$creation_date AS \"Creation Date\",
        mon$pages * mon$page_size AS \"Size (bytes)\",
        TRIM(rdb$character_set_name) AS \"Encoding\",
        COALESCE(CAST(rdb$description AS VARCHAR(80)), '') AS \"Description\"
   FROM mon$database, rdb$database";

const SET_INDEX_STATISTICS: &str = "EXECUTE BLOCK AS
  DECLARE VARIABLE index_name VARCHAR(31);
BEGIN
  FOR SELECT rdb$index_name FROM rdb$indices INTO :index_name DO
    EXECUTE STATEMENT 'SET statistics INDEX ' || :index_name || ';';
END";

fn print_titled(session: &mut Session, title: &str, query: &str) {
    let opts = session.settings.format.titled(title);
    exec_print(session, query, &opts);
}

pub fn list_functions(session: &mut Session, pattern: Option<&str>) {
    print_titled(session, "List of functions", &functions_query(pattern));
}

pub fn list_indexes(
    session: &mut Session,
    pattern: Option<&str>,
    show_system: bool,
    show_extended: bool,
) {
    let query = indexes_query(pattern, show_system, show_extended);
    print_titled(session, "List of indexes", &query);
}

pub fn list_procedures(session: &mut Session, pattern: Option<&str>) {
    print_titled(session, "List of procedures", &procedures_query(pattern));
}

pub fn list_sequences(session: &mut Session, pattern: Option<&str>, show_system: bool) {
    print_titled(session, "List of sequences", &sequences_query(pattern, show_system));
}

pub fn list_tables(session: &mut Session, pattern: Option<&str>, show_system: bool) {
    print_titled(session, "List of tables", &tables_query(pattern, show_system));
}

pub fn list_views(session: &mut Session, pattern: Option<&str>) {
    print_titled(session, "List of views", &views_query(pattern));
}

pub fn list_users(session: &mut Session) {
    print_titled(session, "List of users", USERS_QUERY);
}

pub fn show_activity(session: &mut Session) {
    print_titled(session, "Current activity", ACTIVITY_QUERY);
}

pub fn show_database_info(session: &mut Session) {
    print_titled(session, "Database information", DATABASE_INFO_QUERY);
}

/// `\util OPTION`
pub fn exec_util(session: &mut Session, option: &str) -> bool {
    if option.starts_with("set_index_statistics") {
        return set_index_statistics(session);
    }

    session.eprintln(format!("Unknown \\util option \"{}\"", option));
    false
}

fn set_index_statistics(session: &mut Session) -> bool {
    let result = session.conn.execute(SET_INDEX_STATISTICS);
    if result.status() != ResultStatus::CommandOk {
        session.eprintln("error updating index statistics");
        return false;
    }

    session.println("Index statistics updated");
    true
}
