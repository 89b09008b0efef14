//! `\d NAME`: describe a table, view or index

use once_cell::sync::Lazy;
use regex::Regex;

use super::catalog::quote_literal;
use crate::db::{exec_internal, exec_print, report_error, ResultSet, ResultStatus};
use crate::session::Session;

static QUOTED_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"((?:[^"]|"")*)"$"#).expect("valid identifier regex"));

/// Column type rendering shared by the describe queries
const FIELD_TYPE: &str = "          CASE f.rdb$field_type
            WHEN 261 THEN 'BLOB'
            WHEN 14  THEN 'CHAR(' || f.rdb$field_length || ')'
            WHEN 40  THEN 'CSTRING'
            WHEN 11  THEN 'D_FLOAT'
            WHEN 27  THEN 'DOUBLE'
            WHEN 10  THEN 'FLOAT'
            WHEN 16  THEN
              CASE f.rdb$field_sub_type
                WHEN 1 THEN 'NUMERIC(' || f.rdb$field_precision || ',' || (-f.rdb$field_scale) || ')'
                WHEN 2 THEN 'DECIMAL(' || f.rdb$field_precision || ',' || (-f.rdb$field_scale) || ')'
                ELSE 'BIGINT'
              END
            WHEN 8   THEN
              CASE f.rdb$field_sub_type
                WHEN 1 THEN 'NUMERIC(' || f.rdb$field_precision || ',' || (-f.rdb$field_scale) || ')'
                WHEN 2 THEN 'DECIMAL(' || f.rdb$field_precision || ',' || (-f.rdb$field_scale) || ')'
                ELSE 'INTEGER'
              END
            WHEN 9   THEN 'QUAD'
            WHEN 7   THEN
              CASE f.rdb$field_sub_type
                WHEN 1 THEN 'NUMERIC(' || f.rdb$field_precision || ',' || (-f.rdb$field_scale) || ')'
                WHEN 2 THEN 'DECIMAL(' || f.rdb$field_precision || ',' || (-f.rdb$field_scale) || ')'
                ELSE 'SMALLINT'
              END
            WHEN 12  THEN 'DATE'
            WHEN 13  THEN 'TIME'
            WHEN 35  THEN 'TIMESTAMP'
            WHEN 37  THEN 'VARCHAR(' || f.rdb$field_length || ')'
            ELSE 'UNKNOWN'
          END AS \"Field type\",
";

/// Kind of catalog object a name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Table,
    View,
    Index,
}

/// Lower-cased catalog key for a user-supplied object name.
///
/// A double-quoted identifier loses its quotes and any doubled quotes
/// inside are collapsed.
pub fn object_key(name: &str) -> String {
    let name = match QUOTED_IDENTIFIER.captures(name) {
        Some(caps) => caps[1].replace("\"\"", "\""),
        None => name.to_string(),
    };
    name.to_lowercase()
}

pub fn object_kind_query(key: &str) -> String {
    let key = quote_literal(key);
    format!(
        " SELECT 't' AS objtype
   FROM rdb$relations
  WHERE TRIM(LOWER(rdb$relation_name)) = '{key}'
    AND rdb$view_blr IS NULL
  UNION
 SELECT 'v' AS objtype
   FROM rdb$relations
  WHERE TRIM(LOWER(rdb$relation_name)) = '{key}'
    AND rdb$view_blr IS NOT NULL
  UNION
 SELECT 'i' AS objtype
   FROM rdb$indices
  WHERE TRIM(LOWER(rdb$index_name)) = '{key}'"
    )
}

fn parse_kind(code: &str) -> Option<ObjectKind> {
    match code.trim() {
        "t" => Some(ObjectKind::Table),
        "v" => Some(ObjectKind::View),
        "i" => Some(ObjectKind::Index),
        _ => None,
    }
}

pub fn describe_object(session: &mut Session, name: &str) {
    let key = object_key(name);
    let result = exec_internal(session, &object_kind_query(&key));

    if result.status() != ResultStatus::TuplesOk {
        report_error(session, &result);
        return;
    }

    if result.ntuples() == 0 {
        session.println("No object found");
        return;
    }

    let code = result.value(0, 0).unwrap_or_default();
    match parse_kind(code) {
        Some(ObjectKind::Table) => describe_table(session, &key),
        Some(ObjectKind::View) => describe_view(session, &key),
        Some(ObjectKind::Index) => describe_index(session, &key),
        None => session.println(format!("Unknown object type {}", code)),
    }
}

fn print_object(session: &mut Session, kind: &str, key: &str, query: &str) {
    let opts = session.settings.format.titled(format!("{} \"{}\"", kind, key));
    exec_print(session, query, &opts);
}

/// Run a helper query, yielding rows only on success
fn helper_rows(session: &mut Session, query: &str) -> Option<ResultSet> {
    let result = exec_internal(session, query);
    if result.status() == ResultStatus::TuplesOk && result.ntuples() > 0 {
        Some(result)
    } else {
        None
    }
}

fn describe_table(session: &mut Session, key: &str) {
    let lit = quote_literal(key);
    let columns = format!(
        "  SELECT TRIM(LOWER(rf.rdb$field_name)) AS \"Column\",
{FIELD_TYPE}         CASE WHEN rf.rdb$null_flag <> 0 THEN TRIM('NOT NULL') ELSE '' END AS \"Modifiers\",
         COALESCE(CAST(rf.rdb$default_source AS VARCHAR(80)), '') AS \"Default value\",
         COALESCE(CAST(rf.rdb$description AS VARCHAR(80)), '') AS \"Description\"
    FROM rdb$relation_fields rf
LEFT JOIN rdb$fields f
      ON rf.rdb$field_source = f.rdb$field_name
   WHERE TRIM(LOWER(rf.rdb$relation_name)) = '{lit}'
ORDER BY rf.rdb$field_position"
    );
    print_object(session, "Table", key, &columns);

    let indexes = format!(
        "    SELECT LOWER(TRIM(i.rdb$index_name)) AS index_name,
           TRIM(COALESCE(rc.rdb$constraint_type, '')) AS constraint_type
      FROM rdb$indices i
 LEFT JOIN rdb$relation_constraints rc
        ON rc.rdb$index_name = i.rdb$index_name
     WHERE TRIM(LOWER(i.rdb$relation_name)) = '{lit}'
       AND i.rdb$foreign_key IS NULL"
    );
    if let Some(result) = helper_rows(session, &indexes) {
        session.println("Indexes:");
        for row in 0..result.ntuples() {
            let index_name = result.value(row, 0).unwrap_or_default();
            let segments = index_segments(session, index_name);
            let mut line = format!("  {}", index_name);
            match result.value(row, 1) {
                Some(constraint) if !constraint.is_empty() => {
                    line.push(' ');
                    line.push_str(constraint);
                }
                _ => {}
            }
            line.push_str(&format!(" ({})", segments));
            session.println(line);
        }
    }

    let foreign_keys = format!(
        "    SELECT LOWER(TRIM(from_table.rdb$index_name)) AS index_name,
           LOWER(TRIM(from_field.rdb$field_name)) AS from_field,
           LOWER(TRIM(to_table.rdb$relation_name)) AS to_table,
           LOWER(TRIM(to_field.rdb$field_name)) AS to_field,
           TRIM(refc.rdb$update_rule) AS on_update,
           TRIM(refc.rdb$delete_rule) AS on_delete,
           TRIM(rc.rdb$deferrable) AS is_deferrable,
           TRIM(rc.rdb$initially_deferred) AS is_deferred
      FROM rdb$indices from_table
INNER JOIN rdb$index_segments from_field
        ON from_field.rdb$index_name = from_table.rdb$index_name
INNER JOIN rdb$indices to_table
        ON to_table.rdb$index_name = from_table.rdb$foreign_key
INNER JOIN rdb$index_segments to_field
        ON to_table.rdb$index_name = to_field.rdb$index_name
 LEFT JOIN rdb$relation_constraints rc
        ON rc.rdb$index_name = from_table.rdb$index_name
 LEFT JOIN rdb$ref_constraints refc
        ON rc.rdb$constraint_name = refc.rdb$constraint_name
     WHERE TRIM(LOWER(from_table.rdb$relation_name)) = '{lit}'
       AND from_table.rdb$foreign_key IS NOT NULL"
    );
    if let Some(result) = helper_rows(session, &foreign_keys) {
        session.println("Foreign keys:");
        for row in 0..result.ntuples() {
            let field = |col: usize| result.value(row, col).unwrap_or_default();
            let mut line = format!(
                "  {} FOREIGN KEY ({}) REFERENCES {} ({})",
                field(0),
                field(1),
                field(2),
                field(3)
            );
            if !field(4).is_empty() && field(4) != "NO ACTION" {
                line.push_str(&format!(" ON UPDATE {}", field(4)));
            }
            if !field(5).is_empty() && field(5) != "NO ACTION" {
                line.push_str(&format!(" ON DELETE {}", field(5)));
            }
            if field(6) == "YES" {
                line.push_str(" DEFERRABLE");
            }
            if field(7) == "YES" {
                line.push_str(" INITIALLY DEFERRED");
            }
            session.println(line);
        }
    }

    let triggers = format!(
        "    SELECT LOWER(TRIM(t.rdb$trigger_name)) AS trigger_name,
           CASE t.rdb$trigger_type
             WHEN 1 THEN TRIM('BEFORE INSERT')
             WHEN 2 THEN TRIM('AFTER INSERT')
             WHEN 3 THEN TRIM('BEFORE UPDATE')
             WHEN 4 THEN TRIM('AFTER UPDATE')
             WHEN 5 THEN TRIM('BEFORE DELETE')
             WHEN 6 THEN TRIM('AFTER DELETE')
           END AS trigger_type,
           CASE t.rdb$trigger_inactive
             WHEN 1 THEN 0 ELSE 1
           END AS trigger_active
      FROM rdb$triggers t
     WHERE TRIM(LOWER(t.rdb$relation_name)) = '{lit}'
       AND t.rdb$system_flag = 0
  ORDER BY t.rdb$trigger_name"
    );
    if let Some(result) = helper_rows(session, &triggers) {
        session.println("");
        session.println("Triggers:");
        for row in 0..result.ntuples() {
            let state = if result.value(row, 2) == Some("1") {
                "active"
            } else {
                "inactive"
            };
            let line = format!(
                "  {}: {} ({})",
                result.value(row, 0).unwrap_or_default(),
                result.value(row, 1).unwrap_or_default(),
                state
            );
            session.println(line);
        }
    }

    session.println("");
}

fn index_segments(session: &mut Session, index_name: &str) -> String {
    let query = format!(
        "    SELECT TRIM(LOWER(rdb$field_name)) AS field_name
      FROM rdb$index_segments
     WHERE TRIM(LOWER(rdb$index_name)) = '{}'
  ORDER BY rdb$field_position",
        quote_literal(index_name)
    );

    match helper_rows(session, &query) {
        Some(result) => (0..result.ntuples())
            .filter_map(|row| result.value(row, 0))
            .collect::<Vec<_>>()
            .join(", "),
        None => String::new(),
    }
}

fn describe_view(session: &mut Session, key: &str) {
    let query = format!(
        "    SELECT TRIM(LOWER(r.rdb$field_name)) AS \"Column\",
{FIELD_TYPE}           COALESCE(CAST(r.rdb$description AS VARCHAR(80)), '') AS \"Description\"
      FROM rdb$relation_fields r
 LEFT JOIN rdb$fields f
        ON r.rdb$field_source = f.rdb$field_name
     WHERE TRIM(LOWER(r.rdb$relation_name)) = '{}'
  ORDER BY r.rdb$field_position",
        quote_literal(key)
    );
    print_object(session, "View", key, &query);
}

fn describe_index(session: &mut Session, key: &str) {
    let lit = quote_literal(key);
    let columns = format!(
        "    SELECT TRIM(LOWER(isg.rdb$field_name)) AS \"Column\",
{FIELD_TYPE}           isg.rdb$statistics AS \"Statistics\"
      FROM rdb$indices i
INNER JOIN rdb$index_segments isg
        ON isg.rdb$index_name = i.rdb$index_name
INNER JOIN rdb$relation_fields rf
        ON (rf.rdb$relation_name = i.rdb$relation_name
            AND isg.rdb$field_name = rf.rdb$field_name)
 LEFT JOIN rdb$fields f
        ON rf.rdb$field_source = f.rdb$field_name
     WHERE TRIM(LOWER(i.rdb$index_name)) = '{lit}'
  ORDER BY isg.rdb$field_position"
    );
    print_object(session, "Index", key, &columns);

    let meta = format!(
        "    SELECT TRIM(LOWER(i.rdb$relation_name)) AS table_name,
           COALESCE(CAST(i.rdb$description AS VARCHAR(80)), '') AS description
      FROM rdb$indices i
     WHERE TRIM(LOWER(i.rdb$index_name)) = '{lit}'"
    );
    if let Some(result) = helper_rows(session, &meta) {
        let table = format!("  Table: {}", result.value(0, 0).unwrap_or_default());
        session.println(table);
        match result.value(0, 1) {
            Some(description) if !description.is_empty() => {
                session.println(format!("  Description: {}", description));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Cell, Column, ColumnType};
    use crate::test_support::{session_with, MockConnection};

    fn one_value(name: &str, value: &str) -> ResultSet {
        ResultSet::tuples(
            vec![Column::new(name, ColumnType::Text)],
            vec![vec![Cell::text(value)]],
        )
    }

    #[test]
    fn test_object_key() {
        assert_eq!(object_key("EMPLOYEE"), "employee");
        assert_eq!(object_key("\"Mixed Case\""), "mixed case");
        assert_eq!(object_key("\"say \"\"hi\"\"\""), "say \"hi\"");
    }

    #[test]
    fn test_unresolved_name() {
        let conn = MockConnection::default();
        conn.respond(
            "objtype",
            ResultSet::tuples(vec![Column::new("OBJTYPE", ColumnType::Text)], Vec::new()),
        );
        let (mut session, out, _err) = session_with(conn);

        describe_object(&mut session, "nothing");
        assert_eq!(out.contents(), "No object found\n");
    }

    #[test]
    fn test_index_description() {
        let conn = MockConnection::default();
        conn.respond("objtype", one_value("OBJTYPE", "i"));
        conn.respond(
            "table_name",
            ResultSet::tuples(
                vec![
                    Column::new("TABLE_NAME", ColumnType::Text),
                    Column::new("DESCRIPTION", ColumnType::Text),
                ],
                vec![vec![Cell::text("employee"), Cell::text("")]],
            ),
        );
        conn.respond("isg.rdb$statistics", one_value("Column", "emp_no"));
        let (mut session, out, _err) = session_with(conn.clone());

        describe_object(&mut session, "RDB$PRIMARY7");

        let text = out.contents();
        assert!(text.contains("Index \"rdb$primary7\""));
        assert!(text.contains("emp_no"));
        assert!(text.ends_with("  Table: employee\n"));
        assert!(conn.executed()[0].contains("'rdb$primary7'"));
    }

    #[test]
    fn test_table_lists_indexes_with_segments() {
        let conn = MockConnection::default();
        conn.respond("objtype", one_value("OBJTYPE", "t"));
        conn.respond("rf.rdb$null_flag", one_value("Column", "id"));
        conn.respond(
            "constraint_type",
            ResultSet::tuples(
                vec![
                    Column::new("INDEX_NAME", ColumnType::Text),
                    Column::new("CONSTRAINT_TYPE", ColumnType::Text),
                ],
                vec![vec![Cell::text("pk_t"), Cell::text("PRIMARY KEY")]],
            ),
        );
        conn.respond("AS field_name", one_value("FIELD_NAME", "id"));
        let (mut session, out, _err) = session_with(conn);

        describe_object(&mut session, "t");

        let text = out.contents();
        assert!(text.contains("Table \"t\""));
        assert!(text.contains("Indexes:\n  pk_t PRIMARY KEY (id)\n"));
        assert!(!text.contains("Foreign keys:"));
    }
}
