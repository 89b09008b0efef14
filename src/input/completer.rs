//! Tab completion for SQL keywords, slash commands and `\format` options

use once_cell::sync::Lazy;
use regex::Regex;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::command_names;
use crate::command::format::FORMAT_OPTIONS;

/// The word being completed: everything after the last break character
static CURRENT_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\s@$><=;|&{}()]*$").expect("valid word regex"));

/// Cursor sits on the first argument of `\format`
static FORMAT_ARGUMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\\format\s+\S*$").expect("valid format regex"));

const SQL_KEYWORDS: &[&str] = &[
    "ALTER", "AND", "AS", "ASC", "BEGIN", "BETWEEN", "BIGINT", "BLOB", "BY", "CASE", "CAST",
    "CHAR", "COALESCE", "COMMIT", "COUNT", "CREATE", "DATABASE", "DATE", "DECIMAL", "DEFAULT",
    "DELETE", "DESC", "DISTINCT", "DOMAIN", "DROP", "ELSE", "END", "EXCEPTION", "EXECUTE",
    "EXISTS", "FIRST", "FROM", "GENERATOR", "GRANT", "GROUP", "HAVING", "IN", "INDEX", "INNER",
    "INSERT", "INTEGER", "INTO", "IS", "JOIN", "KEY", "LEFT", "LIKE", "NOT", "NULL", "NUMERIC",
    "ON", "OR", "ORDER", "PRIMARY", "PROCEDURE", "REFERENCES", "RETURNING", "REVOKE",
    "ROLLBACK", "ROWS", "SELECT", "SEQUENCE", "SET", "SKIP", "SMALLINT", "TABLE", "THEN",
    "TIME", "TIMESTAMP", "TRANSACTION", "TRIGGER", "UNION", "UNIQUE", "UPDATE", "VALUES",
    "VARCHAR", "VIEW", "WHEN", "WHERE", "WITH",
];

/// Line editor helper providing completion
#[derive(Debug, Default)]
pub struct SqlHelper;

impl SqlHelper {
    /// Candidates for the text before the cursor, with the byte offset
    /// where the replaced word starts
    pub fn candidates(&self, before_cursor: &str) -> (usize, Vec<String>) {
        let start = CURRENT_WORD
            .find(before_cursor)
            .map_or(before_cursor.len(), |m| m.start());
        let word = &before_cursor[start..];

        if FORMAT_ARGUMENT.is_match(before_cursor) {
            let options = FORMAT_OPTIONS
                .iter()
                .filter(|option| option.starts_with(word))
                .map(|option| option.to_string())
                .collect();
            return (start, options);
        }

        if word.starts_with('\\') {
            let mut commands: Vec<String> = command_names()
                .map(|name| format!("\\{}", name))
                .filter(|command| command.starts_with(word))
                .collect();
            commands.sort();
            return (start, commands);
        }

        if word.is_empty() {
            return (start, Vec::new());
        }

        let upper = word.to_uppercase();
        let lower_case = word.chars().all(|c| !c.is_uppercase());
        let keywords = SQL_KEYWORDS
            .iter()
            .filter(|keyword| keyword.starts_with(&upper))
            .map(|keyword| {
                if lower_case {
                    keyword.to_lowercase()
                } else {
                    keyword.to_string()
                }
            })
            .collect();
        (start, keywords)
    }
}

impl Completer for SqlHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = self.candidates(&line[..pos]);
        let pairs = candidates
            .into_iter()
            .map(|s| Pair {
                display: s.clone(),
                replacement: s,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for SqlHelper {
    type Hint = String;
}

impl Highlighter for SqlHelper {}

impl Validator for SqlHelper {}

impl Helper for SqlHelper {}
