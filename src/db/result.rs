//! Query results as returned by a [`Connection`](super::Connection)

use unicode_width::UnicodeWidthStr;

/// Outcome of executing a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStatus {
    /// Nothing to execute (empty statement)
    EmptyQuery,
    /// Rows are available
    TuplesOk,
    /// Statement executed, no rows returned
    CommandOk,
    TransactionStart,
    TransactionCommit,
    TransactionRollback,
    NonfatalError,
    FatalError,
}

impl ResultStatus {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ResultStatus::EmptyQuery | ResultStatus::NonfatalError | ResultStatus::FatalError
        )
    }
}

/// Column type tag; drives justification and special-case rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Decimal,
    Text,
    Blob,
    Date,
    Time,
    Timestamp,
    Boolean,
    /// Binary row locator (`RDB$DB_KEY`)
    DbKey,
}

impl ColumnType {
    /// Numeric columns are right-justified in aligned output
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Integer | ColumnType::Float | ColumnType::Decimal
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Binary(Vec<u8>),
}

/// A single value; `value` is `None` for SQL NULL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    value: Option<CellValue>,
    display_width: usize,
}

impl Cell {
    pub fn null() -> Self {
        Self {
            value: None,
            display_width: 0,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        let display_width = UnicodeWidthStr::width(value.as_str());
        Self {
            value: Some(CellValue::Text(value)),
            display_width,
        }
    }

    pub fn binary(bytes: Vec<u8>) -> Self {
        let display_width = bytes.len() * 2;
        Self {
            value: Some(CellValue::Binary(bytes)),
            display_width,
        }
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    pub fn value(&self) -> Option<&CellValue> {
        self.value.as_ref()
    }

    /// Text content, if the cell is a non-null text value
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Some(CellValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Terminal columns the value occupies, not its byte length
    pub fn display_width(&self) -> usize {
        self.display_width
    }
}

/// Error details attached to a failed result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryError {
    pub message: String,
    /// Diagnostic fields such as SQLSTATE or the engine error code
    pub fields: Vec<(String, String)>,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

/// Tabular result of a statement, tagged with its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    status: ResultStatus,
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
    error: Option<QueryError>,
}

impl ResultSet {
    pub fn tuples(columns: Vec<Column>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            status: ResultStatus::TuplesOk,
            columns,
            rows,
            error: None,
        }
    }

    /// A row-less result with a non-error status
    pub fn with_status(status: ResultStatus) -> Self {
        Self {
            status,
            columns: Vec::new(),
            rows: Vec::new(),
            error: None,
        }
    }

    pub fn command_ok() -> Self {
        Self::with_status(ResultStatus::CommandOk)
    }

    pub fn error(status: ResultStatus, error: QueryError) -> Self {
        Self {
            status,
            columns: Vec::new(),
            rows: Vec::new(),
            error: Some(error),
        }
    }

    pub fn status(&self) -> ResultStatus {
        self.status
    }

    pub fn error_detail(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn ntuples(&self) -> usize {
        self.rows.len()
    }

    pub fn nfields(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Text of a cell, `None` if out of range, NULL or binary
    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.cell(row, column).and_then(Cell::as_str)
    }

    pub fn column_has_null(&self, column: usize) -> bool {
        self.rows
            .iter()
            .any(|row| row.get(column).map_or(false, Cell::is_null))
    }

    /// Widest non-null display width in a column
    pub fn column_max_width(&self, column: usize) -> usize {
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|cell| !cell.is_null())
            .map(Cell::display_width)
            .max()
            .unwrap_or(0)
    }
}
