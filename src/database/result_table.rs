/*!
 * Materialisation of query results.
 *
 * A `ResultTable` holds every row a statement returned, copied out of the
 * SQLite cursor into owned, dynamically typed cells. The column layout is
 * taken from the first row and reused for all the following ones.
 */

use log::debug;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Params, Row};

use crate::errors::{MemoError, Result};

/// Type of a result column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    /// 64-bit signed integer
    Integer,
    /// UTF-8 text
    Text,
}

/// A single value of a result row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// 64-bit signed integer
    Integer(i64),
    /// Owned UTF-8 text
    Text(String),
}

impl Cell {
    /// Type tag of this cell
    pub fn cell_type(&self) -> CellType {
        match self {
            Cell::Integer(_) => CellType::Integer,
            Cell::Text(_) => CellType::Text,
        }
    }

    /// Integer value, if this is an integer cell
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(value) => Some(*value),
            Cell::Text(_) => None,
        }
    }

    /// Text value, if this is a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value.as_str()),
            Cell::Integer(_) => None,
        }
    }
}

/// In-memory copy of a statement's result rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<Vec<Cell>>,
    column_types: Vec<CellType>,
}

impl ResultTable {
    /// Create an empty table, ready to be passed as a sink to `execute`
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of materialised rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, zero until the first row arrives
    pub fn column_count(&self) -> usize {
        self.column_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column layout determined from the first row
    pub fn column_types(&self) -> &[CellType] {
        &self.column_types
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Cell at the given position, if it exists
    pub fn get(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Integer at the given position
    pub fn integer(&self, row: usize, column: usize) -> Result<i64> {
        self.cell(row, column)?
            .as_integer()
            .ok_or_else(|| MemoError::MalformedResult {
                row,
                column,
                message: "expected an integer".to_string(),
            })
    }

    /// Text at the given position
    pub fn text(&self, row: usize, column: usize) -> Result<&str> {
        self.cell(row, column)?
            .as_text()
            .ok_or_else(|| MemoError::MalformedResult {
                row,
                column,
                message: "expected text".to_string(),
            })
    }

    fn cell(&self, row: usize, column: usize) -> Result<&Cell> {
        self.get(row, column).ok_or_else(|| MemoError::MalformedResult {
            row,
            column,
            message: format!(
                "out of range for a {}x{} result",
                self.row_count(),
                self.column_count()
            ),
        })
    }

    /// Copy one cursor row into the table
    fn push_row(&mut self, row: &Row<'_>, column_count: usize) -> Result<()> {
        let index = self.rows.len();
        if index == 0 && self.column_types.is_empty() {
            self.column_types = (0..column_count)
                .map(|column| cell_type_of(value_at(row, index, column)?, column))
                .collect::<Result<Vec<_>>>()?;
        }

        let cells = self
            .column_types
            .iter()
            .enumerate()
            .map(|(column, expected)| {
                read_cell(value_at(row, index, column)?, *expected, index, column)
            })
            .collect::<Result<Vec<_>>>()?;

        self.rows.push(cells);
        Ok(())
    }
}

/// Execute a query on the connection.
///
/// When `sink` is given, every returned row is appended to it. Without a
/// sink the rows are stepped through and dropped, which is what statements
/// executed only for their side effects want.
pub fn execute<P: Params>(
    conn: &Connection,
    query: &str,
    params: P,
    mut sink: Option<&mut ResultTable>,
) -> Result<()> {
    debug!("Executing query: {}", query);

    let mut stmt = conn.prepare(query).map_err(|source| MemoError::QueryParse {
        query: query.to_string(),
        source,
    })?;
    let column_count = stmt.column_count();

    // Rows of one table share a single layout.
    if let Some(table) = sink.as_deref() {
        if table.column_count() > 0 && table.column_count() != column_count {
            return Err(MemoError::MalformedResult {
                row: table.row_count(),
                column: column_count.min(table.column_count()),
                message: format!(
                    "query returns {} columns, the sink holds {}",
                    column_count,
                    table.column_count()
                ),
            });
        }
    }

    {
        let execution_error = |source: rusqlite::Error| MemoError::QueryExecution {
            query: query.to_string(),
            source,
        };
        let mut rows = stmt.query(params).map_err(execution_error)?;
        while let Some(row) = rows.next().map_err(execution_error)? {
            if let Some(table) = sink.as_deref_mut() {
                table.push_row(row, column_count)?;
            }
        }
    }

    stmt.finalize().map_err(|source| MemoError::QueryFinalize {
        query: query.to_string(),
        source,
    })
}

fn value_at<'a>(row: &'a Row<'_>, index: usize, column: usize) -> Result<ValueRef<'a>> {
    row.get_ref(column).map_err(|_| MemoError::MalformedResult {
        row: index,
        column,
        message: "column missing from cursor row".to_string(),
    })
}

fn cell_type_of(value: ValueRef<'_>, column: usize) -> Result<CellType> {
    match value {
        ValueRef::Integer(_) => Ok(CellType::Integer),
        ValueRef::Text(_) => Ok(CellType::Text),
        other => Err(MemoError::UnsupportedColumnType {
            column,
            type_name: other.data_type().to_string(),
        }),
    }
}

fn read_cell(value: ValueRef<'_>, expected: CellType, index: usize, column: usize) -> Result<Cell> {
    match (expected, value) {
        (CellType::Integer, ValueRef::Integer(number)) => Ok(Cell::Integer(number)),
        (CellType::Text, ValueRef::Text(_)) => {
            let text = value.as_str().map_err(|e| MemoError::MalformedResult {
                row: index,
                column,
                message: format!("invalid UTF-8 text: {}", e),
            })?;
            Ok(Cell::Text(text.to_owned()))
        }
        (_, other) => Err(MemoError::UnsupportedColumnType {
            column,
            type_name: other.data_type().to_string(),
        }),
    }
}
