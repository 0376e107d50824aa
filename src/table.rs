//! Ordered, name-indexed table of cells.
//!
//! A `Table` is a list of equally long columns with unique names. Columns are
//! addressable by name and by position; every name lookup is an explicit
//! failure (`Error::MissingColumn`) rather than an implicit default.
//!
//! Structural operations consume the table and return a new one, so each
//! pipeline step owns its input outright.

use crate::error::{Error, Result};
use crate::types::Cell;
use std::collections::HashMap;

/// A named sequence of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self { name: name.into(), cells }
    }

    /// A column of `len` missing cells
    pub fn missing(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, vec![Cell::Missing; len])
    }

    pub fn non_missing_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_missing()).count()
    }

    pub fn count_matching(&self, symbol: &str) -> usize {
        self.cells.iter().filter(|c| c.matches(symbol)).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    positions: HashMap<String, usize>,
    rows: usize,
}

impl Table {
    /// Build a table, rejecting duplicate names and ragged columns
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        let mut positions = HashMap::with_capacity(columns.len());

        for (i, column) in columns.iter().enumerate() {
            if column.cells.len() != rows {
                return Err(Error::RaggedTable { name: column.name.clone(), expected: rows, found: column.cells.len() });
            }
            if positions.insert(column.name.clone(), i).is_some() {
                return Err(Error::DuplicateColumn { name: column.name.clone() });
            }
        }

        Ok(Self { columns, positions, rows })
    }

    /// Build a table from a header and row-major records
    pub fn from_rows(headers: Vec<String>, records: Vec<Vec<Cell>>) -> Result<Self> {
        let mut columns: Vec<Column> =
            headers.into_iter().map(|name| Column::new(name, Vec::with_capacity(records.len()))).collect();

        for record in records {
            if record.len() != columns.len() {
                let name = columns.get(record.len()).map(|c| c.name.clone()).unwrap_or_default();
                return Err(Error::RaggedTable { name, expected: columns.len(), found: record.len() });
            }
            for (column, cell) in columns.iter_mut().zip(record) {
                column.cells.push(cell);
            }
        }

        Self::new(columns)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no rows left
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn position(&self, name: &str) -> Result<usize> {
        self.positions.get(name).copied().ok_or_else(|| Error::MissingColumn { name: name.to_string() })
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        let idx = self.position(name)?;
        Ok(&self.columns[idx])
    }

    /// Cells of one row, in column order
    pub fn row(&self, row: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c.cells[row]).collect()
    }

    /// Replace the cells of an existing column
    pub fn with_cells(mut self, name: &str, cells: Vec<Cell>) -> Result<Self> {
        let idx = self.position(name)?;
        if cells.len() != self.rows {
            return Err(Error::RaggedTable { name: name.to_string(), expected: self.rows, found: cells.len() });
        }
        self.columns[idx].cells = cells;
        Ok(self)
    }

    /// Rename every column at once; `names` must match the column count
    pub fn with_names(self, names: Vec<String>) -> Result<Self> {
        debug_assert_eq!(names.len(), self.columns.len());
        let columns = self
            .columns
            .into_iter()
            .zip(names)
            .map(|(column, name)| Column::new(name, column.cells))
            .collect();
        Self::new(columns)
    }

    /// Remove the named columns; every name must exist
    pub fn drop_columns<S: AsRef<str>>(self, names: &[S]) -> Result<Self> {
        for name in names {
            self.position(name.as_ref())?;
        }
        let columns =
            self.columns.into_iter().filter(|c| !names.iter().any(|n| n.as_ref() == c.name)).collect();
        Self::new(columns)
    }

    pub fn insert_column(mut self, at: usize, column: Column) -> Result<Self> {
        self.columns.insert(at.min(self.columns.len()), column);
        Self::new(self.columns)
    }

    /// Keep only the rows whose flag is true
    pub fn retain_rows(self, keep: &[bool]) -> Self {
        debug_assert_eq!(keep.len(), self.rows);
        let rows = keep.iter().filter(|k| **k).count();
        let columns = self
            .columns
            .into_iter()
            .map(|column| {
                let cells = column.cells.into_iter().zip(keep).filter(|(_, k)| **k).map(|(c, _)| c).collect();
                Column::new(column.name, cells)
            })
            .collect();
        Self { columns, positions: self.positions, rows }
    }

    /// Swap rows and columns
    ///
    /// Former column names are discarded; the new columns are named by the
    /// former row position (`"0"`, `"1"`, ...).
    pub fn transpose(self) -> Self {
        let width = self.columns.len();
        let mut columns: Vec<Column> =
            (0..self.rows).map(|r| Column::new(r.to_string(), Vec::with_capacity(width))).collect();

        for column in self.columns {
            for (target, cell) in columns.iter_mut().zip(column.cells) {
                target.cells.push(cell);
            }
        }

        let positions = columns.iter().enumerate().map(|(i, c)| (c.name.clone(), i)).collect();
        Self { columns, positions, rows: width }
    }

    /// Apply `f` to every column, keeping names and order
    pub fn map_columns<F>(self, mut f: F) -> Self
    where
        F: FnMut(Column) -> Column,
    {
        let rows = self.rows;
        let columns: Vec<Column> = self.columns.into_iter().map(&mut f).collect();
        debug_assert!(columns.iter().all(|c| c.cells.len() == rows));
        Self { columns, positions: self.positions, rows }
    }
}
