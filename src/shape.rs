use crate::error::{Result, SelectError};

/// The cardinality a caller expects from a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Exactly one row with exactly one column.
    Value,
    /// Exactly one row with any number of columns.
    Row,
    /// Any number of rows with exactly one column.
    Column,
    /// Any number of rows with any number of columns.
    Rows,
}

impl Shape {
    pub fn single_row(self) -> bool {
        matches!(self, Shape::Value | Shape::Row)
    }

    pub fn single_column(self) -> bool {
        matches!(self, Shape::Value | Shape::Column)
    }

    /// Validates the column count of a prepared statement.
    pub fn check_columns(self, column_count: usize) -> Result<()> {
        match column_count {
            0 => Err(SelectError::NoColumns),
            1 => Ok(()),
            _ if self.single_column() => Err(SelectError::MultipleColumns),
            _ => Ok(()),
        }
    }

    /// Called before accepting the row at `index` (zero based).
    pub fn admit_row(self, index: usize) -> Result<()> {
        if index > 0 && self.single_row() {
            return Err(SelectError::MultipleRows);
        }
        Ok(())
    }

    /// Called once the result is exhausted after `rows` rows.
    pub fn finish(self, rows: usize) -> Result<()> {
        if rows == 0 && self.single_row() {
            return Err(SelectError::NoRows);
        }
        Ok(())
    }
}
