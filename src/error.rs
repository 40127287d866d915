use thiserror::Error;

/// Failure to turn a single column value into the requested Rust type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("cannot decode NULL into {target}")]
    UnexpectedNull { target: &'static str },

    #[error("cannot decode {found} into {target}")]
    InvalidType {
        found: &'static str,
        target: &'static str,
    },

    #[error("value out of range for {target}")]
    OutOfRange { target: &'static str },

    #[error("cannot parse {target}: {message}")]
    Parse {
        target: &'static str,
        message: String,
    },
}

/// Error returned by every select helper.
///
/// The first four variants are shape mismatches detected locally. Anything the
/// driver reports is passed through unchanged as [`SelectError::Sqlite`].
#[derive(Error, Debug)]
pub enum SelectError {
    #[error("no rows in result set")]
    NoRows,

    #[error("multiple rows in result set")]
    MultipleRows,

    #[error("no columns in result set")]
    NoColumns,

    #[error("multiple columns in result set")]
    MultipleColumns,

    #[error("column \"{column}\": {source}")]
    Decode {
        column: String,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl SelectError {
    /// True for the row/column cardinality errors.
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            SelectError::NoRows
                | SelectError::MultipleRows
                | SelectError::NoColumns
                | SelectError::MultipleColumns
        )
    }
}

pub type Result<T> = std::result::Result<T, SelectError>;
