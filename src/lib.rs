//! Typed select helpers for SQLite.
//!
//! # Intention
//!
//! - Fetch a statement's result as a single value, a single row, or a single
//!   column, decoded into the Rust type the caller asks for.
//! - Report shape mismatches (no rows, multiple rows, no columns, multiple
//!   columns) separately from errors raised by the driver.
//!
//! # Architectural Boundaries
//!
//! - Works on an already-open `rusqlite::Connection` or `Transaction`.
//! - Opening connections, transactions, migrations and pooling belong to the
//!   caller.
//!
//! ```rust,ignore
//! use sqlite_select::{select_i64, select_map};
//!
//! let conn = rusqlite::Connection::open_in_memory()?;
//! let n = select_i64(&conn, "select 40 + 2", [])?;
//! let person = select_map(&conn, "select 'Adam' as name, 72 as height", [])?;
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod query;
pub mod select;
pub mod service;
pub mod shape;
pub mod value;

pub use config::SelectConfig;
pub use decode::Decode;
pub use error::{DecodeError, Result, SelectError};
pub use query::{Params, SqlQuery};
pub use select::*;
pub use service::{AsyncSelect, SelectService};
pub use shape::Shape;
pub use value::Value;

pub use rust_decimal::Decimal;
pub use uuid::Uuid;
