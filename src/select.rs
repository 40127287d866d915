//! Typed select helpers.
//!
//! Every helper prepares `sql` (exactly one statement) on the given connection (a `Transaction` derefs
//! to a `Connection`, so they work inside transactions too), checks the column
//! count before running anything, then steps the rows and checks the row count.

use std::collections::HashMap;

use rusqlite::{Batch, Connection, Params, Row};
use rust_decimal::Decimal;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::decode::Decode;
use crate::error::{Result, SelectError};
use crate::shape::Shape;
use crate::value::Value;

fn decode_at<T: Decode>(row: &Row<'_>, idx: usize, names: &[String]) -> Result<T> {
    let value = row.get_ref(idx)?;
    T::decode(value).map_err(|source| SelectError::Decode {
        column: names[idx].clone(),
        source,
    })
}

/// Runs `sql` and maps each row through `f`, enforcing `shape`.
fn collect_rows<P, T, F>(
    conn: &Connection,
    sql: &str,
    params: P,
    shape: Shape,
    mut f: F,
) -> Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>, &[String]) -> Result<T>,
{
    trace!(sql, ?shape, "preparing select");
    let mut batch = Batch::new(conn, sql);
    let Some(mut stmt) = batch.next()? else {
        debug!(?shape, "select rejected: empty statement");
        return Err(SelectError::NoColumns);
    };
    // Anything after the first statement would be silently dropped.
    if !matches!(batch.next(), Ok(None)) {
        debug!(?shape, "select rejected: trailing statement");
        return Err(rusqlite::Error::MultipleStatement.into());
    }
    let column_count = stmt.column_count();
    if let Err(err) = shape.check_columns(column_count) {
        debug!(?shape, column_count, %err, "select rejected");
        return Err(err);
    }
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params)?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        if let Err(err) = shape.admit_row(out.len()) {
            debug!(?shape, column_count, %err, "select rejected");
            return Err(err);
        }
        out.push(f(row, &names)?);
    }
    if let Err(err) = shape.finish(out.len()) {
        debug!(?shape, column_count, %err, "select rejected");
        return Err(err);
    }

    debug!(?shape, column_count, rows = out.len(), "select finished");
    Ok(out)
}

fn only<T>(mut rows: Vec<T>) -> Result<T> {
    // collect_rows already enforced exactly one row for single-row shapes.
    rows.pop().ok_or(SelectError::NoRows)
}

fn to_map(row: &Row<'_>, names: &[String]) -> Result<HashMap<String, Value>> {
    let mut map = HashMap::with_capacity(names.len());
    for (idx, name) in names.iter().enumerate() {
        map.insert(name.clone(), decode_at::<Value>(row, idx, names)?);
    }
    Ok(map)
}

fn to_string_map(row: &Row<'_>, names: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::with_capacity(names.len());
    for (idx, name) in names.iter().enumerate() {
        map.insert(name.clone(), decode_at::<String>(row, idx, names)?);
    }
    Ok(map)
}

fn to_values(row: &Row<'_>, names: &[String]) -> Result<Vec<Value>> {
    (0..names.len())
        .map(|idx| decode_at::<Value>(row, idx, names))
        .collect()
}

/// One row, one column, decoded as `T`.
pub fn select_value<T: Decode, P: Params>(conn: &Connection, sql: &str, params: P) -> Result<T> {
    only(collect_rows(conn, sql, params, Shape::Value, |row, names| {
        decode_at(row, 0, names)
    })?)
}

/// Any number of rows of a single column, decoded as `T`.
pub fn select_column<T: Decode, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>> {
    collect_rows(conn, sql, params, Shape::Column, |row, names| {
        decode_at(row, 0, names)
    })
}

/// One row with any number of columns, in column order.
pub fn select_row<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Value>> {
    only(collect_rows(conn, sql, params, Shape::Row, to_values)?)
}

/// Any number of rows with any number of columns.
pub fn select_rows<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Vec<Value>>> {
    collect_rows(conn, sql, params, Shape::Rows, to_values)
}

/// One value rendered as a string; numbers use their decimal rendering.
pub fn select_string<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<String> {
    select_value(conn, sql, params)
}

/// One column rendered as strings.
pub fn select_string_column<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<String>> {
    select_column(conn, sql, params)
}

/// One value as raw bytes; integers and reals come back big-endian.
pub fn select_bytes<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<u8>> {
    select_value(conn, sql, params)
}

/// One column as raw bytes.
pub fn select_bytes_column<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Vec<u8>>> {
    select_column(conn, sql, params)
}

/// One integer. Integral reals and numeric text are accepted.
pub fn select_i64<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<i64> {
    select_value(conn, sql, params)
}

/// One column of integers.
pub fn select_i64_column<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<i64>> {
    select_column(conn, sql, params)
}

/// One float. Integers are widened.
pub fn select_f64<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<f64> {
    select_value(conn, sql, params)
}

/// One column of floats.
pub fn select_f64_column<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<f64>> {
    select_column(conn, sql, params)
}

/// One exact decimal; reals go through their shortest rendering.
pub fn select_decimal<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Decimal> {
    select_value(conn, sql, params)
}

/// One column of decimals.
pub fn select_decimal_column<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Decimal>> {
    select_column(conn, sql, params)
}

/// One UUID from text or a 16-byte blob.
pub fn select_uuid<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Uuid> {
    select_value(conn, sql, params)
}

/// One column of UUIDs.
pub fn select_uuid_column<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Uuid>> {
    select_column(conn, sql, params)
}

/// Single value of whatever type the database returned; NULL is [`Value::Null`].
pub fn select_any<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Value> {
    select_value(conn, sql, params)
}

/// One column of dynamic values.
pub fn select_any_column<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Value>> {
    select_column(conn, sql, params)
}

/// One row as a column name to value map. Duplicate names keep the last column.
pub fn select_map<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<HashMap<String, Value>> {
    only(collect_rows(conn, sql, params, Shape::Row, to_map)?)
}

/// Every row as a column name to value map.
pub fn select_map_column<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<HashMap<String, Value>>> {
    collect_rows(conn, sql, params, Shape::Rows, to_map)
}

/// One row with every column rendered as a string. NULL columns are an error.
pub fn select_string_map<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<HashMap<String, String>> {
    only(collect_rows(conn, sql, params, Shape::Row, to_string_map)?)
}

/// Every row as a column name to string map.
pub fn select_string_map_column<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<HashMap<String, String>>> {
    collect_rows(conn, sql, params, Shape::Rows, to_string_map)
}
