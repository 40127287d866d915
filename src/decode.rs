//! Coercion of raw column values into Rust types.
//!
//! SQLite has five storage classes and no declared column types at read time,
//! so each target type decides which classes it accepts.

use std::str::FromStr;

use rusqlite::types::ValueRef;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::DecodeError;
use crate::value::{storage_class, Value};

/// A type that can be built from one column value.
pub trait Decode: Sized {
    /// Name used in error messages.
    const TARGET: &'static str;

    fn decode(value: ValueRef<'_>) -> Result<Self, DecodeError>;
}

fn invalid<T: Decode>(value: ValueRef<'_>) -> DecodeError {
    match value {
        ValueRef::Null => DecodeError::UnexpectedNull { target: T::TARGET },
        other => DecodeError::InvalidType {
            found: storage_class(other),
            target: T::TARGET,
        },
    }
}

fn utf8<T: Decode>(bytes: &[u8]) -> Result<&str, DecodeError> {
    std::str::from_utf8(bytes).map_err(|e| DecodeError::Parse {
        target: T::TARGET,
        message: e.to_string(),
    })
}

fn parse<T, V>(text: &str) -> Result<V, DecodeError>
where
    T: Decode,
    V: FromStr,
    V::Err: std::fmt::Display,
{
    text.trim().parse::<V>().map_err(|e| DecodeError::Parse {
        target: T::TARGET,
        message: e.to_string(),
    })
}

impl Decode for String {
    const TARGET: &'static str = "string";

    fn decode(value: ValueRef<'_>) -> Result<Self, DecodeError> {
        match value {
            ValueRef::Integer(i) => Ok(i.to_string()),
            ValueRef::Real(f) => Ok(f.to_string()),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                utf8::<Self>(bytes).map(str::to_string)
            }
            ValueRef::Null => Err(invalid::<Self>(value)),
        }
    }
}

impl Decode for Vec<u8> {
    const TARGET: &'static str = "bytes";

    fn decode(value: ValueRef<'_>) -> Result<Self, DecodeError> {
        match value {
            ValueRef::Integer(i) => Ok(i.to_be_bytes().to_vec()),
            ValueRef::Real(f) => Ok(f.to_be_bytes().to_vec()),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => Ok(bytes.to_vec()),
            ValueRef::Null => Err(invalid::<Self>(value)),
        }
    }
}

impl Decode for i64 {
    const TARGET: &'static str = "i64";

    fn decode(value: ValueRef<'_>) -> Result<Self, DecodeError> {
        match value {
            ValueRef::Integer(i) => Ok(i),
            ValueRef::Real(f) => {
                if f.fract() != 0.0 || !f.is_finite() {
                    return Err(DecodeError::InvalidType {
                        found: "REAL",
                        target: Self::TARGET,
                    });
                }
                // i64::MAX as f64 rounds up to 2^63, which is already out of range.
                if f < i64::MIN as f64 || f >= i64::MAX as f64 {
                    return Err(DecodeError::OutOfRange {
                        target: Self::TARGET,
                    });
                }
                Ok(f as i64)
            }
            ValueRef::Text(bytes) => parse::<Self, i64>(utf8::<Self>(bytes)?),
            _ => Err(invalid::<Self>(value)),
        }
    }
}

impl Decode for f64 {
    const TARGET: &'static str = "f64";

    fn decode(value: ValueRef<'_>) -> Result<Self, DecodeError> {
        match value {
            ValueRef::Integer(i) => Ok(i as f64),
            ValueRef::Real(f) => Ok(f),
            ValueRef::Text(bytes) => parse::<Self, f64>(utf8::<Self>(bytes)?),
            _ => Err(invalid::<Self>(value)),
        }
    }
}

impl Decode for bool {
    const TARGET: &'static str = "bool";

    fn decode(value: ValueRef<'_>) -> Result<Self, DecodeError> {
        match value {
            ValueRef::Integer(i) => Ok(i != 0),
            ValueRef::Text(bytes) => {
                let text = utf8::<Self>(bytes)?.trim().to_ascii_lowercase();
                match text.as_str() {
                    "true" | "t" | "1" => Ok(true),
                    "false" | "f" | "0" => Ok(false),
                    _ => Err(DecodeError::Parse {
                        target: Self::TARGET,
                        message: format!("unrecognized boolean {text:?}"),
                    }),
                }
            }
            _ => Err(invalid::<Self>(value)),
        }
    }
}

impl Decode for Decimal {
    const TARGET: &'static str = "decimal";

    fn decode(value: ValueRef<'_>) -> Result<Self, DecodeError> {
        match value {
            ValueRef::Integer(i) => Ok(Decimal::from(i)),
            // Going through the shortest round-trip rendering keeps 1.2345
            // from turning into 1.2344999999999999307...
            ValueRef::Real(f) => decimal_from_real(f),
            ValueRef::Text(bytes) => decimal_from_text(utf8::<Self>(bytes)?),
            _ => Err(invalid::<Self>(value)),
        }
    }
}

fn decimal_from_real(f: f64) -> Result<Decimal, DecodeError> {
    let out_of_range = DecodeError::OutOfRange {
        target: Decimal::TARGET,
    };
    if !f.is_finite() {
        return Err(out_of_range);
    }
    // The rendering is plain digits, so any failure is a precision or
    // magnitude the decimal cannot hold.
    let d = Decimal::from_str_exact(&f.to_string()).map_err(|_| out_of_range.clone())?;
    if d.is_zero() && f != 0.0 {
        return Err(out_of_range);
    }
    Ok(d)
}

fn decimal_from_text(text: &str) -> Result<Decimal, DecodeError> {
    let text = text.trim();
    match Decimal::from_str_exact(text) {
        Ok(d) => Ok(d),
        Err(rust_decimal::Error::Underflow) => Err(DecodeError::OutOfRange {
            target: Decimal::TARGET,
        }),
        Err(_) => Decimal::from_scientific(text).map_err(|e| DecodeError::Parse {
            target: Decimal::TARGET,
            message: e.to_string(),
        }),
    }
}

impl Decode for Uuid {
    const TARGET: &'static str = "uuid";

    fn decode(value: ValueRef<'_>) -> Result<Self, DecodeError> {
        let parsed = match value {
            ValueRef::Text(bytes) => Uuid::parse_str(utf8::<Self>(bytes)?.trim()),
            ValueRef::Blob(bytes) => Uuid::from_slice(bytes),
            _ => return Err(invalid::<Self>(value)),
        };
        parsed.map_err(|e| DecodeError::Parse {
            target: Self::TARGET,
            message: e.to_string(),
        })
    }
}

impl Decode for Value {
    const TARGET: &'static str = "value";

    fn decode(value: ValueRef<'_>) -> Result<Self, DecodeError> {
        Ok(Value::from(value))
    }
}

impl<T: Decode> Decode for Option<T> {
    const TARGET: &'static str = T::TARGET;

    fn decode(value: ValueRef<'_>) -> Result<Self, DecodeError> {
        match value {
            ValueRef::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }
}
