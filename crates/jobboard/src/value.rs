//! Dynamically-typed SQL parameter values.
//!
//! Update records arrive as loosely-typed JSON, so their values can't be bound
//! through a single concrete Rust type. [`SqlValue`] covers the JSON scalars
//! (`string | number | boolean | null`) and picks the wire encoding from the
//! column type Postgres reports for each placeholder. This lets an integer
//! bind to `INTEGER` or `BIGINT`, a whole float like `50000.0` bind to
//! `INTEGER`, a string like `"0.25"` bind to `NUMERIC`, and any scalar bind
//! to a text column.
//!
//! A value that can't be coerced fails with [`BindError`], which
//! [`JobError::from_db_error`] reports as a `BadRequest`.

use bytes::BytesMut;
use rust_decimal::Decimal;
use std::error::Error;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

use crate::error::{JobError, JobResult};

/// A scalar value bound to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl SqlValue {
    /// Convert a JSON value, rejecting arrays and objects.
    pub fn from_json(value: serde_json::Value) -> JobResult<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::String(s) => Ok(Self::Text(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(JobError::bad_request(format!("number out of range: {}", n)))
                }
            }
            Value::Array(_) => Err(JobError::bad_request("arrays are not valid column values")),
            Value::Object(_) => Err(JobError::bad_request("objects are not valid column values")),
        }
    }
}

/// A value that can't be encoded for the column type of its placeholder.
#[derive(Debug, thiserror::Error)]
#[error("cannot store {value} in a {column_type} column: {reason}")]
pub struct BindError {
    pub value: String,
    pub column_type: String,
    pub reason: String,
}

/// Parameter refs compatible with `tokio-postgres`.
pub fn params_ref(values: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Decimal> for SqlValue {
    fn from(value: Decimal) -> Self {
        // Text keeps the exact scale ("0.020" stays "0.020").
        Self::Text(value.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

type BoxError = Box<dyn Error + Sync + Send>;

fn is_text(ty: &Type) -> bool {
    matches!(
        *ty,
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN
    )
}

/// Whole-valued floats only; `50000.0` is fine, `0.5` is not.
fn whole(f: f64) -> Result<i64, BoxError> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Ok(f as i64)
    } else {
        Err(format!("{f} is not an integer").into())
    }
}

impl SqlValue {
    fn describe(&self) -> String {
        match self {
            Self::Text(s) => format!("'{s}'"),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null => "null".to_string(),
        }
    }

    fn encode(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(b) if is_text(ty) => b.to_string().as_str().to_sql_checked(ty, out),
            Self::Bool(b) => b.to_sql_checked(ty, out),
            Self::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql_checked(ty, out),
                Type::FLOAT4 => (*i as f32).to_sql_checked(ty, out),
                Type::FLOAT8 => (*i as f64).to_sql_checked(ty, out),
                Type::NUMERIC => Decimal::from(*i).to_sql_checked(ty, out),
                _ if is_text(ty) => i.to_string().as_str().to_sql_checked(ty, out),
                _ => i.to_sql_checked(ty, out),
            },
            Self::Float(f) => match *ty {
                Type::INT2 | Type::INT4 | Type::INT8 => Self::Int(whole(*f)?).encode(ty, out),
                Type::FLOAT4 => (*f as f32).to_sql_checked(ty, out),
                Type::NUMERIC => Decimal::try_from(*f)?.to_sql_checked(ty, out),
                _ if is_text(ty) => f.to_string().as_str().to_sql_checked(ty, out),
                _ => f.to_sql_checked(ty, out),
            },
            Self::Text(s) => match *ty {
                Type::NUMERIC => s.trim().parse::<Decimal>()?.to_sql_checked(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 => {
                    Self::Int(s.trim().parse::<i64>()?).encode(ty, out)
                }
                Type::FLOAT4 | Type::FLOAT8 => {
                    Self::Float(s.trim().parse::<f64>()?).encode(ty, out)
                }
                Type::BOOL => s.trim().parse::<bool>()?.to_sql_checked(ty, out),
                _ => s.as_str().to_sql_checked(ty, out),
            },
        }
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        self.encode(ty, out).map_err(|cause| {
            Box::new(BindError {
                value: self.describe(),
                column_type: ty.name().to_string(),
                reason: cause.to_string(),
            }) as BoxError
        })
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::BOOL
                | Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::NUMERIC
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::UNKNOWN
        )
    }

    to_sql_checked!();
}
