//! Row mapping traits

use crate::error::{JobError, JobResult};
use tokio_postgres::Row;

/// Trait for converting a database row into a Rust struct
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> JobResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning JobError::Decode on failure
    fn try_get_column<T>(&self, column: &str) -> JobResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> JobResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| JobError::decode(column, e.to_string()))
    }
}
