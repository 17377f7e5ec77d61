//! Partial-update SET clause builder.
//!
//! Turns an ordered record of changed fields into the assignment list of an
//! `UPDATE` statement plus the values for its placeholders:
//!
//! ```ignore
//! use jobboard::{build_set_clause, ColumnMap, UpdateRecord};
//!
//! let data = UpdateRecord::new()
//!     .set("firstName", "Brock")
//!     .set("age", 27);
//! let columns = ColumnMap::from_pairs([("firstName", "first_name")]);
//!
//! let clause = build_set_clause(&data, &columns)?;
//! assert_eq!(clause.set_cols, r#""first_name"=$1, "age"=$2"#);
//!
//! let key_idx = clause.next_placeholder();
//! let sql = format!("UPDATE users SET {} WHERE id = ${}", clause.set_cols, key_idx);
//! ```

use std::collections::HashMap;
use std::fmt::Write;

use crate::error::{JobError, JobResult};
use crate::value::SqlValue;

/// Fields to change, in the order they were supplied.
///
/// Setting a key twice replaces the value but keeps the key's original
/// position, the same as assigning into a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateRecord {
    fields: Vec<(String, SqlValue)>,
}

impl UpdateRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value (builder style).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field value in place. Linear in the number of fields.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<SqlValue>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Build from a JSON object, keeping key order.
    ///
    /// Fails with `BadRequest` if any value is an array or object.
    pub fn from_json(object: serde_json::Map<String, serde_json::Value>) -> JobResult<Self> {
        // Map keys are already unique.
        let fields = object
            .into_iter()
            .map(|(field, value)| match SqlValue::from_json(value) {
                Ok(value) => Ok((field, value)),
                Err(e) => Err(JobError::bad_request(format!("field '{}': {}", field, e))),
            })
            .collect::<JobResult<Vec<_>>>()?;
        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for UpdateRecord
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Logical field name to physical column name.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: HashMap<String, String>,
}

impl ColumnMap {
    /// An empty map: every field is its own column name.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            columns: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Column for `field`, or `field` itself when unmapped.
    pub fn column_for<'a>(&'a self, field: &'a str) -> &'a str {
        match self.columns.get(field) {
            Some(column) => column.as_str(),
            None => field,
        }
    }
}

/// Output of [`build_set_clause`].
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    /// `"col_a"=$1, "col_b"=$2, ...`
    pub set_cols: String,
    /// `values[i]` binds to `$(i + 1)`.
    pub values: Vec<SqlValue>,
}

impl SetClause {
    /// Ordinal of the first placeholder after the SET list.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Append the row key as the final parameter and return its ordinal.
    pub fn push_key(&mut self, key: impl Into<SqlValue>) -> usize {
        let idx = self.next_placeholder();
        self.values.push(key.into());
        idx
    }
}

/// Build the SET list for a partial update.
///
/// Columns come from `columns`, falling back to the field name. An empty
/// record is a `BadRequest`.
pub fn build_set_clause(data: &UpdateRecord, columns: &ColumnMap) -> JobResult<SetClause> {
    if data.is_empty() {
        return Err(JobError::bad_request("No data"));
    }

    let mut set_cols = String::new();
    let mut values = Vec::with_capacity(data.len());

    for (idx, (field, value)) in data.iter().enumerate() {
        if idx > 0 {
            set_cols.push_str(", ");
        }
        push_quoted_ident(&mut set_cols, columns.column_for(field));
        let _ = write!(&mut set_cols, "=${}", idx + 1);
        values.push(value.clone());
    }

    Ok(SetClause { set_cols, values })
}

fn push_quoted_ident(out: &mut String, ident: &str) {
    out.push('"');
    for c in ident.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}
