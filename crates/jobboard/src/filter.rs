//! WHERE clause assembly for job listings.

use serde::Deserialize;
use std::fmt::Write;

use crate::value::SqlValue;

/// Optional search criteria for [`Job::find_all`](crate::Job::find_all).
///
/// Deserializes from `{"title": .., "minSalary": .., "hasEquity": ..}`;
/// any other key is rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    /// Case-insensitive substring of the job title.
    pub title: Option<String>,
    /// Minimum salary, inclusive.
    pub min_salary: Option<i32>,
    /// `true` keeps only jobs with non-zero equity. `false` is the same as unset.
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn min_salary(mut self, min_salary: i32) -> Self {
        self.min_salary = Some(min_salary);
        self
    }

    pub fn has_equity(mut self, has_equity: bool) -> Self {
        self.has_equity = Some(has_equity);
        self
    }
}

/// Output of [`build_list_filter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereClause {
    /// Predicates joined by `AND`, without the `WHERE` keyword. Empty when
    /// nothing constrains the listing.
    pub where_clause: String,
    /// `values[i]` binds to `$(i + 1)`.
    pub values: Vec<SqlValue>,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.where_clause.is_empty()
    }

    /// `" WHERE ..."` for appending to a base query, or `""`.
    pub fn to_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.where_clause)
        }
    }
}

/// Build the WHERE predicates for a job listing.
///
/// Criteria are applied in a fixed order (title, min salary, equity), which
/// fixes the placeholder numbering. The equity check is a literal and takes
/// no placeholder.
pub fn build_list_filter(criteria: &JobFilter) -> WhereClause {
    let mut predicates: Vec<String> = Vec::new();
    let mut values: Vec<SqlValue> = Vec::new();

    if let Some(title) = &criteria.title {
        values.push(SqlValue::Text(format!("%{}%", title)));
        predicates.push(placeholder_predicate("title ILIKE", values.len()));
    }

    if let Some(min_salary) = criteria.min_salary {
        values.push(SqlValue::from(min_salary));
        predicates.push(placeholder_predicate("salary >=", values.len()));
    }

    if criteria.has_equity == Some(true) {
        predicates.push("equity > 0".to_string());
    }

    WhereClause {
        where_clause: predicates.join(" AND "),
        values,
    }
}

fn placeholder_predicate(lhs: &str, idx: usize) -> String {
    let mut s = String::with_capacity(lhs.len() + 4);
    s.push_str(lhs);
    let _ = write!(&mut s, " ${}", idx);
    s
}
