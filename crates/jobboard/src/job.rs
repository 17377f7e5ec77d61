//! The `jobs` table: model, inputs, and CRUD operations.
//!
//! ```ignore
//! use jobboard::{Job, JobFilter, JobPatch, NewJob};
//!
//! let job = Job::create(&client, &NewJob::new("Engineer", "c1").salary(90000)).await?;
//! let engineers = Job::find_all(&client, &JobFilter::new().title("engineer")).await?;
//! let job = Job::update(&client, job.id, &JobPatch::new().salary(95000)).await?;
//! Job::remove(&client, job.id).await?;
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

use crate::client::GenericClient;
use crate::error::{JobError, JobResult};
use crate::filter::{JobFilter, build_list_filter};
use crate::row::{FromRow, RowExt};
use crate::set_clause::{ColumnMap, UpdateRecord, build_set_clause};
use crate::value::{SqlValue, params_ref};

const MAX_LOGGED_SQL: usize = 200;

const RETURNING_COLS: &str = "id, title, salary, equity, company_handle";

const LISTING_SELECT: &str = "SELECT j.id, j.title, j.salary, j.equity, j.company_handle, \
     c.name AS company_name \
     FROM jobs AS j LEFT JOIN companies AS c ON c.handle = j.company_handle";

/// A row of the `jobs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// A job joined with the name of its company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JobResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

impl FromRow for JobListing {
    fn from_row(row: &Row) -> JobResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
            company_name: row.try_get_column("company_name")?,
        })
    }
}

/// Input for [`Job::create`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl NewJob {
    pub fn new(title: impl Into<String>, company_handle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            salary: None,
            equity: None,
            company_handle: company_handle.into(),
        }
    }

    pub fn salary(mut self, salary: i32) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn equity(mut self, equity: Decimal) -> Self {
        self.equity = Some(equity);
        self
    }

    /// Reject values the `jobs` table would refuse.
    pub fn validate(&self) -> JobResult<()> {
        if self.title.trim().is_empty() {
            return Err(JobError::bad_request("title must not be empty"));
        }
        if self.company_handle.trim().is_empty() {
            return Err(JobError::bad_request("companyHandle must not be empty"));
        }
        validate_salary(self.salary)?;
        validate_equity(self.equity)
    }
}

/// Input for [`Job::update`]. Only the given fields change.
///
/// The company a job belongs to is fixed: `companyHandle` (like any other
/// unknown key) fails deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobPatch {
    pub title: Option<String>,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl JobPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn salary(mut self, salary: i32) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn equity(mut self, equity: Decimal) -> Self {
        self.equity = Some(equity);
        self
    }

    pub fn validate(&self) -> JobResult<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(JobError::bad_request("title must not be empty"));
            }
        }
        validate_salary(self.salary)?;
        validate_equity(self.equity)
    }

    /// The set fields as an update record, in declaration order.
    pub fn to_record(&self) -> UpdateRecord {
        let mut record = UpdateRecord::new();
        if let Some(title) = &self.title {
            record.insert("title", title.as_str());
        }
        if let Some(salary) = self.salary {
            record.insert("salary", salary);
        }
        if let Some(equity) = self.equity {
            record.insert("equity", equity);
        }
        record
    }
}

fn validate_salary(salary: Option<i32>) -> JobResult<()> {
    match salary {
        Some(s) if s < 0 => Err(JobError::bad_request("salary must not be negative")),
        _ => Ok(()),
    }
}

fn validate_equity(equity: Option<Decimal>) -> JobResult<()> {
    match equity {
        Some(e) if e.is_sign_negative() || e > Decimal::ONE => Err(JobError::bad_request(
            "equity must be between 0 and 1",
        )),
        _ => Ok(()),
    }
}

fn log_sql(statement: &str, sql: &str, param_count: usize) {
    let sql = match sql.char_indices().nth(MAX_LOGGED_SQL) {
        Some((cut, _)) => format!("{}...", &sql[..cut]),
        None => sql.to_string(),
    };
    tracing::debug!(target: "jobboard.sql", statement, param_count, sql = %sql);
}

fn no_job(id: i32) -> JobError {
    tracing::debug!(target: "jobboard", id, "job not found");
    JobError::not_found(format!("No job: {}", id))
}

impl Job {
    /// Insert a job and return the stored row.
    pub async fn create(conn: &impl GenericClient, data: &NewJob) -> JobResult<Job> {
        data.validate()?;

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            RETURNING_COLS
        );
        log_sql("jobs.create", &sql, 4);

        let row = conn
            .query_one(
                &sql,
                &[&data.title, &data.salary, &data.equity, &data.company_handle],
            )
            .await?;
        Job::from_row(&row)
    }

    /// List jobs matching `filter`, ordered by company name then id.
    pub async fn find_all(
        conn: &impl GenericClient,
        filter: &JobFilter,
    ) -> JobResult<Vec<JobListing>> {
        let clause = build_list_filter(filter);
        let sql = format!("{}{} ORDER BY c.name, j.id", LISTING_SELECT, clause.to_sql());
        log_sql("jobs.find_all", &sql, clause.values.len());

        let rows = conn.query(&sql, &params_ref(&clause.values)).await?;
        rows.iter().map(JobListing::from_row).collect()
    }

    /// Fetch one job with its company name.
    pub async fn get(conn: &impl GenericClient, id: i32) -> JobResult<JobListing> {
        let sql = format!("{} WHERE j.id = $1", LISTING_SELECT);
        log_sql("jobs.get", &sql, 1);

        match conn.query_opt(&sql, &[&id]).await? {
            Some(row) => JobListing::from_row(&row),
            None => Err(no_job(id)),
        }
    }

    /// Apply a partial update. Fails with `BadRequest` when `patch` sets
    /// nothing and `NotFound` when `id` doesn't exist.
    pub async fn update(conn: &impl GenericClient, id: i32, patch: &JobPatch) -> JobResult<Job> {
        patch.validate()?;
        Self::update_record(conn, id, &patch.to_record()).await
    }

    async fn update_record(
        conn: &impl GenericClient,
        id: i32,
        data: &UpdateRecord,
    ) -> JobResult<Job> {
        let mut clause = build_set_clause(data, &ColumnMap::identity())?;
        let id_idx = clause.push_key(SqlValue::from(id));

        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            clause.set_cols, id_idx, RETURNING_COLS
        );
        log_sql("jobs.update", &sql, clause.values.len());

        match conn.query_opt(&sql, &params_ref(&clause.values)).await? {
            Some(row) => Job::from_row(&row),
            None => Err(no_job(id)),
        }
    }

    /// Delete a job.
    pub async fn remove(conn: &impl GenericClient, id: i32) -> JobResult<()> {
        let sql = "DELETE FROM jobs WHERE id = $1";
        log_sql("jobs.remove", sql, 1);

        match conn.execute(sql, &[&id]).await? {
            0 => Err(no_job(id)),
            _ => Ok(()),
        }
    }
}
