//! # jobboard
//!
//! Data access for a jobs board backed by PostgreSQL.
//!
//! ## Features
//!
//! - **Partial updates**: [`build_set_clause`] turns an ordered record of changed
//!   fields into `"col"=$1, "col2"=$2, ...` plus matching parameters
//! - **Filtered listing**: [`build_list_filter`] turns optional search criteria
//!   into a `WHERE` clause with correctly numbered placeholders
//! - **Transaction-friendly**: every [`Job`] operation takes a `GenericClient`, so
//!   a transaction works anywhere a connection does
//! - **SQL logging**: statements are emitted as `DEBUG` events on the
//!   `jobboard.sql` tracing target
//!
//! ## Example
//!
//! ```ignore
//! use jobboard::prelude::*;
//!
//! let config = DbConfig::from_env()?;
//! let pool = create_pool_from_config(&config)?;
//! let client = pool.get().await?;
//!
//! let jobs = Job::find_all(&client, &JobFilter::new().min_salary(50000)).await?;
//! let job = Job::update(&client, jobs[0].id, &JobPatch::new().title("Senior")).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod job;
pub mod prelude;
pub mod row;
pub mod set_clause;
pub mod value;

pub use client::GenericClient;
pub use config::DbConfig;
pub use error::{JobError, JobResult};
pub use filter::{JobFilter, WhereClause, build_list_filter};
pub use job::{Job, JobListing, JobPatch, NewJob};
pub use row::{FromRow, RowExt};
pub use set_clause::{ColumnMap, SetClause, UpdateRecord, build_set_clause};
pub use value::{BindError, SqlValue};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from_config, create_pool_with_config};
