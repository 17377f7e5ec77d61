//! Convenient imports for typical `jobboard` usage.
//!
//! ```ignore
//! use jobboard::prelude::*;
//! ```

pub use crate::{
    ColumnMap, DbConfig, FromRow, GenericClient, Job, JobError, JobFilter, JobListing, JobPatch,
    JobResult, NewJob, RowExt, SqlValue, UpdateRecord, build_list_filter, build_set_clause,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_from_config, create_pool_with_config};
