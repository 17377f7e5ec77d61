//! Database settings loaded from the environment.
//!
//! | Variable                 | Meaning                                        |
//! |--------------------------|------------------------------------------------|
//! | `DATABASE_URL`           | Postgres connection string                     |
//! | `TEST_DATABASE_URL`      | Used instead of `DATABASE_URL` when `APP_ENV=test` |
//! | `DATABASE_POOL_MAX_SIZE` | Pool size, default 16                          |
//!
//! A `.env` file in the working directory is loaded first, if present.

use crate::error::{JobError, JobResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_url: String,
    pub pool_max_size: usize,
}

impl DbConfig {
    pub const DEFAULT_POOL_MAX_SIZE: usize = 16;

    /// Load `.env` (if any), then read settings from the process environment.
    pub fn from_env() -> JobResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(JobError::Config(format!("failed to load .env: {e}")));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> JobResult<Self> {
        let url_key = match lookup("APP_ENV").as_deref() {
            Some("test") => "TEST_DATABASE_URL",
            _ => "DATABASE_URL",
        };

        let database_url = lookup(url_key)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| JobError::Config(format!("{url_key} must be set")))?;

        let pool_max_size = match lookup("DATABASE_POOL_MAX_SIZE") {
            None => Self::DEFAULT_POOL_MAX_SIZE,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(JobError::Config(format!(
                        "DATABASE_POOL_MAX_SIZE must be a positive integer, got '{raw}'"
                    )));
                }
            },
        };

        tracing::debug!(target: "jobboard.config", url_key, pool_max_size, "database settings loaded");

        Ok(Self {
            database_url,
            pool_max_size,
        })
    }
}
