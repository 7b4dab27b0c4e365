use std::fmt;

use snafu::Snafu;

use crate::retry::RetryPolicy;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_MAX_BATCH_BYTES: usize = 8 * 1024 * 1024;
pub const DEFAULT_FAILED_SAMPLE_LIMIT: usize = 10;

/// URL scheme for the target server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    #[snafu(display("host must not be empty"))]
    MissingHost,
    #[snafu(display("class name must not be empty"))]
    MissingClassName,
    #[snafu(display("batch size must be positive"))]
    InvalidBatchSize,
    #[snafu(display("max batch bytes must be positive"))]
    InvalidMaxBatchBytes,
    #[snafu(display("failed sample limit must be positive"))]
    InvalidFailedSampleLimit,
}

/// Configuration for one write job.
///
/// Writes are append-only: there are no update or delete semantics, and a
/// rerun of a failed job may create duplicates of objects that were already
/// acknowledged (at-least-once delivery).
#[derive(Debug, Clone)]
pub struct WriteConfig {
    pub scheme: Scheme,
    pub host: String,
    pub class_name: String,
    /// Maximum objects per submitted batch.
    pub batch_size: usize,
    /// Maximum estimated serialized bytes per submitted batch.
    pub max_batch_bytes: usize,
    pub retry: RetryPolicy,
    /// Create the target class from the dataset schema when it is absent.
    pub create_class: bool,
    /// Dataset column supplying the object id, if any. Must be a text
    /// column containing UUIDs; it never appears in the property map.
    pub id_column: Option<String>,
    /// Dataset column supplying the object vector, if any.
    pub vector_column: Option<String>,
    /// How many failed objects to include in the job summary log.
    pub failed_sample_limit: usize,
}

impl WriteConfig {
    pub fn new(host: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::default(),
            host: host.into(),
            class_name: class_name.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_batch_bytes: DEFAULT_MAX_BATCH_BYTES,
            retry: RetryPolicy::default(),
            create_class: false,
            id_column: None,
            vector_column: None,
            failed_sample_limit: DEFAULT_FAILED_SAMPLE_LIMIT,
        }
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_batch_bytes(mut self, max_batch_bytes: usize) -> Self {
        self.max_batch_bytes = max_batch_bytes;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    pub fn with_create_class(mut self, create_class: bool) -> Self {
        self.create_class = create_class;
        self
    }

    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    pub fn with_vector_column(mut self, column: impl Into<String>) -> Self {
        self.vector_column = Some(column.into());
        self
    }

    /// The base URL for the target server.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }

    /// Validates the connection and bound settings before dispatch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return MissingHostSnafu {}.fail();
        }
        if self.class_name.trim().is_empty() {
            return MissingClassNameSnafu {}.fail();
        }
        if self.batch_size == 0 {
            return InvalidBatchSizeSnafu {}.fail();
        }
        if self.max_batch_bytes == 0 {
            return InvalidMaxBatchBytesSnafu {}.fail();
        }
        if self.failed_sample_limit == 0 {
            return InvalidFailedSampleLimitSnafu {}.fail();
        }
        Ok(())
    }
}
