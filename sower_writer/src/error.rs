use snafu::Snafu;

use sower_schema::SchemaError;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// Fatal pre-dispatch failures.
///
/// Everything here aborts the whole job before any partition starts.
/// Data-level failures are never represented as a job error; they are
/// reported through the job result instead.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum WriteJobError {
    #[snafu(display("invalid configuration"))]
    Config { source: ConfigError },
    #[snafu(display("invalid schema"))]
    Schema { source: SchemaError },
    #[snafu(display("class {class} does not exist and auto-creation is disabled"))]
    SchemaMissing { class: String },
    #[snafu(display("failed to check class {class}"))]
    SchemaCheck {
        class: String,
        source: TransportError,
    },
    #[snafu(display("failed to create class {class}"))]
    SchemaCreate {
        class: String,
        source: TransportError,
    },
}

pub type Result<T, E = WriteJobError> = std::result::Result<T, E>;
