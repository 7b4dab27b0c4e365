//! Partition-parallel bulk write path into Weaviate.
//!
//! ## Data flow
//!
//! Dataset partitions -> [`PartitionWriter`] (one task per partition) ->
//! [`ObjectBuilder`] -> [`BatchAccumulator`] -> retry-wrapped transport ->
//! server. The [`WriteCoordinator`] owns startup (schema check or create)
//! and shutdown (result aggregation).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use sower_weaviate::WeaviateClient;

pub mod batch;
pub mod config;
pub mod coordinator;
pub mod dataset;
pub mod error;
pub mod object;
pub mod partition;
pub mod result;
pub mod retry;
pub mod transport;

pub use batch::{Batch, BatchAccumulator};
pub use config::{ConfigError, Scheme, WriteConfig};
pub use coordinator::WriteCoordinator;
pub use dataset::{Dataset, DatasetPartition, MemoryDataset};
pub use error::WriteJobError;
pub use object::{BuildError, ObjectBuilder};
pub use partition::PartitionWriter;
pub use result::{FailedWrite, FailureKind, JobResult, WriteResult};
pub use retry::RetryPolicy;
pub use transport::{TransportError, WeaviateTransport};

/// Writes a dataset into the configured class, connecting to the server
/// named by the configuration.
///
/// Convenience wrapper for hosts that do not need to share a transport;
/// equivalent to building a [`WeaviateClient`] from the configuration and
/// running a [`WriteCoordinator`] with it.
pub async fn write_dataset<D: Dataset>(
    dataset: D,
    config: WriteConfig,
) -> error::Result<JobResult> {
    let client = Arc::new(WeaviateClient::new(config.base_url()));
    let coordinator = WriteCoordinator::new(client, config);
    coordinator.run(dataset, CancellationToken::new()).await
}
