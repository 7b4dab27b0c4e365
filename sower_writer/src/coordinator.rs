//! Job-level orchestration: schema check, fan-out, aggregation.

use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use sower_weaviate::client::CreateClassOutcome;
use sower_weaviate::types::ClassDefinition;

use crate::config::WriteConfig;
use crate::dataset::Dataset;
use crate::error::{
    ConfigSnafu, Result, SchemaCheckSnafu, SchemaCreateSnafu, SchemaMissingSnafu, SchemaSnafu,
};
use crate::object::ObjectBuilder;
use crate::partition::PartitionWriter;
use crate::result::JobResult;
use crate::transport::WeaviateTransport;

/// Top-level entry point for a write job.
///
/// Validates configuration and schema, makes sure the target class exists,
/// then runs one partition writer task per dataset partition and collects
/// their results. Class existence is established once, before fan-out, and
/// never touched concurrently afterwards.
pub struct WriteCoordinator {
    transport: Arc<dyn WeaviateTransport>,
    config: WriteConfig,
}

impl WriteCoordinator {
    pub fn new(transport: Arc<dyn WeaviateTransport>, config: WriteConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &WriteConfig {
        &self.config
    }

    /// Runs the job to completion.
    ///
    /// Returns `Err` only for pre-dispatch failures (configuration, schema
    /// validation, missing class). Data-level failures are reported inside
    /// the returned [`JobResult`]; sibling partitions never abort each
    /// other.
    pub async fn run<D: Dataset>(&self, dataset: D, ct: CancellationToken) -> Result<JobResult> {
        self.config.validate().context(ConfigSnafu {})?;

        let builder = ObjectBuilder::new(
            self.config.class_name.clone(),
            dataset.schema().clone(),
            self.config.id_column.clone(),
            self.config.vector_column.clone(),
        )
        .context(SchemaSnafu {})?;

        self.ensure_class(&builder).await?;

        let partitions = dataset.partitions();
        info!(
            class = %self.config.class_name,
            partitions = partitions.len(),
            batch_size = self.config.batch_size,
            "starting write job"
        );

        let mut tasks = FuturesUnordered::new();
        for (index, partition) in partitions.into_iter().enumerate() {
            let writer = PartitionWriter::new(
                index,
                builder.clone(),
                self.transport.clone(),
                &self.config,
            );
            let ct = ct.clone();
            tasks.push(tokio::spawn(writer.run(partition, ct)));
        }

        let mut results = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(err) => warn!(err = ?err, "partition task did not complete"),
            }
        }

        let job = JobResult::from_partitions(results);
        for failed in job.failed_sample(self.config.failed_sample_limit) {
            warn!(kind = ?failed.kind, message = %failed.message, "failed write");
        }
        info!(
            success = job.total_success,
            failed = job.total_failed,
            "write job finished"
        );
        Ok(job)
    }

    /// Makes sure the target class exists before any batch references it.
    async fn ensure_class(&self, builder: &ObjectBuilder) -> Result<()> {
        let class = self.config.class_name.as_str();

        let exists = self
            .transport
            .class_exists(class)
            .await
            .context(SchemaCheckSnafu { class })?;
        if exists {
            debug!(class, "target class exists");
            return Ok(());
        }

        if !self.config.create_class {
            return SchemaMissingSnafu { class }.fail();
        }

        let definition = ClassDefinition::from_schema(class, &builder.property_schema());
        let outcome = self
            .transport
            .create_class(&definition)
            .await
            .context(SchemaCreateSnafu { class })?;
        match outcome {
            CreateClassOutcome::Created => info!(class, "created target class"),
            // Someone else created it between the check and the create.
            CreateClassOutcome::AlreadyExists => debug!(class, "target class already present"),
        }
        Ok(())
    }
}
