//! The per-partition write loop.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use sower_schema::Row;
use sower_weaviate::types::ObjectResult;

use crate::batch::{Batch, BatchAccumulator};
use crate::config::WriteConfig;
use crate::dataset::DatasetPartition;
use crate::object::ObjectBuilder;
use crate::result::{FailedWrite, FailureKind, WriteResult};
use crate::retry::{submit_with_retry, RetryPolicy};
use crate::transport::{TransportError, WeaviateTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Init,
    Streaming,
    Draining,
    Done,
}

/// Writes one partition's rows into the target class.
///
/// Internally single-threaded: rows are pulled sequentially and the row
/// stream pauses while a completed batch round-trips to the server, so at
/// most one batch per partition is in flight. Independent writers share
/// nothing but the transport.
pub struct PartitionWriter {
    partition: usize,
    builder: ObjectBuilder,
    accumulator: BatchAccumulator,
    transport: Arc<dyn WeaviateTransport>,
    retry: RetryPolicy,
    result: WriteResult,
    state: WriterState,
}

impl PartitionWriter {
    pub fn new(
        partition: usize,
        builder: ObjectBuilder,
        transport: Arc<dyn WeaviateTransport>,
        config: &WriteConfig,
    ) -> Self {
        Self {
            partition,
            builder,
            accumulator: BatchAccumulator::new(config.batch_size, config.max_batch_bytes),
            transport,
            retry: config.retry,
            result: WriteResult::new(partition),
            state: WriterState::Init,
        }
    }

    /// Drives the partition to completion and returns its result.
    ///
    /// Row-level errors are recorded and the stream continues; only
    /// cancellation stops the partition early, recording the unsubmitted
    /// remainder so every row stays accounted for.
    pub async fn run<P: DatasetPartition>(
        mut self,
        partition: P,
        ct: CancellationToken,
    ) -> WriteResult {
        let mut rows = partition.rows().peekable();

        loop {
            match self.state {
                WriterState::Init => {
                    if rows.peek().is_none() {
                        debug!(partition = self.partition, "partition is empty");
                        self.state = WriterState::Done;
                    } else {
                        self.state = WriterState::Streaming;
                    }
                }
                WriterState::Streaming => {
                    if ct.is_cancelled() {
                        self.abandon(&mut rows);
                        self.state = WriterState::Done;
                        continue;
                    }

                    let Some(row) = rows.next() else {
                        self.state = WriterState::Draining;
                        continue;
                    };

                    match self.builder.build(&row) {
                        Ok(object) => {
                            if let Some(batch) = self.accumulator.push(object) {
                                // Suspension point: the row stream pauses
                                // until the batch has a terminal outcome.
                                self.submit(batch).await;
                            }
                        }
                        Err(err) => {
                            self.result.failed.push(FailedWrite::from_row(
                                row,
                                FailureKind::TypeMismatch,
                                err.to_string(),
                            ));
                        }
                    }
                }
                WriterState::Draining => {
                    if ct.is_cancelled() {
                        self.abandon(&mut rows);
                        self.state = WriterState::Done;
                        continue;
                    }

                    if let Some(batch) = self.accumulator.flush() {
                        self.submit(batch).await;
                    }
                    self.state = WriterState::Done;
                }
                WriterState::Done => {
                    debug!(
                        partition = self.partition,
                        success = self.result.success_count,
                        failed = self.result.failed.len(),
                        "partition writer finished"
                    );
                    return self.result;
                }
            }
        }
    }

    async fn submit(&mut self, batch: Batch) {
        debug!(
            partition = self.partition,
            objects = batch.len(),
            estimated_bytes = batch.estimated_bytes(),
            "submitting batch"
        );

        match submit_with_retry(self.transport.as_ref(), batch.objects(), self.retry).await {
            Ok(results) => self.record_results(batch, results),
            Err(err) => self.record_batch_failure(batch, &err),
        }
    }

    fn record_results(&mut self, batch: Batch, results: Vec<ObjectResult>) {
        for (index, object) in batch.into_objects().into_iter().enumerate() {
            match results.get(index) {
                Some(result) if result.is_success() => self.result.success_count += 1,
                Some(result) => {
                    let message = result
                        .error_message()
                        .unwrap_or_else(|| "object creation failed".to_string());
                    self.result.failed.push(FailedWrite::from_object(
                        object,
                        FailureKind::ObjectRejected,
                        message,
                    ));
                }
                // The server echoed fewer results than objects submitted;
                // the unmatched objects cannot be confirmed.
                None => self.result.failed.push(FailedWrite::from_object(
                    object,
                    FailureKind::ObjectRejected,
                    "no per-object result in batch response",
                )),
            }
        }
    }

    /// Records every object of a failed batch, with the same error when the
    /// transport gave no per-object detail.
    fn record_batch_failure(&mut self, batch: Batch, err: &TransportError) {
        let kind = if err.is_retryable() {
            FailureKind::TransportExhausted
        } else {
            FailureKind::TransportRejected
        };
        let message = err.to_string();
        for object in batch.into_objects() {
            self.result
                .failed
                .push(FailedWrite::from_object(object, kind, message.clone()));
        }
    }

    /// Accounts for everything not yet submitted when the job is cancelled.
    /// Already-acknowledged batches stay committed; delivery is
    /// at-least-once, not exactly-once.
    fn abandon<I: Iterator<Item = Row>>(&mut self, rows: &mut I) {
        debug!(partition = self.partition, "partition writer cancelled");

        if let Some(batch) = self.accumulator.flush() {
            for object in batch.into_objects() {
                self.result.failed.push(FailedWrite::from_object(
                    object,
                    FailureKind::Cancelled,
                    "cancelled before submission",
                ));
            }
        }
        for row in rows {
            self.result.failed.push(FailedWrite::from_row(
                row,
                FailureKind::Cancelled,
                "cancelled before submission",
            ));
        }
    }
}
