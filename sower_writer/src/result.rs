//! Per-partition and job-level write results.

use sower_schema::Row;
use sower_weaviate::types::WeaviateObject;

/// Why a row or object ended up in the failed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The row's value did not match its declared column type.
    TypeMismatch,
    /// The server reported a per-object failure.
    ObjectRejected,
    /// Retryable transport failures exhausted the attempt budget.
    TransportExhausted,
    /// The server rejected the batch outright; no retry.
    TransportRejected,
    /// The job was cancelled before the row was acknowledged.
    Cancelled,
}

/// One permanently failed row or object. Recorded, never discarded.
#[derive(Debug, Clone)]
pub struct FailedWrite {
    pub kind: FailureKind,
    pub message: String,
    /// The object that failed, when the row made it past building.
    pub object: Option<WeaviateObject>,
    /// The offending row, for failures before an object existed.
    pub row: Option<Row>,
}

impl FailedWrite {
    pub fn from_row(row: Row, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            object: None,
            row: Some(row),
        }
    }

    pub fn from_object(object: WeaviateObject, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            object: Some(object),
            row: None,
        }
    }
}

/// The aggregate outcome of one partition.
#[derive(Debug, Clone, Default)]
pub struct WriteResult {
    pub partition: usize,
    pub success_count: u64,
    pub failed: Vec<FailedWrite>,
}

impl WriteResult {
    pub fn new(partition: usize) -> Self {
        Self {
            partition,
            success_count: 0,
            failed: Vec::new(),
        }
    }

    /// Rows accounted for by this result, successful or not.
    pub fn attempted(&self) -> u64 {
        self.success_count + self.failed.len() as u64
    }
}

/// The aggregate outcome of a whole write job.
///
/// Data-level failures live here rather than in an error: the caller
/// decides whether a nonzero failure count fails the job.
#[derive(Debug, Default)]
pub struct JobResult {
    pub total_success: u64,
    pub total_failed: u64,
    pub partitions: Vec<WriteResult>,
}

impl JobResult {
    pub fn from_partitions(mut partitions: Vec<WriteResult>) -> Self {
        partitions.sort_by_key(|r| r.partition);
        let total_success = partitions.iter().map(|r| r.success_count).sum();
        let total_failed = partitions.iter().map(|r| r.failed.len() as u64).sum();
        Self {
            total_success,
            total_failed,
            partitions,
        }
    }

    pub fn is_complete_success(&self) -> bool {
        self.total_failed == 0
    }

    /// Up to `limit` failed writes across all partitions, for reporting.
    pub fn failed_sample(&self, limit: usize) -> Vec<&FailedWrite> {
        self.partitions
            .iter()
            .flat_map(|r| r.failed.iter())
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_result_aggregates_partitions() {
        let mut first = WriteResult::new(1);
        first.success_count = 3;
        let mut second = WriteResult::new(0);
        second.success_count = 2;
        second.failed.push(FailedWrite::from_row(
            Row::new(),
            FailureKind::TypeMismatch,
            "bad value",
        ));

        let job = JobResult::from_partitions(vec![first, second]);
        assert_eq!(job.total_success, 5);
        assert_eq!(job.total_failed, 1);
        assert!(!job.is_complete_success());
        // Partitions are reported in index order regardless of completion order.
        assert_eq!(job.partitions[0].partition, 0);
        assert_eq!(job.failed_sample(10).len(), 1);
    }
}
