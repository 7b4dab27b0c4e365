//! The dataset abstraction consumed by the write path.
//!
//! The host execution engine owns job scheduling and partitioning; the
//! write path only needs a finite sequence of partitions, each yielding
//! its rows once, in order.

use sower_schema::{Row, Schema};

/// A single-pass source of rows for one partition.
pub trait DatasetPartition: Send + 'static {
    type Rows: Iterator<Item = Row> + Send;

    /// Consumes the partition, yielding its rows in order.
    fn rows(self) -> Self::Rows;
}

/// A partitioned, schema-typed row source.
pub trait Dataset {
    type Partition: DatasetPartition;

    /// The schema every row conforms to. Immutable for the job's lifetime.
    fn schema(&self) -> &Schema;

    /// Consumes the dataset into its partitions.
    fn partitions(self) -> Vec<Self::Partition>;
}

impl DatasetPartition for Vec<Row> {
    type Rows = std::vec::IntoIter<Row>;

    fn rows(self) -> Self::Rows {
        self.into_iter()
    }
}

/// An in-memory dataset, used by tests and small loads.
#[derive(Debug, Clone)]
pub struct MemoryDataset {
    schema: Schema,
    partitions: Vec<Vec<Row>>,
}

impl MemoryDataset {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            partitions: Vec::new(),
        }
    }

    pub fn with_partition(mut self, rows: Vec<Row>) -> Self {
        self.partitions.push(rows);
        self
    }

    pub fn row_count(&self) -> usize {
        self.partitions.iter().map(Vec::len).sum()
    }
}

impl Dataset for MemoryDataset {
    type Partition = Vec<Row>;

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn partitions(self) -> Vec<Self::Partition> {
        self.partitions
    }
}
