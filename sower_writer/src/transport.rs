//! The narrow transport capability consumed by the write path.

use async_trait::async_trait;
use snafu::Snafu;

use sower_weaviate::client::CreateClassOutcome;
use sower_weaviate::types::{ClassDefinition, ObjectResult, WeaviateObject};
use sower_weaviate::WeaviateClient;

/// A transport error, pre-classified for retry purposes.
#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub))]
pub enum TransportError {
    /// Plausibly transient: connection failures, timeouts, 5xx responses.
    #[snafu(display("transient transport error: {message}"))]
    Transient { message: String },
    /// Terminal: the server rejected the request; retrying cannot succeed.
    #[snafu(display("request rejected: {message}"))]
    Rejected { message: String },
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Transient { .. })
    }
}

pub type Result<T, E = TransportError> = std::result::Result<T, E>;

/// The capability the write path needs from the target database.
///
/// Implementations must be safe for concurrent use by independent
/// partition writers; any connection pooling stays internal.
#[async_trait]
pub trait WeaviateTransport: Send + Sync {
    /// Submits a batch, returning one result per object in submission order.
    async fn submit(&self, objects: &[WeaviateObject]) -> Result<Vec<ObjectResult>>;

    /// Whether the target class exists.
    async fn class_exists(&self, class: &str) -> Result<bool>;

    /// Creates the target class. An existing class is a benign outcome.
    async fn create_class(&self, definition: &ClassDefinition) -> Result<CreateClassOutcome>;
}

#[async_trait]
impl WeaviateTransport for WeaviateClient {
    async fn submit(&self, objects: &[WeaviateObject]) -> Result<Vec<ObjectResult>> {
        self.batch_create(objects).await.map_err(classify)
    }

    async fn class_exists(&self, class: &str) -> Result<bool> {
        WeaviateClient::class_exists(self, class).await.map_err(classify)
    }

    async fn create_class(&self, definition: &ClassDefinition) -> Result<CreateClassOutcome> {
        WeaviateClient::create_class(self, definition)
            .await
            .map_err(classify)
    }
}

fn classify(err: sower_weaviate::ClientError) -> TransportError {
    if err.is_retryable() {
        TransportError::Transient {
            message: err.to_string(),
        }
    } else {
        TransportError::Rejected {
            message: err.to_string(),
        }
    }
}
