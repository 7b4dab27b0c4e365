//! HTTP client for the Weaviate REST API.

use std::time::Duration;

use snafu::ResultExt;
use tracing::{debug, info};

use crate::error::{ClientError, DecodeSnafu, RejectedSnafu, RequestSnafu, Result, ServerSnafu};
use crate::types::{ClassDefinition, ObjectResult, ObjectsPage, RetrievedObject, WeaviateObject};

/// Class name used by the readiness probe. Created and deleted again.
const PROBE_CLASS: &str = "SowerReadinessProbe";

/// Outcome of a class creation request.
///
/// Class creation is idempotent from the write path's point of view:
/// a class that already exists is a benign condition, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateClassOutcome {
    Created,
    AlreadyExists,
}

/// A client for the Weaviate schema, batch and object endpoints.
///
/// Cheap to clone; the underlying connection pool is shared, so a single
/// client is safe for concurrent use by independent partition writers.
#[derive(Debug, Clone)]
pub struct WeaviateClient {
    client: reqwest::Client,
    base_url: String,
}

impl WeaviateClient {
    /// Creates a client for the given base URL, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Creates a client from separate scheme and host:port parts.
    pub fn from_parts(scheme: &str, host: &str) -> Self {
        Self::new(format!("{scheme}://{host}"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Creates a class, treating an existing class as a benign outcome.
    pub async fn create_class(&self, definition: &ClassDefinition) -> Result<CreateClassOutcome> {
        debug!(class = %definition.class, "creating class");
        let response = self
            .client
            .post(self.url("/v1/schema"))
            .json(definition)
            .send()
            .await
            .context(RequestSnafu {})?;

        let status = response.status();
        if status.is_success() {
            return Ok(CreateClassOutcome::Created);
        }

        let message = response.text().await.unwrap_or_default();
        if status.is_client_error() && message.contains("already exists") {
            debug!(class = %definition.class, "class already exists");
            return Ok(CreateClassOutcome::AlreadyExists);
        }
        if status.is_server_error() {
            return ServerSnafu { status, message }.fail();
        }
        RejectedSnafu { status, message }.fail()
    }

    /// Deletes a class and every object in it.
    pub async fn delete_class(&self, class: &str) -> Result<()> {
        debug!(class, "deleting class");
        let response = self
            .client
            .delete(self.url(&format!("/v1/schema/{class}")))
            .send()
            .await
            .context(RequestSnafu {})?;

        check_status(response).await?;
        Ok(())
    }

    /// Whether a class is present in the schema.
    pub async fn class_exists(&self, class: &str) -> Result<bool> {
        let response = self
            .client
            .get(self.url(&format!("/v1/schema/{class}")))
            .send()
            .await
            .context(RequestSnafu {})?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response).await?;
        Ok(true)
    }

    /// Submits a batch of objects, returning one result per object in
    /// submission order.
    pub async fn batch_create(&self, objects: &[WeaviateObject]) -> Result<Vec<ObjectResult>> {
        let body = serde_json::json!({ "objects": objects });
        let response = self
            .client
            .post(self.url("/v1/batch/objects"))
            .json(&body)
            .send()
            .await
            .context(RequestSnafu {})?;

        let response = check_status(response).await?;
        response
            .json::<Vec<ObjectResult>>()
            .await
            .context(DecodeSnafu {})
    }

    /// Lists objects of a class. Used by integration tests to read back
    /// what the write path produced; not a general query surface.
    pub async fn list_objects(&self, class: &str) -> Result<Vec<RetrievedObject>> {
        let response = self
            .client
            .get(self.url("/v1/objects"))
            .query(&[("class", class)])
            .send()
            .await
            .context(RequestSnafu {})?;

        let response = check_status(response).await?;
        let page = response.json::<ObjectsPage>().await.context(DecodeSnafu {})?;
        Ok(page.objects)
    }

    /// Waits for the server to accept schema operations.
    ///
    /// Probes by creating and deleting a throwaway class. Only errors
    /// classified as retryable keep the loop going; a rejected probe is a
    /// real failure and is surfaced immediately.
    pub async fn wait_ready(&self, max_attempts: u32, delay: Duration) -> Result<()> {
        for attempt in 1..=max_attempts {
            let probe = ClassDefinition::named(PROBE_CLASS);
            let outcome = match self.create_class(&probe).await {
                Ok(outcome) => outcome,
                Err(err) if err.is_retryable() => {
                    info!(attempt, max_attempts, err = %err, "server not ready, retrying");
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(err) => return Err(err),
            };

            if outcome == CreateClassOutcome::Created {
                self.delete_class(PROBE_CLASS).await?;
            }
            return Ok(());
        }

        Err(ClientError::NotReady {
            attempts: max_attempts,
        })
    }
}

/// Maps a non-success status to the matching error classification.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    if status.is_server_error() {
        return ServerSnafu { status, message }.fail();
    }
    RejectedSnafu { status, message }.fail()
}
