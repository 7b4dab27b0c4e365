#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use sower_schema::{DataType, Field, Row, Schema, Value};
use sower_weaviate::client::CreateClassOutcome;
use sower_weaviate::types::{
    ClassDefinition, ErrorMessage, ErrorPayload, ObjectResult, ObjectStatus, ResultStatus,
    WeaviateObject,
};
use sower_writer::{TransportError, WeaviateTransport};

/// How the mock transport answers batch submissions.
#[derive(Debug, Clone, Copy)]
pub enum SubmitBehavior {
    /// Every object succeeds.
    Succeed,
    /// Every call fails with a retryable error.
    AlwaysTransient,
    /// Every call fails with a terminal rejection.
    AlwaysRejected,
    /// Objects whose title contains "bad" fail individually.
    RejectBadTitles,
}

/// An in-memory transport that records every interaction.
pub struct MockTransport {
    pub behavior: SubmitBehavior,
    pub class_exists: bool,
    pub create_outcome: CreateClassOutcome,
    pub submit_calls: AtomicUsize,
    pub submitted: Mutex<Vec<Vec<WeaviateObject>>>,
    pub created_classes: Mutex<Vec<ClassDefinition>>,
}

impl MockTransport {
    pub fn new(behavior: SubmitBehavior) -> Self {
        Self {
            behavior,
            class_exists: true,
            create_outcome: CreateClassOutcome::Created,
            submit_calls: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
            created_classes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_class_exists(mut self, exists: bool) -> Self {
        self.class_exists = exists;
        self
    }

    pub fn with_create_outcome(mut self, outcome: CreateClassOutcome) -> Self {
        self.create_outcome = outcome;
        self
    }

    pub fn calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    /// All submitted objects, flattened in submission order.
    pub fn submitted_objects(&self) -> Vec<WeaviateObject> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .cloned()
            .collect()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.submitted.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl WeaviateTransport for MockTransport {
    async fn submit(
        &self,
        objects: &[WeaviateObject],
    ) -> Result<Vec<ObjectResult>, TransportError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(objects.to_vec());

        match self.behavior {
            SubmitBehavior::Succeed => Ok(objects.iter().map(|_| success_result()).collect()),
            SubmitBehavior::AlwaysTransient => Err(TransportError::Transient {
                message: "connection reset".into(),
            }),
            SubmitBehavior::AlwaysRejected => Err(TransportError::Rejected {
                message: "invalid batch payload".into(),
            }),
            SubmitBehavior::RejectBadTitles => Ok(objects
                .iter()
                .map(|object| {
                    let title = object.properties.get("title").and_then(|v| v.as_str());
                    if title.is_some_and(|t| t.contains("bad")) {
                        failed_result("title is not acceptable")
                    } else {
                        success_result()
                    }
                })
                .collect()),
        }
    }

    async fn class_exists(&self, _class: &str) -> Result<bool, TransportError> {
        Ok(self.class_exists)
    }

    async fn create_class(
        &self,
        definition: &ClassDefinition,
    ) -> Result<CreateClassOutcome, TransportError> {
        self.created_classes.lock().unwrap().push(definition.clone());
        Ok(self.create_outcome)
    }
}

pub fn success_result() -> ObjectResult {
    ObjectResult {
        id: None,
        result: ResultStatus {
            status: ObjectStatus::Success,
            errors: None,
        },
    }
}

pub fn failed_result(message: &str) -> ObjectResult {
    ObjectResult {
        id: None,
        result: ResultStatus {
            status: ObjectStatus::Failed,
            errors: Some(ErrorPayload {
                error: vec![ErrorMessage {
                    message: message.to_string(),
                }],
            }),
        },
    }
}

/// The article schema from the connector's reference scenario.
pub fn article_schema() -> Schema {
    Schema::new(vec![
        Field::new("title", DataType::Text, true),
        Field::new("keywords", DataType::TextArray, true),
    ])
}

pub fn article_row(title: &str, keywords: &[&str]) -> Row {
    Row::new()
        .with("title", Value::Text(title.to_string()))
        .with(
            "keywords",
            Value::TextArray(keywords.iter().map(|k| k.to_string()).collect()),
        )
}

/// `count` article rows titled `{prefix}-{i}`.
pub fn article_rows(prefix: &str, count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| article_row(&format!("{prefix}-{i}"), &[]))
        .collect()
}
