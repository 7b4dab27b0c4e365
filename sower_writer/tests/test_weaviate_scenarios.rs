//! End-to-end scenarios over the real HTTP client against a mock server,
//! mirroring the connector's reference integration flow.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sower_weaviate::WeaviateClient;
use sower_writer::{MemoryDataset, RetryPolicy, WriteConfig, WriteCoordinator};

mod common;

use common::{article_row, article_schema};

fn scenario_config() -> WriteConfig {
    WriteConfig::new("localhost:8080", "Article").with_retry(RetryPolicy {
        max_retries: 1,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(2),
    })
}

#[tokio::test]
async fn test_string_arrays_round_trip_in_a_single_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/schema/Article"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "class": "Article" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/batch/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "result": { "status": "SUCCESS" } },
            { "result": { "status": "SUCCESS" } }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/objects"))
        .and(query_param("class", "Article"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [
                { "class": "Article", "properties": { "title": "Sam and Sam", "keywords": [] } },
                { "class": "Article", "properties": { "title": "Not Sam", "keywords": ["keyword1", "keyword2"] } }
            ]
        })))
        .mount(&server)
        .await;

    let client = Arc::new(WeaviateClient::new(server.uri()));
    let dataset = MemoryDataset::new(article_schema()).with_partition(vec![
        article_row("Sam and Sam", &[]),
        article_row("Not Sam", &["keyword1", "keyword2"]),
    ]);

    let job = WriteCoordinator::new(client.clone(), scenario_config().with_batch_size(100))
        .run(dataset, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(job.total_success, 2);
    assert_eq!(job.total_failed, 0);

    // Two rows, batch size 100: exactly one submission, in row order.
    let requests = server.received_requests().await.unwrap();
    let batches: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/v1/batch/objects")
        .collect();
    assert_eq!(batches.len(), 1);
    let body: serde_json::Value = batches[0].body_json().unwrap();
    let objects = body["objects"].as_array().unwrap();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0]["properties"]["title"], json!("Sam and Sam"));
    assert_eq!(objects[0]["properties"]["keywords"], json!([]));
    assert_eq!(objects[1]["properties"]["keywords"], json!(["keyword1", "keyword2"]));

    // The read-back mirrors what was written.
    let stored = client.list_objects("Article").await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].properties["keywords"], json!(["keyword1", "keyword2"]));
}

#[tokio::test]
async fn test_auto_create_racing_with_an_existing_class_proceeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/schema/Article"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    // The class shows up between the existence check and the create.
    Mock::given(method("POST"))
        .and(path("/v1/schema"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": [{ "message": "class \"Article\" already exists" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/batch/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "result": { "status": "SUCCESS" } }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(WeaviateClient::new(server.uri()));
    let dataset = MemoryDataset::new(article_schema())
        .with_partition(vec![article_row("Sam and Sam", &[])]);

    let job = WriteCoordinator::new(client, scenario_config().with_create_class(true))
        .run(dataset, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(job.total_success, 1);
    assert!(job.is_complete_success());
}

#[tokio::test]
async fn test_transient_server_errors_are_retried_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/schema/Article"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "class": "Article" })))
        .mount(&server)
        .await;
    // First submission hits an overloaded server, the retry succeeds.
    Mock::given(method("POST"))
        .and(path("/v1/batch/objects"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/batch/objects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "result": { "status": "SUCCESS" } }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(WeaviateClient::new(server.uri()));
    let dataset = MemoryDataset::new(article_schema())
        .with_partition(vec![article_row("Sam and Sam", &[])]);

    let job = WriteCoordinator::new(client, scenario_config())
        .run(dataset, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(job.total_success, 1);
}
