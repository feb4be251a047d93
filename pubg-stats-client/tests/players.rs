//! End-to-end tests for player lookups against a mocked API server.

use pubg_stats_client::{Client, ClientConfig, ClientError};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PLAYERS_PATH: &str = "/shards/steam/players";

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// A minimal players response body for the given names, tagged with a
/// `links` object so tests can tell which chunk an envelope came from.
fn player_body(names: &[&str], link: &str) -> Value {
    let data: Vec<Value> = names
        .iter()
        .map(|name| {
            json!({
                "type": "player",
                "id": format!("account.{name}"),
                "attributes": { "name": name }
            })
        })
        .collect();
    json!({ "data": data, "links": { "self": link } })
}

/// A config pointed at the mock server, with backoff compressed so retry
/// tests finish in milliseconds.
fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new("test-key".to_string())
        .with_base_url(Url::parse(&server.uri()).unwrap())
        .with_backoff_base(Duration::from_millis(10))
}

#[tokio::test]
async fn looks_up_players_with_auth_and_accept_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .and(query_param("filter[playerNames]", "shroud,chocoTaco"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Accept", "application/vnd.api+json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(player_body(&["shroud", "chocoTaco"], "p1")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server)).unwrap();
    let envelope = client
        .get_player_info(&names(&["shroud", "chocoTaco"]))
        .await
        .unwrap();

    assert_eq!(envelope.data.len(), 2);
    assert_eq!(envelope.data[0]["attributes"]["name"], json!("shroud"));
}

#[tokio::test]
async fn second_lookup_within_the_ttl_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_body(&["a", "b"], "p1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server)).unwrap();
    let list = names(&["a", "b"]);

    let first = client.get_player_info(&list).await.unwrap();
    let second = client.get_player_info(&list).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn expired_cache_entry_triggers_a_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_body(&["a"], "p1")))
        .expect(2)
        .mount(&server)
        .await;

    // A zero TTL makes every stored entry stale on the next read.
    let config = test_config(&server).with_cache_ttl(Duration::ZERO);
    let client = Client::new(config).unwrap();
    let list = names(&["a"]);

    client.get_player_info(&list).await.unwrap();
    client.get_player_info(&list).await.unwrap();
}

#[tokio::test]
async fn reordered_names_are_a_separate_cache_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_body(&["a", "b"], "p1")))
        .expect(2)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server)).unwrap();

    client.get_player_info(&names(&["a", "b"])).await.unwrap();
    client.get_player_info(&names(&["b", "a"])).await.unwrap();
}

#[tokio::test]
async fn long_name_lists_are_chunked_and_merged_in_order() {
    let all: Vec<String> = (0..23).map(|i| format!("p{i:02}")).collect();
    let chunks: Vec<Vec<&str>> = all
        .chunks(10)
        .map(|chunk| chunk.iter().map(String::as_str).collect())
        .collect();
    assert_eq!(chunks.len(), 3);

    let server = MockServer::start().await;
    for (index, chunk) in chunks.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(PLAYERS_PATH))
            .and(query_param("filter[playerNames]", chunk.join(",")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(player_body(chunk, &format!("chunk-{index}"))),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = Client::new(test_config(&server)).unwrap();
    let envelope = client.get_player_info(&all).await.unwrap();

    assert_eq!(envelope.data.len(), 23);
    assert_eq!(envelope.data[0]["attributes"]["name"], json!("p00"));
    assert_eq!(envelope.data[10]["attributes"]["name"], json!("p10"));
    assert_eq!(envelope.data[22]["attributes"]["name"], json!("p22"));
    // Only `data` accumulates; other top-level fields come from the first chunk.
    assert_eq!(envelope.extra["links"]["self"], json!("chunk-0"));
}

#[tokio::test]
async fn server_rate_limit_responses_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_body(&["a"], "p1")))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server)).unwrap();
    let envelope = client.get_player_info(&names(&["a"])).await.unwrap();

    assert_eq!(envelope.data.len(), 1);
}

#[tokio::test]
async fn persistent_server_errors_exhaust_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server)).unwrap();
    let error = client.get_player_info(&names(&["a"])).await.unwrap_err();

    assert!(matches!(
        error,
        ClientError::Request {
            status: 500,
            attempts: 3
        }
    ));
}

#[tokio::test]
async fn server_reported_errors_fail_without_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "title": "Unauthorized", "detail": "bad key" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server)).unwrap();
    let error = client.get_player_info(&names(&["a"])).await.unwrap_err();

    match error {
        ClientError::Api { detail } => assert_eq!(detail, "bad key"),
        other => panic!("expected ClientError::Api, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_bodies_fail_without_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server)).unwrap();
    let error = client.get_player_info(&names(&["a"])).await.unwrap_err();

    assert!(matches!(error, ClientError::Parse { .. }));
}

#[tokio::test]
async fn a_failing_chunk_aborts_the_call_and_caches_nothing() {
    let all: Vec<String> = (0..12).map(|i| format!("p{i:02}")).collect();
    let first_filter = all[..10].join(",");

    let server = MockServer::start().await;
    // The first chunk succeeds both times; the second always fails.
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .and(query_param("filter[playerNames]", first_filter))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_body(
            &all[..10].iter().map(String::as_str).collect::<Vec<_>>(),
            "p1",
        )))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server)).unwrap();

    let error = client.get_player_info(&all).await.unwrap_err();
    assert!(matches!(error, ClientError::Request { status: 404, .. }));

    // Nothing was cached, so a repeat call re-fetches the first chunk too.
    let error = client.get_player_info(&all).await.unwrap_err();
    assert!(matches!(error, ClientError::Request { status: 404, .. }));
}

#[tokio::test]
async fn invalid_name_lists_make_no_network_calls() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 and, worse, violate expect(0).
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server)).unwrap();

    let error = client.get_player_info(&[]).await.unwrap_err();
    assert!(matches!(error, ClientError::Validation { .. }));

    let error = client
        .get_player_info(&names(&["a", ""]))
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::Validation { .. }));
}
