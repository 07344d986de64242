//! Protocol tests for the session layer, run against a local mock server.
//!
//! These cover the contracts that matter most: the 429 retry policy, the
//! `Link`-cursor pagination engine (completeness, laziness, no parameter
//! re-application), the admission gate, and error mapping.

use std::sync::Once;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use teamspace_rs::{ClientConfig, Credential, Error, RoomId, TeamSpaceClient};

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn client_for(server: &MockServer) -> TeamSpaceClient {
    init_logging();
    TeamSpaceClient::with_config(
        Credential::new("test-token"),
        ClientConfig::default().with_base_url(server.uri()),
    )
    .expect("client should build")
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: u32,
}

#[derive(Serialize)]
struct ListQuery {
    max: u32,
}

fn page_body(ids: &[u32]) -> serde_json::Value {
    json!({ "items": ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>() })
}

/// Mount a three-page widget listing: 2/2/1 items, `Link: rel="next"`
/// headers on pages one and two.
async fn mount_three_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("cursor", "p2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&[3, 4]))
                .insert_header(
                    "Link",
                    format!(r#"<{}/widgets?cursor=p3>; rel="next""#, server.uri()).as_str(),
                ),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("cursor", "p3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[5])))
        .mount(server)
        .await;

    // First page: matched last so the cursor params above take precedence.
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&[1, 2]))
                .insert_header(
                    "Link",
                    format!(r#"<{}/widgets?cursor=p2>; rel="next""#, server.uri()).as_str(),
                ),
        )
        .mount(server)
        .await;
}

// ============================================================================
// RETRY POLICY
// ============================================================================

#[tokio::test]
async fn test_retry_resumes_after_429() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let rooms = client.rooms().list(None).await.expect("should succeed");
    assert!(rooms.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3, "two 429 attempts plus the success");
    assert_eq!(client.throttle_retry_count(), 2);
}

#[tokio::test]
async fn test_non_429_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.rooms().list(None).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.is_server_error());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "5xx must not be retried");
    assert_eq!(client.throttle_retry_count(), 0);
}

#[tokio::test]
async fn test_retry_after_header_is_honored() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let started = Instant::now();
    client.rooms().list(None).await.expect("should succeed");
    let elapsed = started.elapsed();

    assert!(
        elapsed >= Duration::from_secs(2),
        "two 1s backoffs expected, slept only {:?}",
        elapsed
    );
    assert_eq!(client.throttle_retry_count(), 2);
}

// ============================================================================
// PAGINATION
// ============================================================================

#[tokio::test]
async fn test_pagination_yields_all_items_in_order() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let client = client_for(&server);
    let items: Vec<_> = client
        .paginate::<Widget, ListQuery>("/widgets", Some(&ListQuery { max: 2 }), None)
        .collect::<Vec<_>>()
        .await;

    let ids: Vec<u32> = items
        .into_iter()
        .map(|r| r.expect("no page should fail").id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3, "exactly one GET per page");
}

#[tokio::test]
async fn test_pagination_is_lazy() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let client = client_for(&server);
    let mut stream = client.paginate::<Widget, ListQuery>("/widgets", None, None);

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.id, 1);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests.len(),
        1,
        "consuming one item must not fetch a second page"
    );
}

#[tokio::test]
async fn test_pagination_does_not_reapply_params() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;

    let client = client_for(&server);
    let count = client
        .paginate::<Widget, ListQuery>("/widgets", Some(&ListQuery { max: 2 }), None)
        .count()
        .await;
    assert_eq!(count, 5);

    let requests = server.received_requests().await.unwrap();
    let queries: Vec<Vec<(String, String)>> = requests
        .iter()
        .map(|r| {
            r.url
                .query_pairs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .collect();

    // First request carries the caller's params...
    assert_eq!(queries[0], vec![("max".to_string(), "2".to_string())]);
    // ...follow-ups carry only the server's cursor.
    assert_eq!(queries[1], vec![("cursor".to_string(), "p2".to_string())]);
    assert_eq!(queries[2], vec![("cursor".to_string(), "p3".to_string())]);
}

#[tokio::test]
async fn test_pagination_scenario_250_items() {
    let server = MockServer::start().await;

    let page: Vec<u32> = (0..100).collect();
    let page2: Vec<u32> = (100..200).collect();
    let page3: Vec<u32> = (200..250).collect();

    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("cursor", "c2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&page2))
                .insert_header(
                    "Link",
                    format!(r#"<{}/widgets?cursor=c3>; rel="next""#, server.uri()).as_str(),
                ),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("cursor", "c3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&page3)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&page))
                .insert_header(
                    "Link",
                    format!(r#"<{}/widgets?cursor=c2>; rel="next""#, server.uri()).as_str(),
                ),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ids: Vec<u32> = client
        .paginate::<Widget, ListQuery>("/widgets", Some(&ListQuery { max: 100 }), None)
        .map(|r| r.expect("no page should fail").id)
        .collect()
        .await;

    assert_eq!(ids.len(), 250);
    assert_eq!(ids, (0..250).collect::<Vec<u32>>());
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_pagination_skips_empty_page_with_next_link() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("cursor", "empty"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&[]))
                .insert_header(
                    "Link",
                    format!(r#"<{}/widgets?cursor=last>; rel="next""#, server.uri()).as_str(),
                ),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("cursor", "last"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[9])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&[1]))
                .insert_header(
                    "Link",
                    format!(r#"<{}/widgets?cursor=empty>; rel="next""#, server.uri()).as_str(),
                ),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ids: Vec<u32> = client
        .paginate::<Widget, ListQuery>("/widgets", None, None)
        .map(|r| r.expect("no page should fail").id)
        .collect()
        .await;
    assert_eq!(ids, vec![1, 9]);
}

#[tokio::test]
async fn test_pagination_failure_surfaces_at_failing_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/widgets"))
        .and(query_param("cursor", "p2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/widgets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(&[1, 2]))
                .insert_header(
                    "Link",
                    format!(r#"<{}/widgets?cursor=p2>; rel="next""#, server.uri()).as_str(),
                ),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.paginate::<Widget, ListQuery>("/widgets", None, None);

    assert_eq!(stream.next().await.unwrap().unwrap().id, 1);
    assert_eq!(stream.next().await.unwrap().unwrap().id, 2);

    let err = stream.next().await.unwrap().unwrap_err();
    assert_eq!(err.status(), Some(500));

    assert!(stream.next().await.is_none(), "stream ends after the error");
}

#[tokio::test]
async fn test_pagination_explicit_item_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/widgets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 2,
            "widgets": [{ "id": 7 }, { "id": 8 }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ids: Vec<u32> = client
        .paginate::<Widget, ListQuery>("/widgets", None, Some("widgets"))
        .map(|r| r.expect("no page should fail").id)
        .collect()
        .await;
    assert_eq!(ids, vec![7, 8]);
}

// ============================================================================
// CONCURRENCY GATE
// ============================================================================

#[tokio::test]
async fn test_concurrency_gate_caps_in_flight_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/people/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "p-1", "emails": [] }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let client = TeamSpaceClient::with_config(
        Credential::new("test-token"),
        ClientConfig::default()
            .with_base_url(server.uri())
            .with_concurrent_requests(2),
    )
    .unwrap();

    let started = Instant::now();
    let results = futures_util::future::join_all(
        (0..4).map(|_| {
            let client = client.clone();
            async move { client.people().me().await }
        }),
    )
    .await;
    let elapsed = started.elapsed();

    for result in results {
        result.expect("all gated requests should succeed");
    }
    // 4 requests of ~300ms through a 2-wide gate need at least 2 batches.
    assert!(
        elapsed >= Duration::from_millis(600),
        "gate of 2 must serialize 4 requests into 2 batches, took {:?}",
        elapsed
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

// ============================================================================
// TRANSPORT & ERROR MAPPING
// ============================================================================

#[tokio::test]
async fn test_bearer_header_carries_live_credential() {
    let server = MockServer::start().await;

    // The mock only matches when the bearer header carries the live
    // credential.
    Mock::given(method("GET"))
        .and(path("/people/me"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "p-1", "emails": [] })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .people()
        .me()
        .await
        .expect("request must carry auth and tracking headers");
}

#[tokio::test]
async fn test_error_body_is_mapped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rooms/r-missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "The requested resource could not be found.",
            "errorCode": "not_found",
            "trackingId": "TS_trace_1",
            "errors": [
                { "description": "room does not exist", "errorCode": "missing_room" }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .rooms()
        .get(&RoomId::new("r-missing"))
        .await
        .unwrap_err();

    match err {
        Error::Api {
            status,
            code,
            message,
            errors,
            tracking_id,
        } => {
            assert_eq!(status, 404);
            assert_eq!(code.as_deref(), Some("not_found"));
            assert_eq!(message, "The requested resource could not be found.");
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].description, "room does not exist");
            assert_eq!(tracking_id.as_deref(), Some("TS_trace_1"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rooms/r-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .rooms()
        .delete(&RoomId::new("r-1"))
        .await
        .expect("204 with no body is a success");
}

#[tokio::test]
async fn test_malformed_json_is_a_parse_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/people/me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{ definitely not json", "application/json"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.people().me().await.unwrap_err();
    assert!(matches!(err, Error::Json(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_model_mapping_from_wire() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "r-1",
                "title": "Platform Eng",
                "type": "group",
                "isLocked": true,
                "creatorId": "p-9",
                "created": "2023-01-15T08:30:00.000Z"
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let rooms = client.rooms().list(None).await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].title, "Platform Eng");
    assert!(rooms[0].is_locked);
    assert_eq!(rooms[0].creator_id.as_ref().unwrap().as_str(), "p-9");
}
