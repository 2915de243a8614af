use std::time::Duration;

use meilisearch_http::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn executor(server: &MockServer) -> RequestExecutor {
    RequestExecutor::builder(server.uri())
        .api_key("masterKey")
        .timeout(Duration::from_secs(2))
        .build()
        .expect("executor")
}

#[tokio::test]
async fn get_decodes_json_and_sends_auth_without_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes"))
        .and(query_param("limit", "2"))
        .and(header("authorization", "Bearer masterKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"uid": "movies"}],
            "limit": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = QueryParams::new();
    query.insert("limit".into(), "2".into());
    let value = executor(&server).get("/indexes", Some(&query)).await.unwrap();

    assert_eq!(value.unwrap()["results"][0]["uid"], "movies");

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("content-type").is_none());
    let agent = received[0].headers.get("user-agent").unwrap().to_str().unwrap();
    assert!(agent.starts_with("Meilisearch Rust HTTP (v"));
}

#[tokio::test]
async fn post_sends_literal_json_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes/movies/search"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"a":1}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": []})))
        .expect(1)
        .mount(&server)
        .await;

    let value = executor(&server)
        .post("/indexes/movies/search", Some(json!({"a": 1}).into()), None)
        .await
        .unwrap();

    assert_eq!(value, Some(json!({"hits": []})));
}

#[tokio::test]
async fn error_status_is_terminal_api_error() {
    let server = MockServer::start().await;
    let body = r#"{"message":"Index `movies` not found.","code":"index_not_found","type":"invalid_request","link":"https://docs.meilisearch.com/errors#index_not_found"}"#;
    Mock::given(method("GET"))
        .and(path("/indexes/movies"))
        .respond_with(ResponseTemplate::new(404).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let executor = RequestExecutor::builder(server.uri())
        .max_retries(3)
        .backoff_unit(Duration::from_millis(5))
        .build()
        .unwrap();
    let err = executor.get("/indexes/movies", None).await.unwrap_err();

    assert_eq!(err, MeilisearchError::api_error(404, "Not Found", body));
    assert_eq!(err.api_details().unwrap().code.as_deref(), Some("index_not_found"));
    // `expect(1)` is verified when the server drops.
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/indexes/movies/settings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let executor = RequestExecutor::builder(server.uri())
        .max_retries(5)
        .build()
        .unwrap();
    let err = executor
        .patch("/indexes/movies/settings", Some(json!({"rankingRules": []}).into()), None)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.category(), ErrorCategory::Api);
}

#[tokio::test]
async fn empty_success_bodies_are_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/keys/abc"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/indexes/movies/settings/stop-words"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let executor = executor(&server);
    assert_eq!(executor.delete("/keys/abc", None).await.unwrap(), None);
    assert_eq!(
        executor
            .put(
                "/indexes/movies/settings/stop-words",
                Some(json!(["the"]).into()),
                None
            )
            .await
            .unwrap(),
        None
    );

    let received = server.received_requests().await.unwrap();
    assert!(received[0].headers.get("content-type").is_none());
    assert_eq!(received[1].headers.get("content-type").unwrap(), "application/json");
}

#[tokio::test]
async fn echoed_body_round_trips() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/echo"))
        .respond_with(|req: &Request| ResponseTemplate::new(200).set_body_bytes(req.body.clone()))
        .mount(&server)
        .await;

    let document = json!({
        "id": 42,
        "title": "Carol",
        "genres": ["Romance", "Drama"],
        "rating": 7.5,
        "released": true,
        "poster": null,
        "meta": {"nested": {"deep": [1, 2, 3]}}
    });

    let echoed = executor(&server)
        .post("/echo", Some(document.clone().into()), None)
        .await
        .unwrap();

    assert_eq!(echoed, Some(document));
}

#[tokio::test]
async fn raw_payload_is_sent_verbatim() {
    let server = MockServer::start().await;
    let csv = "id,title\n1,Carol\n2,Wonder Woman\n";
    Mock::given(method("POST"))
        .and(path("/indexes/movies/documents"))
        .and(header("content-type", "text/csv"))
        .and(body_string(csv))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"taskUid": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let spec = RequestSpec::post("/indexes/movies/documents", Some(RequestBody::raw(csv)))
        .with_header("Content-Type", "text/csv");
    let task = executor(&server).execute(spec).await.unwrap();

    assert_eq!(task, Some(json!({"taskUid": 7})));
}

#[tokio::test]
async fn slow_response_times_out_without_resending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/indexes/movies/documents"))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(json!({"taskUid": 1}))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let executor = RequestExecutor::builder(server.uri())
        .timeout(Duration::from_millis(50))
        .max_retries(2)
        .backoff_unit(Duration::from_millis(1))
        .build()
        .unwrap();
    let err = executor
        .post(
            "/indexes/movies/documents",
            Some(json!([{"id": 1, "title": "Carol"}]).into()),
            None,
        )
        .await
        .unwrap_err();

    assert!(
        matches!(err, MeilisearchError::ResponseTimeoutError { .. }),
        "unexpected error: {err:?}"
    );
    assert!(!err.is_retryable());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_server_is_a_communication_error_after_retries() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let executor = RequestExecutor::builder(format!("http://{addr}"))
        .max_retries(2)
        .backoff_unit(Duration::from_millis(1))
        .build()
        .unwrap();
    let err = executor.get("/health", None).await.unwrap_err();

    assert!(
        matches!(err, MeilisearchError::CommunicationError { .. }),
        "unexpected error: {err:?}"
    );
}
