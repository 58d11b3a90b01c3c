use axum::http::{self, header, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{
    app, EchoedRequest, JSON_BODY, MALFORMED_JSON_BODY, MAX_BYTES, NUMBERS_JSON_BODY, TEXT_BODY,
};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_method_path_query_headers_and_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/echo/nested/path?b=2&a=1")
                .header("x-one", "1")
                .header("x-one", "2")
                .header(http::header::CONTENT_TYPE, "text/plain")
                .body("payload".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let echoed: EchoedRequest = body_json(resp).await;
    assert_eq!(echoed.method, "PUT");
    assert_eq!(echoed.path, "/echo/nested/path");
    assert_eq!(echoed.query.as_deref(), Some("b=2&a=1"));
    assert_eq!(echoed.header_values("x-one"), vec!["1", "2"]);
    assert_eq!(echoed.body, "payload");
}

#[tokio::test]
async fn echo_accepts_options() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/echo")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: EchoedRequest = body_json(resp).await;
    assert_eq!(echoed.method, "OPTIONS");
    assert!(echoed.query.is_none());
}

// --- basic challenge ---

#[tokio::test]
async fn basic_without_credentials_is_challenged() {
    let resp = app().oneshot(get("/basic")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers()[header::WWW_AUTHENTICATE],
        "Basic realm=\"mock\""
    );
}

#[tokio::test]
async fn basic_with_credentials_echoes() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/basic")
                .header(header::AUTHORIZATION, "Basic dTpw")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: EchoedRequest = body_json(resp).await;
    assert_eq!(echoed.header_values("authorization"), vec!["Basic dTpw"]);
}

// --- fixed bodies ---

#[tokio::test]
async fn text_route_is_plain() {
    let resp = app().oneshot(get("/text")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_bytes(resp).await, TEXT_BODY.as_bytes());
}

#[tokio::test]
async fn json_route_is_compact_json() {
    let resp = app().oneshot(get("/json")).await.unwrap();

    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_bytes(resp).await, JSON_BODY.as_bytes());
}

#[tokio::test]
async fn malformed_json_route_declares_json() {
    let resp = app().oneshot(get("/malformed-json")).await.unwrap();

    assert!(resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    assert_eq!(body_bytes(resp).await, MALFORMED_JSON_BODY.as_bytes());
}

#[tokio::test]
async fn numbers_route_keeps_literal_number_forms() {
    let resp = app().oneshot(get("/numbers")).await.unwrap();

    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_bytes(resp).await, NUMBERS_JSON_BODY.as_bytes());
}

#[tokio::test]
async fn bytes_route_returns_requested_length() {
    let resp = app().oneshot(get("/bytes/1500")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(body.len(), 1500);
    assert!(body.iter().all(|b| *b == b'x'));
}

#[tokio::test]
async fn bytes_route_rejects_oversized_count() {
    let resp = app()
        .oneshot(get(&format!("/bytes/{}", MAX_BYTES + 1)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_headers_are_both_sent() {
    let resp = app().oneshot(get("/duplicate-headers")).await.unwrap();

    let values: Vec<_> = resp
        .headers()
        .get_all("x-dup")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["one", "two"]);
    assert_eq!(resp.headers()["x-single"], "a: b");
}

// --- status ---

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app().oneshot(get("/status/418")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(body_bytes(resp).await, "status 418".as_bytes());
}

#[tokio::test]
async fn status_route_rejects_out_of_range_code() {
    let resp = app().oneshot(get("/status/42")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
