//! Integration tests using wiremock to simulate the BshEngine API.

use bshengine::auth::StaticAuth;
use bshengine::config::ServiceConfig;
use bshengine::services::{ExportFormat, ImageUpload, ListParams, Tenant};
use bshengine::transport::ReqwestTransport;
use bshengine::{BshEngine, CallOptions, Client, Error, RequestOptions};
use bytes::Bytes;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestData {
    id: u32,
    name: String,
}

fn ok(data: Value) -> Value {
    json!({"data": data, "code": 200, "status": "OK", "error": ""})
}

fn client(server: &MockServer) -> Client {
    Client::builder()
        .host(server.uri())
        .transport(ReqwestTransport::new().unwrap())
        .build()
        .unwrap()
}

fn engine(server: &MockServer, auth: StaticAuth) -> BshEngine {
    BshEngine::new(
        ServiceConfig::new()
            .host(server.uri())
            .transport(ReqwestTransport::new().unwrap())
            .auth(auth),
    )
    .unwrap()
}

#[tokio::test]
async fn test_successful_get_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([{"id": 1, "name": "Test"}]))))
        .mount(&mock_server)
        .await;

    let envelope = client(&mock_server)
        .get::<TestData>("/test", RequestOptions::new(), CallOptions::new())
        .await
        .unwrap()
        .unwrap();

    assert!(envelope.is_ok());
    assert_eq!(
        envelope.data,
        vec![TestData {
            id: 1,
            name: "Test".to_string()
        }]
    );
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    let request_data = TestData {
        id: 0,
        name: "New".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/test"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&request_data))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": [{"id": 1, "name": "New"}],
            "code": 201,
            "status": "Created",
            "error": ""
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let envelope = client(&mock_server)
        .post::<TestData>(
            "/test",
            RequestOptions::json(&request_data).unwrap(),
            CallOptions::new(),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(envelope.code, 201);
    assert_eq!(envelope.first().map(|d| d.id), Some(1));
}

#[tokio::test]
async fn test_jwt_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tenants/t-1"))
        .and(header("Authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([
            {"persistenceId": "t-1", "name": "Acme"}
        ]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let envelope = engine(&mock_server, StaticAuth::jwt("jwt-token"))
        .tenants()
        .unwrap()
        .get_by_id::<Tenant>("t-1", CallOptions::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(envelope.first().map(|t| t.name.as_str()), Some("Acme"));
}

#[tokio::test]
async fn test_api_key_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("X-BSH-APIKEY", "key-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = engine(&mock_server, StaticAuth::api_key("key-123"))
        .users()
        .unwrap()
        .me::<Value>(CallOptions::new())
        .await;

    assert!(result.is_ok());

    let requests = mock_server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_list_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tenants"))
        .and(query_param("page", "2"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "code": 200,
            "status": "OK",
            "error": "",
            "pagination": {"current": 2, "total": 12, "pages": 2, "first": false, "last": true}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let envelope = engine(&mock_server, StaticAuth::jwt("t"))
        .tenants()
        .unwrap()
        .list::<Value>(
            ListParams {
                page: Some(2),
                size: Some(10),
                ..ListParams::default()
            },
            CallOptions::new(),
        )
        .await
        .unwrap()
        .unwrap();

    let pagination = envelope.pagination.unwrap();
    assert_eq!(pagination.total, 12);
    assert!(pagination.last);
}

#[tokio::test]
async fn test_404_error_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tenants/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "data": [],
            "code": 404,
            "status": "Not Found",
            "error": "Tenant not found"
        })))
        .mount(&mock_server)
        .await;

    let result = engine(&mock_server, StaticAuth::jwt("t"))
        .tenants()
        .unwrap()
        .get_by_id::<Tenant>("missing", CallOptions::new())
        .await;

    match result {
        Err(Error::Http {
            status,
            endpoint,
            response,
        }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(endpoint, "/api/tenants/missing");
            let response = response.unwrap();
            assert_eq!(response.error, "Tenant not found");
            assert_eq!(response.endpoint.as_deref(), Some("/api/tenants/missing"));
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_500_plain_text_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .get::<Value>("/test", RequestOptions::new(), CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(err.response().is_none());
}

#[tokio::test]
async fn test_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([{"wrong_field": "value"}]))))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .get::<TestData>("/test", RequestOptions::new(), CallOptions::new())
        .await;

    match result {
        Err(Error::DeserializationFailed {
            raw_response,
            status,
            ..
        }) => {
            assert!(raw_response.contains("wrong_field"));
            assert_eq!(status, StatusCode::OK);
        }
        other => panic!("Expected DeserializationFailed error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_export_download() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/entities/Orders/export"))
        .and(query_param("format", "csv"))
        .and(query_param("filename", "orders.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"id,total\n1,10\n".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let blob = engine(&mock_server, StaticAuth::jwt("t"))
        .entities()
        .unwrap()
        .export(
            "Orders",
            &json!({"filters": []}),
            ExportFormat::Csv,
            Some("orders.csv"),
            CallOptions::new(),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(blob, Bytes::from_static(b"id,total\n1,10\n"));
}

#[tokio::test]
async fn test_image_upload_multipart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/images/upload"))
        .and(header_exists("content-type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([{"url": "http://cdn/logo.png"}]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut upload = ImageUpload::new("logo.png", Bytes::from_static(b"\x89PNG"));
    upload.content_type = Some("image/png".into());
    upload.asset_id = Some("asset-1".into());

    let envelope = engine(&mock_server, StaticAuth::jwt("t"))
        .images()
        .unwrap()
        .upload(upload, CallOptions::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        envelope.first().and_then(|r| r.url.as_deref()),
        Some("http://cdn/logo.png")
    );

    let requests = mock_server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"assetId\""));
    assert!(body.contains("filename=\"logo.png\""));
}

#[tokio::test]
async fn test_transport_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!([])))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .host(mock_server.uri())
        .transport(
            ReqwestTransport::builder()
                .timeout(Duration::from_millis(100))
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let err = client
        .get::<Value>("/slow", RequestOptions::new(), CallOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_transport_exception());
}

#[tokio::test]
async fn test_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .and(header("User-Agent", "bshengine-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .host(mock_server.uri())
        .transport(
            ReqwestTransport::builder()
                .default_header("User-Agent", "bshengine-tests")
                .unwrap()
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let result = client
        .get::<Value>("/test", RequestOptions::new(), CallOptions::new())
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_request_header_replaces_default_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .host(mock_server.uri())
        .transport(
            ReqwestTransport::builder()
                .default_header("X-Tenant", "default")
                .unwrap()
                .default_header("User-Agent", "bshengine-tests")
                .unwrap()
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    client
        .get::<Value>(
            "/test",
            RequestOptions::new().with_header("X-Tenant", "caller"),
            CallOptions::new(),
        )
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let tenants: Vec<&str> = requests[0]
        .headers
        .get_all("x-tenant")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(tenants, vec!["caller"]);
    assert_eq!(
        requests[0].headers.get("user-agent").unwrap(),
        "bshengine-tests"
    );
}

#[tokio::test]
async fn test_auth_header_replaces_default_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .mount(&mock_server)
        .await;

    let engine = BshEngine::new(
        ServiceConfig::new()
            .host(mock_server.uri())
            .transport(
                ReqwestTransport::builder()
                    .default_header("X-BSH-APIKEY", "stale-key")
                    .unwrap()
                    .build()
                    .unwrap(),
            )
            .auth(StaticAuth::api_key("fresh-key")),
    )
    .unwrap();

    engine
        .users()
        .unwrap()
        .me::<Value>(CallOptions::new())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let keys: Vec<&str> = requests[0]
        .headers
        .get_all("x-bsh-apikey")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["fresh-key"]);
}

#[tokio::test]
async fn test_export_filename_is_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/entities/Orders/export"))
        .and(query_param("format", "json"))
        .and(query_param("filename", "Q1 & Q2.json"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"[]".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let blob = engine(&mock_server, StaticAuth::jwt("t"))
        .entities()
        .unwrap()
        .export(
            "Orders",
            &json!({}),
            ExportFormat::Json,
            Some("Q1 & Q2.json"),
            CallOptions::new(),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(blob, Bytes::from_static(b"[]"));

    let requests = mock_server.received_requests().await.unwrap();
    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(pairs.len(), 2);
}
