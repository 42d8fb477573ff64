//! Router-level test helpers over in-memory state

use crate::auth::AUTH_TOKEN_HEADER;
use crate::config::{AppConfig, StorageDriver};
use crate::routes::create_router;
use crate::state::AppState;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_HOST: &str = "hub.test";
const BOUNDARY: &str = "content-hub-test-boundary";

/// A router over fresh in-memory repositories and a temporary upload dir
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();

        let mut config = AppConfig::default();
        config.jwt.secret = "route-test-secret".to_string();
        config.database.driver = StorageDriver::Memory;
        config.uploads.dir = uploads.path().to_string_lossy().into_owned();

        let state = AppState::in_memory(config);
        Self {
            router: create_router(state.clone()),
            state,
            uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    /// Register a user and return its token
    pub async fn register(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .send(json_request(
                Method::POST,
                "/api/auth/register",
                None,
                json!({ "name": name, "email": email, "password": "password123" }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTH_TOKEN_HEADER, token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTH_TOKEN_HEADER, token);
    }
    builder.body(Body::empty()).unwrap()
}

/// Hand-assembled `multipart/form-data` body
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}

pub fn multipart_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: MultipartBody,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, TEST_HOST)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(AUTH_TOKEN_HEADER, token);
    }
    builder.body(Body::from(body.finish())).unwrap()
}

/// The listing fields of a valid hotel form
pub fn hotel_fields(name: &str) -> MultipartBody {
    MultipartBody::default()
        .text("name", name)
        .text("email", "desk@hotel.example")
        .text("address", "1 Harbour Road")
        .text("price", "120.50")
        .text("phoneNumber", "+33 1 23 45 67 89")
        .text("currency", "eur")
}
