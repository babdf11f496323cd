// Not every util is used in every test file, so we allow dead code
#![allow(unused_imports, dead_code)]

use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use http_body_util::BodyExt;
use tower::ServiceExt;

use backend::auth::TokenVerifier;
use backend::blob_storage::memory::InMemoryBlobStorage;
use backend::server;
use backend::state::AppState;
use backend::types::Environment;
use image_storage::image_record::memory::InMemoryImageRecordStore;

const TEST_SECRET: &str = "test-secret";

/// Router wired with in-memory doubles, plus handles on the doubles so tests
/// can assert on store contents and gateway traffic
pub struct TestSetup {
    pub router: Router,
    pub record_store: Arc<InMemoryImageRecordStore>,
    pub blob_storage: Arc<InMemoryBlobStorage>,
    token_verifier: Arc<TokenVerifier>,
}

impl TestSetup {
    pub fn new() -> Self {
        let record_store = Arc::new(InMemoryImageRecordStore::new());
        let blob_storage = Arc::new(InMemoryBlobStorage::new());
        let token_verifier = Arc::new(TokenVerifier::new(TEST_SECRET));

        let router = server::app(AppState {
            record_store: record_store.clone(),
            blob_storage: blob_storage.clone(),
            token_verifier: token_verifier.clone(),
            environment: Environment::Development,
        });

        Self {
            router,
            record_store,
            blob_storage,
            token_verifier,
        }
    }

    /// Mints a valid bearer token for `user_id`
    pub fn token_for(&self, user_id: &str) -> String {
        self.token_verifier.issue(user_id)
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    pub async fn get(&self, uri: &str, user: Option<&str>) -> Response {
        self.bodyless("GET", uri, user).await
    }

    pub async fn delete(&self, uri: &str, user: Option<&str>) -> Response {
        self.bodyless("DELETE", uri, user).await
    }

    async fn bodyless(&self, method: &str, uri: &str, user: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri).method(method);
        if let Some(user) = user {
            builder = builder.header("Authorization", format!("Bearer {}", self.token_for(user)));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn send_multipart(
        &self,
        method: &str,
        uri: &str,
        user: Option<&str>,
        body: MultipartBody,
    ) -> Response {
        let mut builder = Request::builder()
            .uri(uri)
            .method(method)
            .header("Content-Type", body.content_type_header());
        if let Some(user) = user {
            builder = builder.header("Authorization", format!("Bearer {}", self.token_for(user)));
        }
        self.send(builder.body(Body::from(body.into_bytes())).unwrap())
            .await
    }
}

/// Hand-rolled multipart/form-data body builder
pub struct MultipartBody {
    boundary: String,
    buf: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self {
            boundary: format!("----image-vault-test-{}", uuid::Uuid::new_v4().simple()),
            buf: Vec::new(),
        }
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(bytes);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type_header(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.buf
    }
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
