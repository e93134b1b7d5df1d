//! Test doubles and request helpers shared by handler and router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::{hash_password, JwtKeys};
use crate::config::Config;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::user::{ExperienceLevel, Industry, NewUser, User};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{DocumentStore, StorageError, StoredObject};
use crate::store::memory::MemoryStore;
use crate::store::Store;

/// A `TextGenerator` that replays one canned reply, or fails once.
pub struct CannedGenerator {
    reply: Option<String>,
    failure: Mutex<Option<LlmError>>,
    prompts: Mutex<Vec<String>>,
}

impl CannedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            failure: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns `error` on the first call and `EmptyContent` afterwards.
    pub fn failing(error: LlmError) -> Self {
        Self {
            reply: None,
            failure: Mutex::new(Some(error)),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(self
                .failure
                .lock()
                .unwrap()
                .take()
                .unwrap_or(LlmError::EmptyContent)),
        }
    }
}

/// Document store that keeps objects in a vector. Deletes can be made to fail.
#[derive(Default)]
pub struct MemoryDocumentStore {
    objects: Mutex<Vec<(String, Bytes)>>,
    fail_deletes: bool,
}

impl MemoryDocumentStore {
    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::default()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().iter().map(|(k, _)| k.clone()).collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<StoredObject, StorageError> {
        self.objects.lock().unwrap().push((key.to_string(), body));
        Ok(StoredObject {
            key: key.to_string(),
            url: format!("http://files.test/{key}"),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_deletes {
            return Err(StorageError::Delete {
                key: key.to_string(),
                message: "bucket unavailable".to_string(),
            });
        }
        self.objects.lock().unwrap().retain(|(k, _)| k != key);
        Ok(())
    }
}

/// A router over in-memory backends, with handles kept for assertions.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub storage: Arc<MemoryDocumentStore>,
    pub llm: Arc<CannedGenerator>,
    pub jwt: JwtKeys,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(CannedGenerator::replying("[]"), MemoryDocumentStore::default())
    }

    pub fn with_llm(llm: CannedGenerator) -> Self {
        Self::build(llm, MemoryDocumentStore::default())
    }

    pub fn with_storage(storage: MemoryDocumentStore) -> Self {
        Self::build(CannedGenerator::replying("[]"), storage)
    }

    pub fn with_upload_limit(max_upload_bytes: usize) -> Self {
        let config = Config {
            max_upload_bytes,
            ..Config::for_tests()
        };
        Self::build_with(config, CannedGenerator::replying("[]"), MemoryDocumentStore::default())
    }

    fn build(llm: CannedGenerator, storage: MemoryDocumentStore) -> Self {
        Self::build_with(Config::for_tests(), llm, storage)
    }

    fn build_with(config: Config, llm: CannedGenerator, storage: MemoryDocumentStore) -> Self {
        let store = Arc::new(MemoryStore::new());
        let storage = Arc::new(storage);
        let llm = Arc::new(llm);
        let jwt = JwtKeys::new(config.jwt_secret.as_bytes(), config.jwt_ttl_days);

        let state = AppState {
            store: store.clone(),
            storage: storage.clone(),
            llm: llm.clone(),
            jwt: jwt.clone(),
            config,
        };

        Self {
            router: build_router(state),
            store,
            storage,
            llm,
            jwt,
        }
    }

    /// Inserts a user directly and returns it with a valid token.
    pub async fn user(&self, email: &str) -> (User, String) {
        let user = self
            .store
            .insert_user(NewUser {
                name: "Test User".to_string(),
                email: email.to_string(),
                password_hash: hash_password("password123").unwrap(),
                industry: Industry::Software,
                experience_level: ExperienceLevel::Senior,
            })
            .await
            .unwrap();
        let token = self.jwt.issue(user.id).unwrap();
        (user, token)
    }

    /// Sends a request and returns the status with the body parsed as JSON
    /// (`Value::Null` for an empty body).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    builder(method, uri, token).body(Body::empty()).unwrap()
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    builder(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Builds a multipart body with a single file field.
pub fn multipart_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    field: &str,
    file_name: &str,
    content_type: &str,
    contents: &[u8],
) -> Request<Body> {
    const BOUNDARY: &str = "nextdraft-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    builder(method, uri, token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}
