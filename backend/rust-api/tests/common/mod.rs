#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use focused_api::{
    config::{Config, ObjectStorageSettings},
    create_router,
    middlewares::auth::{JwtClaims, JwtService},
    models::{ContentRecord, ContentType, QuizAttempt},
    services::{
        stores::{AssignmentDirectory, AttemptRepository, ContentCatalog, ObjectStore},
        submission_service::QuizSubmissionService,
        AppState,
    },
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-secret";
pub const METRICS_AUTH: &str = "ops:metrics-pass";
pub const ACCOUNT_ID: &str = "acct-1";
pub const PUBLIC_BASE: &str = "https://cdn.focused.test";

#[derive(Default)]
pub struct InMemoryCatalog {
    contents: Mutex<HashMap<String, ContentRecord>>,
    pub fail: AtomicBool,
}

impl InMemoryCatalog {
    pub fn insert(&self, id: &str, content_type: ContentType, url: &str) {
        self.contents.lock().unwrap().insert(
            id.to_string(),
            ContentRecord {
                id: id.to_string(),
                content_type,
                url: url.to_string(),
            },
        );
    }
}

#[async_trait]
impl ContentCatalog for InMemoryCatalog {
    async fn find_content(&self, content_id: &str) -> anyhow::Result<Option<ContentRecord>> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("catalog unavailable");
        }
        Ok(self.contents.lock().unwrap().get(content_id).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryAssignments {
    pairs: Mutex<HashSet<(String, String)>>,
}

impl InMemoryAssignments {
    pub fn assign(&self, user_id: &str, course_id: &str) {
        self.pairs
            .lock()
            .unwrap()
            .insert((user_id.to_string(), course_id.to_string()));
    }
}

#[async_trait]
impl AssignmentDirectory for InMemoryAssignments {
    async fn is_assigned(&self, user_id: &str, course_id: &str) -> anyhow::Result<bool> {
        Ok(self
            .pairs
            .lock()
            .unwrap()
            .contains(&(user_id.to_string(), course_id.to_string())))
    }
}

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    pub gets: AtomicUsize,
    pub fail_puts: AtomicBool,
}

impl InMemoryObjectStore {
    pub fn put_json(&self, key: &str, value: &Value) {
        self.put_raw(key, serde_json::to_vec(value).unwrap());
    }

    pub fn put_raw(&self, key: &str, bytes: Vec<u8>) {
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_object(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.object(key)
            .ok_or_else(|| anyhow!("no such key: {}", key))
    }

    async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> anyhow::Result<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            bail!("upload rejected");
        }
        self.put_raw(key, bytes);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", PUBLIC_BASE, key.trim_start_matches('/'))
    }

    fn key_from_url(&self, url: &str) -> String {
        url.strip_prefix(PUBLIC_BASE)
            .unwrap_or(url)
            .trim_start_matches('/')
            .to_string()
    }
}

#[derive(Default)]
pub struct InMemoryAttempts {
    attempts: Mutex<Vec<QuizAttempt>>,
    pub fail: AtomicBool,
}

impl InMemoryAttempts {
    pub fn all(&self) -> Vec<QuizAttempt> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttemptRepository for InMemoryAttempts {
    async fn insert_attempt(&self, attempt: &QuizAttempt) -> anyhow::Result<i64> {
        if self.fail.load(Ordering::SeqCst) {
            bail!("write concern timeout");
        }
        let mut attempts = self.attempts.lock().unwrap();
        attempts.push(attempt.clone());
        Ok(attempts.len() as i64)
    }
}

/// Router wired to in-memory collaborators, with handles for seeding and
/// inspecting them.
pub struct TestApp {
    pub router: Router,
    pub catalog: Arc<InMemoryCatalog>,
    pub assignments: Arc<InMemoryAssignments>,
    pub objects: Arc<InMemoryObjectStore>,
    pub attempts: Arc<InMemoryAttempts>,
}

pub fn test_config() -> Config {
    Config {
        app_env: "test".to_string(),
        listen_addr: "127.0.0.1:0".to_string(),
        mongo_uri: "mongodb://localhost:27017".to_string(),
        mongo_database: "focused_test".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        metrics_auth: METRICS_AUTH.to_string(),
        object_storage: ObjectStorageSettings {
            bucket: "focused-content".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key: "key".to_string(),
            secret_key: "secret".to_string(),
            public_base_url: Some(PUBLIC_BASE.to_string()),
            account_id: ACCOUNT_ID.to_string(),
            timeout_secs: 5,
            require_https: false,
        },
    }
}

pub fn create_test_app() -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let catalog = Arc::new(InMemoryCatalog::default());
    let assignments = Arc::new(InMemoryAssignments::default());
    let objects = Arc::new(InMemoryObjectStore::default());
    let attempts = Arc::new(InMemoryAttempts::default());

    let service = QuizSubmissionService::from_stores(
        catalog.clone(),
        assignments.clone(),
        objects.clone(),
        attempts.clone(),
        ACCOUNT_ID,
    );
    let state = Arc::new(AppState::with_submission_service(test_config(), service));

    TestApp {
        router: create_router(state),
        catalog,
        assignments,
        objects,
        attempts,
    }
}

pub fn token_for(user_id: &str, role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: (now + 3600) as usize,
        iat: now as usize,
    };
    JwtService::new(JWT_SECRET)
        .generate_token(&claims)
        .expect("token should sign")
}

pub fn teacher_quiz_key(course_id: &str, content_id: &str) -> String {
    format!("focused/{}/quiz/teacher/{}.json", course_id, content_id)
}

pub fn teacher_quiz_url(course_id: &str, content_id: &str) -> String {
    format!("{}/{}", PUBLIC_BASE, teacher_quiz_key(course_id, content_id))
}

/// Sends a request and returns the status with the body parsed as JSON
/// (`Value::Null` for empty bodies).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn submission_request(token: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/quiz/submissions")
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::from(body)).unwrap()
}
