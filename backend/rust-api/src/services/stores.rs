//! Collaborator seams of the submission pipeline.
//!
//! Production wires these to MongoDB and S3-compatible object storage; tests
//! swap in in-memory versions.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ContentRecord, QuizAttempt};

#[async_trait]
pub trait ContentCatalog: Send + Sync {
    async fn find_content(&self, content_id: &str) -> Result<Option<ContentRecord>>;
}

#[async_trait]
pub trait AssignmentDirectory: Send + Sync {
    async fn is_assigned(&self, user_id: &str, course_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;

    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Public URL an object is reachable under.
    fn public_url(&self, key: &str) -> String;

    /// Storage key for a public URL: the URL with the public base stripped.
    fn key_from_url(&self, url: &str) -> String;
}

#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Inserts the attempt and returns its generated id.
    async fn insert_attempt(&self, attempt: &QuizAttempt) -> Result<i64>;
}
