use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime, Document},
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Database,
};
use serde::Serialize;

use super::stores::{AssignmentDirectory, AttemptRepository, ContentCatalog};
use crate::metrics::track_db_operation;
use crate::models::{AssignmentRecord, ContentRecord, QuizAttempt};
use crate::utils::time::chrono_to_bson;

const CONTENTS: &str = "contents";
const ASSIGNMENTS: &str = "assignments";
const ATTEMPTS: &str = "quiz_attempts";
const COUNTERS: &str = "counters";

/// MongoDB-backed catalog, assignment and attempt storage.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

#[derive(Debug, Serialize)]
struct AttemptDocument {
    #[serde(rename = "_id")]
    id: i64,
    content_id: String,
    user_id: String,
    start_time: BsonDateTime,
    end_time: BsonDateTime,
    grade: Option<f64>,
    total_points: Option<i64>,
    reviewed_at: Option<BsonDateTime>,
    quiz_url: String,
    quiz_answer_url: String,
    created_at: BsonDateTime,
}

impl AttemptDocument {
    fn new(id: i64, attempt: &QuizAttempt) -> Self {
        Self {
            id,
            content_id: attempt.content_id.clone(),
            user_id: attempt.user_id.clone(),
            start_time: chrono_to_bson(attempt.start_time),
            end_time: chrono_to_bson(attempt.end_time),
            grade: attempt.grade,
            total_points: attempt.total_points,
            reviewed_at: attempt.reviewed_at.map(chrono_to_bson),
            quiz_url: attempt.quiz_url.clone(),
            quiz_answer_url: attempt.quiz_answer_url.clone(),
            created_at: chrono_to_bson(Utc::now()),
        }
    }
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Atomically increments the attempt counter and returns the new value.
    async fn next_attempt_id(&self) -> Result<i64> {
        let counters = self.db.collection::<Document>(COUNTERS);
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = counters
            .find_one_and_update(doc! { "_id": ATTEMPTS }, doc! { "$inc": { "seq": 1_i64 } })
            .with_options(options)
            .await
            .context("Failed to increment attempt counter")?
            .ok_or_else(|| anyhow!("Attempt counter missing after upsert"))?;

        counter
            .get_i64("seq")
            .or_else(|_| counter.get_i32("seq").map(i64::from))
            .context("Attempt counter has a non-integer seq")
    }
}

#[async_trait]
impl ContentCatalog for MongoStore {
    async fn find_content(&self, content_id: &str) -> Result<Option<ContentRecord>> {
        let collection = self.db.collection::<ContentRecord>(CONTENTS);
        track_db_operation("find_one", CONTENTS, async {
            collection
                .find_one(doc! { "_id": content_id })
                .await
                .with_context(|| format!("Failed to load content {}", content_id))
        })
        .await
    }
}

#[async_trait]
impl AssignmentDirectory for MongoStore {
    async fn is_assigned(&self, user_id: &str, course_id: &str) -> Result<bool> {
        let collection = self.db.collection::<AssignmentRecord>(ASSIGNMENTS);
        let assignment = track_db_operation("find_one", ASSIGNMENTS, async {
            collection
                .find_one(doc! { "user_id": user_id, "course_id": course_id })
                .await
                .context("Failed to query assignments")
        })
        .await?;

        Ok(assignment.is_some())
    }
}

#[async_trait]
impl AttemptRepository for MongoStore {
    async fn insert_attempt(&self, attempt: &QuizAttempt) -> Result<i64> {
        let id = track_db_operation("find_one_and_update", COUNTERS, self.next_attempt_id()).await?;

        let document = AttemptDocument::new(id, attempt);
        let collection = self.db.collection::<AttemptDocument>(ATTEMPTS);
        track_db_operation("insert_one", ATTEMPTS, async {
            collection
                .insert_one(&document)
                .await
                .map(|_| ())
                .context("Failed to insert quiz attempt")
        })
        .await?;

        Ok(id)
    }
}
