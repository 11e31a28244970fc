use std::sync::Arc;

use super::stores::AttemptRepository;
use super::submission_error::SubmissionError;
use crate::models::QuizAttempt;

/// Insert-only writer for graded attempts.
pub struct AttemptPersister {
    repository: Arc<dyn AttemptRepository>,
}

impl AttemptPersister {
    pub fn new(repository: Arc<dyn AttemptRepository>) -> Self {
        Self { repository }
    }

    pub async fn persist(&self, attempt: &QuizAttempt) -> Result<i64, SubmissionError> {
        let id = self
            .repository
            .insert_attempt(attempt)
            .await
            .map_err(SubmissionError::Persist)?;

        tracing::info!(
            "Saved quiz attempt {}: user={}, content={}, grade={:?}/{:?}",
            id,
            attempt.user_id,
            attempt.content_id,
            attempt.grade,
            attempt.total_points
        );
        Ok(id)
    }
}
