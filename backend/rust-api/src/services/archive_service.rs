use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;

use super::stores::ObjectStore;
use super::submission_error::SubmissionError;
use crate::models::AnswerValue;

/// Uploads a student's raw answers to object storage.
pub struct SubmissionArchiver {
    store: Arc<dyn ObjectStore>,
    account_id: String,
}

impl SubmissionArchiver {
    pub fn new(store: Arc<dyn ObjectStore>, account_id: impl Into<String>) -> Self {
        Self {
            store,
            account_id: account_id.into(),
        }
    }

    pub fn answer_key(&self, user_id: &str, content_id: &str) -> String {
        format!(
            "focused/{}/quiz/answer/{}/{}.json",
            self.account_id, user_id, content_id
        )
    }

    /// Returns the public URL of the archived document.
    pub async fn archive(
        &self,
        user_id: &str,
        content_id: &str,
        answers: &BTreeMap<String, AnswerValue>,
    ) -> Result<String, SubmissionError> {
        let key = self.answer_key(user_id, content_id);
        let body = serde_json::to_vec(answers)
            .context("Failed to serialize student answers")
            .map_err(SubmissionError::Archive)?;

        self.store
            .put_object(&key, body, "application/json")
            .await
            .map_err(SubmissionError::Archive)?;

        tracing::info!("Archived answers of user {} for content {} at {}", user_id, content_id, key);
        Ok(self.store.public_url(&key))
    }
}
