use std::sync::Arc;

use super::stores::ObjectStore;
use super::submission_error::SubmissionError;
use crate::metrics::record_definition_issue;
use crate::models::QuizDefinition;

/// Loads the teacher's quiz definition from object storage.
pub struct AnswerKeyFetcher {
    store: Arc<dyn ObjectStore>,
}

impl AnswerKeyFetcher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub async fn fetch(&self, quiz_url: &str) -> Result<QuizDefinition, SubmissionError> {
        let key = self.store.key_from_url(quiz_url);
        tracing::debug!("Fetching answer key {}", key);

        let bytes = self
            .store
            .get_object(&key)
            .await
            .map_err(|cause| SubmissionError::KeyFetch {
                key: key.clone(),
                cause,
            })?;

        let definition: QuizDefinition =
            serde_json::from_slice(&bytes).map_err(|cause| SubmissionError::KeyParse {
                key: key.clone(),
                cause,
            })?;

        for issue in definition.lint() {
            tracing::warn!("Quiz definition {} has a problem: {}", key, issue);
            record_definition_issue(issue.label());
        }

        Ok(definition)
    }
}
