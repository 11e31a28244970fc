use thiserror::Error;

/// Failures of the quiz submission pipeline.
///
/// Client-facing variants reject the request without side effects. The
/// remaining variants are server errors; only `Persist` can leave an archived
/// answer document behind.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("content {0} not found")]
    ContentNotFound(String),

    #[error("content url has no course segment: {0}")]
    MalformedContentUrl(String),

    #[error("user is not assigned to course {course_id}")]
    NotAssigned { course_id: String },

    #[error("content {content_id} is {content_type}, not a quiz")]
    NotAQuiz {
        content_id: String,
        content_type: String,
    },

    #[error("eligibility lookup failed: {0:#}")]
    EligibilityLookup(anyhow::Error),

    #[error("failed to fetch answer key {key}: {cause:#}")]
    KeyFetch { key: String, cause: anyhow::Error },

    #[error("failed to parse answer key {key}: {cause}")]
    KeyParse {
        key: String,
        #[source]
        cause: serde_json::Error,
    },

    #[error("failed to archive answers: {0:#}")]
    Archive(anyhow::Error),

    #[error("failed to persist attempt: {0:#}")]
    Persist(anyhow::Error),
}

impl SubmissionError {
    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionError::InvalidSubmission(_) => "invalid_submission",
            SubmissionError::Forbidden(_) => "forbidden",
            SubmissionError::ContentNotFound(_) => "content_not_found",
            SubmissionError::MalformedContentUrl(_) => "malformed_content_url",
            SubmissionError::NotAssigned { .. } => "not_assigned",
            SubmissionError::NotAQuiz { .. } => "not_a_quiz",
            SubmissionError::EligibilityLookup(_) => "eligibility_lookup_failure",
            SubmissionError::KeyFetch { .. } => "key_fetch_failure",
            SubmissionError::KeyParse { .. } => "key_parse_failure",
            SubmissionError::Archive(_) => "archive_failure",
            SubmissionError::Persist(_) => "persist_failure",
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SubmissionError::InvalidSubmission(_)
                | SubmissionError::Forbidden(_)
                | SubmissionError::ContentNotFound(_)
                | SubmissionError::MalformedContentUrl(_)
                | SubmissionError::NotAssigned { .. }
                | SubmissionError::NotAQuiz { .. }
        )
    }
}
