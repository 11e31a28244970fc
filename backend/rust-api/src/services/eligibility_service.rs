use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use super::stores::{AssignmentDirectory, ContentCatalog};
use super::submission_error::SubmissionError;
use crate::models::ContentType;

lazy_static! {
    static ref COURSE_SEGMENT: Regex =
        Regex::new(r"(?:^|/)focused/([^/?#]+)/").expect("course segment regex is valid");
}

/// A quiz the submitting student is allowed to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleQuiz {
    pub content_id: String,
    pub course_id: String,
    pub quiz_url: String,
}

pub struct EligibilityValidator {
    catalog: Arc<dyn ContentCatalog>,
    assignments: Arc<dyn AssignmentDirectory>,
}

impl EligibilityValidator {
    pub fn new(catalog: Arc<dyn ContentCatalog>, assignments: Arc<dyn AssignmentDirectory>) -> Self {
        Self {
            catalog,
            assignments,
        }
    }

    /// Checks, in order: the quiz URL names a course, the user is assigned to
    /// that course, and the content is a quiz.
    pub async fn validate(
        &self,
        user_id: &str,
        content_id: &str,
    ) -> Result<EligibleQuiz, SubmissionError> {
        let content = self
            .catalog
            .find_content(content_id)
            .await
            .map_err(SubmissionError::EligibilityLookup)?
            .ok_or_else(|| SubmissionError::ContentNotFound(content_id.to_string()))?;

        let course_id = extract_course_id(&content.url)
            .ok_or_else(|| SubmissionError::MalformedContentUrl(content.url.clone()))?;

        let assigned = self
            .assignments
            .is_assigned(user_id, &course_id)
            .await
            .map_err(SubmissionError::EligibilityLookup)?;
        if !assigned {
            tracing::info!(
                "User {} tried to submit content {} without an assignment to course {}",
                user_id,
                content_id,
                course_id
            );
            return Err(SubmissionError::NotAssigned { course_id });
        }

        if content.content_type != ContentType::Quiz {
            return Err(SubmissionError::NotAQuiz {
                content_id: content_id.to_string(),
                content_type: content.content_type.as_str().to_string(),
            });
        }

        Ok(EligibleQuiz {
            content_id: content_id.to_string(),
            course_id,
            quiz_url: content.url,
        })
    }
}

/// Course id from a `.../focused/<course_id>/...` content URL.
pub fn extract_course_id(url: &str) -> Option<String> {
    COURSE_SEGMENT
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|segment| segment.as_str().to_string())
}
