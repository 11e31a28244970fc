use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::quiz::{AnswerValue, QuizDefinition};

/// Request body of a quiz submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1, max = 256))]
    pub content_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Question id to the student's raw answer.
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerValue>,
}

impl SubmitQuizRequest {
    pub fn has_inverted_window(&self) -> bool {
        self.end_time < self.start_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitQuizResponse {
    pub message: String,
    pub score: f64,
    pub total_points: i64,
    pub quiz_answer_id: i64,
    pub student_answers_url: String,
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(rename = "quizTeacherResponse")]
    pub quiz_teacher_response: QuizDefinition,
}
