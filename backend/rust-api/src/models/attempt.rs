use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Graded result of one quiz submission.
///
/// Written once. `reviewed_at` stays empty while a free-text answer waits for
/// a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub content_id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub grade: Option<f64>,
    pub total_points: Option<i64>,
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Location of the teacher's quiz definition.
    pub quiz_url: String,
    /// Location of the archived student answers.
    pub quiz_answer_url: String,
}
