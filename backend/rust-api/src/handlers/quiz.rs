use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;

use crate::extractors::AppJson;
use crate::middlewares::auth::JwtClaims;
use crate::models::{SubmitQuizRequest, SubmitQuizResponse};
use crate::services::submission_error::SubmissionError;
use crate::services::AppState;

/// POST /api/v1/quiz/submissions
///
/// The role check happens in `student_guard_middleware`.
pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<JwtClaims>,
    AppJson(payload): AppJson<SubmitQuizRequest>,
) -> Result<Json<SubmitQuizResponse>, SubmissionError> {
    let response = state.submissions.submit(&claims.sub, payload).await?;
    Ok(Json(response))
}

impl SubmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionError::InvalidSubmission(_)
            | SubmissionError::MalformedContentUrl(_)
            | SubmissionError::NotAQuiz { .. } => StatusCode::BAD_REQUEST,
            SubmissionError::Forbidden(_) | SubmissionError::NotAssigned { .. } => {
                StatusCode::FORBIDDEN
            }
            SubmissionError::ContentNotFound(_) => StatusCode::NOT_FOUND,
            SubmissionError::EligibilityLookup(_)
            | SubmissionError::KeyFetch { .. }
            | SubmissionError::KeyParse { .. }
            | SubmissionError::Archive(_)
            | SubmissionError::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.is_client_error() {
            tracing::info!("Quiz submission rejected ({}): {}", self.kind(), self);
            self.to_string()
        } else {
            tracing::error!("Quiz submission failed ({}): {}", self.kind(), self);
            "Quiz submission could not be processed".to_string()
        };

        (
            status,
            Json(json!({
                "message": message,
                "status": status.as_u16(),
                "error": self.kind(),
            })),
        )
            .into_response()
    }
}
