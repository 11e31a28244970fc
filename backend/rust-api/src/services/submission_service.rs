use std::sync::Arc;

use chrono::Utc;
use validator::Validate;

use super::answer_key_service::AnswerKeyFetcher;
use super::archive_service::SubmissionArchiver;
use super::attempt_service::AttemptPersister;
use super::eligibility_service::EligibilityValidator;
use super::grading_service::GradingEngine;
use super::review_state::ReviewStateResolver;
use super::stores::{AssignmentDirectory, AttemptRepository, ContentCatalog, ObjectStore};
use super::submission_error::SubmissionError;
use crate::metrics::{record_score, record_submission_outcome};
use crate::models::{QuizAttempt, SubmitQuizRequest, SubmitQuizResponse};

/// Runs a quiz submission end to end: eligibility, answer key, grading,
/// review state, answer archive and attempt record.
///
/// Every step fails fast. The answer archive is written before the attempt so
/// a stored attempt always points at an existing archive.
pub struct QuizSubmissionService {
    eligibility: EligibilityValidator,
    answer_keys: AnswerKeyFetcher,
    archiver: SubmissionArchiver,
    persister: AttemptPersister,
}

impl QuizSubmissionService {
    pub fn new(
        eligibility: EligibilityValidator,
        answer_keys: AnswerKeyFetcher,
        archiver: SubmissionArchiver,
        persister: AttemptPersister,
    ) -> Self {
        Self {
            eligibility,
            answer_keys,
            archiver,
            persister,
        }
    }

    pub fn from_stores(
        catalog: Arc<dyn ContentCatalog>,
        assignments: Arc<dyn AssignmentDirectory>,
        objects: Arc<dyn ObjectStore>,
        attempts: Arc<dyn AttemptRepository>,
        account_id: impl Into<String>,
    ) -> Self {
        Self::new(
            EligibilityValidator::new(catalog, assignments),
            AnswerKeyFetcher::new(objects.clone()),
            SubmissionArchiver::new(objects, account_id),
            AttemptPersister::new(attempts),
        )
    }

    pub async fn submit(
        &self,
        user_id: &str,
        req: SubmitQuizRequest,
    ) -> Result<SubmitQuizResponse, SubmissionError> {
        let result = self.process(user_id, req).await;
        match &result {
            Ok(_) => record_submission_outcome("graded"),
            Err(err) => record_submission_outcome(err.kind()),
        }
        result
    }

    async fn process(
        &self,
        user_id: &str,
        req: SubmitQuizRequest,
    ) -> Result<SubmitQuizResponse, SubmissionError> {
        req.validate()
            .map_err(|err| SubmissionError::InvalidSubmission(err.to_string()))?;

        tracing::info!(
            "Processing quiz submission: user={}, content={}, answers={}",
            user_id,
            req.content_id,
            req.answers.len()
        );

        if req.has_inverted_window() {
            tracing::warn!(
                "Submission window ends before it starts: user={}, content={}, start={}, end={}",
                user_id,
                req.content_id,
                req.start_time,
                req.end_time
            );
        }

        let quiz = self.eligibility.validate(user_id, &req.content_id).await?;
        let definition = self.answer_keys.fetch(&quiz.quiz_url).await?;

        let report = GradingEngine::grade(&definition, &req.answers);
        tracing::debug!("Per-question grades for {}: {:?}", req.content_id, report.questions);

        let reviewed_at = ReviewStateResolver::reviewed_at(&definition, Utc::now());

        let answers_url = self
            .archiver
            .archive(user_id, &req.content_id, &req.answers)
            .await?;

        let attempt = QuizAttempt {
            content_id: req.content_id.clone(),
            user_id: user_id.to_string(),
            start_time: req.start_time,
            end_time: req.end_time,
            grade: Some(report.earned_points),
            total_points: Some(report.total_points),
            reviewed_at,
            quiz_url: quiz.quiz_url.clone(),
            quiz_answer_url: answers_url.clone(),
        };

        let attempt_id = self.persister.persist(&attempt).await.inspect_err(|_| {
            tracing::warn!(
                "Attempt not saved, archived answers left at {}",
                answers_url
            );
        })?;

        record_score(report.earned_points, report.total_points, reviewed_at.is_none());

        let message = if reviewed_at.is_some() {
            "Quiz submitted and graded"
        } else {
            "Quiz submitted, free-text answers await teacher review"
        };

        Ok(SubmitQuizResponse {
            message: message.to_string(),
            score: report.earned_points,
            total_points: report.total_points,
            quiz_answer_id: attempt_id,
            student_answers_url: answers_url,
            reviewed_at,
            quiz_teacher_response: definition,
        })
    }
}
