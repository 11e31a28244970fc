use chrono::{DateTime, Utc};

use crate::models::{QuestionKind, QuizDefinition};

/// Decides whether a graded attempt still needs a teacher.
///
/// Only free-text questions are ambiguous enough for manual grading; every
/// other type is fully graded automatically.
pub struct ReviewStateResolver;

impl ReviewStateResolver {
    pub fn requires_manual_review(definition: &QuizDefinition) -> bool {
        definition
            .questions
            .iter()
            .any(|question| matches!(question.kind, QuestionKind::Text { .. }))
    }

    /// `None` while review is pending, otherwise `now`.
    pub fn reviewed_at(definition: &QuizDefinition, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if Self::requires_manual_review(definition) {
            None
        } else {
            Some(now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(types: &[&str]) -> QuizDefinition {
        let questions: Vec<_> = types
            .iter()
            .enumerate()
            .map(|(i, ty)| match *ty {
                "checkbox" => json!({ "id": format!("q{}", i), "type": ty, "points": 1, "correctAnswers": ["a"] }),
                "boolean" => json!({ "id": format!("q{}", i), "type": ty, "points": 1, "correctAnswer": true }),
                _ => json!({ "id": format!("q{}", i), "type": ty, "points": 1, "correctAnswer": "a" }),
            })
            .collect();
        serde_json::from_value(json!({ "title": "t", "questions": questions })).unwrap()
    }

    #[test]
    fn auto_gradable_quizzes_are_reviewed_immediately() {
        let now = Utc::now();
        let quiz = definition(&["multiple", "checkbox", "boolean"]);
        assert_eq!(ReviewStateResolver::reviewed_at(&quiz, now), Some(now));
    }

    #[test]
    fn any_text_question_leaves_review_pending() {
        let quiz = definition(&["multiple", "text", "boolean"]);
        assert!(ReviewStateResolver::requires_manual_review(&quiz));
        assert_eq!(ReviewStateResolver::reviewed_at(&quiz, Utc::now()), None);
    }

    #[test]
    fn empty_quiz_needs_no_review() {
        let quiz = definition(&[]);
        assert!(ReviewStateResolver::reviewed_at(&quiz, Utc::now()).is_some());
    }
}
