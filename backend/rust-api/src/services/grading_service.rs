use std::collections::{BTreeMap, HashSet};

use crate::models::{AnswerValue, QuestionKind, QuizDefinition};

/// Points awarded for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionGrade {
    pub question_id: String,
    pub awarded: u32,
    pub max_points: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    pub earned_points: f64,
    pub total_points: i64,
    pub questions: Vec<QuestionGrade>,
}

/// Scores a student's answers against a quiz definition.
///
/// Every question is all-or-nothing. Answers of the wrong shape score zero for
/// that question instead of failing the submission.
pub struct GradingEngine;

impl GradingEngine {
    pub fn grade(
        definition: &QuizDefinition,
        answers: &BTreeMap<String, AnswerValue>,
    ) -> GradeReport {
        let mut earned: i64 = 0;
        let mut total: i64 = 0;
        let mut questions = Vec::with_capacity(definition.questions.len());
        // Omitted answers grade like an explicit null.
        let missing = AnswerValue::default();

        for question in &definition.questions {
            total += i64::from(question.points);

            let answer = answers.get(&question.id).unwrap_or(&missing);
            let correct = Self::is_correct(&question.kind, answer);
            let awarded = if correct { question.points } else { 0 };
            earned += i64::from(awarded);

            questions.push(QuestionGrade {
                question_id: question.id.clone(),
                awarded,
                max_points: question.points,
            });
        }

        GradeReport {
            earned_points: earned as f64,
            total_points: total,
            questions,
        }
    }

    fn is_correct(kind: &QuestionKind, answer: &AnswerValue) -> bool {
        match kind {
            QuestionKind::Text { correct_answer } => {
                match (correct_answer.as_text(), answer.as_text()) {
                    (Some(expected), Some(given)) => normalize_text(expected) == normalize_text(given),
                    _ => false,
                }
            }
            QuestionKind::Multiple { correct_answer } => {
                match (correct_answer.as_text(), answer.as_text()) {
                    (Some(expected), Some(given)) => expected == given,
                    _ => false,
                }
            }
            QuestionKind::Checkbox { correct_answers } => match answer {
                AnswerValue::Choices(selected) => selection_matches(correct_answers, selected),
                _ => false,
            },
            QuestionKind::Boolean { correct_answer } => {
                // An unreadable key can never be matched.
                let Some(expected) = correct_answer.as_bool() else {
                    return false;
                };
                answer.as_bool().unwrap_or(false) == expected
            }
        }
    }
}

fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Same number of selections as correct answers, and the same members.
fn selection_matches(correct: &[String], selected: &[String]) -> bool {
    let expected: HashSet<&str> = correct.iter().map(String::as_str).collect();
    let given: HashSet<&str> = selected.iter().map(String::as_str).collect();
    selected.len() == expected.len() && given == expected
}
