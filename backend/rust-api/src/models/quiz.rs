use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Teacher-authored quiz, stored as a JSON document in object storage.
///
/// Immutable once fetched for grading. Echoed back to the student in the
/// submission response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDefinition {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub prompt: String,
    /// Display choices for `multiple` and `checkbox` questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

/// Question variant, tagged by the `type` field of the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuestionKind {
    Text {
        #[serde(rename = "correctAnswer", default)]
        correct_answer: AnswerValue,
    },
    Multiple {
        #[serde(rename = "correctAnswer", default)]
        correct_answer: AnswerValue,
    },
    Checkbox {
        #[serde(rename = "correctAnswers", default)]
        correct_answers: Vec<String>,
    },
    Boolean {
        #[serde(rename = "correctAnswer", default)]
        correct_answer: AnswerValue,
    },
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Text { .. } => "text",
            QuestionKind::Multiple { .. } => "multiple",
            QuestionKind::Checkbox { .. } => "checkbox",
            QuestionKind::Boolean { .. } => "boolean",
        }
    }
}

/// A single answer value, either a student's or a correct answer from the key.
///
/// Decoded once from untyped JSON. Anything that is not a string, a boolean or
/// a list made only of strings lands in `Unsupported` and keeps its raw form so
/// the archived submission matches what the student sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AnswerValue {
    Text(String),
    Bool(bool),
    Choices(Vec<String>),
    Unsupported(Value),
}

impl Default for AnswerValue {
    fn default() -> Self {
        AnswerValue::Unsupported(Value::Null)
    }
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Native booleans, or the string synonyms `true`/`verdadero` and
    /// `false`/`falso` in any case.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Bool(value) => Some(*value),
            AnswerValue::Text(text) => parse_bool_synonym(text),
            _ => None,
        }
    }
}

impl From<Value> for AnswerValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => AnswerValue::Text(text),
            Value::Bool(flag) => AnswerValue::Bool(flag),
            Value::Array(items) if items.iter().all(Value::is_string) => AnswerValue::Choices(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        _ => None,
                    })
                    .collect(),
            ),
            other => AnswerValue::Unsupported(other),
        }
    }
}

impl From<AnswerValue> for Value {
    fn from(answer: AnswerValue) -> Self {
        match answer {
            AnswerValue::Text(text) => Value::String(text),
            AnswerValue::Bool(flag) => Value::Bool(flag),
            AnswerValue::Choices(items) => {
                Value::Array(items.into_iter().map(Value::String).collect())
            }
            AnswerValue::Unsupported(raw) => raw,
        }
    }
}

pub fn parse_bool_synonym(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "verdadero" => Some(true),
        "false" | "falso" => Some(false),
        _ => None,
    }
}

/// Structural problems in a quiz definition that grade as silent zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionIssue {
    DuplicateQuestionId(String),
    UnparseableBooleanKey(String),
    NonTextKey(String),
    EmptyCheckboxKey(String),
}

impl DefinitionIssue {
    pub fn label(&self) -> &'static str {
        match self {
            DefinitionIssue::DuplicateQuestionId(_) => "duplicate_question_id",
            DefinitionIssue::UnparseableBooleanKey(_) => "unparseable_boolean_key",
            DefinitionIssue::NonTextKey(_) => "non_text_key",
            DefinitionIssue::EmptyCheckboxKey(_) => "empty_checkbox_key",
        }
    }
}

impl fmt::Display for DefinitionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionIssue::DuplicateQuestionId(id) => {
                write!(f, "question id {} appears more than once", id)
            }
            DefinitionIssue::UnparseableBooleanKey(id) => {
                write!(f, "boolean question {} has no parseable correct answer", id)
            }
            DefinitionIssue::NonTextKey(id) => {
                write!(f, "question {} has a non-string correct answer", id)
            }
            DefinitionIssue::EmptyCheckboxKey(id) => {
                write!(f, "checkbox question {} has no correct answers", id)
            }
        }
    }
}

impl QuizDefinition {
    /// Sum of all question point values.
    pub fn total_points(&self) -> i64 {
        self.questions.iter().map(|q| i64::from(q.points)).sum()
    }

    pub fn lint(&self) -> Vec<DefinitionIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for question in &self.questions {
            if !seen.insert(question.id.as_str()) {
                issues.push(DefinitionIssue::DuplicateQuestionId(question.id.clone()));
            }

            match &question.kind {
                QuestionKind::Text { correct_answer } | QuestionKind::Multiple { correct_answer } => {
                    if correct_answer.as_text().is_none() {
                        issues.push(DefinitionIssue::NonTextKey(question.id.clone()));
                    }
                }
                QuestionKind::Boolean { correct_answer } => {
                    if correct_answer.as_bool().is_none() {
                        issues.push(DefinitionIssue::UnparseableBooleanKey(question.id.clone()));
                    }
                }
                QuestionKind::Checkbox { correct_answers } => {
                    if correct_answers.is_empty() {
                        issues.push(DefinitionIssue::EmptyCheckboxKey(question.id.clone()));
                    }
                }
            }
        }

        issues
    }
}
