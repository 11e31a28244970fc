pub mod attempt;
pub mod catalog;
pub mod quiz;
pub mod submission;

pub use attempt::QuizAttempt;
pub use catalog::{AssignmentRecord, ContentRecord, ContentType};
pub use quiz::{AnswerValue, DefinitionIssue, Question, QuestionKind, QuizDefinition};
pub use submission::{SubmitQuizRequest, SubmitQuizResponse};
