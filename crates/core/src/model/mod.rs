mod ids;
mod quiz;
mod session;

pub use ids::{ParseIdError, QuizId};
pub use quiz::{
    FieldIssue, Quiz, QuizDraft, QuizError, QuizField, QuizValidationError, ValidatedQuiz,
};
pub use session::{SessionKey, SessionKeyError};
