use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuizId;

//
// ─── VALIDATION ────────────────────────────────────────────────────────────────
//

/// Form field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizField {
    Question,
    Answer,
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: QuizField,
    pub message: &'static str,
}

/// Every field check that failed for a draft, in form order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("there are errors in the form: {}", join_messages(.issues))]
pub struct QuizValidationError {
    issues: Vec<FieldIssue>,
}

impl QuizValidationError {
    #[must_use]
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn messages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.issues.iter().map(|issue| issue.message)
    }

    #[must_use]
    pub fn has_issue(&self, field: QuizField) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

fn join_messages(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.message)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Invalid(#[from] QuizValidationError),

    #[error("updated_at is before created_at")]
    InvalidTimeRange,
}

//
// ─── QUIZ TYPES ────────────────────────────────────────────────────────────────
//

/// Unvalidated form input for creating or editing a quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizDraft {
    pub question: String,
    pub answer: String,
}

impl QuizDraft {
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Check both fields and stamp the draft with `now`.
    ///
    /// # Errors
    ///
    /// Returns `QuizValidationError` listing every blank field.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedQuiz, QuizValidationError> {
        let mut issues = Vec::new();
        if self.question.trim().is_empty() {
            issues.push(FieldIssue {
                field: QuizField::Question,
                message: "Question must not be empty.",
            });
        }
        if self.answer.trim().is_empty() {
            issues.push(FieldIssue {
                field: QuizField::Answer,
                message: "Answer must not be empty.",
            });
        }
        if !issues.is_empty() {
            return Err(QuizValidationError { issues });
        }

        Ok(ValidatedQuiz {
            question: self.question,
            answer: self.answer,
            created_at: now,
        })
    }
}

/// A draft that passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuiz {
    question: String,
    answer: String,
    created_at: DateTime<Utc>,
}

impl ValidatedQuiz {
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn assign_id(self, id: QuizId) -> Quiz {
        Quiz {
            id,
            question: self.question,
            answer: self.answer,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    question: String,
    answer: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Rehydrate a quiz from storage, re-running field validation.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Invalid` for blank fields and
    /// `QuizError::InvalidTimeRange` if `updated_at` precedes `created_at`.
    pub fn from_persisted(
        id: QuizId,
        question: String,
        answer: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        if updated_at < created_at {
            return Err(QuizError::InvalidTimeRange);
        }
        let validated = QuizDraft { question, answer }.validate(created_at)?;
        let mut quiz = validated.assign_id(id);
        quiz.updated_at = updated_at;
        Ok(quiz)
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace question and answer; id and `created_at` are kept.
    ///
    /// # Errors
    ///
    /// Returns `QuizValidationError` and leaves the quiz untouched if the draft is invalid.
    pub fn edit(&mut self, draft: QuizDraft, now: DateTime<Utc>) -> Result<(), QuizValidationError> {
        let validated = draft.validate(now)?;
        self.question = validated.question;
        self.answer = validated.answer;
        self.updated_at = now.max(self.created_at);
        Ok(())
    }

    /// Form input pre-filled from this quiz, for the edit view.
    #[must_use]
    pub fn to_draft(&self) -> QuizDraft {
        QuizDraft::new(self.question.clone(), self.answer.clone())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn draft_reports_every_blank_field() {
        let err = QuizDraft::new("  ", "\t").validate(fixed_now()).unwrap_err();

        assert!(err.has_issue(QuizField::Question));
        assert!(err.has_issue(QuizField::Answer));
        assert_eq!(
            err.messages().collect::<Vec<_>>(),
            vec!["Question must not be empty.", "Answer must not be empty."]
        );
        assert_eq!(
            err.to_string(),
            "there are errors in the form: Question must not be empty. Answer must not be empty."
        );
    }

    #[test]
    fn draft_with_blank_answer_only_flags_answer() {
        let err = QuizDraft::new("Capital of Italy", "")
            .validate(fixed_now())
            .unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].field, QuizField::Answer);
    }

    #[test]
    fn valid_draft_assigns_id_and_timestamps() {
        let quiz = QuizDraft::new("Capital of Italy", "Rome")
            .validate(fixed_now())
            .unwrap()
            .assign_id(QuizId::new(3));

        assert_eq!(quiz.id(), QuizId::new(3));
        assert_eq!(quiz.question(), "Capital of Italy");
        assert_eq!(quiz.answer(), "Rome");
        assert_eq!(quiz.created_at(), quiz.updated_at());
    }

    #[test]
    fn edit_keeps_id_and_created_at() {
        let mut quiz = QuizDraft::new("Capital of Spain", "Madrid")
            .validate(fixed_now())
            .unwrap()
            .assign_id(QuizId::new(1));
        let later = fixed_now() + chrono::Duration::hours(1);

        quiz.edit(QuizDraft::new("Capital of France", "Paris"), later)
            .unwrap();

        assert_eq!(quiz.id(), QuizId::new(1));
        assert_eq!(quiz.answer(), "Paris");
        assert_eq!(quiz.created_at(), fixed_now());
        assert_eq!(quiz.updated_at(), later);
    }

    #[test]
    fn failed_edit_leaves_quiz_untouched() {
        let mut quiz = QuizDraft::new("Capital of Spain", "Madrid")
            .validate(fixed_now())
            .unwrap()
            .assign_id(QuizId::new(1));
        let before = quiz.clone();

        assert!(quiz.edit(QuizDraft::new("", "x"), fixed_now()).is_err());
        assert_eq!(quiz, before);
    }

    #[test]
    fn from_persisted_rejects_inverted_timestamps() {
        let err = Quiz::from_persisted(
            QuizId::new(1),
            "Q".into(),
            "A".into(),
            fixed_now(),
            fixed_now() - chrono::Duration::seconds(1),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::InvalidTimeRange);
    }
}
