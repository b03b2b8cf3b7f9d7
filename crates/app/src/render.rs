//! Plain-text views for the terminal.

use std::fmt::Write as _;

use quiz_core::model::{Quiz, QuizValidationError};
use services::{CheckResult, NextQuiz, RandomResult, RoundComplete};

pub fn quiz_list(quizzes: &[Quiz]) -> String {
    if quizzes.is_empty() {
        return "There are no quizzes yet.".to_owned();
    }
    let mut out = String::new();
    for quiz in quizzes {
        let _ = writeln!(out, "{:>4}. {}", quiz.id().value(), quiz.question());
    }
    out.trim_end().to_owned()
}

pub fn quiz_detail(quiz: &Quiz) -> String {
    format!(
        "Quiz {}\n  Question: {}\n  Answer:   {}",
        quiz.id(),
        quiz.question(),
        quiz.answer()
    )
}

pub fn form_errors(err: &QuizValidationError) -> String {
    let mut out = String::from("There are errors in the form:");
    for message in err.messages() {
        let _ = write!(out, "\n  - {message}");
    }
    out
}

pub fn check_result(check: &CheckResult) -> String {
    let verdict = if check.result { "Correct" } else { "Wrong" };
    format!("{verdict}! '{}' for: {}", check.answer, check.quiz.question())
}

pub fn next_quiz(next: &NextQuiz) -> String {
    format!(
        "Score: {}\nQuestion {}: {}",
        next.score, next.quiz.id, next.quiz.question
    )
}

pub fn round_complete(done: &RoundComplete) -> String {
    format!("No more quizzes! You answered them all. Score: {}", done.score)
}

pub fn random_result(result: &RandomResult) -> String {
    if result.result {
        format!("'{}' is correct. Score: {}", result.answer, result.score)
    } else {
        format!(
            "'{}' is wrong. Final score: {}. Starting a new round.",
            result.answer, result.score
        )
    }
}
