use quiz_core::model::{Quiz, QuizId};
use quiz_core::play::{Draw, Verdict};
use serde::Serialize;

/// The part of a quiz a player may see before answering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizPrompt {
    pub id: QuizId,
    pub question: String,
}

impl From<&Quiz> for QuizPrompt {
    fn from(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id(),
            question: quiz.question().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextQuiz {
    pub score: usize,
    pub quiz: QuizPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundComplete {
    pub score: usize,
}

/// What to render after asking for the next random quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RandomTurn {
    Next(NextQuiz),
    RoundComplete(RoundComplete),
}

impl RandomTurn {
    #[must_use]
    pub fn score(&self) -> usize {
        match self {
            RandomTurn::Next(next) => next.score,
            RandomTurn::RoundComplete(done) => done.score,
        }
    }
}

impl From<Draw> for RandomTurn {
    fn from(draw: Draw) -> Self {
        match draw {
            Draw::Next { quiz, score } => RandomTurn::Next(NextQuiz {
                score,
                quiz: QuizPrompt::from(&quiz),
            }),
            Draw::RoundComplete { score } => RandomTurn::RoundComplete(RoundComplete { score }),
        }
    }
}

/// What to render after an answer is judged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RandomResult {
    pub answer: String,
    pub result: bool,
    pub score: usize,
}

impl From<Verdict> for RandomResult {
    fn from(verdict: Verdict) -> Self {
        Self {
            answer: verdict.answer,
            result: verdict.result,
            score: verdict.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizDraft;
    use quiz_core::time::fixed_now;

    #[test]
    fn next_quiz_view_hides_the_answer() {
        let quiz = QuizDraft::new("Capital of Italy", "Rome")
            .validate(fixed_now())
            .unwrap()
            .assign_id(QuizId::new(3));
        let turn = RandomTurn::from(Draw::Next { quiz, score: 2 });

        let RandomTurn::Next(next) = turn else {
            panic!("expected a quiz");
        };
        let json = serde_json::to_value(&next).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "score": 2, "quiz": { "id": 3, "question": "Capital of Italy" } })
        );
    }

    #[test]
    fn round_complete_carries_score() {
        let turn = RandomTurn::from(Draw::RoundComplete { score: 4 });
        assert_eq!(turn, RandomTurn::RoundComplete(RoundComplete { score: 4 }));
        assert_eq!(turn.score(), 4);
    }
}
