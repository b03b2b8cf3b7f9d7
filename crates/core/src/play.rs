//! Random-play rounds.
//!
//! A round is a streak: every correctly answered quiz id is appended to the
//! session's [`RoundHistory`], and the score is always the history length.
//! A wrong answer or an exhausted pool resets the history to empty.
//!
//! Everything here is pure. Callers load the history for a session, pass it in
//! by value, and store whatever history comes back:
//!
//! ```text
//! (history, pool, rng)     --draw_next--> (history', Draw)
//! (history, quiz, answer)  --judge------> (history', Verdict)
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Quiz, QuizId};

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

/// Ids answered correctly in the current round, in answer order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundHistory(Vec<QuizId>);

impl RoundHistory {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn from_ids(ids: Vec<QuizId>) -> Self {
        Self(ids)
    }

    #[must_use]
    pub fn ids(&self) -> &[QuizId] {
        &self.0
    }

    /// Current streak.
    #[must_use]
    pub fn score(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

//
// ─── OUTPUTS ───────────────────────────────────────────────────────────────────
//

/// Result of asking for the next random quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draw {
    /// A quiz from the pool, with the streak so far.
    Next { quiz: Quiz, score: usize },
    /// Every quiz was answered correctly; `score` is the streak that just ended.
    RoundComplete { score: usize },
}

/// Result of judging one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// The answer exactly as submitted.
    pub answer: String,
    pub result: bool,
    pub score: usize,
}

//
// ─── TRANSITIONS ───────────────────────────────────────────────────────────────
//

/// Pick the next quiz uniformly from `pool`.
///
/// `pool` must already exclude the ids in `history`. An empty pool ends the
/// round: the returned history is empty and the score is the pre-reset length.
pub fn draw_next<R: Rng + ?Sized>(
    history: RoundHistory,
    mut pool: Vec<Quiz>,
    rng: &mut R,
) -> (RoundHistory, Draw) {
    let score = history.score();
    if pool.is_empty() {
        return (RoundHistory::new(), Draw::RoundComplete { score });
    }

    let index = rng.random_range(0..pool.len());
    let quiz = pool.swap_remove(index);
    (history, Draw::Next { quiz, score })
}

/// Judge `answer` against `quiz` and advance the round.
///
/// A missing answer counts as the empty string. A correct answer appends the
/// quiz id and reports the new length; a wrong one reports the streak it broke
/// and clears the history.
#[must_use]
pub fn judge(mut history: RoundHistory, quiz: &Quiz, answer: Option<&str>) -> (RoundHistory, Verdict) {
    let answer = answer.unwrap_or_default().to_owned();
    let result = answers_match(&answer, quiz.answer());

    let score = if result {
        history.0.push(quiz.id());
        history.score()
    } else {
        let broken = history.score();
        history = RoundHistory::new();
        broken
    };

    (history, Verdict { answer, result, score })
}

/// Case-insensitive comparison that ignores surrounding whitespace.
#[must_use]
pub fn answers_match(submitted: &str, expected: &str) -> bool {
    normalize_answer(submitted) == normalize_answer(expected)
}

fn normalize_answer(raw: &str) -> String {
    raw.to_lowercase().trim().to_owned()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizDraft;
    use crate::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn quiz(id: u64, answer: &str) -> Quiz {
        QuizDraft::new(format!("Question {id}"), answer)
            .validate(fixed_now())
            .unwrap()
            .assign_id(QuizId::new(id))
    }

    fn history(ids: &[u64]) -> RoundHistory {
        RoundHistory::from_ids(ids.iter().copied().map(QuizId::new).collect())
    }

    #[test]
    fn judge_ignores_case_and_surrounding_whitespace() {
        let paris = quiz(1, "Paris");
        assert!(judge(RoundHistory::new(), &paris, Some(" paris  ")).1.result);
        assert!(judge(RoundHistory::new(), &paris, Some("PARIS")).1.result);
        assert!(!judge(RoundHistory::new(), &paris, Some("Pari")).1.result);
        assert!(!judge(RoundHistory::new(), &paris, Some("Pa ris")).1.result);
    }

    #[test]
    fn judge_treats_missing_answer_as_empty() {
        let (_, verdict) = judge(RoundHistory::new(), &quiz(1, "Paris"), None);
        assert_eq!(verdict.answer, "");
        assert!(!verdict.result);
    }

    #[test]
    fn correct_answer_appends_and_reports_new_length() {
        let (next, verdict) = judge(history(&[4, 9]), &quiz(2, "Rome"), Some("rome"));

        assert_eq!(next, history(&[4, 9, 2]));
        assert_eq!(verdict.score, 3);
        assert_eq!(verdict.answer, "rome");
    }

    #[test]
    fn wrong_answer_reports_broken_streak_and_resets() {
        let (next, verdict) = judge(history(&[4, 9]), &quiz(2, "Rome"), Some(" Madrid"));

        assert!(next.is_empty());
        assert_eq!(verdict.score, 2);
        assert_eq!(verdict.answer, " Madrid");
        assert!(!verdict.result);
    }

    #[test]
    fn draw_picks_from_pool_without_touching_history() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = vec![quiz(2, "a"), quiz(3, "b"), quiz(5, "c")];

        for _ in 0..20 {
            let (next, draw) = draw_next(history(&[1]), pool.clone(), &mut rng);
            assert_eq!(next, history(&[1]));
            match draw {
                Draw::Next { quiz, score } => {
                    assert!(pool.iter().any(|q| q.id() == quiz.id()));
                    assert_eq!(score, 1);
                }
                Draw::RoundComplete { .. } => panic!("pool was not empty"),
            }
        }
    }

    #[test]
    fn draw_is_deterministic_for_a_seed() {
        let pool: Vec<Quiz> = (1..=10).map(|id| quiz(id, "x")).collect();
        let pick = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            match draw_next(RoundHistory::new(), pool.clone(), &mut rng).1 {
                Draw::Next { quiz, .. } => quiz.id(),
                Draw::RoundComplete { .. } => unreachable!(),
            }
        };
        assert_eq!(pick(42), pick(42));
    }

    #[test]
    fn draw_reaches_every_pool_member() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool: Vec<Quiz> = (1..=3).map(|id| quiz(id, "x")).collect();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            if let Draw::Next { quiz, .. } = draw_next(RoundHistory::new(), pool.clone(), &mut rng).1 {
                seen.insert(quiz.id());
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn empty_pool_completes_round_with_previous_score() {
        let mut rng = StdRng::seed_from_u64(0);
        let (next, draw) = draw_next(history(&[1]), Vec::new(), &mut rng);

        assert_eq!(draw, Draw::RoundComplete { score: 1 });
        assert!(next.is_empty());
    }

    #[test]
    fn wrong_answer_makes_missed_quiz_eligible_again() {
        let q = quiz(1, "yes");
        let (next, _) = judge(history(&[1, 2]), &q, Some("no"));
        assert!(!next.ids().contains(&q.id()));
    }

    #[test]
    fn history_serializes_as_id_array() {
        let json = serde_json::to_string(&history(&[3, 1])).unwrap();
        assert_eq!(json, "[3,1]");
        let back: RoundHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, history(&[3, 1]));
    }
}
