use std::collections::HashSet;
use std::sync::Arc;

use quiz_core::model::{QuizDraft, QuizId, SessionKey};
use quiz_core::play::RoundHistory;
use quiz_core::time::fixed_now;
use services::{Clock, QuizService, RandomPlayService, RandomTurn, RoundComplete};
use storage::repository::{InMemoryRepository, PlaySessionRepository};

async fn seeded(questions: &[(&str, &str)]) -> (InMemoryRepository, Vec<QuizId>) {
    let repo = InMemoryRepository::new();
    let quizzes = QuizService::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()));
    let mut ids = Vec::new();
    for (question, answer) in questions {
        let quiz = quizzes
            .create_quiz(QuizDraft::new(*question, *answer))
            .await
            .unwrap();
        ids.push(quiz.id());
    }
    (repo, ids)
}

fn service(repo: &InMemoryRepository, seed: u64) -> RandomPlayService {
    RandomPlayService::with_seed(Arc::new(repo.clone()), Arc::new(repo.clone()), seed)
}

fn expect_quiz(turn: RandomTurn) -> (QuizId, usize) {
    match turn {
        RandomTurn::Next(next) => (next.quiz.id, next.score),
        RandomTurn::RoundComplete(done) => panic!("round ended early at {}", done.score),
    }
}

#[tokio::test]
async fn streak_builds_then_breaks_on_wrong_answer() {
    let (repo, ids) = seeded(&[("Capital of Italy", "Rome"), ("Capital of France", "Paris")]).await;
    let answers = |id: QuizId| if id == ids[0] { "Rome" } else { "Paris" };
    let service = service(&repo, 2024);
    let key = SessionKey::new("browser").unwrap();

    let (first, score) = expect_quiz(service.next_quiz(&key).await.unwrap());
    assert_eq!(score, 0);
    assert!(ids.contains(&first));

    let result = service
        .check_answer(&key, first, Some(answers(first)))
        .await
        .unwrap();
    assert!(result.result);
    assert_eq!(result.score, 1);

    let (second, score) = expect_quiz(service.next_quiz(&key).await.unwrap());
    assert_ne!(second, first);
    assert_eq!(score, 1);
    assert_eq!(service.history(&key).await.unwrap().ids(), &[first]);

    let result = service
        .check_answer(&key, second, Some("Berlin"))
        .await
        .unwrap();
    assert!(!result.result);
    assert_eq!(result.answer, "Berlin");
    assert_eq!(result.score, 1);
    assert!(service.history(&key).await.unwrap().is_empty());
}

#[tokio::test]
async fn exhausted_pool_completes_round_and_restarts() {
    let (repo, ids) = seeded(&[("Capital of Spain", "Madrid")]).await;
    let key = SessionKey::new("browser").unwrap();
    repo.save_history(&key, &RoundHistory::from_ids(vec![ids[0]]))
        .await
        .unwrap();
    let service = service(&repo, 7);

    let turn = service.next_quiz(&key).await.unwrap();
    assert_eq!(turn, RandomTurn::RoundComplete(RoundComplete { score: 1 }));
    assert!(service.history(&key).await.unwrap().is_empty());

    let (again, score) = expect_quiz(service.next_quiz(&key).await.unwrap());
    assert_eq!(again, ids[0]);
    assert_eq!(score, 0);
}

#[tokio::test]
async fn perfect_round_visits_every_quiz_once() {
    let questions = [
        ("Capital of Italy", "Rome"),
        ("Capital of France", "Paris"),
        ("Capital of Spain", "Madrid"),
        ("Capital of Portugal", "Lisbon"),
    ];
    let (repo, ids) = seeded(&questions).await;
    let service = service(&repo, 99);
    let key = SessionKey::new("perfect").unwrap();

    let mut seen = HashSet::new();
    for expected_score in 0..questions.len() {
        let (id, score) = expect_quiz(service.next_quiz(&key).await.unwrap());
        assert_eq!(score, expected_score);
        assert!(seen.insert(id), "quiz {id} drawn twice in one round");

        let index = ids.iter().position(|candidate| *candidate == id).unwrap();
        let answer = format!("  {}  ", questions[index].1.to_uppercase());
        let result = service.check_answer(&key, id, Some(answer.as_str())).await.unwrap();
        assert!(result.result);
        assert_eq!(result.score, expected_score + 1);
    }

    let done = service.next_quiz(&key).await.unwrap();
    assert_eq!(
        done,
        RandomTurn::RoundComplete(RoundComplete {
            score: questions.len()
        })
    );
}

#[tokio::test]
async fn same_seed_draws_same_sequence() {
    let questions: Vec<(String, String)> = (1..=8)
        .map(|n| (format!("Question {n}"), format!("Answer {n}")))
        .collect();
    let borrowed: Vec<(&str, &str)> = questions
        .iter()
        .map(|(q, a)| (q.as_str(), a.as_str()))
        .collect();

    let mut runs = Vec::new();
    for _ in 0..2 {
        let (repo, _) = seeded(&borrowed).await;
        let service = service(&repo, 5);
        let key = SessionKey::new("seeded").unwrap();
        let mut drawn = Vec::new();
        for _ in 0..5 {
            drawn.push(expect_quiz(service.next_quiz(&key).await.unwrap()).0);
        }
        runs.push(drawn);
    }
    assert_eq!(runs[0], runs[1]);
}
