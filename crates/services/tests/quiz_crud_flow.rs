use quiz_core::model::{QuizDraft, SessionKey};
use quiz_core::time::fixed_now;
use services::{AppServices, Clock, QuizServiceError, RandomTurn};

#[tokio::test]
async fn sqlite_create_edit_play_delete() {
    let services = AppServices::new_sqlite(
        "sqlite:file:memdb_quiz_crud_flow?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
        Some(1),
    )
    .await
    .expect("connect sqlite");
    let quizzes = services.quizzes();

    let created = quizzes
        .create_quiz(QuizDraft::new("Capital of Italy", "Rome"))
        .await
        .expect("create quiz");

    let err = quizzes
        .update_quiz(created.id(), QuizDraft::new("", "Rome"))
        .await
        .unwrap_err();
    let QuizServiceError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    assert_eq!(
        validation.messages().collect::<Vec<_>>(),
        vec!["Question must not be empty."]
    );

    let mut draft = created.to_draft();
    draft.answer = "Roma".to_string();
    quizzes
        .update_quiz(created.id(), draft)
        .await
        .expect("update quiz");

    let checked = services
        .play()
        .check(created.id(), Some(" roma "))
        .await
        .unwrap();
    assert!(checked.result);

    let key = SessionKey::new("flow").unwrap();
    let random = services.random_play();
    let turn = random.next_quiz(&key).await.unwrap();
    assert!(matches!(turn, RandomTurn::Next(ref next) if next.quiz.id == created.id()));
    let verdict = random
        .check_answer(&key, created.id(), Some("ROMA"))
        .await
        .unwrap();
    assert_eq!(verdict.score, 1);

    quizzes.delete_quiz(created.id()).await.expect("delete quiz");
    assert!(quizzes.list_quizzes().await.unwrap().is_empty());

    // the history still names the deleted quiz; the exclusion list simply matches nothing
    let turn = random.next_quiz(&key).await.unwrap();
    assert!(matches!(turn, RandomTurn::RoundComplete(ref done) if done.score == 1));
}
