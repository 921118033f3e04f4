mod common;

use std::time::Duration;

use common::{
    start_request, state_with, test_config, EvalMode, ScriptedEvaluator, ScriptedGenerator,
    QUESTION_TIME_LIMIT,
};
use interview_engine::dto::session_dto::{DraftAnswerRequest, SubmitAnswerRequest};
use interview_engine::models::session::{SessionKind, SessionStatus};
use interview_engine::AppState;
use uuid::Uuid;

fn timer_state() -> AppState {
    state_with(
        &test_config(),
        ScriptedGenerator::reliable(),
        ScriptedEvaluator::new(EvalMode::FullScore),
    )
}

async fn started_session(state: &AppState, total_questions: u8) -> (Uuid, String) {
    let id = state
        .session_service
        .create(start_request(SessionKind::Technical, total_questions))
        .expect("create")
        .id;
    let question = state
        .sequencer_service
        .next(id)
        .await
        .expect("next")
        .expect("question");
    (id, question.code)
}

async fn save_draft(state: &AppState, id: Uuid, code: &str, text: &str) {
    state
        .session_service
        .save_draft(
            id,
            DraftAnswerRequest {
                question_code: code.to_string(),
                text: text.to_string(),
            },
        )
        .await
        .expect("draft");
}

#[tokio::test(start_paused = true)]
async fn expiry_auto_submits_the_draft_exactly_once() {
    let state = timer_state();
    let (id, code) = started_session(&state, 2).await;
    save_draft(&state, id, &code, "draft answer in progress").await;

    tokio::time::sleep(Duration::from_secs(QUESTION_TIME_LIMIT as u64 + 1)).await;

    let snapshot = state.session_service.snapshot(id).await.unwrap();
    assert_eq!(snapshot.answers.len(), 1);
    let recorded = &snapshot.answers[0];
    assert!(recorded.answer.auto_submitted);
    assert_eq!(recorded.answer.question_code, code);
    assert_eq!(recorded.answer.time_spent_seconds, QUESTION_TIME_LIMIT);
    assert!(snapshot.draft_answer.is_none());

    // Long after expiry nothing fires again.
    tokio::time::sleep(Duration::from_secs(600)).await;
    let snapshot = state.session_service.snapshot(id).await.unwrap();
    assert_eq!(snapshot.answers.len(), 1);
    assert_eq!(snapshot.status, SessionStatus::Active);
}

#[tokio::test(start_paused = true)]
async fn expiry_with_no_draft_submits_nothing() {
    let state = timer_state();
    let (id, _code) = started_session(&state, 2).await;

    tokio::time::sleep(Duration::from_secs(QUESTION_TIME_LIMIT as u64 + 60)).await;

    let snapshot = state.session_service.snapshot(id).await.unwrap();
    assert!(snapshot.answers.is_empty());
    assert_eq!(snapshot.status, SessionStatus::Active);
    assert!(snapshot.pending_question().is_some());
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_the_countdown_indefinitely() {
    let state = timer_state();
    let (id, code) = started_session(&state, 2).await;
    save_draft(&state, id, &code, "paused draft").await;

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(state.session_service.pause(id).await.unwrap());

    // Far past the original limit; the frozen timer must not fire.
    tokio::time::sleep(Duration::from_secs(600)).await;
    let snapshot = state.session_service.snapshot(id).await.unwrap();
    assert!(snapshot.answers.is_empty());
    assert_eq!(snapshot.status, SessionStatus::Paused);

    // Resuming continues from the frozen value and eventually fires.
    assert!(state.session_service.resume(id).await.unwrap());
    tokio::time::sleep(Duration::from_secs(QUESTION_TIME_LIMIT as u64)).await;
    let snapshot = state.session_service.snapshot(id).await.unwrap();
    assert_eq!(snapshot.answers.len(), 1);
    assert!(snapshot.answers[0].answer.auto_submitted);
}

#[tokio::test(start_paused = true)]
async fn manual_submission_cancels_the_timer() {
    let state = timer_state();
    let (id, code) = started_session(&state, 2).await;
    save_draft(&state, id, &code, "will be submitted manually").await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    let resp = state
        .submission_service
        .submit(
            id,
            SubmitAnswerRequest {
                question_code: code.clone(),
                text: "final answer".to_string(),
                time_spent_seconds: 5,
            },
        )
        .await
        .expect("manual submit");
    assert!(!resp.is_complete);

    let second = state
        .sequencer_service
        .next(id)
        .await
        .expect("next")
        .expect("second question");

    // Sleep past both questions' expiries: the first timer is gone and
    // the second question has no draft, so nothing may fire.
    tokio::time::sleep(Duration::from_secs(QUESTION_TIME_LIMIT as u64 + 30)).await;
    let snapshot = state.session_service.snapshot(id).await.unwrap();
    assert_eq!(snapshot.answers.len(), 1);
    assert!(!snapshot.answers[0].answer.auto_submitted);
    assert_eq!(
        snapshot.pending_question().map(|q| q.code.clone()),
        Some(second.code)
    );
}

#[tokio::test(start_paused = true)]
async fn completing_the_session_by_timeout_finalizes_it() {
    let state = timer_state();
    let (id, code) = started_session(&state, 1).await;
    save_draft(&state, id, &code, "timed out answer").await;

    tokio::time::sleep(Duration::from_secs(QUESTION_TIME_LIMIT as u64 + 1)).await;

    let snapshot = state.session_service.snapshot(id).await.unwrap();
    assert_eq!(snapshot.status, SessionStatus::Completed);
    let results = state.results_service.results(id).await.expect("results");
    assert_eq!(results.percentage, 100);
}

#[tokio::test(start_paused = true)]
async fn eviction_cancels_the_running_timer() {
    let state = timer_state();
    let (id, code) = started_session(&state, 1).await;
    save_draft(&state, id, &code, "about to be evicted").await;

    state.store.remove(id).expect("entry existed");

    // The aborted timer must not resurrect the session on expiry.
    tokio::time::sleep(Duration::from_secs(QUESTION_TIME_LIMIT as u64 + 60)).await;
    assert!(state.store.is_empty());
}
