use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::dto::session_dto::{
    DraftAnswerRequest, DraftAnswerResponse, NextQuestionResponse, PauseResponse, ResumeResponse,
    SessionStatusResponse, SessionView, StartSessionRequest, StartSessionResponse,
    SubmitAnswerRequest,
};
use crate::error::Error;
use crate::AppState;

#[axum::debug_handler]
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> crate::error::Result<Response> {
    let session = state.session_service.create(req)?;
    let id = session.id;

    // The first question is part of the start contract; if neither the
    // generation service nor the bank can produce one, the session is
    // withdrawn rather than leaving the caller a dead id.
    let first_question = match state.sequencer_service.next(id).await {
        Ok(Some(question)) => question,
        Ok(None) => {
            state.session_service.discard(id);
            return Err(Error::Internal(
                "new session produced no first question".to_string(),
            ));
        }
        Err(err) => {
            tracing::error!(session_id = %id, error = ?err, "failed to deliver first question");
            state.session_service.discard(id);
            return Err(err);
        }
    };

    let session = state.session_service.snapshot(id).await?;
    let response = StartSessionResponse {
        session: SessionView::from(&session),
        first_question,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let entry = state.store.get(id)?;
    let session = entry.snapshot().await;
    let response = SessionStatusResponse {
        session: SessionView::from(&session),
        pending_question_code: session.pending_question().map(|q| q.code.clone()),
        time_remaining_seconds: entry.remaining_seconds(),
    };
    Ok(Json(response).into_response())
}

#[axum::debug_handler]
pub async fn next_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let question = state.sequencer_service.next(id).await?;
    let complete = question.is_none();
    Ok(Json(NextQuestionResponse { question, complete }).into_response())
}

#[axum::debug_handler]
pub async fn save_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DraftAnswerRequest>,
) -> crate::error::Result<Response> {
    let question_code = req.question_code.clone();
    state.session_service.save_draft(id, req).await?;
    Ok(Json(DraftAnswerResponse {
        saved: true,
        question_code,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitAnswerRequest>,
) -> crate::error::Result<Response> {
    let response = state.submission_service.submit(id, req).await?;
    Ok(Json(response).into_response())
}

#[axum::debug_handler]
pub async fn pause_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let paused = state.session_service.pause(id).await?;
    Ok(Json(PauseResponse { paused }).into_response())
}

#[axum::debug_handler]
pub async fn resume_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let resumed = state.session_service.resume(id).await?;
    Ok(Json(ResumeResponse { resumed }).into_response())
}

#[axum::debug_handler]
pub async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let results = state.results_service.results(id).await?;
    Ok(Json(results).into_response())
}
