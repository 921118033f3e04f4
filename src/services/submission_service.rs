use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::session_dto::{SubmitAnswerRequest, SubmitAnswerResponse};
use crate::error::{Error, Result};
use crate::models::answer::Answer;
use crate::models::evaluation::Evaluation;
use crate::models::session::{SessionKind, SessionStatus};
use crate::services::evaluation_service::{AnswerEvaluator, EvaluationRequest};
use crate::services::results_service;
use crate::store::session_store::SessionStore;

/// Validates and records submitted answers: evaluates them through the
/// collaborator (degrading to the neutral default), folds the result into
/// the session totals, and finalizes the session on the last answer.
#[derive(Clone)]
pub struct SubmissionService {
    store: Arc<SessionStore>,
    evaluator: Arc<dyn AnswerEvaluator>,
}

impl SubmissionService {
    pub fn new(store: Arc<SessionStore>, evaluator: Arc<dyn AnswerEvaluator>) -> Self {
        Self { store, evaluator }
    }

    pub async fn submit(&self, id: Uuid, req: SubmitAnswerRequest) -> Result<SubmitAnswerResponse> {
        req.validate()?;
        self.submit_inner(id, req, false).await
    }

    async fn submit_inner(
        &self,
        id: Uuid,
        req: SubmitAnswerRequest,
        auto_submitted: bool,
    ) -> Result<SubmitAnswerResponse> {
        let entry = self.store.get(id)?;
        let _gate = entry.lock_writer().await;

        let snapshot = entry.snapshot().await;
        match snapshot.status {
            SessionStatus::Completed => return Err(Error::SessionFinalized),
            SessionStatus::Paused => return Err(Error::SessionNotActive),
            SessionStatus::Active => {}
        }
        let pending = snapshot
            .pending_question()
            .ok_or(Error::StaleSubmission)?
            .clone();
        if pending.code != req.question_code {
            return Err(Error::StaleSubmission);
        }

        let time_spent = req.time_spent_seconds.min(pending.time_limit_seconds);

        // The evaluation call runs before the state lock is taken; the
        // writer gate keeps competing submissions out in the meantime.
        let eval_request = EvaluationRequest {
            question: pending.clone(),
            answer_text: req.text.clone(),
            time_spent_seconds: time_spent,
            job_requirements: snapshot.job_requirements.clone(),
            role_competencies: snapshot.role_competencies.clone(),
        };
        let mut evaluation = match self.evaluator.evaluate(eval_request).await {
            Ok(evaluation) => evaluation,
            Err(err) => {
                warn!(
                    session_id = %id,
                    question_code = %pending.code,
                    error = ?err,
                    "evaluation failed, recording neutral default"
                );
                Evaluation::neutral_default(pending.max_score)
            }
        };

        // The collaborator's word is never taken on bounds.
        evaluation.score = evaluation.score.min(pending.max_score);
        evaluation.max_score = pending.max_score;
        if snapshot.kind != SessionKind::JobSpecific {
            evaluation.job_fit_score = None;
        }
        if snapshot.kind != SessionKind::RoleBased {
            evaluation.role_competency_score = None;
        }

        let answer = Answer {
            question_code: req.question_code,
            text: req.text,
            time_spent_seconds: time_spent,
            submitted_at: Utc::now(),
            auto_submitted,
        };

        let session_after = {
            let mut session = entry.write().await;
            // record_answer re-checks the pending question, so whichever
            // of a manual submit and a timer expiry commits second is
            // rejected here instead of producing a duplicate answer.
            session.record_answer(answer, evaluation.clone())?;
            if session.status == SessionStatus::Completed {
                session.results = Some(results_service::compose(&session));
            }
            session.clone()
        };
        entry.cancel_timer();

        let is_complete = session_after.status == SessionStatus::Completed;
        if is_complete {
            info!(
                session_id = %id,
                total_score = session_after.total_score,
                max_possible_score = session_after.max_possible_score,
                "session completed"
            );
        }

        Ok(SubmitAnswerResponse {
            evaluation,
            session: (&session_after).into(),
            is_complete,
        })
    }

    /// Timer-driven submission of the stored draft. Shares the manual
    /// path end to end; losing a race against a manual submit is a
    /// silent no-op.
    pub async fn auto_submit(&self, id: Uuid, question_code: String) {
        let Ok(entry) = self.store.get(id) else {
            return;
        };

        let (draft, time_limit) = {
            let session = entry.read().await;
            if session.status != SessionStatus::Active {
                return;
            }
            match session.pending_question() {
                Some(q) if q.code == question_code => {
                    (session.draft_answer.clone(), q.time_limit_seconds)
                }
                _ => return,
            }
        };
        let Some(text) = draft.filter(|t| !t.trim().is_empty()) else {
            debug!(
                session_id = %id,
                question_code = %question_code,
                "timer expired with no draft answer"
            );
            return;
        };

        let req = SubmitAnswerRequest {
            question_code: question_code.clone(),
            text,
            time_spent_seconds: time_limit,
        };
        match self.submit_inner(id, req, true).await {
            Ok(_) => {
                info!(
                    session_id = %id,
                    question_code = %question_code,
                    "draft answer auto-submitted on timeout"
                );
            }
            // A manual submission won the race; nothing to do.
            Err(Error::StaleSubmission) | Err(Error::SessionFinalized) => {}
            Err(err) => {
                error!(
                    session_id = %id,
                    question_code = %question_code,
                    error = ?err,
                    "auto-submit failed"
                );
            }
        }
    }
}
