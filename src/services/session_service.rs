use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::session_dto::{DraftAnswerRequest, StartSessionRequest};
use crate::error::{Error, Result};
use crate::models::session::{Session, SessionStatus};
use crate::store::session_store::SessionStore;

/// Owns session creation and the active/paused/completed state machine.
/// Question delivery and answer recording live in the sequencer and
/// submission services; nothing here touches those sequences.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    pub fn create(&self, req: StartSessionRequest) -> Result<Session> {
        req.validate()?;

        let session = Session::new(
            req.kind,
            req.industry,
            req.position,
            req.difficulty,
            req.total_questions,
            req.job_requirements,
            req.role_competencies,
        );
        info!(
            session_id = %session.id,
            kind = ?session.kind,
            position = %session.position,
            total_questions = session.total_questions,
            "session created"
        );
        self.store.insert(session.clone());
        Ok(session)
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<Session> {
        Ok(self.store.get(id)?.snapshot().await)
    }

    /// Suspend an active session. Returns false without touching anything
    /// when the session is not currently active.
    pub async fn pause(&self, id: Uuid) -> Result<bool> {
        let entry = self.store.get(id)?;
        let _gate = entry.lock_writer().await;
        {
            let mut session = entry.write().await;
            if session.status != SessionStatus::Active {
                return Ok(false);
            }
            session.status = SessionStatus::Paused;
        }
        entry.pause_timer();
        info!(session_id = %id, "session paused");
        Ok(true)
    }

    /// Reactivate a paused session. Returns false when the session is not
    /// currently paused.
    pub async fn resume(&self, id: Uuid) -> Result<bool> {
        let entry = self.store.get(id)?;
        let _gate = entry.lock_writer().await;
        {
            let mut session = entry.write().await;
            if session.status != SessionStatus::Paused {
                return Ok(false);
            }
            session.status = SessionStatus::Active;
        }
        entry.resume_timer();
        info!(session_id = %id, "session resumed");
        Ok(true)
    }

    /// Store the in-progress answer text for the pending question. The
    /// timer submits this draft if the countdown expires.
    pub async fn save_draft(&self, id: Uuid, req: DraftAnswerRequest) -> Result<()> {
        req.validate()?;
        let entry = self.store.get(id)?;
        let _gate = entry.lock_writer().await;
        let mut session = entry.write().await;
        match session.status {
            SessionStatus::Completed => return Err(Error::SessionFinalized),
            SessionStatus::Paused => return Err(Error::SessionNotActive),
            SessionStatus::Active => {}
        }
        let pending = session.pending_question().ok_or(Error::StaleSubmission)?;
        if pending.code != req.question_code {
            return Err(Error::StaleSubmission);
        }
        session.draft_answer = if req.text.trim().is_empty() {
            None
        } else {
            Some(req.text)
        };
        Ok(())
    }

    /// Drop a session outright, e.g. when its first question could not be
    /// obtained and the caller has no usable id to hand out.
    pub fn discard(&self, id: Uuid) {
        self.store.remove(id);
    }
}
