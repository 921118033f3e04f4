use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::question::{Category, Question};
use crate::models::session::{Session, SessionKind, SessionStatus};
use crate::services::generation_service::{GenerationRequest, QuestionGenerator};
use crate::services::question_bank::QuestionBank;
use crate::services::submission_service::SubmissionService;
use crate::services::timer_service;
use crate::store::session_store::{SessionEntry, SessionStore};

/// How many delivered question codes are echoed back to the generation
/// service to bias it away from repetition.
const REPETITION_WINDOW: usize = 3;

/// Per-kind category weighting. Each session kind gets its own strategy
/// rather than branching on the kind inline.
pub trait SequencingPolicy: Send + Sync {
    /// Category for the question at `index` (0-based delivery order).
    fn category_for(&self, index: u8, session: &Session) -> Category;

    /// Requirement or competency to steer the question towards, if the
    /// kind uses sequencing hints.
    fn focus_for(&self, _index: u8, _session: &Session) -> Option<String> {
        None
    }
}

struct TechnicalPolicy;

impl SequencingPolicy for TechnicalPolicy {
    fn category_for(&self, _index: u8, _session: &Session) -> Category {
        Category::Technical
    }
}

struct BehavioralPolicy;

impl SequencingPolicy for BehavioralPolicy {
    fn category_for(&self, _index: u8, _session: &Session) -> Category {
        Category::Behavioral
    }
}

struct MixedPolicy;

impl SequencingPolicy for MixedPolicy {
    fn category_for(&self, index: u8, _session: &Session) -> Category {
        const ROTATION: [Category; 3] = [
            Category::Technical,
            Category::Behavioral,
            Category::Situational,
        ];
        ROTATION[index as usize % ROTATION.len()]
    }
}

struct RoleBasedPolicy;

impl SequencingPolicy for RoleBasedPolicy {
    fn category_for(&self, index: u8, _session: &Session) -> Category {
        // Every third question probes behaviour; the rest target the
        // declared competencies.
        if index % 3 == 2 {
            Category::Behavioral
        } else {
            Category::RoleCompetency
        }
    }

    fn focus_for(&self, index: u8, session: &Session) -> Option<String> {
        if session.role_competencies.is_empty() {
            return None;
        }
        let slot = index as usize % session.role_competencies.len();
        session.role_competencies.get(slot).cloned()
    }
}

struct JobSpecificPolicy;

impl SequencingPolicy for JobSpecificPolicy {
    fn category_for(&self, index: u8, _session: &Session) -> Category {
        if index % 2 == 1 {
            Category::Technical
        } else {
            Category::JobKnowledge
        }
    }

    fn focus_for(&self, index: u8, session: &Session) -> Option<String> {
        if session.job_requirements.is_empty() {
            return None;
        }
        let slot = index as usize % session.job_requirements.len();
        session.job_requirements.get(slot).cloned()
    }
}

pub fn policy_for(kind: SessionKind) -> &'static dyn SequencingPolicy {
    match kind {
        SessionKind::Technical => &TechnicalPolicy,
        SessionKind::Behavioral => &BehavioralPolicy,
        SessionKind::Mixed => &MixedPolicy,
        SessionKind::RoleBased => &RoleBasedPolicy,
        SessionKind::JobSpecific => &JobSpecificPolicy,
    }
}

/// Decides and delivers the next question for a session: generation
/// service first, fallback bank second, and only then an error.
#[derive(Clone)]
pub struct SequencerService {
    store: Arc<SessionStore>,
    generator: Arc<dyn QuestionGenerator>,
    submission: Arc<SubmissionService>,
}

impl SequencerService {
    pub fn new(
        store: Arc<SessionStore>,
        generator: Arc<dyn QuestionGenerator>,
        submission: Arc<SubmissionService>,
    ) -> Self {
        Self {
            store,
            generator,
            submission,
        }
    }

    /// Deliver the next question, or `Ok(None)` once all questions are
    /// out. An unanswered pending question is redelivered unchanged so a
    /// reconnecting client can pick up where it left off.
    pub async fn next(&self, id: Uuid) -> Result<Option<Question>> {
        let entry = self.store.get(id)?;
        let _gate = entry.lock_writer().await;

        let snapshot = entry.snapshot().await;
        match snapshot.status {
            SessionStatus::Completed => return Err(Error::SessionFinalized),
            SessionStatus::Paused => return Err(Error::SessionNotActive),
            SessionStatus::Active => {}
        }
        if let Some(pending) = snapshot.pending_question() {
            return Ok(Some(pending.clone()));
        }
        if snapshot.current_question_index >= snapshot.total_questions {
            return Ok(None);
        }

        // Collaborator I/O happens here, before the state lock is taken;
        // the writer gate alone keeps competing next/submit calls out.
        let question = self.obtain_question(&snapshot).await?;

        {
            let mut session = entry.write().await;
            session.append_question(question.clone())?;
        }
        self.arm_timer(&entry, id, &question);

        info!(
            session_id = %id,
            question_code = %question.code,
            category = %question.category.as_str(),
            fallback = question.is_fallback(),
            "question delivered"
        );
        Ok(Some(question))
    }

    async fn obtain_question(&self, session: &Session) -> Result<Question> {
        let index = session.current_question_index;
        let policy = policy_for(session.kind);
        let category = policy.category_for(index, session);
        let focus = policy.focus_for(index, session);

        let request = GenerationRequest {
            category,
            industry: session.industry.clone(),
            position: session.position.clone(),
            difficulty: session.difficulty,
            previous_question_codes: session.recent_question_codes(REPETITION_WINDOW),
            job_requirements: session.job_requirements.clone(),
            role_competencies: session.role_competencies.clone(),
            focus,
        };

        match self.generator.generate(request).await {
            Ok(question) => Ok(question),
            Err(err) => {
                warn!(
                    session_id = %session.id,
                    error = ?err,
                    "question generation failed, trying fallback bank"
                );
                QuestionBank::lookup(&session.position, category, session.difficulty).ok_or_else(
                    || {
                        Error::Generation(format!(
                            "generation failed and no fallback exists for ({}, {}, {:?})",
                            session.position,
                            category.as_str(),
                            session.difficulty
                        ))
                    },
                )
            }
        }
    }

    fn arm_timer(&self, entry: &Arc<SessionEntry>, session_id: Uuid, question: &Question) {
        let submission = Arc::clone(&self.submission);
        let code = question.code.clone();
        let handle = timer_service::arm(
            question.code.clone(),
            question.time_limit_seconds,
            async move {
                submission.auto_submit(session_id, code).await;
            },
        );
        entry.install_timer(handle);
    }
}
