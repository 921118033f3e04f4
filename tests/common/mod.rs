#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use interview_engine::config::Config;
use interview_engine::dto::session_dto::StartSessionRequest;
use interview_engine::error::{Error, Result};
use interview_engine::models::evaluation::Evaluation;
use interview_engine::models::question::{Difficulty, Question};
use interview_engine::models::session::{Session, SessionKind};
use interview_engine::services::evaluation_service::{AnswerEvaluator, EvaluationRequest};
use interview_engine::services::generation_service::{GenerationRequest, QuestionGenerator};
use interview_engine::AppState;

pub const QUESTION_TIME_LIMIT: u32 = 60;
pub const QUESTION_MAX_SCORE: u32 = 10;

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".to_string(),
        intelligence_base_url: "http://127.0.0.1:9".to_string(),
        intelligence_api_key: "test-key".to_string(),
        intelligence_timeout_secs: 5,
        session_ttl_secs: 3600,
        eviction_interval_secs: 60,
        public_rps: 100,
    }
}

pub fn test_config_with_ttl(ttl_secs: u64) -> Config {
    Config {
        session_ttl_secs: ttl_secs,
        ..test_config()
    }
}

pub fn start_request(kind: SessionKind, total_questions: u8) -> StartSessionRequest {
    StartSessionRequest {
        kind,
        industry: "software".to_string(),
        position: "backend engineer".to_string(),
        difficulty: Difficulty::Medium,
        total_questions,
        job_requirements: Vec::new(),
        role_competencies: Vec::new(),
    }
}

pub fn question_for(request: &GenerationRequest, seq: u32) -> Question {
    Question {
        id: Uuid::new_v4(),
        code: format!("q-test{}", seq),
        category: request.category,
        difficulty: request.difficulty,
        text: format!("Scripted question #{}", seq),
        expected_keywords: vec!["scripted".to_string()],
        time_limit_seconds: QUESTION_TIME_LIMIT,
        max_score: QUESTION_MAX_SCORE,
        topic: None,
        focus: request.focus.clone(),
    }
}

/// Deterministic generator: emits `q-testN` questions, optionally failing
/// on scripted call numbers (1-based).
pub struct ScriptedGenerator {
    calls: AtomicU32,
    fail_on: Vec<u32>,
    always_fail: bool,
}

impl ScriptedGenerator {
    pub fn reliable() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_on: Vec::new(),
            always_fail: false,
        }
    }

    pub fn failing_on(calls: &[u32]) -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_on: calls.to_vec(),
            always_fail: false,
        }
    }

    pub fn always_failing() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_on: Vec::new(),
            always_fail: true,
        }
    }
}

#[async_trait]
impl QuestionGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Question> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.always_fail || self.fail_on.contains(&call) {
            return Err(Error::Generation(format!("scripted failure on call {}", call)));
        }
        Ok(question_for(&request, call))
    }
}

pub enum EvalMode {
    /// Full marks every time.
    FullScore,
    /// A fixed score every time.
    Fixed(u32),
    /// A score far above the question maximum, to exercise clamping.
    Overflow,
    /// Collaborator outage on every call.
    AlwaysFail,
    /// Full marks plus a per-call job-fit score sequence.
    JobFitSeq(Vec<Option<u32>>),
    /// Full marks plus a per-call role-competency score sequence.
    RoleFitSeq(Vec<Option<u32>>),
}

pub struct ScriptedEvaluator {
    calls: AtomicU32,
    mode: EvalMode,
}

impl ScriptedEvaluator {
    pub fn new(mode: EvalMode) -> Self {
        Self {
            calls: AtomicU32::new(0),
            mode,
        }
    }
}

#[async_trait]
impl AnswerEvaluator for ScriptedEvaluator {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<Evaluation> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        let max = request.question.max_score;
        let mut evaluation = Evaluation {
            score: max,
            max_score: max,
            feedback: "Scripted feedback.".to_string(),
            strengths: vec!["clarity".to_string()],
            weaknesses: Vec::new(),
            suggestions: Vec::new(),
            dimension_scores: Default::default(),
            job_fit_score: None,
            role_competency_score: None,
            degraded: false,
        };
        match &self.mode {
            EvalMode::FullScore => {}
            EvalMode::Fixed(score) => evaluation.score = *score,
            EvalMode::Overflow => evaluation.score = 999,
            EvalMode::AlwaysFail => {
                return Err(Error::Internal("scripted evaluation outage".to_string()))
            }
            EvalMode::JobFitSeq(seq) => {
                evaluation.job_fit_score = seq.get(call).copied().flatten();
            }
            EvalMode::RoleFitSeq(seq) => {
                evaluation.role_competency_score = seq.get(call).copied().flatten();
            }
        }
        Ok(evaluation)
    }
}

pub fn state_with(
    config: &Config,
    generator: impl QuestionGenerator + 'static,
    evaluator: impl AnswerEvaluator + 'static,
) -> AppState {
    AppState::with_collaborators(config, Arc::new(generator), Arc::new(evaluator))
}

/// The engine-wide invariants that must hold at every observable point.
pub fn assert_invariants(session: &Session) {
    assert!(session.current_question_index <= session.total_questions);
    assert_eq!(
        session.current_question_index as usize,
        session.questions.len()
    );
    assert!(session.answers.len() <= session.questions.len());
    assert!(session.questions.len() - session.answers.len() <= 1);
    assert!(session.total_score <= session.max_possible_score);
}
