use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::evaluation::Evaluation;
use crate::models::question::{Difficulty, Question};
use crate::models::session::{Session, SessionKind, SessionStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartSessionRequest {
    pub kind: SessionKind,
    #[validate(length(min = 1, message = "industry must not be empty"))]
    pub industry: String,
    #[validate(length(min = 1, message = "position must not be empty"))]
    pub position: String,
    pub difficulty: Difficulty,
    #[validate(range(min = 1, max = 20, message = "total_questions must be between 1 and 20"))]
    pub total_questions: u8,
    #[serde(default)]
    pub job_requirements: Vec<String>,
    #[serde(default)]
    pub role_competencies: Vec<String>,
}

/// Snapshot of a session safe to hand to clients: progress counters and
/// totals, without the full question/answer history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub kind: SessionKind,
    pub status: SessionStatus,
    pub industry: String,
    pub position: String,
    pub difficulty: Difficulty,
    pub total_questions: u8,
    pub current_question_index: u8,
    pub questions_answered: u32,
    pub total_score: u32,
    pub max_possible_score: u32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            kind: session.kind,
            status: session.status,
            industry: session.industry.clone(),
            position: session.position.clone(),
            difficulty: session.difficulty,
            total_questions: session.total_questions,
            current_question_index: session.current_question_index,
            questions_answered: session.answers.len() as u32,
            total_score: session.total_score,
            max_possible_score: session.max_possible_score,
            started_at: session.started_at,
            ended_at: session.ended_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub session: SessionView,
    pub pending_question_code: Option<String>,
    pub time_remaining_seconds: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session: SessionView,
    pub first_question: Question,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextQuestionResponse {
    pub question: Option<Question>,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DraftAnswerRequest {
    #[validate(length(min = 1, message = "question_code must not be empty"))]
    pub question_code: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftAnswerResponse {
    pub saved: bool,
    pub question_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, message = "question_code must not be empty"))]
    pub question_code: String,
    #[validate(length(min = 1, message = "answer text must not be empty"))]
    pub text: String,
    pub time_spent_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub evaluation: Evaluation,
    pub session: SessionView,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseResponse {
    pub paused: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeResponse {
    pub resumed: bool,
}
