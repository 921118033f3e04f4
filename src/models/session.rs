use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

use super::answer::Answer;
use super::evaluation::{Evaluation, SessionResults};
use super::question::{Difficulty, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    Technical,
    Behavioral,
    Mixed,
    RoleBased,
    JobSpecific,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredAnswer {
    pub answer: Answer,
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub kind: SessionKind,
    pub industry: String,
    pub position: String,
    pub difficulty: Difficulty,
    pub total_questions: u8,
    /// Number of questions delivered so far; always equals `questions.len()`.
    /// `answers.len()` lags it by at most one (the pending question).
    pub current_question_index: u8,
    pub questions: Vec<Question>,
    pub answers: Vec<ScoredAnswer>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub total_score: u32,
    pub max_possible_score: u32,
    #[serde(default)]
    pub job_requirements: Vec<String>,
    #[serde(default)]
    pub role_competencies: Vec<String>,
    /// In-progress answer text, consumed by the timer's auto-submit.
    #[serde(default)]
    pub draft_answer: Option<String>,
    /// Composed once, when the final answer is recorded.
    #[serde(default)]
    pub results: Option<SessionResults>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        kind: SessionKind,
        industry: String,
        position: String,
        difficulty: Difficulty,
        total_questions: u8,
        job_requirements: Vec<String>,
        role_competencies: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            industry,
            position,
            difficulty,
            total_questions,
            current_question_index: 0,
            questions: Vec::new(),
            answers: Vec::new(),
            started_at: Utc::now(),
            ended_at: None,
            status: SessionStatus::Active,
            total_score: 0,
            max_possible_score: 0,
            job_requirements,
            role_competencies,
            draft_answer: None,
            results: None,
        }
    }

    /// The delivered-but-unanswered question, if one exists.
    pub fn pending_question(&self) -> Option<&Question> {
        if self.answers.len() < self.questions.len() {
            self.questions.last()
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() as u8 == self.total_questions
    }

    /// Codes of the most recently delivered questions, newest last.
    pub fn recent_question_codes(&self, n: usize) -> Vec<String> {
        self.questions
            .iter()
            .rev()
            .take(n)
            .rev()
            .map(|q| q.code.clone())
            .collect()
    }

    /// Append a delivered question and advance the index. The index moves
    /// only here, so it always counts questions actually delivered.
    pub fn append_question(&mut self, question: Question) -> Result<()> {
        if self.status == SessionStatus::Completed {
            return Err(Error::SessionFinalized);
        }
        if self.pending_question().is_some() {
            return Err(Error::Internal(
                "question delivered while another is pending".to_string(),
            ));
        }
        if self.current_question_index >= self.total_questions {
            return Err(Error::Internal(
                "question delivered past the configured total".to_string(),
            ));
        }
        self.questions.push(question);
        self.current_question_index += 1;
        Ok(())
    }

    /// Record the answer to the pending question and fold its evaluation
    /// into the running totals. Completes the session on the final answer.
    pub fn record_answer(&mut self, answer: Answer, evaluation: Evaluation) -> Result<()> {
        if self.status == SessionStatus::Completed {
            return Err(Error::SessionFinalized);
        }
        let pending = self.pending_question().ok_or(Error::StaleSubmission)?;
        if pending.code != answer.question_code {
            return Err(Error::StaleSubmission);
        }
        self.total_score += evaluation.score;
        self.max_possible_score += evaluation.max_score;
        self.answers.push(ScoredAnswer { answer, evaluation });
        self.draft_answer = None;
        if self.is_complete() {
            self.status = SessionStatus::Completed;
            self.ended_at = Some(Utc::now());
        }
        Ok(())
    }
}
