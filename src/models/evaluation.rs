use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::question::Category;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Clamped into [0, question.max_score] regardless of what the
    /// evaluation service returned.
    pub score: u32,
    pub max_score: u32,
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub dimension_scores: BTreeMap<String, u32>,
    /// Present only for job-specific sessions.
    #[serde(default)]
    pub job_fit_score: Option<u32>,
    /// Present only for role-based sessions.
    #[serde(default)]
    pub role_competency_score: Option<u32>,
    /// True when the evaluation service failed and the neutral default
    /// was recorded instead.
    #[serde(default)]
    pub degraded: bool,
}

impl Evaluation {
    /// Stand-in recorded when the evaluation service is unavailable.
    /// The session must keep progressing, so the answer is accepted with
    /// the minimum score and generic feedback.
    pub fn neutral_default(max_score: u32) -> Self {
        Self {
            score: 0,
            max_score,
            feedback: "Automatic evaluation was unavailable for this answer.".to_string(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            suggestions: vec!["Request a manual review of this answer.".to_string()],
            dimension_scores: BTreeMap::new(),
            job_fit_score: None,
            role_competency_score: None,
            degraded: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAverage {
    pub category: Category,
    pub average_score: f64,
    pub questions: u32,
}

/// Read-only bundle derived once a session completes, consumed by the
/// certificate/report renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResults {
    pub session_id: Uuid,
    pub position: String,
    pub total_score: u32,
    pub max_possible_score: u32,
    pub percentage: u32,
    pub grade: String,
    pub category_averages: Vec<CategoryAverage>,
    /// Mean over only the evaluations that reported the field.
    pub job_fit_score: Option<f64>,
    pub role_competency_score: Option<f64>,
    pub completed_at: DateTime<Utc>,
}
