use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::evaluation::{CategoryAverage, SessionResults};
use crate::models::question::Category;
use crate::models::session::Session;
use crate::store::session_store::SessionStore;

/// Letter grade for a rounded percentage. The ladder is contiguous; every
/// percentage maps to exactly one grade.
pub fn grade_for(percentage: u32) -> &'static str {
    match percentage {
        90.. => "A+",
        85..=89 => "A",
        80..=84 => "A-",
        75..=79 => "B+",
        70..=74 => "B",
        65..=69 => "B-",
        60..=64 => "C+",
        55..=59 => "C",
        50..=54 => "C-",
        _ => "F",
    }
}

/// Derive the read-only results bundle for a completed session. Called
/// exactly once, under the session lock, when the final answer lands.
pub fn compose(session: &Session) -> SessionResults {
    let percentage = if session.max_possible_score > 0 {
        ((session.total_score as f64 / session.max_possible_score as f64) * 100.0).round() as u32
    } else {
        0
    };

    // Questions and answers are index-aligned: one answer per delivered
    // question, in delivery order.
    let mut by_category: BTreeMap<Category, (u64, u32)> = BTreeMap::new();
    let mut job_fit: Vec<u32> = Vec::new();
    let mut role_competency: Vec<u32> = Vec::new();
    for (question, scored) in session.questions.iter().zip(session.answers.iter()) {
        let slot = by_category.entry(question.category).or_insert((0, 0));
        slot.0 += scored.evaluation.score as u64;
        slot.1 += 1;
        if let Some(fit) = scored.evaluation.job_fit_score {
            job_fit.push(fit);
        }
        if let Some(competency) = scored.evaluation.role_competency_score {
            role_competency.push(competency);
        }
    }

    let category_averages = by_category
        .into_iter()
        .map(|(category, (sum, count))| CategoryAverage {
            category,
            average_score: sum as f64 / count as f64,
            questions: count,
        })
        .collect();

    SessionResults {
        session_id: session.id,
        position: session.position.clone(),
        total_score: session.total_score,
        max_possible_score: session.max_possible_score,
        percentage,
        grade: grade_for(percentage).to_string(),
        category_averages,
        job_fit_score: mean(&job_fit),
        role_competency_score: mean(&role_competency),
        completed_at: session.ended_at.unwrap_or_else(Utc::now),
    }
}

/// Mean over only the evaluations that reported the value; None if none did.
fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|v| *v as u64).sum::<u64>() as f64 / values.len() as f64)
}

#[derive(Clone)]
pub struct ResultsService {
    store: Arc<SessionStore>,
}

impl ResultsService {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// The bundle composed at completion; a session still in flight has
    /// nothing to report yet.
    pub async fn results(&self, id: Uuid) -> Result<SessionResults> {
        let entry = self.store.get(id)?;
        let session = entry.read().await;
        session.results.clone().ok_or(Error::SessionNotCompleted)
    }
}
