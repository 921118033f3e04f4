use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::evaluation::Evaluation;
use crate::models::question::Question;

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRequest {
    pub question: Question,
    pub answer_text: String,
    pub time_spent_seconds: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub job_requirements: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub role_competencies: Vec<String>,
}

#[async_trait]
pub trait AnswerEvaluator: Send + Sync {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<Evaluation>;
}

#[derive(Debug, Deserialize)]
struct EvaluationPayload {
    score: u32,
    #[serde(default)]
    feedback: Option<String>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    dimension_scores: BTreeMap<String, u32>,
    #[serde(default)]
    job_fit_score: Option<u32>,
    #[serde(default)]
    role_competency_score: Option<u32>,
}

#[derive(Clone)]
pub struct HttpAnswerEvaluator {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpAnswerEvaluator {
    pub fn new(base_url: String, api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            base_url,
            api_key,
            timeout,
        }
    }
}

#[async_trait]
impl AnswerEvaluator for HttpAnswerEvaluator {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<Evaluation> {
        let max_score = request.question.max_score;
        let res = self
            .client
            .post(format!("{}/v1/answers/evaluate", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Internal(format!(
                "evaluation service returned {}: {}",
                status, text
            )));
        }

        let payload: EvaluationPayload = res.json().await?;
        Ok(Evaluation {
            score: payload.score,
            max_score,
            feedback: payload
                .feedback
                .unwrap_or_else(|| "No feedback provided.".to_string()),
            strengths: payload.strengths,
            weaknesses: payload.weaknesses,
            suggestions: payload.suggestions,
            dimension_scores: payload.dimension_scores,
            job_fit_score: payload.job_fit_score,
            role_competency_score: payload.role_competency_score,
            degraded: false,
        })
    }
}
