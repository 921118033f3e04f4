use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::question::{
    Category, Difficulty, Question, DEFAULT_MAX_SCORE, DEFAULT_TIME_LIMIT_SECS,
};
use crate::utils::code;

const MIN_TIME_LIMIT_SECS: u32 = 30;
const MAX_TIME_LIMIT_SECS: u32 = 1800;
const MAX_QUESTION_SCORE: u32 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub category: Category,
    pub industry: String,
    pub position: String,
    pub difficulty: Difficulty,
    /// Codes of recently delivered questions, to bias against repetition.
    pub previous_question_codes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub job_requirements: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub role_competencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
}

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<Question>;
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestionPayload {
    text: String,
    #[serde(default)]
    expected_keywords: Vec<String>,
    #[serde(default)]
    time_limit_seconds: Option<u32>,
    #[serde(default)]
    max_score: Option<u32>,
    #[serde(default)]
    topic: Option<String>,
}

#[derive(Clone)]
pub struct HttpQuestionGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpQuestionGenerator {
    pub fn new(base_url: String, api_key: String, timeout: Duration, client: Client) -> Self {
        Self {
            client,
            base_url,
            api_key,
            timeout,
        }
    }

    /// Coerce the service payload into a well-formed question. Limits and
    /// scores are sanitized here so a misbehaving producer cannot inject
    /// a zero-score or day-long question.
    fn coerce_question(&self, payload: GeneratedQuestionPayload, request: &GenerationRequest) -> Result<Question> {
        let text = payload.text.trim().to_string();
        if text.is_empty() {
            return Err(Error::Generation("generation service returned an empty question".to_string()));
        }
        let time_limit = payload
            .time_limit_seconds
            .unwrap_or(DEFAULT_TIME_LIMIT_SECS)
            .clamp(MIN_TIME_LIMIT_SECS, MAX_TIME_LIMIT_SECS);
        let max_score = payload
            .max_score
            .unwrap_or(DEFAULT_MAX_SCORE)
            .clamp(1, MAX_QUESTION_SCORE);

        Ok(Question {
            id: Uuid::new_v4(),
            code: code::generated_question_code(),
            category: request.category,
            difficulty: request.difficulty,
            text,
            expected_keywords: payload.expected_keywords,
            time_limit_seconds: time_limit,
            max_score,
            topic: payload.topic,
            focus: request.focus.clone(),
        })
    }
}

#[async_trait]
impl QuestionGenerator for HttpQuestionGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Question> {
        let res = self
            .client
            .post(format!("{}/v1/questions/generate", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "generation service returned {}: {}",
                status, text
            )));
        }

        let payload: GeneratedQuestionPayload = res.json().await?;
        self.coerce_question(payload, &request)
    }
}
