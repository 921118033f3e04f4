use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question_code: String,
    pub text: String,
    /// Clamped to the question's time limit on submission.
    pub time_spent_seconds: u32,
    pub submitted_at: DateTime<Utc>,
    pub auto_submitted: bool,
}
