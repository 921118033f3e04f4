use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_MAX_SCORE: u32 = 10;
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Technical,
    Behavioral,
    Situational,
    RoleCompetency,
    JobKnowledge,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Behavioral => "behavioral",
            Category::Situational => "situational",
            Category::RoleCompetency => "role-competency",
            Category::JobKnowledge => "job-knowledge",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    /// Stable identity used for answer matching and fallback tagging.
    /// Generated questions carry a `q-` prefix, bank questions `fallback-`.
    pub code: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub text: String,
    #[serde(default)]
    pub expected_keywords: Vec<String>,
    pub time_limit_seconds: u32,
    pub max_score: u32,
    #[serde(default)]
    pub topic: Option<String>,
    /// Requirement or competency the sequencer targeted, if any.
    #[serde(default)]
    pub focus: Option<String>,
}

impl Question {
    pub fn is_fallback(&self) -> bool {
        self.code.starts_with("fallback-")
    }
}
