use std::collections::HashMap;
use std::sync::OnceLock;

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::models::question::{
    Category, Difficulty, Question, DEFAULT_MAX_SCORE, DEFAULT_TIME_LIMIT_SECS,
};
use crate::utils::code;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BankKey {
    /// Normalized position, or empty for the any-position row.
    position: String,
    category: Category,
    difficulty: Difficulty,
}

struct BankTemplate {
    text: &'static str,
    keywords: &'static [&'static str],
    topic: &'static str,
}

/// Static stand-in questions served when the generation service is down.
/// Keyed by (position, category, difficulty); a position-agnostic row
/// exists for the broadly applicable categories so common sessions keep
/// moving, while the narrower categories only carry medium-difficulty
/// stand-ins and escalate otherwise.
pub struct QuestionBank;

impl QuestionBank {
    pub fn lookup(position: &str, category: Category, difficulty: Difficulty) -> Option<Question> {
        let table = bank_table();
        let normalized = normalize_position(position);

        let templates = table
            .get(&BankKey {
                position: normalized,
                category,
                difficulty,
            })
            .or_else(|| {
                table.get(&BankKey {
                    position: String::new(),
                    category,
                    difficulty,
                })
            })?;

        let template = templates.choose(&mut rand::thread_rng())?;
        Some(Question {
            id: Uuid::new_v4(),
            code: code::fallback_question_code(),
            category,
            difficulty,
            text: template.text.to_string(),
            expected_keywords: template.keywords.iter().map(|k| k.to_string()).collect(),
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECS,
            max_score: DEFAULT_MAX_SCORE,
            topic: Some(template.topic.to_string()),
            focus: None,
        })
    }
}

fn normalize_position(position: &str) -> String {
    position.trim().to_lowercase()
}

fn bank_table() -> &'static HashMap<BankKey, Vec<BankTemplate>> {
    static TABLE: OnceLock<HashMap<BankKey, Vec<BankTemplate>>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

fn build_table() -> HashMap<BankKey, Vec<BankTemplate>> {
    let mut table: HashMap<BankKey, Vec<BankTemplate>> = HashMap::new();
    let mut add = |position: &str, category: Category, difficulty: Difficulty, template: BankTemplate| {
        table
            .entry(BankKey {
                position: position.to_string(),
                category,
                difficulty,
            })
            .or_default()
            .push(template);
    };

    // Position-specific rows.
    add(
        "software engineer",
        Category::Technical,
        Difficulty::Easy,
        BankTemplate {
            text: "Walk through what happens when you submit a form in a web application, from the browser to the database and back.",
            keywords: &["http", "request", "server", "database", "response"],
            topic: "web fundamentals",
        },
    );
    add(
        "software engineer",
        Category::Technical,
        Difficulty::Medium,
        BankTemplate {
            text: "You have a service whose p99 latency doubled after a deploy. How do you find the cause?",
            keywords: &["metrics", "profiling", "rollback", "logs", "bisect"],
            topic: "debugging",
        },
    );
    add(
        "software engineer",
        Category::Technical,
        Difficulty::Hard,
        BankTemplate {
            text: "Design a rate limiter shared by multiple API servers. Discuss consistency, failure modes, and what you would trade off under load.",
            keywords: &["distributed", "token bucket", "redis", "consistency", "degradation"],
            topic: "system design",
        },
    );
    add(
        "data analyst",
        Category::Technical,
        Difficulty::Medium,
        BankTemplate {
            text: "A dashboard metric dropped 30% overnight. Describe how you would verify whether the drop is real before escalating.",
            keywords: &["data quality", "pipeline", "segmentation", "baseline"],
            topic: "data validation",
        },
    );

    // Any-position rows: technical.
    add(
        "",
        Category::Technical,
        Difficulty::Easy,
        BankTemplate {
            text: "Describe a tool or system you use daily in your work. What problem does it solve and what are its limitations?",
            keywords: &["tooling", "workflow", "limitations"],
            topic: "tools of the trade",
        },
    );
    add(
        "",
        Category::Technical,
        Difficulty::Medium,
        BankTemplate {
            text: "Tell me about a technically difficult problem you solved recently. What made it hard and how did you approach it?",
            keywords: &["problem solving", "approach", "tradeoffs"],
            topic: "problem solving",
        },
    );
    add(
        "",
        Category::Technical,
        Difficulty::Hard,
        BankTemplate {
            text: "Describe a time you had to make a significant technical decision with incomplete information. How did you bound the risk?",
            keywords: &["risk", "decision", "uncertainty", "mitigation"],
            topic: "technical judgment",
        },
    );

    // Any-position rows: behavioral.
    add(
        "",
        Category::Behavioral,
        Difficulty::Easy,
        BankTemplate {
            text: "Tell me about a recent piece of work you are proud of and the part you personally played in it.",
            keywords: &["ownership", "contribution", "outcome"],
            topic: "ownership",
        },
    );
    add(
        "",
        Category::Behavioral,
        Difficulty::Medium,
        BankTemplate {
            text: "Describe a disagreement with a colleague about how to approach a piece of work. How was it resolved?",
            keywords: &["conflict", "communication", "compromise", "resolution"],
            topic: "collaboration",
        },
    );
    add(
        "",
        Category::Behavioral,
        Difficulty::Hard,
        BankTemplate {
            text: "Tell me about a time you failed to deliver something you had committed to. What happened afterwards and what changed in how you work?",
            keywords: &["failure", "accountability", "learning", "process"],
            topic: "accountability",
        },
    );

    // Any-position rows: situational.
    add(
        "",
        Category::Situational,
        Difficulty::Easy,
        BankTemplate {
            text: "You receive two urgent requests from different stakeholders and can only finish one today. How do you decide?",
            keywords: &["prioritization", "stakeholders", "communication"],
            topic: "prioritization",
        },
    );
    add(
        "",
        Category::Situational,
        Difficulty::Medium,
        BankTemplate {
            text: "Halfway through a project the requirements change substantially. What do you do in the first day after learning this?",
            keywords: &["scope change", "replanning", "stakeholders"],
            topic: "adaptability",
        },
    );
    add(
        "",
        Category::Situational,
        Difficulty::Hard,
        BankTemplate {
            text: "You discover a serious mistake in work that has already shipped, made by someone on your team. Walk through exactly what you do and in what order.",
            keywords: &["incident", "escalation", "blameless", "remediation"],
            topic: "incident handling",
        },
    );

    // Narrow categories carry only medium stand-ins; other difficulties
    // escalate to the caller.
    add(
        "",
        Category::RoleCompetency,
        Difficulty::Medium,
        BankTemplate {
            text: "Pick the competency you consider most central to this role and describe a concrete situation where you demonstrated it.",
            keywords: &["competency", "evidence", "impact"],
            topic: "role competencies",
        },
    );
    add(
        "",
        Category::JobKnowledge,
        Difficulty::Medium,
        BankTemplate {
            text: "Based on your understanding of this position, which responsibility would you expect to spend most of your time on, and how have you prepared for it?",
            keywords: &["responsibilities", "preparation", "experience"],
            topic: "job knowledge",
        },
    );

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_lookup_is_case_and_whitespace_insensitive() {
        let question = QuestionBank::lookup("  Software Engineer ", Category::Technical, Difficulty::Hard)
            .expect("position-specific row");
        assert_eq!(question.category, Category::Technical);
        assert_eq!(question.difficulty, Difficulty::Hard);
        assert!(question.text.contains("rate limiter"));
    }

    #[test]
    fn unknown_positions_fall_through_to_the_generic_row() {
        let question = QuestionBank::lookup("zookeeper", Category::Behavioral, Difficulty::Medium)
            .expect("any-position row");
        assert_eq!(question.category, Category::Behavioral);
        assert!(question.code.starts_with("fallback-"));
        assert!(question.is_fallback());
    }

    #[test]
    fn uncovered_difficulty_misses() {
        assert!(QuestionBank::lookup("zookeeper", Category::JobKnowledge, Difficulty::Hard).is_none());
        assert!(QuestionBank::lookup("zookeeper", Category::RoleCompetency, Difficulty::Easy).is_none());
    }
}
