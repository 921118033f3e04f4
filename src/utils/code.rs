use rand::{distributions::Alphanumeric, thread_rng, Rng};

fn random_suffix(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

/// Code for a question obtained from the generation service.
pub fn generated_question_code() -> String {
    format!("q-{}", random_suffix(10))
}

/// Code for a question served from the fallback bank. The prefix keeps
/// bank questions distinguishable from generated ones downstream.
pub fn fallback_question_code() -> String {
    format!("fallback-{}", random_suffix(10))
}
