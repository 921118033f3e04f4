pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::services::evaluation_service::{AnswerEvaluator, HttpAnswerEvaluator};
use crate::services::generation_service::{HttpQuestionGenerator, QuestionGenerator};
use crate::services::results_service::ResultsService;
use crate::services::sequencer_service::SequencerService;
use crate::services::session_service::SessionService;
use crate::services::submission_service::SubmissionService;
use crate::store::session_store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub session_service: SessionService,
    pub sequencer_service: Arc<SequencerService>,
    pub submission_service: Arc<SubmissionService>,
    pub results_service: ResultsService,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.intelligence_timeout_secs))
            .build()
            .unwrap();
        let timeout = Duration::from_secs(config.intelligence_timeout_secs);

        let generator: Arc<dyn QuestionGenerator> = Arc::new(HttpQuestionGenerator::new(
            config.intelligence_base_url.clone(),
            config.intelligence_api_key.clone(),
            timeout,
            http_client.clone(),
        ));
        let evaluator: Arc<dyn AnswerEvaluator> = Arc::new(HttpAnswerEvaluator::new(
            config.intelligence_base_url.clone(),
            config.intelligence_api_key.clone(),
            timeout,
            http_client,
        ));

        Self::with_collaborators(config, generator, evaluator)
    }

    /// Assemble the state with explicit collaborators. Tests inject mocks
    /// here; `new` wires up the HTTP implementations.
    pub fn with_collaborators(
        config: &Config,
        generator: Arc<dyn QuestionGenerator>,
        evaluator: Arc<dyn AnswerEvaluator>,
    ) -> Self {
        let store = Arc::new(SessionStore::new(Duration::from_secs(
            config.session_ttl_secs,
        )));
        let submission_service = Arc::new(SubmissionService::new(store.clone(), evaluator));
        let sequencer_service = Arc::new(SequencerService::new(
            store.clone(),
            generator,
            submission_service.clone(),
        ));

        Self {
            session_service: SessionService::new(store.clone()),
            results_service: ResultsService::new(store.clone()),
            sequencer_service,
            submission_service,
            store,
        }
    }
}
