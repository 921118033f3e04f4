use axum::{
    routing::{get, patch, post},
    Router,
};
use interview_engine::{config::Config, routes, AppState};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = Config::from_env()?;

    let app_state = AppState::new(&config);

    {
        let store = app_state.store.clone();
        let interval = Duration::from_secs(config.eviction_interval_secs);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let evicted = store.evict_idle();
                if evicted > 0 {
                    info!(count = evicted, "evicted idle sessions");
                }
            }
        });
    }

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let session_api = Router::new()
        .route("/api/sessions", post(routes::session::start_session))
        .route("/api/sessions/:id", get(routes::session::get_session))
        .route(
            "/api/sessions/:id/next",
            post(routes::session::next_question),
        )
        .route(
            "/api/sessions/:id/draft",
            patch(routes::session::save_draft),
        )
        .route(
            "/api/sessions/:id/submit",
            post(routes::session::submit_answer),
        )
        .route(
            "/api/sessions/:id/pause",
            post(routes::session::pause_session),
        )
        .route(
            "/api/sessions/:id/resume",
            post(routes::session::resume_session),
        )
        .route(
            "/api/sessions/:id/results",
            get(routes::session::get_results),
        )
        .layer(axum::middleware::from_fn_with_state(
            interview_engine::middleware::rate_limit::new_rps_state(config.public_rps),
            interview_engine::middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(session_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
