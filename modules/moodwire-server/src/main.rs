use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use moodwire_common::Config;
use moodwire_feed::RssHeadlineSource;
use moodwire_server::classifier::LexiconClassifier;
use moodwire_server::registry::SubscriberRegistry;
use moodwire_server::scoring::ScoringLoop;
use moodwire_server::{ws, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("moodwire=info".parse()?))
        .init();

    let config = Config::from_env();

    let registry = Arc::new(SubscriberRegistry::new(config.send_queue_depth));
    let source = Arc::new(RssHeadlineSource::new(config.feed_max_age_days));
    let classifier = Arc::new(LexiconClassifier::new());

    let producer = ScoringLoop::new(
        source,
        classifier,
        Arc::clone(&registry),
        Duration::from_secs(config.score_interval_secs),
    );
    tokio::spawn(producer.run());

    let state = Arc::new(AppState { registry });

    let app = Router::new()
        .route("/", get(status))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Moodwire server starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Static service descriptor plus the current subscriber count.
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "moodwire",
        "version": env!("CARGO_PKG_VERSION"),
        "subscribers": state.registry.count().await,
        "message": "Welcome to the Moodwire sentiment feed",
    }))
}
