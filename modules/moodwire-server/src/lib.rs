pub mod classifier;
pub mod registry;
pub mod scoring;
pub mod ws;

use std::sync::Arc;

use registry::SubscriberRegistry;

/// Shared application state passed to Axum handlers.
pub struct AppState {
    pub registry: Arc<SubscriberRegistry>,
}
