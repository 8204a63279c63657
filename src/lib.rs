pub mod config;
pub mod logging;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod tutor;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::LLMProvider;
use crate::state::AppState;
use crate::store::{CurriculumCatalog, InMemoryProfileStore};
use crate::tutor::{PipelineConfig, TutorPipeline};

/// Builds the app from environment configuration with an empty curriculum catalog.
pub fn create_app() -> axum::Router {
    let pipeline = TutorPipeline::new(Arc::new(LLMProvider::from_env()), PipelineConfig::from_env());
    let state = AppState::new(
        pipeline,
        Arc::new(CurriculumCatalog::new()),
        Arc::new(InMemoryProfileStore::new()),
    );
    create_app_with(state)
}

pub fn create_app_with(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
