use std::sync::Arc;

use tutor_backend_rust::config::Config;
use tutor_backend_rust::create_app_with;
use tutor_backend_rust::logging::{init_tracing, LoggingConfig};
use tutor_backend_rust::services::LLMProvider;
use tutor_backend_rust::state::AppState;
use tutor_backend_rust::store::{CurriculumCatalog, InMemoryProfileStore};
use tutor_backend_rust::tutor::{PipelineConfig, TutorPipeline};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&LoggingConfig::from_env(config.log_level.clone()));

    let curricula = Arc::new(CurriculumCatalog::new());
    if let Some(dir) = config.curriculum_dir.as_ref() {
        if let Err(err) = curricula.load_dir(dir).await {
            tracing::warn!(dir = %dir.display(), error = %err, "curriculum directory not loaded");
        }
    }

    let provider = LLMProvider::from_env();
    if !provider.is_available() {
        tracing::warn!("LLM_API_KEY not set; generation requests will fail");
    }
    let pipeline = TutorPipeline::new(Arc::new(provider), PipelineConfig::from_env());

    let state = AppState::new(pipeline, curricula, Arc::new(InMemoryProfileStore::new()));
    let app = create_app_with(state);

    let addr = config.bind_addr();
    tracing::info!(%addr, "tutor backend listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind listener failed");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        tracing::error!(error = %e, "server error");
    }

    tracing::info!("shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
