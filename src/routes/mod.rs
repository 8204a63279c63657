mod curricula;
mod health;
mod lessons;
mod profile;
mod questions;

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/students/:student_id/lessons/generate",
            post(lessons::generate_lesson).fallback(fallback_handler),
        )
        .route(
            "/api/students/:student_id/questions/generate",
            post(questions::generate_questions).fallback(fallback_handler),
        )
        .route(
            "/api/students/:student_id/profile",
            get(profile::get_profile)
                .put(profile::update_profile)
                .fallback(fallback_handler),
        )
        .route(
            "/api/students/:student_id/profile/skills",
            post(profile::record_skill).fallback(fallback_handler),
        )
        .nest("/api/curricula", curricula::router())
        .nest("/health", health::router())
        .fallback(fallback_handler)
        .with_state(state)
}

/// Maps body decoding failures onto the `VALIDATION_ERROR` envelope.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::validation(rejection.body_text()))
}

async fn fallback_handler() -> Response {
    AppError::not_found("Endpoint not found").into_response()
}
