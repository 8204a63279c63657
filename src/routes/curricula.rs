use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::store::CatalogFilter;
use crate::tutor::curriculum::{browse, BrowsePath};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_curricula))
        .route("/:id", get(get_curriculum))
        .route("/:id/browse", get(browse_curriculum))
}

async fn list_curricula(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Response {
    ok(state.curricula().summaries(&filter)).into_response()
}

async fn get_curriculum(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let curriculum = state
        .curricula()
        .get(&id)
        .ok_or_else(|| AppError::not_found(format!("Curriculum '{id}' not found")))?;
    Ok(ok(curriculum.as_ref()).into_response())
}

async fn browse_curriculum(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(path): Query<BrowsePath>,
) -> Result<Response, AppError> {
    let curriculum = state
        .curricula()
        .get(&id)
        .ok_or_else(|| AppError::not_found(format!("Curriculum '{id}' not found")))?;
    let view = browse(&curriculum, &path).map_err(|err| AppError::not_found(err.to_string()))?;
    Ok(ok(view).into_response())
}
