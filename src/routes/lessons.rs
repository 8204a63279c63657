use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::tutor::curriculum::{find_lesson, LessonLocator};
use crate::tutor::{GeneratedLesson, LessonSpec};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LessonRequest {
    pub curriculum_id: String,
    #[serde(flatten)]
    pub locator: LessonLocator,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LessonResponse {
    lesson: GeneratedLesson,
    subject: String,
    generated_at: String,
}

pub(super) struct LocatedLesson {
    pub spec: LessonSpec,
    pub subject: String,
}

pub(super) fn locate_lesson(state: &AppState, request: &LessonRequest) -> Result<LocatedLesson, AppError> {
    if request.locator.lesson_id.trim().is_empty() {
        return Err(AppError::validation("lessonId is required"));
    }

    let curriculum = state.curricula().get(&request.curriculum_id).ok_or_else(|| {
        AppError::not_found(format!("Curriculum '{}' not found", request.curriculum_id))
    })?;
    let found = find_lesson(&curriculum, &request.locator).ok_or_else(|| {
        AppError::not_found(format!("Lesson '{}' not found", request.locator.lesson_id))
    })?;

    Ok(LocatedLesson {
        spec: found.lesson.spec.clone(),
        subject: found.subject.name.clone(),
    })
}

pub(super) async fn generate_lesson(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    body: Result<Json<LessonRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = json_body(body)?;
    let located = locate_lesson(&state, &request)?;
    let profile = state.profiles().load(&student_id).await?;

    let lesson = state
        .pipeline()
        .generate_lesson(&located.spec, profile.learning_preferences.as_ref())
        .await?;

    let response = LessonResponse {
        lesson,
        subject: located.subject,
        generated_at: chrono::Utc::now().to_rfc3339(),
    };
    Ok(ok(response).into_response())
}
