use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::json_body;
use super::lessons::{locate_lesson, LessonRequest};
use crate::response::{ok, AppError};
use crate::state::AppState;
use crate::tutor::mastery::mastery_for;
use crate::tutor::question_parser::DroppedBlock;
use crate::tutor::{adapt_difficulty, Difficulty, GeneratedQuestion};

const DEFAULT_COUNT: usize = 3;
const MAX_COUNT: usize = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct QuestionsRequest {
    #[serde(flatten)]
    lesson: LessonRequest,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionsResponse {
    questions: Vec<GeneratedQuestion>,
    difficulty: Difficulty,
    requested_difficulty: Difficulty,
    student_mastery: f64,
    dropped: Vec<DroppedBlock>,
    padded: usize,
    generated_at: String,
}

fn parse_difficulty(raw: Option<&str>) -> Result<Difficulty, AppError> {
    match raw {
        None => Ok(Difficulty::default()),
        Some(value) => Difficulty::from_str(value).ok_or_else(|| {
            AppError::validation(format!("difficulty must be easy, medium or hard, got '{value}'"))
        }),
    }
}

fn validate_count(count: Option<usize>) -> Result<usize, AppError> {
    let count = count.unwrap_or(DEFAULT_COUNT);
    if !(1..=MAX_COUNT).contains(&count) {
        return Err(AppError::validation(format!(
            "count must be between 1 and {MAX_COUNT}"
        )));
    }
    Ok(count)
}

pub(super) async fn generate_questions(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    body: Result<Json<QuestionsRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let request = json_body(body)?;
    let requested = parse_difficulty(request.difficulty.as_deref())?;
    let count = validate_count(request.count)?;
    let located = locate_lesson(&state, &request.lesson)?;

    let profile = state.profiles().load(&student_id).await?;
    let mastery = mastery_for(&profile.skill_profile, &located.spec.lesson_id);
    let difficulty = adapt_difficulty(requested, mastery);
    if difficulty != requested {
        debug!(
            %student_id,
            lesson_id = %located.spec.lesson_id,
            mastery,
            requested = requested.as_str(),
            adapted = difficulty.as_str(),
            "difficulty adapted to mastery"
        );
    }

    let batch = state
        .pipeline()
        .generate_questions(
            &located.spec,
            difficulty,
            count,
            profile.learning_preferences.as_ref(),
        )
        .await?;

    let response = QuestionsResponse {
        questions: batch.questions,
        difficulty: batch.difficulty,
        requested_difficulty: requested,
        student_mastery: mastery,
        dropped: batch.dropped,
        padded: batch.padded,
        generated_at: chrono::Utc::now().to_rfc3339(),
    };
    Ok(ok(response).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_defaults_and_bounds() {
        assert_eq!(validate_count(None).unwrap(), 3);
        assert_eq!(validate_count(Some(10)).unwrap(), 10);
        assert!(validate_count(Some(0)).is_err());
        assert!(validate_count(Some(11)).is_err());
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!(parse_difficulty(None).unwrap(), Difficulty::Medium);
        assert_eq!(parse_difficulty(Some("HARD")).unwrap(), Difficulty::Hard);
        assert!(parse_difficulty(Some("extreme")).is_err());
    }
}
