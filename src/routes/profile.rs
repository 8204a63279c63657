use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::json_body;
use crate::response::{ok, ok_with_message, AppError};
use crate::state::AppState;
use crate::tutor::mastery::MAX_HISTORY;
use crate::tutor::{InteractionReport, LearningPreferences, LearningStyle, SkillEntry, SkillProfile};

/// Either part may be sent alone; at least one is required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateProfileDto {
    #[serde(default)]
    learning_preferences: Option<LearningPreferences>,
    #[serde(default)]
    skill_profile: Option<SkillProfile>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SkillResponse {
    lesson_id: String,
    skill: SkillEntry,
}

/// A student without stored preferences gets the configured defaults, which are saved.
pub(super) async fn get_profile(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Response, AppError> {
    let profiles = state.profiles();
    let mut profile = profiles.load(&student_id).await?;
    if profile.learning_preferences.is_none() {
        let defaults = state.pipeline().config().default_preferences.clone();
        profile = profiles.save_preferences(&student_id, defaults).await?;
        info!(%student_id, "default learning preferences created");
    }
    Ok(ok(profile).into_response())
}

fn validate_preferences(mut preferences: LearningPreferences) -> Result<LearningPreferences, AppError> {
    if preferences.style == LearningStyle::Unrecognized {
        return Err(AppError::validation("Invalid learning style"));
    }
    let name = preferences.tutor_persona.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("tutorPersona.name must not be empty"));
    }
    preferences.tutor_persona.name = name;
    Ok(preferences)
}

fn validate_skill_profile(mut skills: SkillProfile) -> Result<SkillProfile, AppError> {
    if skills.keys().any(|lesson_id| lesson_id.trim().is_empty()) {
        return Err(AppError::validation("skillProfile keys must be lesson ids"));
    }
    for (lesson_id, entry) in skills.iter_mut() {
        if !(0.0..=1.0).contains(&entry.mastery_score) {
            return Err(AppError::validation(format!(
                "masteryScore for '{lesson_id}' must be between 0 and 1"
            )));
        }
        let excess = entry.interaction_history.len().saturating_sub(MAX_HISTORY);
        entry.interaction_history.drain(..excess);
    }
    Ok(skills)
}

pub(super) async fn update_profile(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    body: Result<Json<UpdateProfileDto>, JsonRejection>,
) -> Result<Response, AppError> {
    let dto = json_body(body)?;
    if dto.learning_preferences.is_none() && dto.skill_profile.is_none() {
        return Err(AppError::validation(
            "learningPreferences or skillProfile is required",
        ));
    }

    // validate both parts before writing either
    let preferences = dto.learning_preferences.map(validate_preferences).transpose()?;
    let skills = dto.skill_profile.map(validate_skill_profile).transpose()?;

    let profiles = state.profiles();
    let mut profile = None;
    if let Some(preferences) = preferences {
        profile = Some(profiles.save_preferences(&student_id, preferences).await?);
    }
    if let Some(skills) = skills {
        profile = Some(profiles.save_skill_profile(&student_id, skills).await?);
    }
    let profile = match profile {
        Some(profile) => profile,
        None => profiles.load(&student_id).await?,
    };

    Ok(ok_with_message(profile, "Profile updated successfully").into_response())
}

pub(super) async fn record_skill(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    body: Result<Json<InteractionReport>, JsonRejection>,
) -> Result<Response, AppError> {
    let report = json_body(body)?;
    if report.lesson_id.trim().is_empty() {
        return Err(AppError::validation("lessonId is required"));
    }

    let skill = state
        .profiles()
        .record_interaction(&student_id, &report, Utc::now())
        .await?;
    info!(
        %student_id,
        lesson_id = %report.lesson_id,
        mastery = skill.mastery_score,
        confidence = skill.confidence.as_str(),
        "skill recorded"
    );

    let response = SkillResponse {
        lesson_id: report.lesson_id,
        skill,
    };
    Ok(ok(response).into_response())
}
