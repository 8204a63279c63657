//! Per-lesson mastery transitions.
//!
//! A [`SkillEntry`] only changes through [`apply_interaction`]. The transition is pure: the
//! caller supplies the prior entry and the event time and persists the result.

use chrono::{DateTime, Utc};

use super::types::{
    Confidence, Difficulty, InteractionAction, InteractionRecord, InteractionReport, SkillEntry,
    SkillProfile,
};

pub const CORRECT_STEP: f64 = 0.10;
pub const INCORRECT_STEP: f64 = 0.05;
pub const MAX_HISTORY: usize = 10;

const STRUGGLING_THRESHOLD: f64 = 0.3;
const PROFICIENT_THRESHOLD: f64 = 0.8;

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

fn next_score(current: f64, report: &InteractionReport) -> (f64, InteractionAction) {
    match (report.is_correct, report.mastery_score_override) {
        (Some(true), _) => ((current + CORRECT_STEP).min(1.0), InteractionAction::CorrectAnswer),
        (Some(false), _) => ((current - INCORRECT_STEP).max(0.0), InteractionAction::IncorrectAnswer),
        (None, Some(value)) if value.is_finite() => (clamp_score(value), InteractionAction::LessonView),
        (None, _) => (current, InteractionAction::LessonView),
    }
}

pub fn apply_interaction(
    prior: Option<&SkillEntry>,
    report: &InteractionReport,
    at: DateTime<Utc>,
) -> SkillEntry {
    let mut entry = prior.cloned().unwrap_or_default();
    let current = clamp_score(entry.mastery_score);

    let (score, action) = next_score(current, report);
    entry.mastery_score = score;
    entry.confidence = report
        .confidence_override
        .unwrap_or_else(|| Confidence::from_score(score));
    entry.last_attempt = Some(at);

    entry.interaction_history.push_back(InteractionRecord {
        timestamp: at,
        action,
        mastery_score: score,
    });
    while entry.interaction_history.len() > MAX_HISTORY {
        entry.interaction_history.pop_front();
    }

    entry
}

/// Applies `report` to the matching entry of `profile` and returns the new entry.
/// Entries for other lessons are left untouched.
pub fn record_in_profile(
    profile: &mut SkillProfile,
    report: &InteractionReport,
    at: DateTime<Utc>,
) -> SkillEntry {
    let entry = apply_interaction(profile.get(&report.lesson_id), report, at);
    *profile = merge_skill_entry(std::mem::take(profile), &report.lesson_id, entry.clone());
    entry
}

/// Replaces the entry for `lesson_id`, keeping every other lesson.
pub fn merge_skill_entry(mut profile: SkillProfile, lesson_id: &str, entry: SkillEntry) -> SkillProfile {
    profile.insert(lesson_id.to_string(), entry);
    profile
}

pub fn mastery_for(profile: &SkillProfile, lesson_id: &str) -> f64 {
    profile
        .get(lesson_id)
        .map(|entry| clamp_score(entry.mastery_score))
        .unwrap_or(0.0)
}

/// One-step difficulty clamp based on the current score only.
pub fn adapt_difficulty(requested: Difficulty, mastery_score: f64) -> Difficulty {
    match requested {
        Difficulty::Hard if mastery_score < STRUGGLING_THRESHOLD => Difficulty::Medium,
        Difficulty::Easy if mastery_score > PROFICIENT_THRESHOLD => Difficulty::Medium,
        other => other,
    }
}
