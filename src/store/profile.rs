use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::StoreError;
use crate::tutor::mastery::record_in_profile;
use crate::tutor::types::{InteractionReport, LearningPreferences, SkillEntry, SkillProfile};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub learning_preferences: Option<LearningPreferences>,
    #[serde(default)]
    pub skill_profile: SkillProfile,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Persistence for per-student preferences and skill entries.
///
/// `record_interaction` has a read-modify-write default that is not atomic. Stores that
/// can serialize updates per student should override it.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns an empty profile when the student has none.
    async fn load(&self, student_id: &str) -> Result<StudentProfile, StoreError>;

    async fn save_preferences(
        &self,
        student_id: &str,
        preferences: LearningPreferences,
    ) -> Result<StudentProfile, StoreError>;

    async fn save_skill_profile(
        &self,
        student_id: &str,
        skill_profile: SkillProfile,
    ) -> Result<StudentProfile, StoreError>;

    async fn record_interaction(
        &self,
        student_id: &str,
        report: &InteractionReport,
        at: DateTime<Utc>,
    ) -> Result<SkillEntry, StoreError> {
        let mut skills = self.load(student_id).await?.skill_profile;
        let entry = record_in_profile(&mut skills, report, at);
        self.save_skill_profile(student_id, skills).await?;
        Ok(entry)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, StudentProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }
}

fn validate_student_id(student_id: &str) -> Result<(), StoreError> {
    if student_id.trim().is_empty() {
        return Err(StoreError::InvalidKey("student id is empty".to_string()));
    }
    Ok(())
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, student_id: &str) -> Result<StudentProfile, StoreError> {
        validate_student_id(student_id)?;
        Ok(self.profiles.read().get(student_id).cloned().unwrap_or_default())
    }

    async fn save_preferences(
        &self,
        student_id: &str,
        preferences: LearningPreferences,
    ) -> Result<StudentProfile, StoreError> {
        validate_student_id(student_id)?;
        let mut guard = self.profiles.write();
        let profile = guard.entry(student_id.to_string()).or_default();
        profile.learning_preferences = Some(preferences);
        profile.updated_at = Some(Utc::now());
        Ok(profile.clone())
    }

    async fn save_skill_profile(
        &self,
        student_id: &str,
        skill_profile: SkillProfile,
    ) -> Result<StudentProfile, StoreError> {
        validate_student_id(student_id)?;
        let mut guard = self.profiles.write();
        let profile = guard.entry(student_id.to_string()).or_default();
        profile.skill_profile = skill_profile;
        profile.updated_at = Some(Utc::now());
        Ok(profile.clone())
    }

    async fn record_interaction(
        &self,
        student_id: &str,
        report: &InteractionReport,
        at: DateTime<Utc>,
    ) -> Result<SkillEntry, StoreError> {
        validate_student_id(student_id)?;
        // single write lock covers the read, transition and write-back
        let mut guard = self.profiles.write();
        let profile = guard.entry(student_id.to_string()).or_default();
        let entry = record_in_profile(&mut profile.skill_profile, report, at);
        profile.updated_at = Some(at);
        Ok(entry)
    }
}
