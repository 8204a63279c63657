use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::generation::{GenerationClient, GenerationError, GenerationRequest};
use super::lesson_parser::parse_lesson;
use super::padding::pad_questions;
use super::prompt::{build_lesson_prompt, build_questions_prompt};
use super::question_parser::{parse_questions, DroppedBlock};
use super::types::{
    Difficulty, Gender, GeneratedLesson, GeneratedQuestion, LearningPreferences, LearningStyle,
    LessonSpec, TutorPersona,
};

const LESSON_MAX_TOKENS: u32 = 4000;
const LESSON_TEMPERATURE: f32 = 0.7;
const QUESTIONS_MAX_TOKENS: u32 = 3000;
const QUESTIONS_TEMPERATURE: f32 = 0.8;

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Used whenever a caller has no stored or supplied preferences.
    pub default_preferences: LearningPreferences,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let fallback = LearningPreferences::default();
        let style = env_string("TUTOR_DEFAULT_STYLE")
            .and_then(|v| LearningStyle::from_str(&v))
            .unwrap_or(fallback.style);
        let name = env_string("TUTOR_PERSONA_NAME").unwrap_or(fallback.tutor_persona.name);
        let gender = env_string("TUTOR_PERSONA_GENDER")
            .and_then(|v| Gender::from_str(&v))
            .unwrap_or(fallback.tutor_persona.gender);

        Self {
            default_preferences: LearningPreferences {
                style,
                tutor_persona: TutorPersona { name, gender },
            },
        }
    }

    pub fn resolve_preferences<'a>(
        &'a self,
        preferences: Option<&'a LearningPreferences>,
    ) -> &'a LearningPreferences {
        preferences.unwrap_or(&self.default_preferences)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBatch {
    pub questions: Vec<GeneratedQuestion>,
    pub difficulty: Difficulty,
    /// Blocks in the reply that could not be turned into questions.
    pub dropped: Vec<DroppedBlock>,
    /// Number of fallback questions appended to reach the requested count.
    pub padded: usize,
}

#[derive(Clone)]
pub struct TutorPipeline {
    client: Arc<dyn GenerationClient>,
    config: PipelineConfig,
}

impl TutorPipeline {
    pub fn new(client: Arc<dyn GenerationClient>, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn client(&self) -> Arc<dyn GenerationClient> {
        Arc::clone(&self.client)
    }

    async fn fetch_reply(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let reply = self.client.generate(&request).await?;
        if reply.trim().is_empty() {
            return Err(GenerationError::EmptyReply);
        }
        Ok(reply)
    }

    pub async fn generate_lesson(
        &self,
        lesson: &LessonSpec,
        preferences: Option<&LearningPreferences>,
    ) -> Result<GeneratedLesson, GenerationError> {
        let preferences = self.config.resolve_preferences(preferences);
        let prompt = build_lesson_prompt(lesson, preferences);
        let request = GenerationRequest::new(prompt)
            .with_max_tokens(LESSON_MAX_TOKENS)
            .with_temperature(LESSON_TEMPERATURE);

        let reply = self.fetch_reply(request).await.map_err(|err| {
            warn!(lesson_id = %lesson.lesson_id, error = %err, "lesson generation failed");
            err
        })?;

        let generated = parse_lesson(&reply, lesson);
        info!(
            lesson_id = %lesson.lesson_id,
            key_points = generated.key_points.len(),
            duration_min = generated.estimated_duration,
            "lesson generated"
        );
        Ok(generated)
    }

    pub async fn generate_questions(
        &self,
        lesson: &LessonSpec,
        difficulty: Difficulty,
        count: usize,
        preferences: Option<&LearningPreferences>,
    ) -> Result<QuestionBatch, GenerationError> {
        let preferences = self.config.resolve_preferences(preferences);
        let prompt = build_questions_prompt(lesson, difficulty, count, preferences);
        let request = GenerationRequest::new(prompt)
            .with_max_tokens(QUESTIONS_MAX_TOKENS)
            .with_temperature(QUESTIONS_TEMPERATURE);

        let reply = self.fetch_reply(request).await.map_err(|err| {
            warn!(lesson_id = %lesson.lesson_id, error = %err, "question generation failed");
            err
        })?;

        let parsed = parse_questions(&reply);
        let padded = count.saturating_sub(parsed.questions.len());
        if !parsed.dropped.is_empty() || padded > 0 {
            warn!(
                lesson_id = %lesson.lesson_id,
                parsed = parsed.questions.len(),
                dropped = parsed.dropped.len(),
                padded,
                "question reply did not match the requested count"
            );
        }

        Ok(QuestionBatch {
            questions: pad_questions(parsed.questions, count),
            difficulty,
            dropped: parsed.dropped,
            padded,
        })
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
