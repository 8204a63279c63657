use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonSpec {
    pub lesson_id: String,
    pub name: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Academic,
    Simplified,
    Humorous,
    /// Any style name outside the known set; prompts fall back to generic wording.
    #[serde(other)]
    Unrecognized,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Academic => "academic",
            Self::Simplified => "simplified",
            Self::Humorous => "humorous",
            Self::Unrecognized => "engaging",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "academic" => Some(Self::Academic),
            "simplified" => Some(Self::Simplified),
            "humorous" => Some(Self::Humorous),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorPersona {
    pub name: String,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPreferences {
    pub style: LearningStyle,
    pub tutor_persona: TutorPersona,
}

impl Default for LearningPreferences {
    fn default() -> Self {
        Self {
            style: LearningStyle::Simplified,
            tutor_persona: TutorPersona {
                name: "Professor Ahmed".to_string(),
                gender: Gender::Male,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLesson {
    pub lesson_id: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub estimated_duration: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "multiple-choice")]
    MultipleChoice,
    #[serde(rename = "short-answer")]
    ShortAnswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::ShortAnswer => "short-answer",
        }
    }

    /// Matches the leading token, so `Short answer (one sentence)` is short-answer.
    /// Spaces and underscores count as hyphens; case is ignored.
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();
        [Self::MultipleChoice, Self::ShortAnswer]
            .into_iter()
            .find(|kind| normalized.starts_with(kind.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub const HIGH_THRESHOLD: f64 = 0.7;
    pub const MEDIUM_THRESHOLD: f64 = 0.4;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Self::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionAction {
    LessonView,
    CorrectAnswer,
    IncorrectAnswer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub timestamp: DateTime<Utc>,
    pub action: InteractionAction,
    pub mastery_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub mastery_score: f64,
    pub confidence: Confidence,
    #[serde(default)]
    pub last_attempt: Option<DateTime<Utc>>,
    #[serde(default)]
    pub interaction_history: VecDeque<InteractionRecord>,
}

impl Default for SkillEntry {
    fn default() -> Self {
        Self {
            mastery_score: 0.0,
            confidence: Confidence::Low,
            last_attempt: None,
            interaction_history: VecDeque::new(),
        }
    }
}

/// Per-student mastery state keyed by lesson id.
pub type SkillProfile = HashMap<String, SkillEntry>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionReport {
    pub lesson_id: String,
    #[serde(default)]
    pub is_correct: Option<bool>,
    #[serde(default, rename = "masteryScore")]
    pub mastery_score_override: Option<f64>,
    #[serde(default, rename = "confidence")]
    pub confidence_override: Option<Confidence>,
}

impl InteractionReport {
    pub fn viewed(lesson_id: impl Into<String>) -> Self {
        Self {
            lesson_id: lesson_id.into(),
            is_correct: None,
            mastery_score_override: None,
            confidence_override: None,
        }
    }

    pub fn answered(lesson_id: impl Into<String>, is_correct: bool) -> Self {
        Self {
            is_correct: Some(is_correct),
            ..Self::viewed(lesson_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_style_deserializes_to_unrecognized() {
        let style: LearningStyle = serde_json::from_str("\"socratic\"").unwrap();
        assert_eq!(style, LearningStyle::Unrecognized);
        let style: LearningStyle = serde_json::from_str("\"academic\"").unwrap();
        assert_eq!(style, LearningStyle::Academic);
    }

    #[test]
    fn test_default_preferences() {
        let prefs = LearningPreferences::default();
        assert_eq!(prefs.style, LearningStyle::Simplified);
        assert_eq!(prefs.tutor_persona.name, "Professor Ahmed");
        assert_eq!(prefs.tutor_persona.gender, Gender::Male);
    }

    #[test]
    fn test_question_type_wire_names() {
        let json = serde_json::to_value(QuestionType::MultipleChoice).unwrap();
        assert_eq!(json, "multiple-choice");
        assert_eq!(QuestionType::from_str("Short Answer"), Some(QuestionType::ShortAnswer));
        assert_eq!(QuestionType::from_str("essay"), None);
        assert_eq!(QuestionType::from_str("short_answer question"), Some(QuestionType::ShortAnswer));
    }

    #[test]
    fn test_short_answer_omits_options_field() {
        let question = GeneratedQuestion {
            question: "Define osmosis.".into(),
            question_type: QuestionType::ShortAnswer,
            options: None,
            correct_answer: "Diffusion of water across a membrane".into(),
            explanation: String::new(),
        };
        let json = serde_json::to_value(&question).unwrap();
        assert!(json.get("options").is_none());
        assert_eq!(json["type"], "short-answer");
        assert_eq!(json["correctAnswer"], "Diffusion of water across a membrane");
    }

    #[test]
    fn test_interaction_report_wire_format() {
        let report: InteractionReport = serde_json::from_str(
            r#"{"lessonId":"bio-1","masteryScore":0.4,"confidence":"high"}"#,
        )
        .unwrap();
        assert_eq!(report.lesson_id, "bio-1");
        assert_eq!(report.is_correct, None);
        assert_eq!(report.mastery_score_override, Some(0.4));
        assert_eq!(report.confidence_override, Some(Confidence::High));
    }

    #[test]
    fn test_skill_entry_round_trips_action_tags() {
        let mut entry = SkillEntry::default();
        entry.interaction_history.push_back(InteractionRecord {
            timestamp: Utc::now(),
            action: InteractionAction::CorrectAnswer,
            mastery_score: 0.1,
        });
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["interactionHistory"][0]["action"], "correct_answer");
        assert_eq!(json["confidence"], "low");
    }
}
