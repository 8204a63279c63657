use super::types::{Difficulty, LearningPreferences, LearningStyle, LessonSpec};

/// Marker the question prompt asks the model to put in front of every question.
/// The question parser splits on the same marker.
pub const QUESTION_MARKER_PREFIX: &str = "**Question ";

pub fn style_instructions(style: LearningStyle) -> &'static str {
    match style {
        LearningStyle::Academic => {
            "Use formal academic language with precise terminology. Include theoretical background and detailed explanations. Reference established principles and methodologies."
        }
        LearningStyle::Simplified => {
            "Use clear, simple language that is easy to understand. Break down complex concepts into smaller parts. Use everyday analogies and practical examples to illustrate points."
        }
        LearningStyle::Humorous => {
            "Make the content engaging and fun while maintaining educational value. Use appropriate humor, interesting analogies, and relatable examples. Keep the tone light but informative."
        }
        LearningStyle::Unrecognized => {
            "Use clear, engaging language appropriate for high school students."
        }
    }
}

pub fn difficulty_instructions(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => {
            "Create basic questions that test fundamental understanding and recall of key concepts. Focus on definitions and simple applications."
        }
        Difficulty::Medium => {
            "Create questions that require understanding and application of concepts. Include some analysis and problem-solving elements."
        }
        Difficulty::Hard => {
            "Create challenging questions that require synthesis, analysis, and critical thinking. Include complex problem-solving and application to new situations."
        }
    }
}

pub fn build_lesson_prompt(lesson: &LessonSpec, preferences: &LearningPreferences) -> String {
    let persona = &preferences.tutor_persona;
    let objectives = lesson
        .objectives
        .iter()
        .map(|obj| format!("- {obj}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are {name}, an experienced {gender} educator. Generate a comprehensive lesson on the following topic:

**Lesson Topic**: {topic}

**Learning Objectives**:
{objectives}

**Key Terms**: {keywords}

**Teaching Style**: {style_instructions}

**Requirements**:
1. Create engaging, educational content that covers all learning objectives
2. Use the specified teaching style throughout
3. Include practical examples and analogies where appropriate
4. Structure the content with clear headings and sections
5. End with a brief summary of key points

**Format your response as follows**:

# [Lesson Title]

## Introduction
[Engaging introduction that hooks the student]

## Main Content
[Detailed explanation covering all objectives, broken into logical sections with subheadings]

## Key Points
- [Key point 1]
- [Key point 2]
- [Key point 3]
[Continue as needed]

## Summary
[Brief summary reinforcing the main concepts]

Please ensure the content is appropriate for high school level students and maintains the {style} style throughout."#,
        name = persona.name,
        gender = persona.gender.as_str(),
        topic = lesson.name,
        objectives = objectives,
        keywords = lesson.keywords.join(", "),
        style_instructions = style_instructions(preferences.style),
        style = preferences.style.as_str(),
    )
}

pub fn build_questions_prompt(
    lesson: &LessonSpec,
    difficulty: Difficulty,
    count: usize,
    preferences: &LearningPreferences,
) -> String {
    let persona = &preferences.tutor_persona;

    format!(
        r#"You are {name}, an experienced {gender} educator. Generate {count} practice questions for the following lesson:

**Lesson Topic**: {topic}
**Learning Objectives**: {objectives}
**Key Terms**: {keywords}
**Difficulty Level**: {difficulty}

**Instructions**:
{difficulty_instructions}

**Tone**: {style_instructions}

**Question Types**:
- Mix of multiple-choice and short-answer questions
- Each multiple-choice question should have 4 options (A, B, C, D)
- Include clear explanations for all answers

**Format your response as follows**:

{marker}1**
Type: multiple-choice
Question: [Your question here]
A) [Option A]
B) [Option B]
C) [Option C]
D) [Option D]
Correct Answer: [Letter]
Explanation: [Detailed explanation of why this answer is correct and others are wrong]

{marker}2**
Type: short-answer
Question: [Your question here]
Correct Answer: [Expected answer]
Explanation: [Explanation of the concept and what makes a good answer]

[Continue for all {count} questions]

Ensure questions test understanding of the learning objectives and use appropriate terminology."#,
        name = persona.name,
        gender = persona.gender.as_str(),
        count = count,
        topic = lesson.name,
        objectives = lesson.objectives.join(", "),
        keywords = lesson.keywords.join(", "),
        difficulty = difficulty.as_str(),
        difficulty_instructions = difficulty_instructions(difficulty),
        style_instructions = style_instructions(preferences.style),
        marker = QUESTION_MARKER_PREFIX,
    )
}
