use super::types::{GeneratedQuestion, QuestionType};

pub fn fallback_question(index: usize) -> GeneratedQuestion {
    GeneratedQuestion {
        question: format!("What is an important concept from this lesson? (Question {index})"),
        question_type: QuestionType::ShortAnswer,
        options: None,
        correct_answer:
            "Please refer to the lesson content for key concepts and their explanations.".to_string(),
        explanation: "This is a general question about the lesson content. Review the main points covered in the lesson to provide a comprehensive answer.".to_string(),
    }
}

/// Pads with fallback questions or truncates so the result has exactly `count` items.
/// Parsed questions keep their order; fallbacks are numbered by their 1-based position.
pub fn pad_questions(mut questions: Vec<GeneratedQuestion>, count: usize) -> Vec<GeneratedQuestion> {
    questions.truncate(count);
    while questions.len() < count {
        let index = questions.len() + 1;
        questions.push(fallback_question(index));
    }
    questions
}
