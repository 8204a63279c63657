//! Question reply parsing.
//!
//! A reply is cut into blocks at every `**Question <n>**` marker, and each block is read
//! by a small line-oriented state machine. Blocks without a question or an answer are
//! dropped; the drop is reported in [`QuestionParse::dropped`] rather than as an error.

use serde::Serialize;
use tracing::debug;

use super::prompt::QUESTION_MARKER_PREFIX;
use super::types::{GeneratedQuestion, QuestionType};

const MAX_OPTIONS: usize = 4;
const OPTION_LETTERS: [char; MAX_OPTIONS] = ['A', 'B', 'C', 'D'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingField {
    Question,
    CorrectAnswer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedBlock {
    /// Zero-based position of the block in the reply.
    pub index: usize,
    pub missing: Vec<MissingField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionParse {
    pub questions: Vec<GeneratedQuestion>,
    pub dropped: Vec<DroppedBlock>,
}

/// Returns the length of a `**Question <digits>**` marker starting at `text`, if any.
fn marker_len(text: &str) -> Option<usize> {
    let rest = text.strip_prefix(QUESTION_MARKER_PREFIX)?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    rest[digits..].starts_with("**").then(|| QUESTION_MARKER_PREFIX.len() + digits + 2)
}

/// Splits a reply on question markers. Text before the first marker is discarded.
pub fn split_question_blocks(reply: &str) -> Vec<&str> {
    let mut markers: Vec<(usize, usize)> = Vec::new();
    let mut cursor = 0;
    while let Some(found) = reply[cursor..].find(QUESTION_MARKER_PREFIX) {
        let start = cursor + found;
        match marker_len(&reply[start..]) {
            Some(len) => {
                markers.push((start, start + len));
                cursor = start + len;
            }
            None => cursor = start + QUESTION_MARKER_PREFIX.len(),
        }
    }

    markers
        .iter()
        .enumerate()
        .map(|(i, &(_, body_start))| {
            let body_end = markers.get(i + 1).map_or(reply.len(), |&(next, _)| next);
            &reply[body_start..body_end]
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Preamble,
    Question,
    Option,
    CorrectAnswer,
    Explanation,
}

/// Strips a `label:` prefix, ignoring ASCII case. Returns the text after the colon.
fn strip_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let head = line.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    line[label.len()..].trim_start().strip_prefix(':')
}

fn option_marker(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let letter = chars.next()?;
    if !OPTION_LETTERS.contains(&letter) {
        return None;
    }
    chars.as_str().strip_prefix(')')
}

fn push_line(buffer: &mut String, text: &str) {
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(text);
}

#[derive(Default)]
struct BlockFields {
    question_type: Option<QuestionType>,
    question: String,
    options: Vec<String>,
    correct_answer: String,
    explanation: String,
}

/// Labels that may also start mid-line, e.g. `Question: Why? Correct Answer: Because`.
const INLINE_LABELS: [&str; 2] = ["Correct Answer", "Explanation"];

/// Byte offset of the first label from `labels` that appears after the start of `line`
/// and is followed by a colon.
fn inline_label_start(line: &str, labels: &[&str]) -> Option<usize> {
    let lower = line.to_ascii_lowercase();
    let lead = line.len() - line.trim_start().len();
    labels
        .iter()
        .filter_map(|label| {
            let needle = label.to_ascii_lowercase();
            lower
                .match_indices(needle.as_str())
                .map(|(at, _)| at)
                .find(|&at| at > lead && strip_label(&line[at..], label).is_some())
        })
        .min()
}

/// Splits `line` before an inline label that can still change the current field.
fn split_inline<'a>(line: &'a str, field: Field) -> (&'a str, Option<&'a str>) {
    let labels: &[&str] = match field {
        Field::Explanation => &[],
        Field::CorrectAnswer => &INLINE_LABELS[1..],
        _ => &INLINE_LABELS,
    };
    match inline_label_start(line, labels) {
        Some(at) => (&line[..at], Some(&line[at..])),
        None => (line, None),
    }
}

fn scan_line(fields: &mut BlockFields, field: Field, raw: &str) -> Field {
    let line = raw.trim();

    if field == Field::Explanation {
        push_line(&mut fields.explanation, raw.trim_end());
        return field;
    }
    if let Some(rest) = strip_label(line, "Explanation") {
        push_line(&mut fields.explanation, rest.trim());
        return Field::Explanation;
    }
    if field == Field::CorrectAnswer {
        push_line(&mut fields.correct_answer, line);
        return field;
    }
    if let Some(rest) = strip_label(line, "Correct Answer") {
        push_line(&mut fields.correct_answer, rest.trim());
        return Field::CorrectAnswer;
    }
    if let Some(rest) = strip_label(line, "Type") {
        if fields.question_type.is_none() {
            fields.question_type = QuestionType::from_str(rest);
        }
        return field;
    }
    if let Some(rest) = strip_label(line, "Question") {
        push_line(&mut fields.question, rest.trim());
        return Field::Question;
    }
    if let Some(rest) = option_marker(line) {
        fields.options.push(rest.trim().to_string());
        return Field::Option;
    }

    match field {
        Field::Question => push_line(&mut fields.question, line),
        Field::Option => {
            if let Some(last) = fields.options.last_mut() {
                push_line(last, line);
            }
        }
        Field::Preamble | Field::CorrectAnswer | Field::Explanation => {}
    }
    field
}

fn scan_block(block: &str) -> BlockFields {
    let mut fields = BlockFields::default();
    let mut field = Field::Preamble;

    for raw in block.lines() {
        let mut pending = Some(raw);
        while let Some(segment) = pending.take() {
            let (current, rest) = split_inline(segment, field);
            field = scan_line(&mut fields, field, current);
            pending = rest;
        }
    }

    fields
}

/// Converts one question block, or reports which required fields were missing.
pub fn parse_question_block(block: &str) -> Result<GeneratedQuestion, Vec<MissingField>> {
    let fields = scan_block(block);
    let question = fields.question.trim().to_string();
    let correct_answer = fields.correct_answer.trim().to_string();

    let mut missing = Vec::new();
    if question.is_empty() {
        missing.push(MissingField::Question);
    }
    if correct_answer.is_empty() {
        missing.push(MissingField::CorrectAnswer);
    }
    if !missing.is_empty() {
        return Err(missing);
    }

    let question_type = fields.question_type.unwrap_or(QuestionType::MultipleChoice);
    let options = match question_type {
        QuestionType::MultipleChoice => Some(
            fields
                .options
                .into_iter()
                .map(|o| o.trim().to_string())
                .take(MAX_OPTIONS)
                .collect(),
        ),
        QuestionType::ShortAnswer => None,
    };

    Ok(GeneratedQuestion {
        question,
        question_type,
        options,
        correct_answer,
        explanation: fields.explanation.trim().to_string(),
    })
}

pub fn parse_questions(reply: &str) -> QuestionParse {
    let mut parsed = QuestionParse::default();

    for (index, block) in split_question_blocks(reply).into_iter().enumerate() {
        match parse_question_block(block) {
            Ok(question) => parsed.questions.push(question),
            Err(missing) => {
                debug!(block = index, ?missing, "dropping unparsable question block");
                parsed.dropped.push(DroppedBlock { index, missing });
            }
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "Here are your questions!\n\n**Question 1**\nType: multiple-choice\nQuestion: Which gas do plants absorb?\nA) Oxygen\nB) Carbon dioxide\nC) Nitrogen\nD) Helium\nCorrect Answer: B\nExplanation: Plants take in CO2\nfor photosynthesis.\n\n**Question 2**\nType: short-answer\nQuestion: Name the green pigment\nin leaves.\nCorrect Answer: Chlorophyll\nExplanation: It absorbs light.\n";

    #[test]
    fn test_parses_both_question_types() {
        let parsed = parse_questions(REPLY);
        assert!(parsed.dropped.is_empty());
        assert_eq!(parsed.questions.len(), 2);

        let mc = &parsed.questions[0];
        assert_eq!(mc.question_type, QuestionType::MultipleChoice);
        assert_eq!(mc.question, "Which gas do plants absorb?");
        assert_eq!(
            mc.options.as_deref(),
            Some(&["Oxygen".to_string(), "Carbon dioxide".into(), "Nitrogen".into(), "Helium".into()][..])
        );
        assert_eq!(mc.correct_answer, "B");
        assert_eq!(mc.explanation, "Plants take in CO2\nfor photosynthesis.");

        let sa = &parsed.questions[1];
        assert_eq!(sa.question_type, QuestionType::ShortAnswer);
        assert_eq!(sa.question, "Name the green pigment\nin leaves.");
        assert_eq!(sa.options, None);
        assert_eq!(sa.correct_answer, "Chlorophyll");
        assert_eq!(sa.explanation, "It absorbs light.");
    }

    #[test]
    fn test_preamble_is_discarded_and_no_marker_means_no_blocks() {
        assert!(split_question_blocks("Question: orphan\nCorrect Answer: x").is_empty());
        assert_eq!(split_question_blocks("intro **Question 7** body").len(), 1);
        assert_eq!(split_question_blocks("intro **Question 7** body")[0], " body");
    }

    #[test]
    fn test_malformed_markers_are_not_split_points() {
        let blocks = split_question_blocks("**Question A**\n**Question 3*\n**Question 12**tail");
        assert_eq!(blocks, vec!["tail"]);
    }

    #[test]
    fn test_missing_correct_answer_drops_block() {
        let reply = "**Question 1**\nQuestion: What is 2+2?\nExplanation: arithmetic\n**Question 2**\nQuestion: What is 3+3?\nCorrect Answer: 6\n";
        let parsed = parse_questions(reply);
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(parsed.questions[0].correct_answer, "6");
        assert_eq!(
            parsed.dropped,
            vec![DroppedBlock { index: 0, missing: vec![MissingField::CorrectAnswer] }]
        );
    }

    #[test]
    fn test_empty_block_reports_both_fields() {
        let missing = parse_question_block("\n\n").unwrap_err();
        assert_eq!(missing, vec![MissingField::Question, MissingField::CorrectAnswer]);
    }

    #[test]
    fn test_missing_type_defaults_to_multiple_choice_without_options() {
        let question = parse_question_block("Question: Why is the sky blue?\nCorrect Answer: Rayleigh scattering").unwrap();
        assert_eq!(question.question_type, QuestionType::MultipleChoice);
        assert_eq!(question.options, Some(vec![]));
        assert_eq!(question.explanation, "");
    }

    #[test]
    fn test_unrecognized_type_defaults_to_multiple_choice() {
        let question = parse_question_block("Type: essay\nQuestion: Discuss.\nA) yes\nCorrect Answer: A").unwrap();
        assert_eq!(question.question_type, QuestionType::MultipleChoice);
        assert_eq!(question.options, Some(vec!["yes".to_string()]));
    }

    #[test]
    fn test_options_are_capped_at_four() {
        let block = "Question: Pick\nA) 1\nB) 2\nC) 3\nD) 4\nA) 5\nCorrect Answer: A";
        let question = parse_question_block(block).unwrap();
        assert_eq!(question.options.map(|o| o.len()), Some(4));
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let question = parse_question_block("type: Short-Answer\nquestion: Capital of Egypt?\ncorrect answer : Cairo\nexplanation: Nile delta").unwrap();
        assert_eq!(question.question_type, QuestionType::ShortAnswer);
        assert_eq!(question.correct_answer, "Cairo");
        assert_eq!(question.explanation, "Nile delta");
    }

    #[test]
    fn test_explanation_keeps_option_like_lines() {
        let question = parse_question_block("Question: Q\nCorrect Answer: C\nExplanation: Because\nA) is wrong").unwrap();
        assert_eq!(question.options, Some(vec![]));
        assert_eq!(question.explanation, "Because\nA) is wrong");
    }

    #[test]
    fn test_inline_answer_ends_the_question() {
        let parsed = parse_questions(
            "**Question 1**\nType: short-answer\nQuestion: What is inertia? Correct Answer: resistance to change\nExplanation: x",
        );
        assert!(parsed.dropped.is_empty());
        let question = &parsed.questions[0];
        assert_eq!(question.question_type, QuestionType::ShortAnswer);
        assert_eq!(question.question, "What is inertia?");
        assert_eq!(question.correct_answer, "resistance to change");
        assert_eq!(question.explanation, "x");
    }

    #[test]
    fn test_inline_explanation_ends_the_answer() {
        let question =
            parse_question_block("Question: 2+2? correct answer : 4 Explanation: basic sums. Correct Answer: stays here")
                .unwrap();
        assert_eq!(question.question, "2+2?");
        assert_eq!(question.correct_answer, "4");
        assert_eq!(question.explanation, "basic sums. Correct Answer: stays here");
    }

    #[test]
    fn test_label_words_without_colon_stay_in_the_question() {
        let question = parse_question_block("Question: Give an explanation of the correct answer\nCorrect Answer: ok").unwrap();
        assert_eq!(question.question, "Give an explanation of the correct answer");
    }

    #[test]
    fn test_type_matches_on_leading_token() {
        let question = parse_question_block("Type: short-answer question\nQuestion: Name it\nCorrect Answer: Cairo").unwrap();
        assert_eq!(question.question_type, QuestionType::ShortAnswer);
        assert_eq!(question.options, None);

        let question = parse_question_block("Type: Multiple choice (pick one)\nQuestion: Pick\nA) x\nCorrect Answer: A").unwrap();
        assert_eq!(question.question_type, QuestionType::MultipleChoice);
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_questions(REPLY), parse_questions(REPLY));
    }
}
