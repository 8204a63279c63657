//! Property-Based Tests for the generation pipeline
//!
//! Tests the following invariants:
//! - Parser totality: any reply text yields a lesson / question parse without panicking
//! - Block accounting: every question block is either parsed or reported as dropped
//! - Padding: the delivered question count always equals the requested count
//! - Mastery: scores stay in [0, 1], history is bounded and keeps the newest events
//! - Confidence: bands follow the 0.4 / 0.7 thresholds

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use tutor_backend_rust::tutor::lesson_parser::parse_lesson;
use tutor_backend_rust::tutor::mastery::{apply_interaction, MAX_HISTORY};
use tutor_backend_rust::tutor::padding::pad_questions;
use tutor_backend_rust::tutor::question_parser::{parse_questions, split_question_blocks};
use tutor_backend_rust::tutor::{Confidence, InteractionReport, LessonSpec, QuestionType};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn lesson_spec() -> LessonSpec {
    LessonSpec {
        lesson_id: "l1".to_string(),
        name: "Photosynthesis".to_string(),
        objectives: vec![],
        keywords: vec![],
    }
}

/// Reply-shaped text: mixes markdown headings, bullets, question markers and labels.
fn arb_reply() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        Just("# Title".to_string()),
        Just("## Key Points".to_string()),
        Just("## Summary".to_string()),
        Just("- bullet".to_string()),
        Just("**Question 1**".to_string()),
        Just("Type: short-answer".to_string()),
        Just("Type: multiple-choice".to_string()),
        Just("Question: why?".to_string()),
        Just("A) option".to_string()),
        Just("Correct Answer: A".to_string()),
        Just("Explanation: because".to_string()),
        Just(String::new()),
        "[ -~]{0,40}",
    ];
    prop::collection::vec(line, 0..40).prop_map(|lines| lines.join("\n"))
}

#[derive(Debug, Clone)]
enum Event {
    Correct,
    Incorrect,
    View,
    Override(f64),
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Correct),
        Just(Event::Incorrect),
        Just(Event::View),
        (-0.5f64..=1.5f64).prop_map(Event::Override),
    ]
}

fn report_for(event: &Event) -> InteractionReport {
    match event {
        Event::Correct => InteractionReport::answered("l1", true),
        Event::Incorrect => InteractionReport::answered("l1", false),
        Event::View => InteractionReport::viewed("l1"),
        Event::Override(score) => InteractionReport {
            mastery_score_override: Some(*score),
            ..InteractionReport::viewed("l1")
        },
    }
}

// ============================================================================
// Parsers
// ============================================================================

proptest! {
    #[test]
    fn prop_lesson_parse_is_total(reply in any::<String>()) {
        let lesson = parse_lesson(&reply, &lesson_spec());
        prop_assert_eq!(&lesson.content, &reply);
        prop_assert!(lesson.estimated_duration >= 5);
        prop_assert!(!lesson.title.is_empty());
    }

    #[test]
    fn prop_lesson_parse_is_deterministic(reply in arb_reply()) {
        let first = parse_lesson(&reply, &lesson_spec());
        let second = parse_lesson(&reply, &lesson_spec());
        prop_assert!(first.key_points.iter().all(|p| !p.trim().is_empty()));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_question_blocks_are_accounted_for(reply in arb_reply()) {
        let blocks = split_question_blocks(&reply).len();
        let parsed = parse_questions(&reply);
        prop_assert_eq!(parsed.questions.len() + parsed.dropped.len(), blocks);

        for question in &parsed.questions {
            match question.question_type {
                QuestionType::MultipleChoice => {
                    prop_assert!(question.options.as_ref().map_or(false, |o| o.len() <= 4));
                }
                QuestionType::ShortAnswer => prop_assert!(question.options.is_none()),
            }
        }
        prop_assert_eq!(parse_questions(&reply), parsed);
    }

    #[test]
    fn prop_question_parse_never_panics(reply in any::<String>()) {
        let _ = parse_questions(&reply);
    }

    #[test]
    fn prop_padding_meets_requested_count(reply in arb_reply(), count in 1usize..=10) {
        let parsed = parse_questions(&reply);
        let kept = parsed.questions.len().min(count);
        let padded = pad_questions(parsed.questions.clone(), count);

        prop_assert_eq!(padded.len(), count);
        prop_assert_eq!(&padded[..kept], &parsed.questions[..kept]);
        for (i, question) in padded.iter().enumerate().skip(kept) {
            let suffix = format!("(Question {})", i + 1);
            prop_assert!(question.question.ends_with(&suffix));
            prop_assert_eq!(question.question_type, QuestionType::ShortAnswer);
        }
    }
}

// ============================================================================
// Mastery
// ============================================================================

proptest! {
    #[test]
    fn prop_mastery_stays_bounded_and_history_keeps_newest(
        events in prop::collection::vec(arb_event(), 1..30)
    ) {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut entry = None;
        for (i, event) in events.iter().enumerate() {
            let at = start + Duration::minutes(i as i64);
            let next = apply_interaction(entry.as_ref(), &report_for(event), at);
            prop_assert!((0.0..=1.0).contains(&next.mastery_score));
            prop_assert_eq!(next.confidence, Confidence::from_score(next.mastery_score));
            prop_assert_eq!(next.last_attempt, Some(at));
            entry = Some(next);
        }

        let entry = entry.unwrap();
        let expected = events.len().min(MAX_HISTORY);
        prop_assert_eq!(entry.interaction_history.len(), expected);

        let newest = start + Duration::minutes(events.len() as i64 - 1);
        prop_assert_eq!(entry.interaction_history.back().map(|r| r.timestamp), Some(newest));
        let oldest = start + Duration::minutes((events.len() - expected) as i64);
        prop_assert_eq!(entry.interaction_history.front().map(|r| r.timestamp), Some(oldest));
        prop_assert!(entry
            .interaction_history
            .iter()
            .zip(entry.interaction_history.iter().skip(1))
            .all(|(a, b)| a.timestamp < b.timestamp));
    }

    #[test]
    fn prop_confidence_bands(score in 0.0f64..=1.0) {
        let confidence = Confidence::from_score(score);
        let expected = if score >= 0.7 {
            Confidence::High
        } else if score >= 0.4 {
            Confidence::Medium
        } else {
            Confidence::Low
        };
        prop_assert_eq!(confidence, expected);
    }
}
