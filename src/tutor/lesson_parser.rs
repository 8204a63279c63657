//! Line scanner turning a lesson reply into a [`GeneratedLesson`].
//!
//! The reply is treated as untrusted text. Every missing section has a default, so
//! [`parse_lesson`] is total over arbitrary input.

use super::types::{GeneratedLesson, LessonSpec};

const WORDS_PER_MINUTE: usize = 200;
const MIN_DURATION_MINUTES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Other,
    KeyPoints,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyPointsState {
    NotSeen,
    AwaitingFirstBullet,
    InList,
    Done,
}

struct Heading<'a> {
    level: usize,
    text: &'a str,
}

fn heading(line: &str) -> Option<Heading<'_>> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(Heading { level, text: rest.trim() })
}

/// Title heading: exactly one `#` in column zero, whitespace, then text.
fn title_of(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim();
    (!title.is_empty()).then_some(title)
}

fn classify_section(text: &str) -> Section {
    let name = text.trim_end_matches(':').trim();
    if name.eq_ignore_ascii_case("key points") {
        Section::KeyPoints
    } else if name.eq_ignore_ascii_case("summary") {
        Section::Summary
    } else {
        Section::Other
    }
}

fn bullet_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    let marker = chars.next()?;
    if !matches!(marker, '-' | '*' | '•') {
        return None;
    }
    let rest = chars.as_str();
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn estimate_duration_minutes(text: &str) -> u32 {
    let minutes = word_count(text).div_ceil(WORDS_PER_MINUTE);
    minutes.max(MIN_DURATION_MINUTES) as u32
}

pub fn parse_lesson(reply: &str, lesson: &LessonSpec) -> GeneratedLesson {
    let mut title: Option<&str> = None;
    let mut key_points: Vec<String> = Vec::new();
    let mut key_points_state = KeyPointsState::NotSeen;
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut summary_seen = false;
    let mut section = Section::Other;

    for line in reply.lines() {
        if title.is_none() {
            title = title_of(line);
        }

        if let Some(h) = heading(line) {
            if key_points_state == KeyPointsState::InList {
                key_points_state = KeyPointsState::Done;
            }
            section = if h.level >= 2 {
                classify_section(h.text)
            } else {
                Section::Other
            };
            match section {
                Section::KeyPoints if key_points_state == KeyPointsState::NotSeen => {
                    key_points_state = KeyPointsState::AwaitingFirstBullet;
                }
                Section::Summary if !summary_seen => {
                    summary_seen = true;
                }
                Section::Summary => {
                    // only the first summary section counts
                    section = Section::Other;
                }
                _ => {}
            }
            continue;
        }

        match section {
            Section::KeyPoints => match key_points_state {
                KeyPointsState::AwaitingFirstBullet => {
                    if let Some(point) = bullet_text(line) {
                        key_points.push(point.to_string());
                        key_points_state = KeyPointsState::InList;
                    } else if !line.trim().is_empty() {
                        key_points_state = KeyPointsState::Done;
                    }
                }
                KeyPointsState::InList => {
                    if let Some(point) = bullet_text(line) {
                        key_points.push(point.to_string());
                    } else {
                        key_points_state = KeyPointsState::Done;
                    }
                }
                KeyPointsState::NotSeen | KeyPointsState::Done => {}
            },
            Section::Summary => summary_lines.push(line),
            Section::Other => {}
        }
    }

    let title = title
        .map(str::to_string)
        .unwrap_or_else(|| lesson.name.clone());

    GeneratedLesson {
        lesson_id: lesson.lesson_id.clone(),
        title,
        content: reply.to_string(),
        summary: summary_lines.join("\n").trim().to_string(),
        key_points,
        estimated_duration: estimate_duration_minutes(reply),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson() -> LessonSpec {
        LessonSpec {
            lesson_id: "chem-2".into(),
            name: "Chemical Bonds".into(),
            objectives: vec!["Compare ionic and covalent bonds".into()],
            keywords: vec!["electronegativity".into()],
        }
    }

    const FULL_REPLY: &str = "# Bonds Hold the World Together\n\n## Introduction\nAtoms like company.\n\n## Main Content\n### Ionic bonds\nElectrons move.\n\n## Key Points\n- Ionic bonds transfer electrons\n- Covalent bonds share electrons\n* Electronegativity decides\n\n## Summary\nBonds form because atoms seek stability.\nThat is all.\n";

    #[test]
    fn test_parses_all_sections() {
        let parsed = parse_lesson(FULL_REPLY, &lesson());
        assert_eq!(parsed.lesson_id, "chem-2");
        assert_eq!(parsed.title, "Bonds Hold the World Together");
        assert_eq!(
            parsed.key_points,
            vec![
                "Ionic bonds transfer electrons",
                "Covalent bonds share electrons",
                "Electronegativity decides",
            ]
        );
        assert_eq!(
            parsed.summary,
            "Bonds form because atoms seek stability.\nThat is all."
        );
        assert_eq!(parsed.content, FULL_REPLY);
        assert_eq!(parsed.estimated_duration, 5);
    }

    #[test]
    fn test_missing_sections_fall_back() {
        let parsed = parse_lesson("Just some prose without any headings.", &lesson());
        assert_eq!(parsed.title, "Chemical Bonds");
        assert!(parsed.key_points.is_empty());
        assert_eq!(parsed.summary, "");
    }

    #[test]
    fn test_empty_reply() {
        let parsed = parse_lesson("", &lesson());
        assert_eq!(parsed.title, "Chemical Bonds");
        assert_eq!(parsed.content, "");
        assert_eq!(parsed.estimated_duration, 5);
    }

    #[test]
    fn test_subheading_is_not_a_title() {
        let parsed = parse_lesson("## Introduction\ntext\n#NoSpace\n#   \n# Real Title", &lesson());
        assert_eq!(parsed.title, "Real Title");
    }

    #[test]
    fn test_key_points_stop_at_first_non_bullet() {
        let reply = "## Key Points\n\n- one\n- two\nnot a bullet\n- three\n";
        let parsed = parse_lesson(reply, &lesson());
        assert_eq!(parsed.key_points, vec!["one", "two"]);
    }

    #[test]
    fn test_key_points_heading_is_case_insensitive() {
        let parsed = parse_lesson("### KEY POINTS:\n- alpha\n", &lesson());
        assert_eq!(parsed.key_points, vec!["alpha"]);
    }

    #[test]
    fn test_summary_ends_at_next_heading() {
        let reply = "## Summary\nShort recap.\n## Further Reading\nBooks.";
        let parsed = parse_lesson(reply, &lesson());
        assert_eq!(parsed.summary, "Short recap.");
    }

    #[test]
    fn test_duration_for_thousand_words() {
        let reply = vec!["word"; 1000].join(" ");
        assert_eq!(parse_lesson(&reply, &lesson()).estimated_duration, 5);
    }

    #[test]
    fn test_duration_rounds_up() {
        let reply = vec!["word"; 1201].join("\n\t ");
        assert_eq!(estimate_duration_minutes(&reply), 7);
        assert_eq!(word_count("  a   b\n\nc  "), 3);
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse_lesson(FULL_REPLY, &lesson()), parse_lesson(FULL_REPLY, &lesson()));
    }
}
