use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::LessonSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumLesson {
    #[serde(flatten)]
    pub spec: LessonSpec,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub chapter_id: String,
    pub name: String,
    #[serde(default)]
    pub lessons: Vec<CurriculumLesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub unit_id: String,
    pub name: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub subject_id: String,
    pub name: String,
    #[serde(default)]
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Curriculum {
    pub country: String,
    pub grade: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl Curriculum {
    pub fn id(&self) -> String {
        curriculum_id(&self.country, &self.grade)
    }

    pub fn lesson_count(&self) -> usize {
        self.subjects.iter().map(Subject::lesson_count).sum()
    }
}

impl Subject {
    pub fn chapter_count(&self) -> usize {
        self.units.iter().map(|u| u.chapters.len()).sum()
    }

    pub fn lesson_count(&self) -> usize {
        self.units.iter().map(Unit::lesson_count).sum()
    }
}

impl Unit {
    pub fn lesson_count(&self) -> usize {
        self.chapters.iter().map(|c| c.lessons.len()).sum()
    }
}

/// Drill-down position inside a curriculum. Deeper ids are ignored unless every parent id
/// is present, so `unit` without `subject` lists subjects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BrowsePath {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub chapter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowseError {
    #[error("Subject not found")]
    SubjectNotFound,
    #[error("Unit not found")]
    UnitNotFound,
    #[error("Chapter not found")]
    ChapterNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub subject_id: String,
    pub name: String,
    pub unit_count: usize,
    pub chapter_count: usize,
    pub lesson_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    pub unit_id: String,
    pub name: String,
    pub chapter_count: usize,
    pub lesson_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSummary {
    pub chapter_id: String,
    pub name: String,
    pub lesson_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRef {
    pub id: String,
    pub name: String,
}

/// One level of the curriculum tree plus the path that leads to it. Exactly one of the
/// child lists is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseView {
    pub curriculum_id: String,
    pub country: String,
    pub grade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<NodeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<NodeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter: Option<NodeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<SubjectSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Vec<UnitSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<ChapterSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lessons: Option<Vec<CurriculumLesson>>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn browse(curriculum: &Curriculum, path: &BrowsePath) -> Result<BrowseView, BrowseError> {
    let mut view = BrowseView {
        curriculum_id: curriculum.id(),
        country: curriculum.country.clone(),
        grade: curriculum.grade.clone(),
        subject: None,
        unit: None,
        chapter: None,
        subjects: None,
        units: None,
        chapters: None,
        lessons: None,
    };

    let Some(subject_id) = non_empty(&path.subject) else {
        view.subjects = Some(
            curriculum
                .subjects
                .iter()
                .map(|s| SubjectSummary {
                    subject_id: s.subject_id.clone(),
                    name: s.name.clone(),
                    unit_count: s.units.len(),
                    chapter_count: s.chapter_count(),
                    lesson_count: s.lesson_count(),
                })
                .collect(),
        );
        return Ok(view);
    };
    let subject = curriculum
        .subjects
        .iter()
        .find(|s| s.subject_id == subject_id)
        .ok_or(BrowseError::SubjectNotFound)?;
    view.subject = Some(NodeRef { id: subject.subject_id.clone(), name: subject.name.clone() });

    let Some(unit_id) = non_empty(&path.unit) else {
        view.units = Some(
            subject
                .units
                .iter()
                .map(|u| UnitSummary {
                    unit_id: u.unit_id.clone(),
                    name: u.name.clone(),
                    chapter_count: u.chapters.len(),
                    lesson_count: u.lesson_count(),
                })
                .collect(),
        );
        return Ok(view);
    };
    let unit = subject
        .units
        .iter()
        .find(|u| u.unit_id == unit_id)
        .ok_or(BrowseError::UnitNotFound)?;
    view.unit = Some(NodeRef { id: unit.unit_id.clone(), name: unit.name.clone() });

    let Some(chapter_id) = non_empty(&path.chapter) else {
        view.chapters = Some(
            unit.chapters
                .iter()
                .map(|c| ChapterSummary {
                    chapter_id: c.chapter_id.clone(),
                    name: c.name.clone(),
                    lesson_count: c.lessons.len(),
                })
                .collect(),
        );
        return Ok(view);
    };
    let chapter = unit
        .chapters
        .iter()
        .find(|c| c.chapter_id == chapter_id)
        .ok_or(BrowseError::ChapterNotFound)?;
    view.chapter = Some(NodeRef { id: chapter.chapter_id.clone(), name: chapter.name.clone() });
    view.lessons = Some(chapter.lessons.clone());

    Ok(view)
}

/// Optional subject/unit/chapter filters narrow the search; the lesson id is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonLocator {
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
    #[serde(default)]
    pub chapter_id: Option<String>,
    pub lesson_id: String,
}

impl LessonLocator {
    pub fn lesson(lesson_id: impl Into<String>) -> Self {
        Self {
            lesson_id: lesson_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FoundLesson<'a> {
    pub lesson: &'a CurriculumLesson,
    pub subject: &'a Subject,
}

fn matches_filter(filter: &Option<String>, id: &str) -> bool {
    filter.as_deref().map_or(true, |f| f.is_empty() || f == id)
}

pub fn find_lesson<'a>(curriculum: &'a Curriculum, locator: &LessonLocator) -> Option<FoundLesson<'a>> {
    for subject in &curriculum.subjects {
        if !matches_filter(&locator.subject_id, &subject.subject_id) {
            continue;
        }
        for unit in &subject.units {
            if !matches_filter(&locator.unit_id, &unit.unit_id) {
                continue;
            }
            for chapter in &unit.chapters {
                if !matches_filter(&locator.chapter_id, &chapter.chapter_id) {
                    continue;
                }
                if let Some(lesson) = chapter
                    .lessons
                    .iter()
                    .find(|l| l.spec.lesson_id == locator.lesson_id)
                {
                    return Some(FoundLesson { lesson, subject });
                }
            }
        }
    }
    None
}

/// `("Saudi Arabia", "Grade 10")` becomes `saudi-arabia-grade-10`.
pub fn curriculum_id(country: &str, grade: &str) -> String {
    fn slug(value: &str) -> String {
        value
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
    }
    format!("{}-{}", slug(country), slug(grade))
}
