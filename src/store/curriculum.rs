use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::StoreError;
use crate::tutor::curriculum::Curriculum;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumSummary {
    pub id: String,
    pub country: String,
    pub grade: String,
    pub subjects: Vec<String>,
    pub lesson_count: usize,
}

/// List filters. `country` matches the lowercased country exactly; `grade` is a
/// case-insensitive substring match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogFilter {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
}

impl CatalogFilter {
    pub fn matches(&self, curriculum: &Curriculum) -> bool {
        let country = self.country.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let grade = self.grade.as_deref().map(str::trim).filter(|g| !g.is_empty());

        country.map_or(true, |c| curriculum.country.to_lowercase() == c.to_lowercase())
            && grade.map_or(true, |g| {
                curriculum.grade.to_lowercase().contains(&g.to_lowercase())
            })
    }
}

/// In-memory curriculum catalog keyed by [`Curriculum::id`].
#[derive(Debug, Default)]
pub struct CurriculumCatalog {
    curricula: RwLock<HashMap<String, Arc<Curriculum>>>,
}

impl CurriculumCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a curriculum and returns its id.
    pub fn insert(&self, curriculum: Curriculum) -> String {
        let id = curriculum.id();
        self.curricula.write().insert(id.clone(), Arc::new(curriculum));
        id
    }

    pub fn get(&self, id: &str) -> Option<Arc<Curriculum>> {
        self.curricula.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.curricula.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.curricula.read().is_empty()
    }

    pub fn summaries(&self, filter: &CatalogFilter) -> Vec<CurriculumSummary> {
        let mut summaries: Vec<CurriculumSummary> = self
            .curricula
            .read()
            .iter()
            .filter(|(_, c)| filter.matches(c))
            .map(|(id, c)| CurriculumSummary {
                id: id.clone(),
                country: c.country.clone(),
                grade: c.grade.clone(),
                subjects: c.subjects.iter().map(|s| s.name.clone()).collect(),
                lesson_count: c.lesson_count(),
            })
            .collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        summaries
    }

    /// Loads every `*.json` file in `dir`. Files that cannot be read or decoded are
    /// logged and skipped. Returns the number of curricula loaded.
    pub async fn load_dir(&self, dir: impl AsRef<Path>) -> Result<usize, StoreError> {
        let dir = dir.as_ref();
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut loaded = 0;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let raw = match tokio::fs::read_to_string(&path).await {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to read curriculum file");
                    continue;
                }
            };
            match serde_json::from_str::<Curriculum>(&raw) {
                Ok(curriculum) => {
                    let id = self.insert(curriculum);
                    debug!(path = %path.display(), %id, "curriculum loaded");
                    loaded += 1;
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "invalid curriculum document");
                }
            }
        }

        info!(dir = %dir.display(), loaded, "curriculum catalog loaded");
        Ok(loaded)
    }
}
