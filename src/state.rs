use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::store::{CurriculumCatalog, ProfileStore};
use crate::tutor::TutorPipeline;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    pipeline: TutorPipeline,
    curricula: Arc<CurriculumCatalog>,
    profiles: Arc<dyn ProfileStore>,
}

impl AppState {
    pub fn new(
        pipeline: TutorPipeline,
        curricula: Arc<CurriculumCatalog>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            pipeline,
            curricula,
            profiles,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn pipeline(&self) -> &TutorPipeline {
        &self.pipeline
    }

    pub fn curricula(&self) -> Arc<CurriculumCatalog> {
        Arc::clone(&self.curricula)
    }

    pub fn profiles(&self) -> Arc<dyn ProfileStore> {
        Arc::clone(&self.profiles)
    }
}
