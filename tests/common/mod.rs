#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use parking_lot::Mutex;

use tutor_backend_rust::create_app_with;
use tutor_backend_rust::state::AppState;
use tutor_backend_rust::store::{CurriculumCatalog, InMemoryProfileStore, ProfileStore};
use tutor_backend_rust::tutor::{
    GenerationClient, GenerationError, GenerationRequest, PipelineConfig, TutorPipeline,
};

pub const CURRICULUM_ID: &str = "jordan-grade-10";

pub const CURRICULUM: &str = r#"{
    "country": "Jordan",
    "grade": "Grade 10",
    "subjects": [
        {"subjectId": "phys", "name": "Physics", "units": [
            {"unitId": "u1", "name": "Mechanics", "chapters": [
                {"chapterId": "c1", "name": "Forces", "lessons": [
                    {"lessonId": "newton", "name": "Newton's Laws",
                     "objectives": ["State the three laws"], "dependencies": [], "keywords": ["inertia"]}
                ]}
            ]}
        ]}
    ]
}"#;

/// Replays queued replies in order; an `Err` entry becomes a provider failure.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies.lock().push_back(Ok(reply.to_string()));
    }

    pub fn push_failure(&self, message: &str) {
        self.replies.lock().push_back(Err(message.to_string()));
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.prompts.lock().push(request.prompt.clone());
        match self.replies.lock().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(GenerationError::Unavailable(message)),
            None => Err(GenerationError::Unavailable("no scripted reply".to_string())),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub client: Arc<ScriptedClient>,
    pub profiles: Arc<InMemoryProfileStore>,
}

pub fn create_test_app() -> TestApp {
    let client = ScriptedClient::new();
    let curricula = Arc::new(CurriculumCatalog::new());
    curricula.insert(serde_json::from_str(CURRICULUM).unwrap());
    let profiles = Arc::new(InMemoryProfileStore::new());

    let pipeline = TutorPipeline::new(client.clone(), PipelineConfig::default());
    let store: Arc<dyn ProfileStore> = profiles.clone();
    let state = AppState::new(pipeline, curricula, store);

    TestApp {
        router: create_app_with(state),
        client,
        profiles,
    }
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
