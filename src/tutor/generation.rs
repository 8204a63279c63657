use async_trait::async_trait;
use thiserror::Error;

use crate::services::llm_provider::LLMError;

const CONNECTION_PROBE_PROMPT: &str =
    "Hello, please respond with \"AI service is working correctly\" to test the connection.";
const CONNECTION_PROBE_REPLY: &str = "AI service is working correctly";

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("language model call failed: {0}")]
    Provider(#[from] LLMError),
    #[error("language model unavailable: {0}")]
    Unavailable(String),
    #[error("language model returned an empty reply")]
    EmptyReply,
}

/// The language-model call. Implementations return the raw reply text; no schema is
/// enforced on it.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;

    async fn check_connection(&self) -> bool {
        let request = GenerationRequest::new(CONNECTION_PROBE_PROMPT).with_max_tokens(100);
        match self.generate(&request).await {
            Ok(reply) => reply.contains(CONNECTION_PROBE_REPLY),
            Err(err) => {
                tracing::warn!(error = %err, "generation connection check failed");
                false
            }
        }
    }
}
