pub mod llm_provider;

pub use llm_provider::{LLMConfig, LLMError, LLMProvider};
