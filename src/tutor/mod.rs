//! Adaptive content generation.
//!
//! - `prompt`: lesson and question prompts from lesson metadata and preferences
//! - `generation`: the language-model seam ([`GenerationClient`])
//! - `lesson_parser` / `question_parser`: total parsers over untrusted replies
//! - `padding`: reconciles parsed questions with the requested count
//! - `mastery`: per-lesson skill transitions and difficulty adaptation
//! - `pipeline`: wires the pieces around a client
//! - `curriculum`: curriculum documents and lesson lookup

pub mod curriculum;
pub mod generation;
pub mod lesson_parser;
pub mod mastery;
pub mod padding;
pub mod pipeline;
pub mod prompt;
pub mod question_parser;
pub mod types;

pub use generation::{GenerationClient, GenerationError, GenerationRequest};
pub use mastery::{adapt_difficulty, apply_interaction, merge_skill_entry};
pub use pipeline::{PipelineConfig, QuestionBatch, TutorPipeline};
pub use types::*;
