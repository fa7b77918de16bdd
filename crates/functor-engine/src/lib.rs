//! Language model orchestration for the Functor Engine.
//!
//! This crate turns text into model calls and model output back into
//! typed values:
//!
//! - **Entity extraction**: which concepts a text mentions
//! - **World specification**: a `{nodes, edges}` graph distilled from a
//!   world description, handed to the [`GraphService`] for a rebuild
//! - **Translation**: the text rewritten under the laws of its concepts
//!
//! Backends are Gemini, OpenAI-compatible chat completions, and the
//! Anthropic Messages API, selected by configuration.
//!
//! [`GraphService`]: functor_graph::GraphService

pub mod config;
pub mod engine;
pub mod error;
pub mod llm;
pub mod parse;
pub mod prompt;

// Re-export primary types for convenience.
pub use config::{BackendType, ConfigError, FunctorConfig, LlmBackendConfig, LlmConfig};
pub use engine::{Extraction, FALLBACK_INSTRUCTION, FunctorEngine};
pub use error::EngineError;
pub use llm::{LlmBackend, create_backend};
pub use prompt::{PromptEngine, RenderedPrompt};
