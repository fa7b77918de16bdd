//! The Functor Engine: orchestration from raw text to translated text.
//!
//! Translation pipeline:
//! 1. Take the world snapshot current at request start
//! 2. Ask the model for the concepts the text mentions
//! 3. Resolve mentions onto graph nodes and gather their laws
//! 4. Ask the model to rewrite the text under those laws
//!
//! Every model call runs under a deadline. A failed or abandoned call never
//! mutates the graph.

use std::sync::Arc;
use std::time::Duration;

use functor_graph::{GraphService, assemble_context};
use functor_types::TranslationResponse;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::LlmConfig;
use crate::error::EngineError;
use crate::llm::{LlmBackend, create_backend};
use crate::parse::{parse_entities, parse_world_spec};
use crate::prompt::{PromptEngine, RenderedPrompt};

/// World laws passed to generation when no mention resolved to a law.
pub const FALLBACK_INSTRUCTION: &str = "No specific laws found. Apply a general fantasy/SF filter.";

/// Outcome of asking the model which concepts a text mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The mentions, in the order the model listed them.
    Extracted(Vec<String>),
    /// The call or its parsing failed; carries the reason.
    ExtractionFailed(String),
}

/// Orchestrates model calls against the shared world graph.
pub struct FunctorEngine {
    graph: Arc<GraphService>,
    backend: LlmBackend,
    prompts: PromptEngine,
    call_timeout: Duration,
}

impl FunctorEngine {
    /// Assemble an engine from its parts.
    pub const fn new(
        graph: Arc<GraphService>,
        backend: LlmBackend,
        prompts: PromptEngine,
        call_timeout: Duration,
    ) -> Self {
        Self {
            graph,
            backend,
            prompts,
            call_timeout,
        }
    }

    /// Build an engine from the `llm` configuration section.
    ///
    /// # Errors
    ///
    /// [`EngineError::ServiceUnavailable`] when no credential is configured,
    /// [`EngineError::Template`] when a template override fails to load.
    pub fn from_config(graph: Arc<GraphService>, config: &LlmConfig) -> Result<Self, EngineError> {
        let backend_config = config.backend_config().ok_or_else(|| {
            EngineError::ServiceUnavailable("no language model credential configured".to_owned())
        })?;

        let prompts = match &config.templates_dir {
            Some(dir) => PromptEngine::with_overrides(dir)?,
            None => PromptEngine::builtin()?,
        };

        let backend = create_backend(&backend_config);
        info!(
            backend = backend.name(),
            model = backend.model(),
            timeout_ms = config.timeout_ms,
            "functor engine configured"
        );

        Ok(Self::new(graph, backend, prompts, config.timeout()))
    }

    /// Ask the model which concepts `text` mentions.
    pub async fn extract_entities(&self, text: &str) -> Extraction {
        let result = match self.prompts.render_extraction(text) {
            Ok(prompt) => self.call(&prompt).await,
            Err(e) => Err(e),
        };

        match result.and_then(|raw| parse_entities(&raw)) {
            Ok(mentions) => {
                debug!(count = mentions.len(), "entities extracted");
                Extraction::Extracted(mentions)
            }
            Err(e) => Extraction::ExtractionFailed(e.to_string()),
        }
    }

    /// Rebuild the world graph from a natural-language world description.
    ///
    /// Returns the new node count.
    ///
    /// # Errors
    ///
    /// [`EngineError::ServiceUnavailable`] when the model call fails or
    /// times out; the graph is left untouched.
    /// [`EngineError::MalformedExtraction`] when the model output is not a
    /// valid world specification; the graph is emptied.
    pub async fn initialize_world(&self, spec_text: &str) -> Result<usize, EngineError> {
        let prompt = self.prompts.render_world_spec(spec_text)?;
        let raw = self.call(&prompt).await?;

        let spec = match parse_world_spec(&raw) {
            Ok(spec) => spec,
            Err(e) => {
                warn!(error = %e, "world specification unparseable, emptying the world");
                self.graph.reset().await;
                return Err(e);
            }
        };

        let node_count = self.graph.rebuild(&spec).await?;
        info!(node_count, "world initialized");
        Ok(node_count)
    }

    /// Rewrite `text` under the laws of the current world.
    ///
    /// A failed extraction degrades to no applied laws.
    ///
    /// # Errors
    ///
    /// [`EngineError::ServiceUnavailable`] when the generation call fails or
    /// times out.
    pub async fn translate(&self, text: &str) -> Result<TranslationResponse, EngineError> {
        let snapshot = self.graph.read_snapshot().await;

        let mentions = match self.extract_entities(text).await {
            Extraction::Extracted(mentions) => mentions,
            Extraction::ExtractionFailed(reason) => {
                warn!(reason = %reason, "entity extraction failed, translating without laws");
                Vec::new()
            }
        };

        let context = assemble_context(&snapshot.graph, text, &mentions);
        debug!(
            snapshot_id = %snapshot.id,
            applied = context.applied_laws.len(),
            "translating against snapshot"
        );

        let laws = if context.is_empty() {
            FALLBACK_INSTRUCTION
        } else {
            context.context_text.as_str()
        };
        let prompt = self.prompts.render_translation(text, laws)?;
        let translated = self.call(&prompt).await?;

        Ok(TranslationResponse {
            original_text: text.to_owned(),
            translated_text: translated.trim().to_owned(),
            applied_laws: context.applied_laws,
        })
    }

    async fn call(&self, prompt: &RenderedPrompt) -> Result<String, EngineError> {
        timeout(self.call_timeout, self.backend.complete(prompt))
            .await
            .map_err(|_| {
                warn!(
                    backend = self.backend.name(),
                    timeout_ms = self.call_timeout.as_millis(),
                    "model call timed out"
                );
                EngineError::ServiceUnavailable(format!(
                    "{} call timed out after {}ms",
                    self.backend.name(),
                    self.call_timeout.as_millis()
                ))
            })?
    }
}
