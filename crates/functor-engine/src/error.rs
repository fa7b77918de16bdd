//! Error types for the Functor Engine.
//!
//! Failures of the language model collaborator are converted into this
//! taxonomy at the boundary: an unreachable or misbehaving service is
//! [`EngineError::ServiceUnavailable`], output that cannot be parsed into the
//! expected shape is [`EngineError::MalformedExtraction`].

use functor_graph::GraphError;

/// Errors that can occur while orchestrating model calls.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The language model service is unreachable, unconfigured, timed out,
    /// or answered with an error.
    #[error("language model service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The language model answered, but its output has the wrong shape.
    #[error("malformed model output: {0}")]
    MalformedExtraction(String),

    /// A prompt template failed to load or render.
    #[error("template error: {0}")]
    Template(String),
}

impl From<GraphError> for EngineError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Spec(spec) => Self::MalformedExtraction(spec.to_string()),
            GraphError::ShutDown => {
                Self::ServiceUnavailable(String::from("graph service is shut down"))
            }
        }
    }
}
