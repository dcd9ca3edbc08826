//! Error types for the visage-core library.

use thiserror::Error;

/// Main error type for the visage library.
#[derive(Error, Debug)]
pub enum VisageError {
    /// Model discovery or loading error.
    #[error("model load error: {0}")]
    Load(#[from] ModelLoadError),

    /// Pipeline error during an inference request.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while discovering or loading the model artifact.
///
/// These are non-fatal: a failed load leaves the handle empty and every
/// subsequent inference request reports failure instead of crashing.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    /// Every discovery strategy came up empty.
    #[error("no model artifact found after {tried} discovery strategies")]
    NotFound { tried: usize },

    /// An artifact was found but the runtime rejected it.
    #[error("model artifact rejected: {0}")]
    Artifact(String),

    /// I/O error while reading an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised during a single inference request.
///
/// Every stage fails fast; no partial results are ever produced.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The byte buffer is not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Inference was attempted before a successful model load.
    #[error("model not loaded")]
    ModelNotLoaded,

    /// The input tensor does not match the model's fixed shape.
    /// Enforced upstream by construction, so hitting this is a bug.
    #[error("input tensor shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: [usize; 4],
        actual: Vec<usize>,
    },

    /// The model runtime failed during the forward pass.
    #[error("inference error: {0}")]
    Inference(#[from] visage_inference::InferenceError),

    /// Buffer allocation failed.
    #[error("resource exhausted: {0}")]
    Resource(String),
}

/// Result type for the visage library.
pub type Result<T> = std::result::Result<T, VisageError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_error_messages() {
        let err = ModelLoadError::NotFound { tried: 3 };
        assert_eq!(
            err.to_string(),
            "no model artifact found after 3 discovery strategies"
        );
    }

    #[test]
    fn pipeline_error_messages() {
        assert_eq!(PipelineError::ModelNotLoaded.to_string(), "model not loaded");

        let err = PipelineError::ShapeMismatch {
            expected: [1, 3, 224, 224],
            actual: vec![1, 3, 100, 100],
        };
        assert!(err.to_string().contains("[1, 3, 224, 224]"));
    }

    #[test]
    fn pipeline_error_wraps_into_top_level() {
        let err: VisageError = PipelineError::ModelNotLoaded.into();
        assert!(matches!(err, VisageError::Pipeline(_)));
    }
}
