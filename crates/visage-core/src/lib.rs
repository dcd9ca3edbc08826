//! Core library for the visage inference adapter.
//!
//! This crate provides:
//! - Model artifact discovery (ordered locator chain)
//! - Image decoding and resizing to the model's fixed input size
//! - NCHW tensor normalization with ImageNet statistics
//! - A classifier producing a fixed five-score output vector

pub mod classify;
pub mod error;
pub mod models;

pub use classify::{Classifier, ImagePreprocessor, Scores, INPUT_SIZE, NUM_CLASSES};
pub use error::{ModelLoadError, PipelineError, Result, VisageError};
pub use models::config::{AdapterConfig, ClassifierConfig, ModelConfig};

#[cfg(feature = "native")]
pub use classify::load_classifier;

/// Re-export inference types.
pub use visage_inference::{InferenceBackend, InferenceError, InputTensor, OutputTensor};

#[cfg(feature = "native")]
pub use visage_inference::OrtBackend;

#[cfg(feature = "tract")]
pub use visage_inference::TractBackend;
