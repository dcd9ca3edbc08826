//! ONNX inference abstraction layer for visage.
//!
//! This crate provides a unified interface for running ONNX classification
//! models across different backends:
//! - `ort` with XNNPACK execution provider for native platforms
//! - `tract` as a pure-Rust portable fallback
//!
//! The crate knows nothing about images; it moves tensors in and out of a
//! model session.

mod backend;
mod error;
mod tensor;

pub use backend::InferenceBackend;
pub use error::InferenceError;
pub use tensor::{InputTensor, OutputTensor};

#[cfg(feature = "native")]
pub use backend::ort::OrtBackend;

#[cfg(feature = "tract")]
pub use backend::tract::TractBackend;

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, InferenceError>;
