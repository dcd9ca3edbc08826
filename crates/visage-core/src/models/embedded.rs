//! Embedded model data for standalone binary distribution.
//!
//! With the `embedded-model` feature enabled the classification model is
//! compiled directly into the binary, so deployment needs no model files on
//! disk. The build expects the artifact at `models/faceshape.onnx` relative
//! to the workspace root.

/// Embedded classification model.
pub static DEFAULT_MODEL: &[u8] = include_bytes!("../../../../models/faceshape.onnx");

/// Check if the embedded model is available.
pub fn has_embedded_model() -> bool {
    !DEFAULT_MODEL.is_empty()
}
