//! Tract backend for portable, pure-Rust ONNX inference.

use std::path::Path;

use ndarray::ArrayD;
use tract_onnx::prelude::*;
use tracing::debug;

use crate::error::InferenceError;
use crate::tensor::{InputTensor, OutputTensor};
use crate::{InferenceBackend, Result};

/// Default input shape for classification graphs (batch=1, channels=3, 224x224).
const DEFAULT_INPUT_SHAPE: [usize; 4] = [1, 3, 224, 224];

/// Backend using Tract for pure-Rust ONNX inference.
pub struct TractBackend {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl TractBackend {
    /// Load a model from a file path with the default classification input shape.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_file_with_shape(path, &DEFAULT_INPUT_SHAPE)
    }

    /// Load a model from a file path with specified input shape.
    pub fn from_file_with_shape<P: AsRef<Path>>(path: P, input_shape: &[usize]) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading model with Tract from: {}", path.display());

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to load model: {}", e)))?;

        Self::finish(model, input_shape)
    }

    /// Load a model from bytes with the default classification input shape.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with_shape(bytes, &DEFAULT_INPUT_SHAPE)
    }

    /// Load a model from bytes with specified input shape.
    pub fn from_bytes_with_shape(bytes: &[u8], input_shape: &[usize]) -> Result<Self> {
        debug!("Loading model with Tract from {} bytes", bytes.len());

        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(bytes))
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to load model: {}", e)))?;

        Self::finish(model, input_shape)
    }

    fn finish(mut model: InferenceModel, input_shape: &[usize]) -> Result<Self> {
        // Pin the input fact so dynamic batch dimensions become concrete
        model
            .set_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), input_shape))
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to set input shape: {}", e)))?;

        let model = model
            .into_typed()
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to type model: {}", e)))?
            .into_optimized()
            .map_err(|e| InferenceError::ModelLoad(format!("Failed to optimize: {}", e)))?
            .into_runnable()
            .map_err(|e| InferenceError::SessionCreate(e.to_string()))?;

        // Tract doesn't expose input/output names as easily, use fixed labels
        let input_names = vec!["input".to_string()];
        let output_names = vec!["output".to_string()];

        Ok(Self {
            model,
            input_names,
            output_names,
        })
    }

    fn convert_input(&self, tensor: &InputTensor) -> Result<TValue> {
        let arr = tensor.as_array();
        let shape: TVec<usize> = arr.shape().iter().cloned().collect();
        let data: Vec<f32> = arr.iter().cloned().collect();
        let tract_tensor =
            tract_ndarray::ArrayD::from_shape_vec(tract_ndarray::IxDyn(shape.as_slice()), data)
                .map_err(|e| InferenceError::InvalidInput(e.to_string()))?;
        Ok(tract_tensor.into_tvalue())
    }
}

impl InferenceBackend for TractBackend {
    fn run(&self, inputs: &[(&str, InputTensor)]) -> Result<Vec<(String, OutputTensor)>> {
        let tract_inputs: TVec<TValue> = inputs
            .iter()
            .map(|(_, tensor)| self.convert_input(tensor))
            .collect::<Result<TVec<_>>>()?;

        let outputs = self
            .model
            .run(tract_inputs)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let mut results = Vec::with_capacity(outputs.len());

        for (idx, output) in outputs.iter().enumerate() {
            let name = self
                .output_names
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("output_{}", idx));

            let tensor = if let Ok(arr) = output.to_array_view::<f32>() {
                let shape: Vec<usize> = arr.shape().to_vec();
                let data: Vec<f32> = arr.iter().cloned().collect();
                let arr = ArrayD::from_shape_vec(ndarray::IxDyn(&shape), data)
                    .map_err(|e| InferenceError::OutputExtraction(e.to_string()))?;
                OutputTensor::Float32(arr)
            } else if let Ok(arr) = output.to_array_view::<i64>() {
                let shape: Vec<usize> = arr.shape().to_vec();
                let data: Vec<i64> = arr.iter().cloned().collect();
                let arr = ArrayD::from_shape_vec(ndarray::IxDyn(&shape), data)
                    .map_err(|e| InferenceError::OutputExtraction(e.to_string()))?;
                OutputTensor::Int64(arr)
            } else {
                return Err(InferenceError::OutputExtraction(format!(
                    "unsupported output type for '{}'",
                    name
                )));
            };

            results.push((name, tensor));
        }

        Ok(results)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}
