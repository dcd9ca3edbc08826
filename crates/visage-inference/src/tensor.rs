//! Tensor types crossing the backend seam.
//!
//! Classification models here take a single `f32` input; outputs are `f32`
//! score planes or, for some exported graphs, `i64` index tensors.

use ndarray::{ArrayD, IxDyn};

use crate::error::InferenceError;

/// Input tensor for inference. Always `f32`.
#[derive(Debug, Clone)]
pub struct InputTensor(ArrayD<f32>);

impl InputTensor {
    /// Create an input tensor from raw data and shape.
    pub fn from_f32(data: Vec<f32>, shape: Vec<usize>) -> Result<Self, InferenceError> {
        let arr = ArrayD::from_shape_vec(IxDyn(&shape), data)
            .map_err(|e| InferenceError::InvalidInput(e.to_string()))?;
        Ok(InputTensor(arr))
    }

    /// Get the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &ArrayD<f32> {
        &self.0
    }

    /// Consume the tensor and return the underlying array.
    pub fn into_array(self) -> ArrayD<f32> {
        self.0
    }
}

impl From<ArrayD<f32>> for InputTensor {
    fn from(arr: ArrayD<f32>) -> Self {
        InputTensor(arr)
    }
}

/// Output tensor from inference.
#[derive(Debug, Clone)]
pub enum OutputTensor {
    Float32(ArrayD<f32>),
    Int64(ArrayD<i64>),
}

impl OutputTensor {
    /// Get the shape of the tensor.
    pub fn shape(&self) -> &[usize] {
        match self {
            OutputTensor::Float32(arr) => arr.shape(),
            OutputTensor::Int64(arr) => arr.shape(),
        }
    }

    /// Try to get the inner Float32 array.
    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            OutputTensor::Float32(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to get the inner Int64 array.
    pub fn as_i64(&self) -> Option<&ArrayD<i64>> {
        match self {
            OutputTensor::Int64(arr) => Some(arr),
            _ => None,
        }
    }
}
