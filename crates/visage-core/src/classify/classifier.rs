//! Fixed five-class image classifier.

use std::time::Instant;

use image::DynamicImage;
use ndarray::Array4;
use tracing::{debug, info};
use visage_inference::{InferenceBackend, InferenceError, InputTensor, OutputTensor};

use crate::error::PipelineError;
use crate::models::config::ClassifierConfig;

use super::preprocess::ImagePreprocessor;
use super::{Scores, NUM_CLASSES};

/// Classifier orchestrating one synchronous inference request:
/// decode, resize, normalize, invoke.
///
/// Holds no per-request state; concurrent calls may share one instance.
pub struct Classifier<B: InferenceBackend> {
    backend: B,
    preprocessor: ImagePreprocessor,
}

impl<B: InferenceBackend> Classifier<B> {
    /// Create a classifier with the default model contract settings.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, &ClassifierConfig::default())
    }

    /// Create a classifier from pipeline configuration.
    pub fn with_config(backend: B, config: &ClassifierConfig) -> Self {
        Self {
            backend,
            preprocessor: ImagePreprocessor::from_config(config),
        }
    }

    /// Classify an encoded image (JPEG, PNG, ...).
    pub fn classify(&self, bytes: &[u8]) -> Result<Scores, PipelineError> {
        let start = Instant::now();
        let tensor = self.preprocessor.prepare(bytes)?;
        let scores = self.invoke(tensor)?;
        info!(
            "classification complete in {}ms",
            start.elapsed().as_millis()
        );
        Ok(scores)
    }

    /// Classify an already decoded image.
    pub fn classify_image(&self, image: &DynamicImage) -> Result<Scores, PipelineError> {
        let tensor = self.preprocessor.prepare_image(image)?;
        self.invoke(tensor)
    }

    fn invoke(&self, tensor: Array4<f32>) -> Result<Scores, PipelineError> {
        let size = self.preprocessor.input_size() as usize;
        let expected = [1, 3, size, size];
        if tensor.shape() != expected {
            return Err(PipelineError::ShapeMismatch {
                expected,
                actual: tensor.shape().to_vec(),
            });
        }

        let input_name = self
            .backend
            .input_names()
            .first()
            .map(String::as_str)
            .unwrap_or("x");
        let input = InputTensor::from(tensor.into_dyn());

        let outputs = self.backend.run(&[(input_name, input)])?;

        let (name, output) = outputs.into_iter().next().ok_or_else(|| {
            PipelineError::Inference(InferenceError::OutputExtraction(
                "model produced no outputs".to_string(),
            ))
        })?;

        let scores = match output {
            OutputTensor::Float32(arr) => arr,
            _ => {
                return Err(PipelineError::Inference(InferenceError::OutputExtraction(
                    format!("unexpected output type for '{}'", name),
                )))
            }
        };

        if scores.len() != NUM_CLASSES {
            return Err(PipelineError::Inference(InferenceError::OutputExtraction(
                format!("expected {} scores, got {}", NUM_CLASSES, scores.len()),
            )));
        }

        let mut result = [0.0f32; NUM_CLASSES];
        for (slot, value) in result.iter_mut().zip(scores.iter()) {
            *slot = *value;
        }

        debug!("scores: {:?}", result);
        Ok(Scores::new(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use ndarray::ArrayD;
    use pretty_assertions::assert_eq;
    use visage_inference::Result as InferenceResult;

    /// Backend returning canned outputs, recording the input it saw.
    struct StubBackend {
        input_names: Vec<String>,
        output_names: Vec<String>,
        output: Vec<f32>,
        output_shape: Vec<usize>,
    }

    impl StubBackend {
        fn scores(output: [f32; 5]) -> Self {
            Self {
                input_names: vec!["x_1".to_string()],
                output_names: vec!["var_out".to_string()],
                output: output.to_vec(),
                output_shape: vec![1, 5],
            }
        }
    }

    impl InferenceBackend for StubBackend {
        fn run(
            &self,
            inputs: &[(&str, InputTensor)],
        ) -> InferenceResult<Vec<(String, OutputTensor)>> {
            assert_eq!(inputs.len(), 1);
            assert_eq!(inputs[0].0, "x_1");
            assert_eq!(inputs[0].1.shape(), &[1, 3, 224, 224]);

            let arr =
                ArrayD::from_shape_vec(ndarray::IxDyn(&self.output_shape), self.output.clone())
                    .unwrap();
            Ok(vec![(
                self.output_names[0].clone(),
                OutputTensor::Float32(arr),
            )])
        }

        fn input_names(&self) -> &[String] {
            &self.input_names
        }

        fn output_names(&self) -> &[String] {
            &self.output_names
        }
    }

    fn test_image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255])))
    }

    fn png_bytes(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[test]
    fn classify_returns_backend_scores() {
        let expected = [0.1, 0.2, 0.3, 0.25, 0.15];
        let classifier = Classifier::new(StubBackend::scores(expected));

        let scores = classifier.classify(&png_bytes(&test_image())).unwrap();
        assert_eq!(scores.as_array(), &expected);
        assert_eq!(scores.top(), (2, 0.3));
    }

    #[test]
    fn classify_is_deterministic() {
        let classifier = Classifier::new(StubBackend::scores([0.9, 0.02, 0.03, 0.04, 0.01]));
        let bytes = png_bytes(&test_image());

        let a = classifier.classify(&bytes).unwrap();
        let b = classifier.classify(&bytes).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn classify_rejects_non_image_bytes() {
        let classifier = Classifier::new(StubBackend::scores([0.0; 5]));
        let err = classifier.classify(b"\x00\x01garbage");
        assert!(matches!(err, Err(PipelineError::Decode(_))));
    }

    #[test]
    fn wrong_output_length_is_an_inference_error() {
        let mut stub = StubBackend::scores([0.0; 5]);
        stub.output = vec![0.5; 7];
        stub.output_shape = vec![1, 7];
        let classifier = Classifier::new(stub);

        let err = classifier.classify(&png_bytes(&test_image()));
        assert!(matches!(err, Err(PipelineError::Inference(_))));
    }

    #[test]
    fn classify_image_skips_decode() {
        let classifier = Classifier::new(StubBackend::scores([0.2, 0.2, 0.2, 0.2, 0.2]));
        let scores = classifier.classify_image(&test_image()).unwrap();
        assert_eq!(scores.as_array(), &[0.2, 0.2, 0.2, 0.2, 0.2]);
    }
}
