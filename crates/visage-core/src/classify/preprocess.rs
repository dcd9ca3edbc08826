//! Image preprocessing for the classification pipeline.
//!
//! One request runs decode, resize, normalize; every buffer allocated here
//! is scoped to the request and dropped when the call returns.

use image::{imageops::FilterType, DynamicImage, GenericImageView, RgbaImage};
use ndarray::Array4;
use tracing::debug;

use crate::error::PipelineError;
use crate::models::config::ClassifierConfig;

const RGB_CHANNELS: usize = 3;

/// Image preprocessor producing the model's normalized NCHW input tensor.
pub struct ImagePreprocessor {
    input_size: u32,
    mean: [f32; 3],
    std: [f32; 3],
}

impl ImagePreprocessor {
    /// Create a preprocessor with the default model contract settings.
    pub fn new() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }

    /// Create a preprocessor from pipeline configuration.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            input_size: config.input_size,
            mean: config.mean,
            std: config.std,
        }
    }

    /// Spatial input size this preprocessor targets.
    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Decode an opaque byte buffer into an image.
    ///
    /// Supports whatever raster formats the decoder provides (JPEG and PNG
    /// at minimum).
    pub fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, PipelineError> {
        let image = image::load_from_memory(bytes)?;
        let (width, height) = image.dimensions();
        debug!("Decoded image: {}x{}", width, height);
        Ok(image)
    }

    /// Resample to the model's square input size.
    ///
    /// Aspect ratio is deliberately not preserved: the image is stretched to
    /// fill the target square. Callers do any aspect-aware cropping before
    /// submission.
    pub fn resize(&self, image: &DynamicImage) -> RgbaImage {
        image
            .resize_exact(self.input_size, self.input_size, FilterType::Lanczos3)
            .to_rgba8()
    }

    /// Convert an interleaved RGBA grid into a planar NCHW float tensor.
    ///
    /// Each value is `(raw / 255 - mean_c) / std_c`; the alpha channel is
    /// discarded.
    pub fn normalize(&self, rgba: &RgbaImage) -> Result<Array4<f32>, PipelineError> {
        let size = self.input_size as usize;
        let (width, height) = rgba.dimensions();
        if (width, height) != (self.input_size, self.input_size) {
            return Err(PipelineError::ShapeMismatch {
                expected: [1, RGB_CHANNELS, size, size],
                actual: vec![1, RGB_CHANNELS, height as usize, width as usize],
            });
        }

        let hw = size * size;
        let total = hw
            .checked_mul(RGB_CHANNELS)
            .ok_or_else(|| PipelineError::Resource("tensor size overflow".to_string()))?;

        let mut data: Vec<f32> = Vec::new();
        data.try_reserve_exact(total)
            .map_err(|e| PipelineError::Resource(e.to_string()))?;
        data.resize(total, 0.0);

        for y in 0..self.input_size {
            for x in 0..self.input_size {
                let pixel = rgba.get_pixel(x, y);
                let offset = y as usize * size + x as usize;
                for c in 0..RGB_CHANNELS {
                    let value = pixel[c] as f32 / 255.0;
                    data[c * hw + offset] = (value - self.mean[c]) / self.std[c];
                }
            }
        }

        Array4::from_shape_vec((1, RGB_CHANNELS, size, size), data)
            .map_err(|e| PipelineError::Resource(e.to_string()))
    }

    /// Run the full decode, resize, normalize sequence on raw bytes.
    pub fn prepare(&self, bytes: &[u8]) -> Result<Array4<f32>, PipelineError> {
        let image = self.decode(bytes)?;
        self.prepare_image(&image)
    }

    /// Run resize and normalize on an already decoded image.
    pub fn prepare_image(&self, image: &DynamicImage) -> Result<Array4<f32>, PipelineError> {
        let resized = self.resize(image);
        self.normalize(&resized)
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;

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
    fn normalize_pure_red_matches_channel_statistics() {
        let preprocessor = ImagePreprocessor::new();
        let rgba = RgbaImage::from_pixel(224, 224, Rgba([255, 0, 0, 255]));

        let tensor = preprocessor.normalize(&rgba).unwrap();

        let r = (1.0 - 0.485) / 0.229;
        let g = (0.0 - 0.456) / 0.224;
        let b = (0.0 - 0.406) / 0.225;

        assert!((tensor[[0, 0, 0, 0]] - r).abs() < 1e-6);
        assert!((tensor[[0, 1, 100, 57]] - g).abs() < 1e-6);
        assert!((tensor[[0, 2, 223, 223]] - b).abs() < 1e-6);
    }

    #[test]
    fn normalize_discards_alpha() {
        let preprocessor = ImagePreprocessor::new();
        let opaque = RgbaImage::from_pixel(224, 224, Rgba([40, 80, 120, 255]));
        let translucent = RgbaImage::from_pixel(224, 224, Rgba([40, 80, 120, 7]));

        let a = preprocessor.normalize(&opaque).unwrap();
        let b = preprocessor.normalize(&translucent).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn prepare_always_yields_fixed_shape() {
        let preprocessor = ImagePreprocessor::new();

        for (w, h) in [(100u32, 50u32), (224, 224), (613, 817)] {
            let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                w,
                h,
                Rgba([10, 20, 30, 255]),
            ));
            let tensor = preprocessor.prepare(&png_bytes(&image)).unwrap();
            assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
            assert_eq!(tensor.len(), 3 * 224 * 224);
        }
    }

    #[test]
    fn prepare_is_deterministic() {
        let preprocessor = ImagePreprocessor::new();
        let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(90, 130, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        }));
        let bytes = png_bytes(&image);

        let a = preprocessor.prepare(&bytes).unwrap();
        let b = preprocessor.prepare(&bytes).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn decode_rejects_garbage() {
        let preprocessor = ImagePreprocessor::new();
        let err = preprocessor.decode(b"definitely not an image");
        assert!(matches!(err, Err(PipelineError::Decode(_))));
    }
}
