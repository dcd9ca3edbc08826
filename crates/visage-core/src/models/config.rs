//! Configuration structures for the inference adapter.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable naming a JSON config file for embedded hosts.
pub const CONFIG_ENV_VAR: &str = "VISAGE_CONFIG";

/// Main configuration for the visage adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Model artifact discovery configuration.
    pub model: ModelConfig,

    /// Classification pipeline configuration.
    pub classifier: ClassifierConfig,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Model artifact locations.
///
/// The deployment tooling stages the artifact under `model_dir` using the
/// fixed logical name; discovery derives the concrete candidate paths here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Logical resource name of the model, without extension.
    pub resource_name: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            resource_name: "faceshape".to_string(),
        }
    }
}

impl ModelConfig {
    /// Path of the ahead-of-time optimized artifact form.
    pub fn compiled_artifact(&self) -> PathBuf {
        self.model_dir.join(format!("{}.ort", self.resource_name))
    }

    /// Path of the packaged ONNX artifact form.
    pub fn packaged_artifact(&self) -> PathBuf {
        self.model_dir.join(format!("{}.onnx", self.resource_name))
    }
}

/// Classification pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Spatial input size of the model (square, pixels).
    pub input_size: u32,

    /// Per-channel normalization mean (R, G, B).
    pub mean: [f32; 3],

    /// Per-channel normalization standard deviation (R, G, B).
    pub std: [f32; 3],
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_size: crate::classify::INPUT_SIZE,
            // ImageNet statistics
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

impl AdapterConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Resolve configuration for hosts that cannot pass arguments.
    ///
    /// Reads the file named by `VISAGE_CONFIG` when set; any problem with it
    /// is logged and the coded defaults are used instead.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                match Self::from_file(&path) {
                    Ok(config) => config,
                    Err(e) => {
                        warn!("ignoring config file {}: {}", path.display(), e);
                        Self::default()
                    }
                }
            }
            None => Self::default(),
        }
    }
}
