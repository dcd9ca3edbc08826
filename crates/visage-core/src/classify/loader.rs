//! Model artifact discovery and classifier construction.
//!
//! Discovery walks an ordered chain of locators; the first one that yields a
//! source wins. Loading is idempotent: repeating it re-runs discovery and
//! replaces the previous handle on success.

use std::path::PathBuf;

use tracing::debug;

use crate::error::ModelLoadError;
use crate::models::config::ModelConfig;

/// Where a model artifact comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// Artifact file on disk.
    File(PathBuf),
    /// Artifact compiled into the binary.
    Bytes(&'static [u8]),
}

/// One discovery strategy for the model artifact.
pub trait ArtifactLocator {
    /// Short name of the strategy, for diagnostics.
    fn strategy(&self) -> &'static str;

    /// Probe for the artifact; `None` means this strategy has nothing.
    fn locate(&self) -> Option<ModelSource>;
}

/// Locates the ahead-of-time optimized `.ort` artifact form.
pub struct CompiledArtifact {
    path: PathBuf,
}

impl CompiledArtifact {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            path: config.compiled_artifact(),
        }
    }
}

impl ArtifactLocator for CompiledArtifact {
    fn strategy(&self) -> &'static str {
        "compiled"
    }

    fn locate(&self) -> Option<ModelSource> {
        self.path
            .is_file()
            .then(|| ModelSource::File(self.path.clone()))
    }
}

/// Locates the packaged `.onnx` artifact form.
pub struct PackagedArtifact {
    path: PathBuf,
}

impl PackagedArtifact {
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            path: config.packaged_artifact(),
        }
    }
}

impl ArtifactLocator for PackagedArtifact {
    fn strategy(&self) -> &'static str {
        "packaged"
    }

    fn locate(&self) -> Option<ModelSource> {
        self.path
            .is_file()
            .then(|| ModelSource::File(self.path.clone()))
    }
}

/// Falls back to the model compiled into the binary, when built with the
/// `embedded-model` feature. Needs no file lookup.
pub struct EmbeddedArtifact;

impl EmbeddedArtifact {
    #[cfg(feature = "embedded-model")]
    fn bytes() -> Option<&'static [u8]> {
        Some(crate::models::embedded::DEFAULT_MODEL)
    }

    #[cfg(not(feature = "embedded-model"))]
    fn bytes() -> Option<&'static [u8]> {
        None
    }
}

impl ArtifactLocator for EmbeddedArtifact {
    fn strategy(&self) -> &'static str {
        "embedded"
    }

    fn locate(&self) -> Option<ModelSource> {
        Self::bytes().map(ModelSource::Bytes)
    }
}

/// The discovery order: compiled artifact, packaged artifact, embedded default.
pub fn locator_chain(config: &ModelConfig) -> Vec<Box<dyn ArtifactLocator>> {
    vec![
        Box::new(CompiledArtifact::new(config)),
        Box::new(PackagedArtifact::new(config)),
        Box::new(EmbeddedArtifact),
    ]
}

/// Walk the locator chain and return the winning strategy and source.
pub fn resolve_artifact(
    config: &ModelConfig,
) -> Result<(&'static str, ModelSource), ModelLoadError> {
    let chain = locator_chain(config);
    let tried = chain.len();

    for locator in chain {
        match locator.locate() {
            Some(source) => {
                debug!("model artifact resolved via {} strategy", locator.strategy());
                return Ok((locator.strategy(), source));
            }
            None => debug!("{} strategy: no artifact", locator.strategy()),
        }
    }

    Err(ModelLoadError::NotFound { tried })
}

/// Discover the model artifact and construct a ready classifier.
#[cfg(feature = "native")]
pub fn load_classifier(
    config: &crate::models::config::AdapterConfig,
) -> Result<super::classifier::Classifier<visage_inference::OrtBackend>, ModelLoadError> {
    use super::classifier::Classifier;
    use tracing::info;
    use visage_inference::OrtBackend;

    let (strategy, source) = resolve_artifact(&config.model)?;

    let backend = match source {
        ModelSource::File(path) => OrtBackend::from_file(&path),
        ModelSource::Bytes(bytes) => OrtBackend::from_bytes(bytes),
    }
    .map_err(|e| ModelLoadError::Artifact(e.to_string()))?;

    info!("model loaded via {} strategy", strategy);
    Ok(Classifier::with_config(backend, &config.classifier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_in(dir: &std::path::Path) -> ModelConfig {
        ModelConfig {
            model_dir: dir.to_path_buf(),
            resource_name: "faceshape".to_string(),
        }
    }

    #[test]
    fn packaged_form_wins_when_compiled_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let onnx = dir.path().join("faceshape.onnx");
        std::fs::write(&onnx, b"stub").unwrap();

        let (strategy, source) = resolve_artifact(&config_in(dir.path())).unwrap();
        assert_eq!(strategy, "packaged");
        assert_eq!(source, ModelSource::File(onnx));
    }

    #[test]
    fn compiled_form_wins_when_both_are_present() {
        let dir = tempfile::tempdir().unwrap();
        let ort = dir.path().join("faceshape.ort");
        std::fs::write(&ort, b"stub").unwrap();
        std::fs::write(dir.path().join("faceshape.onnx"), b"stub").unwrap();

        let (strategy, source) = resolve_artifact(&config_in(dir.path())).unwrap();
        assert_eq!(strategy, "compiled");
        assert_eq!(source, ModelSource::File(ort));
    }

    #[cfg(not(feature = "embedded-model"))]
    #[test]
    fn empty_directory_exhausts_the_chain() {
        let dir = tempfile::tempdir().unwrap();

        let err = resolve_artifact(&config_in(dir.path())).unwrap_err();
        assert!(matches!(err, ModelLoadError::NotFound { tried: 3 }));
    }

    #[cfg(feature = "native")]
    #[test]
    fn corrupt_artifact_is_rejected_not_fatal() {
        use crate::models::config::AdapterConfig;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("faceshape.onnx"), b"not a real model").unwrap();

        let config = AdapterConfig {
            model: config_in(dir.path()),
            ..AdapterConfig::default()
        };
        let err = load_classifier(&config).unwrap_err();
        assert!(matches!(err, ModelLoadError::Artifact(_)));
    }
}
