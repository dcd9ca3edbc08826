//! Image classification pipeline.

mod classifier;
mod loader;
mod preprocess;

pub use classifier::Classifier;
pub use loader::{
    locator_chain, resolve_artifact, ArtifactLocator, CompiledArtifact, EmbeddedArtifact,
    ModelSource, PackagedArtifact,
};
pub use preprocess::ImagePreprocessor;

#[cfg(feature = "native")]
pub use loader::load_classifier;

use serde::{Deserialize, Serialize};

/// Number of output classes. Fixed by the model contract.
pub const NUM_CLASSES: usize = 5;

/// Spatial input size of the model (square, pixels).
pub const INPUT_SIZE: u32 = 224;

/// Score vector produced by one inference request, in model-definition order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores([f32; NUM_CLASSES]);

impl Scores {
    /// Wrap a raw score array.
    pub fn new(scores: [f32; NUM_CLASSES]) -> Self {
        Self(scores)
    }

    /// Borrow the raw score array.
    pub fn as_array(&self) -> &[f32; NUM_CLASSES] {
        &self.0
    }

    /// Index and score of the highest-scoring class.
    pub fn top(&self) -> (usize, f32) {
        let mut best = (0, self.0[0]);
        for (idx, &score) in self.0.iter().enumerate().skip(1) {
            if score > best.1 {
                best = (idx, score);
            }
        }
        best
    }
}

impl From<[f32; NUM_CLASSES]> for Scores {
    fn from(scores: [f32; NUM_CLASSES]) -> Self {
        Self(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn top_picks_highest_score() {
        let scores = Scores::new([0.1, 0.6, 0.05, 0.2, 0.05]);
        assert_eq!(scores.top(), (1, 0.6));
    }

    #[test]
    fn top_breaks_ties_toward_first() {
        let scores = Scores::new([0.25, 0.25, 0.25, 0.25, 0.0]);
        assert_eq!(scores.top().0, 0);
    }
}
