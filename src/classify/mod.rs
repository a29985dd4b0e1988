// Classification adapter - from feature vector to (label, confidence)
//
// The classifier itself is an external capability behind the
// `GestureClassifier` trait: it maps a feature vector to a probability
// distribution over a fixed label index space. The adapter selects the
// best channel and resolves it against the vocabulary.
//
// Leniency policy: a predicted index beyond the vocabulary bounds resolves
// to the index's decimal string instead of failing. A stale label file
// degrades the output rather than crashing the loop.

use crate::error::ModelError;
use crate::labels::LabelVocabulary;

/// Port for the external gesture classifier.
///
/// `infer` accepts one feature vector (a single-row batch) and returns a
/// probability distribution: non-negative values, nominally summing to 1,
/// one per output channel.
pub trait GestureClassifier {
    fn infer(&self, features: &[f32]) -> Result<Vec<f32>, ModelError>;

    /// Number of output channels the classifier produces
    fn output_width(&self) -> usize;
}

/// Best-channel prediction for one frame
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Probability mass assigned to the predicted label (0.0-1.0)
    pub confidence: f32,
}

/// Drives the classifier port and resolves predictions against the
/// vocabulary.
pub struct ClassificationAdapter {
    classifier: Box<dyn GestureClassifier>,
    vocabulary: LabelVocabulary,
}

impl ClassificationAdapter {
    /// Create an adapter over a classifier and a loaded vocabulary.
    ///
    /// A vocabulary whose length differs from the classifier's output
    /// width is tolerated at runtime (see the leniency policy above), but
    /// the mismatch is worth knowing about, so it is logged once here.
    pub fn new(classifier: Box<dyn GestureClassifier>, vocabulary: LabelVocabulary) -> Self {
        let width = classifier.output_width();
        if width != vocabulary.len() {
            tracing::warn!(
                "[Classify] Vocabulary has {} labels but the model has {} output channels; \
                 out-of-range predictions will resolve to numeric labels",
                vocabulary.len(),
                width
            );
        }
        Self {
            classifier,
            vocabulary,
        }
    }

    /// Classify one feature vector: argmax channel, its probability as
    /// confidence. No temperature scaling, no top-k.
    pub fn classify(&self, features: &[f32]) -> Result<Prediction, ModelError> {
        let probs = self.classifier.infer(features)?;

        let (index, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            })
            .ok_or_else(|| ModelError::InferenceFailed {
                reason: "classifier returned an empty distribution".to_string(),
            })?;

        let label = match self.vocabulary.get(index) {
            Some(label) => label.to_string(),
            None => index.to_string(),
        };

        Ok(Prediction { label, confidence })
    }

    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }
}
