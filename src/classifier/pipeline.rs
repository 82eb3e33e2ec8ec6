// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end classification: bytes -> tensor -> probability -> prediction

use ndarray::Array4;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::{decide, ClassifierError, Prediction, ProbabilityScorer};

/// Shared handle to the loaded model
///
/// Cloning is cheap; every clone refers to the same scorer.
#[derive(Clone)]
pub struct PneumoniaClassifier {
    scorer: Arc<dyn ProbabilityScorer>,
}

impl std::fmt::Debug for PneumoniaClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PneumoniaClassifier")
            .field("model", &self.scorer.name())
            .finish()
    }
}

impl PneumoniaClassifier {
    pub fn new(scorer: Arc<dyn ProbabilityScorer>) -> Self {
        Self { scorer }
    }

    pub fn model_name(&self) -> &str {
        self.scorer.name()
    }

    /// Score a preprocessed tensor and apply the decision rule
    pub fn classify(&self, input: &Array4<f32>) -> Result<Prediction, ClassifierError> {
        let start = Instant::now();
        let probability = self.scorer.score(input)?;
        debug!("Raw pneumonia probability: {:.6}", probability);

        let prediction = decide(probability)?;

        info!(
            "Classified as {} ({:.2}%) in {}ms",
            prediction.predicted_class,
            prediction.confidence,
            start.elapsed().as_millis()
        );

        Ok(prediction)
    }
}
