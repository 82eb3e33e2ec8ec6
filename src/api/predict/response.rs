// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction response types

use serde::{Deserialize, Serialize};

use crate::classifier::{Diagnosis, Prediction};

/// Response from POST /predict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// "Normal" or "Pneumonia"
    pub predicted_class: Diagnosis,
    /// Confidence in the predicted class, percent with 2 decimals
    pub confidence: f64,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            predicted_class: prediction.predicted_class,
            confidence: prediction.confidence,
        }
    }
}
