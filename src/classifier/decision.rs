// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decision rule mapping the model's scalar output to a label

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ClassifierError;

/// Probability above which an image is labelled Pneumonia (strict)
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Decimal places kept in the reported confidence percentage
pub const CONFIDENCE_DECIMALS: i32 = 2;

/// Class names in model output order
pub const CLASS_NAMES: [&str; 2] = ["Normal", "Pneumonia"];

/// Diagnosis produced by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    Normal,
    Pneumonia,
}

impl Diagnosis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Diagnosis::Normal => CLASS_NAMES[0],
            Diagnosis::Pneumonia => CLASS_NAMES[1],
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label plus confidence in that label, as a percentage (50.0-100.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_class: Diagnosis,
    pub confidence: f64,
}

/// Map the model's probability of pneumonia to a prediction
///
/// Confidence is the probability assigned to the chosen label, so it is
/// never below 50%. Values outside [0, 1] or non-finite are rejected.
pub fn decide(probability: f32) -> Result<Prediction, ClassifierError> {
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(ClassifierError::InvalidOutput(format!(
            "probability {} is outside [0, 1]",
            probability
        )));
    }

    let p = probability as f64;
    let (predicted_class, confidence) = if p > DECISION_THRESHOLD {
        (Diagnosis::Pneumonia, p)
    } else {
        (Diagnosis::Normal, 1.0 - p)
    };

    Ok(Prediction {
        predicted_class,
        confidence: round_to(confidence * 100.0, CONFIDENCE_DECIMALS),
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
