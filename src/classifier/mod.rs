// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pneumonia classifier
//!
//! Components:
//! - `decision` - Threshold rule from probability to label and confidence
//! - `model` - Scorer trait and the ONNX Runtime implementation
//! - `pipeline` - Preprocess, score and decide in one call

pub mod decision;
pub mod model;
pub mod pipeline;

use thiserror::Error;

pub use decision::{decide, Diagnosis, Prediction, CLASS_NAMES, DECISION_THRESHOLD};
pub use model::{OnnxPneumoniaModel, ProbabilityScorer};
pub use pipeline::PneumoniaClassifier;

/// Errors raised while loading or running the classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Pneumonia model not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to load pneumonia model: {0}")]
    LoadFailed(String),

    #[error("Invalid model input: {0}")]
    InvalidInput(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),
}
