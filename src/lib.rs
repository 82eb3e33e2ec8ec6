// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod config;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{create_router, ApiError, AppState};
pub use classifier::{
    decide, ClassifierError, Diagnosis, OnnxPneumoniaModel, PneumoniaClassifier, Prediction,
    ProbabilityScorer,
};
pub use config::ServerConfig;
pub use vision::{decode_image_bytes, preprocess_bytes, preprocess_for_classifier, ImageError};
