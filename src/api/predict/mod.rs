// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction API endpoint module
//!
//! Provides POST /predict for classifying an uploaded chest X-ray.

pub mod handler;
pub mod response;

pub use handler::{predict_handler, UPLOAD_FIELD};
pub use response::PredictResponse;
