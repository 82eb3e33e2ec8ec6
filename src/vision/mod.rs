// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for chest X-ray uploads
//!
//! This module provides:
//! - Decoding of uploaded image bytes with format sniffing
//! - Conversion of decoded images into the classifier's input tensor

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo, ACCEPTED_FORMATS};
pub use preprocessing::{
    preprocess_bytes, preprocess_for_classifier, to_grayscale, CLASSIFIER_INPUT_CHANNELS,
    CLASSIFIER_INPUT_SHAPE, CLASSIFIER_INPUT_SIZE, PIXEL_MAX, PIXEL_SCALE,
};
