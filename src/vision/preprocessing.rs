// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the pneumonia classifier
//!
//! The classifier was trained on single-channel 224x224 images scaled
//! linearly to [0, 1], laid out NHWC. These parameters must match training.

use image::{imageops::FilterType, DynamicImage, GrayImage, Luma};
use ndarray::Array4;

use super::image_utils::{decode_image_bytes, ImageError};

/// Target width and height of the classifier input
pub const CLASSIFIER_INPUT_SIZE: u32 = 224;

/// Channel count of the classifier input (grayscale)
pub const CLASSIFIER_INPUT_CHANNELS: usize = 1;

/// Largest 8-bit pixel value; pixels are divided by it
pub const PIXEL_MAX: f32 = 255.0;

/// Linear normalization factor applied to 8-bit pixel values
pub const PIXEL_SCALE: f32 = 1.0 / PIXEL_MAX;

/// Resampling filter used for the resize (bicubic)
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Shape of the tensor produced by [`preprocess_for_classifier`]
pub const CLASSIFIER_INPUT_SHAPE: [usize; 4] = [
    1,
    CLASSIFIER_INPUT_SIZE as usize,
    CLASSIFIER_INPUT_SIZE as usize,
    CLASSIFIER_INPUT_CHANNELS,
];

/// Convert an image to single-channel grayscale
///
/// Uses the ITU-R 601-2 luma transform
/// `L = R * 299/1000 + G * 587/1000 + B * 114/1000` in 16-bit fixed point.
/// Alpha is discarded. 8-bit grayscale input is returned unchanged.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    let mut gray = GrayImage::new(rgb.width(), rgb.height());

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let luma = (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;
        gray.put_pixel(x, y, Luma([luma as u8]));
    }

    gray
}

/// Preprocess a decoded image for the classifier
///
/// Steps:
/// 1. Convert to grayscale
/// 2. Resize to CLASSIFIER_INPUT_SIZE x CLASSIFIER_INPUT_SIZE (no crop, aspect ratio is not kept)
/// 3. Scale pixels to [0, 1] (divide by PIXEL_MAX)
/// 4. Lay out as NHWC tensor [1, 224, 224, 1]
pub fn preprocess_for_classifier(image: &DynamicImage) -> Array4<f32> {
    let gray = to_grayscale(image);
    let resized = image::imageops::resize(
        &gray,
        CLASSIFIER_INPUT_SIZE,
        CLASSIFIER_INPUT_SIZE,
        RESIZE_FILTER,
    );

    let size = CLASSIFIER_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, size, size, CLASSIFIER_INPUT_CHANNELS));

    for (x, y, pixel) in resized.enumerate_pixels() {
        // Division keeps 255 at exactly 1.0
        tensor[[0, y as usize, x as usize, 0]] = pixel.0[0] as f32 / PIXEL_MAX;
    }

    tensor
}

/// Decode raw upload bytes and preprocess them for the classifier
pub fn preprocess_bytes(bytes: &[u8]) -> Result<Array4<f32>, ImageError> {
    let (image, _info) = decode_image_bytes(bytes)?;
    Ok(preprocess_for_classifier(&image))
}
