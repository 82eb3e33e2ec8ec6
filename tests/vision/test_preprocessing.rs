// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Preprocessing tests for uploaded X-rays
//!
//! For any decodable image, in any supported format and of any size,
//! preprocessing must yield a `[1, 224, 224, 1]` tensor with values in [0, 1].

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use pneumonia_detection_api::vision::{
    decode_image_bytes, preprocess_bytes, preprocess_for_classifier, ImageError,
    CLASSIFIER_INPUT_SHAPE,
};
use std::io::Cursor;

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

fn assert_valid_tensor(tensor: &ndarray::Array4<f32>) {
    assert_eq!(tensor.shape(), &CLASSIFIER_INPUT_SHAPE);
    assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[cfg(test)]
mod preprocessing_tests {
    use super::*;

    #[test]
    fn test_every_supported_format_yields_model_shape() {
        let img = gradient(97, 61);

        for format in [
            ImageFormat::Png,
            ImageFormat::Jpeg,
            ImageFormat::Bmp,
            ImageFormat::Gif,
            ImageFormat::Tiff,
        ] {
            let bytes = encode(&img, format);
            let (_decoded, info) = decode_image_bytes(&bytes)
                .unwrap_or_else(|e| panic!("{:?} failed to decode: {}", format, e));
            assert_eq!(info.format, format);
            assert_eq!((info.width, info.height), (97, 61));

            assert_valid_tensor(&preprocess_bytes(&bytes).unwrap());
        }
    }

    #[test]
    fn test_any_size_yields_model_shape() {
        for (w, h) in [(1, 1), (224, 224), (225, 223), (1024, 768), (50, 900)] {
            assert_valid_tensor(&preprocess_for_classifier(&gradient(w, h)));
        }
    }

    #[test]
    fn test_already_target_size_grayscale_is_scaled_only() {
        let gray = image::GrayImage::from_fn(224, 224, |x, _| image::Luma([(x % 256) as u8]));
        let tensor = preprocess_for_classifier(&DynamicImage::ImageLuma8(gray));

        assert_eq!(tensor[[0, 0, 0, 0]], 0.0);
        assert!((tensor[[0, 10, 200, 0]] - 200.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_preprocessing_is_deterministic() {
        let bytes = encode(&gradient(300, 180), ImageFormat::Png);
        let first = preprocess_bytes(&bytes).unwrap();
        let second = preprocess_bytes(&bytes).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_image_bytes_are_rejected() {
        let result = preprocess_bytes(b"{\"not\": \"an image\"}");
        assert!(matches!(result, Err(ImageError::UnsupportedFormat)));
    }
}
