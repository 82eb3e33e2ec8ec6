// Version information for the Pneumonia Detection API

/// Full version string with feature description
pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"), "-onnx-cpu");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "multipart-upload",
    "grayscale-224",
    "onnx-runtime",
    "single-origin-cors",
];

/// Get version information as a formatted string
pub fn get_version_info() -> String {
    format!("Pneumonia Detection API {} ({})", VERSION, FEATURES.join(", "))
}
