// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX pneumonia model
//!
//! Wraps the exported CNN (input `[1, 224, 224, 1]`, sigmoid output `[1, 1]`)
//! behind the [`ProbabilityScorer`] trait.

use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::ClassifierError;
use crate::vision::CLASSIFIER_INPUT_SHAPE;

/// Anything that can run a forward pass and return P(pneumonia)
pub trait ProbabilityScorer: Send + Sync {
    /// Run a forward pass on a preprocessed `[1, 224, 224, 1]` tensor
    fn score(&self, input: &Array4<f32>) -> Result<f32, ClassifierError>;

    /// Human-readable model name for logs and health output
    fn name(&self) -> &str;
}

/// Pneumonia classifier loaded from an ONNX file
///
/// Runs on the CPU execution provider. The session is loaded once and
/// shared; ONNX Runtime needs exclusive access per run, hence the mutex.
#[derive(Clone)]
pub struct OnnxPneumoniaModel {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Model output name
    output_name: String,
    /// Model file stem (e.g. "pneumonia_model")
    model_name: String,
}

impl std::fmt::Debug for OnnxPneumoniaModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPneumoniaModel")
            .field("model_name", &self.model_name)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl OnnxPneumoniaModel {
    /// Load the pneumonia model from an ONNX file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    pub fn load<P: AsRef<Path>>(model_path: P, intra_threads: usize) -> Result<Self, ClassifierError> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(ClassifierError::ModelNotFound(model_path.display().to_string()));
        }

        info!("Loading pneumonia model from {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| load_error("create session builder", model_path, e))?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(|e| load_error("set CPU execution provider", model_path, e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error("set optimization level", model_path, e))?
            .with_intra_threads(intra_threads.max(1))
            .map_err(|e| load_error("set intra threads", model_path, e))?
            .commit_from_file(model_path)
            .map_err(|e| load_error("load model", model_path, e))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| ClassifierError::LoadFailed("model declares no inputs".to_string()))?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| ClassifierError::LoadFailed("model declares no outputs".to_string()))?;

        if let Some(input) = session.inputs.first() {
            debug!("Pneumonia model input type: {:?}", input.input_type);
        }

        let model_name = model_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "pneumonia_model".to_string());

        info!(
            "Pneumonia model loaded (CPU-only) - input: {}, output: {}",
            input_name, output_name
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
            model_name,
        })
    }
}

impl ProbabilityScorer for OnnxPneumoniaModel {
    fn score(&self, input: &Array4<f32>) -> Result<f32, ClassifierError> {
        validate_input_shape(input)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ClassifierError::Inference("session mutex poisoned".to_string()))?;

        let input_value = Value::from_array(input.to_owned())
            .map_err(|e| ClassifierError::Inference(format!("failed to create input tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .map_err(|e| ClassifierError::Inference(format!("forward pass failed: {}", e)))?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| ClassifierError::InvalidOutput(format!("failed to extract output: {}", e)))?;

        debug!("Pneumonia model output shape: {:?}", output_tensor.shape());

        // Output is [batch, 1]; take element [0][0]
        output_tensor
            .iter()
            .next()
            .copied()
            .ok_or_else(|| ClassifierError::InvalidOutput("model returned an empty tensor".to_string()))
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

fn load_error(stage: &str, model_path: &Path, e: impl std::fmt::Display) -> ClassifierError {
    ClassifierError::LoadFailed(format!(
        "failed to {} for {}: {}",
        stage,
        model_path.display(),
        e
    ))
}

/// Reject tensors that do not match the trained input layout
pub fn validate_input_shape(input: &Array4<f32>) -> Result<(), ClassifierError> {
    if input.shape() != CLASSIFIER_INPUT_SHAPE {
        return Err(ClassifierError::InvalidInput(format!(
            "invalid input shape {:?}, expected {:?}",
            input.shape(),
            CLASSIFIER_INPUT_SHAPE
        )));
    }
    Ok(())
}
