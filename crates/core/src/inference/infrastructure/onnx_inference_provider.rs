/// Inference provider backed by an ONNX Runtime session via `ort`.
use std::path::Path;

use ndarray::{Array4, ArrayD};

use crate::inference::domain::inference_provider::InferenceProvider;

use super::execution_provider::preferred_execution_providers;

pub struct OnnxInferenceProvider {
    session: ort::session::Session,
}

impl OnnxInferenceProvider {
    /// Load an ONNX model, registering the platform's preferred
    /// execution providers.
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;
        log::debug!(
            "ONNX session ready: {} input(s), {} output(s)",
            session.inputs().len(),
            session.outputs().len()
        );
        Ok(Self { session })
    }
}

impl InferenceProvider for OnnxInferenceProvider {
    fn infer(&mut self, input: Array4<f32>) -> Result<ArrayD<f32>, Box<dyn std::error::Error>> {
        let input_value = ort::value::Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("ONNX model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        Ok(tensor.to_owned())
    }
}
