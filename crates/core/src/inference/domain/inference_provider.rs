use ndarray::{Array4, ArrayD};

/// Memory order of a 4-D input batch as the caller builds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[batch, channels, height, width]`
    Nchw,
    /// `[batch, height, width, channels]`
    Nhwc,
}

/// Domain interface for a loaded network: one forward pass per call.
///
/// Inference sessions need exclusive access while running, hence
/// `&mut self`. Both the face detector and the mask classifier sit behind
/// this trait so either can be swapped for a deterministic fake.
pub trait InferenceProvider: Send {
    fn infer(&mut self, input: Array4<f32>) -> Result<ArrayD<f32>, Box<dyn std::error::Error>>;
}
