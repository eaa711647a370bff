/// Batched mask/no-mask classification over an [`InferenceProvider`].
use ndarray::{stack, Axis, Ix2};

use crate::classification::domain::face_crop::FaceCrop;
use crate::classification::domain::prediction::Prediction;
use crate::inference::domain::inference_provider::{InferenceProvider, TensorLayout};

pub struct MaskClassifier {
    provider: Box<dyn InferenceProvider>,
}

impl MaskClassifier {
    /// Batches are stacked crops, `[N, 224, 224, 3]`.
    pub const INPUT_LAYOUT: TensorLayout = TensorLayout::Nhwc;

    pub fn new(provider: Box<dyn InferenceProvider>) -> Self {
        Self { provider }
    }

    /// Classifies all crops in one `[N, 224, 224, 3]` inference call.
    ///
    /// Predictions come back in crop order. An empty slice never reaches
    /// the model.
    pub fn classify(
        &mut self,
        crops: &[FaceCrop],
    ) -> Result<Vec<Prediction>, Box<dyn std::error::Error>> {
        if crops.is_empty() {
            return Ok(Vec::new());
        }

        let views: Vec<_> = crops.iter().map(|c| c.pixels()).collect();
        let batch = stack(Axis(0), &views)?;
        let output = self.provider.infer(batch)?;

        let scores = output
            .into_dimensionality::<Ix2>()
            .map_err(|e| format!("Classifier output must be [batch, classes]: {e}"))?;
        let (rows, cols) = scores.dim();
        if rows != crops.len() || cols < 2 {
            return Err(format!(
                "Classifier returned shape [{rows}, {cols}] for a batch of {}",
                crops.len()
            )
            .into());
        }

        Ok(scores
            .outer_iter()
            .map(|row| Prediction::new(row[0], row[1]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bounding_box::BoundingBox;
    use crate::shared::frame::Frame;
    use approx::assert_relative_eq;
    use ndarray::{Array2, Array4, ArrayD, IxDyn};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Scores each crop by its mean pixel value: mask = mean, no_mask = -mean.
    struct MeanScoringNet {
        calls: Arc<AtomicUsize>,
        batch_sizes: Arc<Mutex<Vec<usize>>>,
    }

    impl MeanScoringNet {
        fn new() -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                batch_sizes: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl InferenceProvider for MeanScoringNet {
        fn infer(
            &mut self,
            input: Array4<f32>,
        ) -> Result<ArrayD<f32>, Box<dyn std::error::Error>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let n = input.shape()[0];
            self.batch_sizes.lock().unwrap().push(n);
            let scores = Array2::from_shape_fn((n, 2), |(i, c)| {
                let mean = input.index_axis(Axis(0), i).mean().unwrap_or(0.0);
                if c == 0 {
                    mean
                } else {
                    -mean
                }
            });
            Ok(scores.into_dyn())
        }
    }

    struct FixedOutputNet {
        shape: Vec<usize>,
    }

    impl InferenceProvider for FixedOutputNet {
        fn infer(
            &mut self,
            _input: Array4<f32>,
        ) -> Result<ArrayD<f32>, Box<dyn std::error::Error>> {
            Ok(ArrayD::zeros(IxDyn(&self.shape)))
        }
    }

    fn gray_crop(value: u8) -> FaceCrop {
        let frame = Frame::filled(20, 20, [value, value, value], 0);
        let bbox = BoundingBox::clamped(0, 0, 20, 20, 20, 20).unwrap();
        FaceCrop::from_frame(&frame, &bbox).unwrap()
    }

    #[test]
    fn test_empty_input_skips_model() {
        let net = MeanScoringNet::new();
        let calls = net.calls.clone();
        let mut classifier = MaskClassifier::new(Box::new(net));
        let predictions = classifier.classify(&[]).unwrap();
        assert!(predictions.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_single_batched_call_for_all_crops() {
        let net = MeanScoringNet::new();
        let calls = net.calls.clone();
        let batch_sizes = net.batch_sizes.clone();
        let mut classifier = MaskClassifier::new(Box::new(net));
        let crops: Vec<FaceCrop> = (0..4).map(|i| gray_crop(i * 50)).collect();
        classifier.classify(&crops).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*batch_sizes.lock().unwrap(), vec![4]);
    }

    #[test]
    fn test_output_order_matches_input_order() {
        let mut classifier = MaskClassifier::new(Box::new(MeanScoringNet::new()));
        let values = [255u8, 0, 200, 51, 127];
        let crops: Vec<FaceCrop> = values.iter().map(|&v| gray_crop(v)).collect();
        let predictions = classifier.classify(&crops).unwrap();

        assert_eq!(predictions.len(), values.len());
        for (prediction, &v) in predictions.iter().zip(values.iter()) {
            let expected = v as f32 / 127.5 - 1.0;
            assert_relative_eq!(prediction.mask, expected, epsilon = 1e-5);
            assert_relative_eq!(prediction.no_mask, -expected, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_wrong_batch_size_is_an_error() {
        let mut classifier = MaskClassifier::new(Box::new(FixedOutputNet { shape: vec![1, 2] }));
        let crops = vec![gray_crop(10), gray_crop(20)];
        assert!(classifier.classify(&crops).is_err());
    }

    #[test]
    fn test_single_class_output_is_an_error() {
        let mut classifier = MaskClassifier::new(Box::new(FixedOutputNet { shape: vec![2, 1] }));
        let crops = vec![gray_crop(10), gray_crop(20)];
        assert!(classifier.classify(&crops).is_err());
    }

    #[test]
    fn test_non_matrix_output_is_an_error() {
        let mut classifier =
            MaskClassifier::new(Box::new(FixedOutputNet { shape: vec![1, 1, 2] }));
        assert!(classifier.classify(&[gray_crop(10)]).is_err());
    }
}
