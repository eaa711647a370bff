/// SSD face localization over an [`InferenceProvider`].
///
/// Builds the 300×300 mean-subtracted blob, runs one forward pass, and turns
/// the `DetectionOutput` records into clamped pixel boxes.
use ndarray::Array4;

use crate::detection::domain::detection::Detection;
use crate::inference::domain::inference_provider::InferenceProvider;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::{
    DEFAULT_CONFIDENCE, DETECTION_RECORD_LEN, FACE_BLOB_MEAN, FACE_BLOB_SIZE,
};
use crate::shared::frame::Frame;

/// Face localization settings, passed explicitly on every call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocatorConfig {
    /// Detections must score strictly above this to be kept.
    pub confidence: f32,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

pub struct FaceLocator {
    provider: Box<dyn InferenceProvider>,
}

impl FaceLocator {
    pub fn new(provider: Box<dyn InferenceProvider>) -> Self {
        Self { provider }
    }

    /// Returns faces scoring above `config.confidence`, in the network's
    /// output order.
    pub fn locate(
        &mut self,
        frame: &Frame,
        config: &LocatorConfig,
    ) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        let blob = build_blob(frame)?;
        let output = self.provider.infer(blob)?;
        let output = output.as_standard_layout();
        let values = output.as_slice().ok_or("Cannot get detector output slice")?;
        parse_detections(values, frame.width(), frame.height(), config.confidence)
    }
}

/// Bilinear resize to the blob size, subtract the BGR means, NCHW float32.
fn build_blob(frame: &Frame) -> Result<Array4<f32>, Box<dyn std::error::Error>> {
    let size = FACE_BLOB_SIZE as usize;
    let resized = frame.resized(FACE_BLOB_SIZE, FACE_BLOB_SIZE)?;
    let src = resized.as_ndarray();
    Ok(Array4::from_shape_fn((1, 3, size, size), |(_, c, y, x)| {
        src[[y, x, c]] as f32 - FACE_BLOB_MEAN[c]
    }))
}

/// Decodes `[image_id, class_id, confidence, x1, y1, x2, y2]` records.
fn parse_detections(
    values: &[f32],
    frame_width: u32,
    frame_height: u32,
    threshold: f32,
) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
    if values.len() % DETECTION_RECORD_LEN != 0 {
        return Err(format!(
            "Detector output length {} is not a multiple of {DETECTION_RECORD_LEN}",
            values.len()
        )
        .into());
    }

    let detections = values
        .chunks_exact(DETECTION_RECORD_LEN)
        .filter(|record| record[2] > threshold)
        .filter_map(|record| {
            let corners = [record[3], record[4], record[5], record[6]];
            BoundingBox::from_normalized(corners, frame_width, frame_height).map(|bbox| {
                Detection {
                    bbox,
                    confidence: record[2],
                }
            })
        })
        .collect();
    Ok(detections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn};
    use rstest::rstest;
    use std::sync::{Arc, Mutex};

    /// Returns a fixed SSD output and records the shapes it was fed.
    struct FakeDetectorNet {
        records: Vec<[f32; 7]>,
        inputs: Arc<Mutex<Vec<Vec<usize>>>>,
    }

    impl FakeDetectorNet {
        fn new(records: Vec<[f32; 7]>) -> Self {
            Self {
                records,
                inputs: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl InferenceProvider for FakeDetectorNet {
        fn infer(
            &mut self,
            input: Array4<f32>,
        ) -> Result<ArrayD<f32>, Box<dyn std::error::Error>> {
            self.inputs.lock().unwrap().push(input.shape().to_vec());
            let flat: Vec<f32> = self.records.iter().flatten().copied().collect();
            Ok(ArrayD::from_shape_vec(
                IxDyn(&[1, 1, self.records.len(), 7]),
                flat,
            )?)
        }
    }

    fn record(confidence: f32, corners: [f32; 4]) -> [f32; 7] {
        [0.0, 1.0, confidence, corners[0], corners[1], corners[2], corners[3]]
    }

    fn sample_records() -> Vec<[f32; 7]> {
        vec![
            record(0.95, [0.1, 0.1, 0.3, 0.4]),
            record(0.30, [0.5, 0.5, 0.7, 0.7]),
            record(0.50, [0.2, 0.6, 0.4, 0.9]),
            record(0.75, [0.6, 0.1, 0.9, 0.5]),
            record(0.05, [0.0, 0.0, 1.0, 1.0]),
        ]
    }

    fn locate(records: Vec<[f32; 7]>, frame: &Frame, confidence: f32) -> Vec<Detection> {
        let mut locator = FaceLocator::new(Box::new(FakeDetectorNet::new(records)));
        locator
            .locate(frame, &LocatorConfig { confidence })
            .unwrap()
    }

    #[test]
    fn test_blob_shape_and_mean_subtraction() {
        let frame = Frame::filled(64, 48, [104, 177, 123], 0);
        let blob = build_blob(&frame).unwrap();
        assert_eq!(blob.shape(), &[1, 3, 300, 300]);
        assert!(blob.iter().all(|&v| v.abs() < 1e-6));
    }

    #[test]
    fn test_blob_keeps_bgr_channel_order() {
        let frame = Frame::filled(10, 10, [114, 187, 133], 0);
        let blob = build_blob(&frame).unwrap();
        assert_relative_eq!(blob[[0, 0, 150, 150]], 10.0);
        assert_relative_eq!(blob[[0, 1, 150, 150]], 10.0);
        assert_relative_eq!(blob[[0, 2, 0, 299]], 10.0);
    }

    #[test]
    fn test_locate_runs_one_pass_on_blob() {
        let net = FakeDetectorNet::new(sample_records());
        let inputs = net.inputs.clone();
        let mut locator = FaceLocator::new(Box::new(net));
        let frame = Frame::filled(500, 375, [0, 0, 0], 0);
        locator.locate(&frame, &LocatorConfig::default()).unwrap();
        assert_eq!(*inputs.lock().unwrap(), vec![vec![1, 3, 300, 300]]);
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.25)]
    #[case(0.5)]
    #[case(0.75)]
    #[case(0.95)]
    #[case(1.0)]
    fn test_only_detections_above_threshold(#[case] threshold: f32) {
        let frame = Frame::filled(500, 375, [0, 0, 0], 0);
        let detections = locate(sample_records(), &frame, threshold);
        let expected = sample_records()
            .iter()
            .filter(|r| r[2] > threshold)
            .count();
        assert_eq!(detections.len(), expected);
        assert!(detections.iter().all(|d| d.confidence > threshold));
    }

    #[test]
    fn test_threshold_is_strict() {
        let frame = Frame::filled(100, 100, [0, 0, 0], 0);
        let detections = locate(vec![record(0.5, [0.1, 0.1, 0.5, 0.5])], &frame, 0.5);
        assert!(detections.is_empty());
    }

    #[test]
    fn test_preserves_network_order() {
        let frame = Frame::filled(500, 375, [0, 0, 0], 0);
        let detections = locate(sample_records(), &frame, 0.4);
        let confidences: Vec<f32> = detections.iter().map(|d| d.confidence).collect();
        assert_eq!(confidences, vec![0.95, 0.50, 0.75]);
    }

    #[test]
    fn test_scales_boxes_to_frame_pixels() {
        let frame = Frame::filled(500, 400, [0, 0, 0], 0);
        let detections = locate(vec![record(0.9, [0.1, 0.25, 0.3, 0.5])], &frame, 0.5);
        let b = detections[0].bbox;
        assert_eq!((b.start_x(), b.start_y(), b.end_x(), b.end_y()), (50, 100, 150, 200));
    }

    #[test]
    fn test_boxes_clamped_to_frame() {
        let frame = Frame::filled(500, 375, [0, 0, 0], 0);
        let records = vec![
            record(0.9, [-0.2, -0.3, 0.4, 0.5]),
            record(0.9, [0.7, 0.6, 1.4, 1.2]),
            record(0.9, [-1.0, -1.0, 2.0, 2.0]),
        ];
        let detections = locate(records, &frame, 0.5);
        assert_eq!(detections.len(), 3);
        for d in &detections {
            let b = d.bbox;
            assert!(b.start_x() < b.end_x() && b.end_x() <= frame.width());
            assert!(b.start_y() < b.end_y() && b.end_y() <= frame.height());
        }
    }

    #[test]
    fn test_boxes_outside_frame_are_dropped() {
        let frame = Frame::filled(500, 375, [0, 0, 0], 0);
        let records = vec![
            record(0.9, [1.1, 0.2, 1.5, 0.4]),
            record(0.9, [0.3, 0.3, 0.3, 0.6]),
            record(0.9, [0.1, 0.1, 0.2, 0.2]),
        ];
        let detections = locate(records, &frame, 0.5);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].bbox.start_x(), 50);
    }

    #[test]
    fn test_no_records_means_no_detections() {
        let frame = Frame::filled(500, 375, [0, 0, 0], 0);
        assert!(locate(Vec::new(), &frame, 0.5).is_empty());
    }

    #[test]
    fn test_malformed_output_is_an_error() {
        assert!(parse_detections(&[0.0; 10], 100, 100, 0.5).is_err());
    }
}
