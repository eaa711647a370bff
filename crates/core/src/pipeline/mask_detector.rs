use std::time::Instant;

use crate::classification::domain::face_crop::FaceCrop;
use crate::classification::domain::mask_classifier::MaskClassifier;
use crate::classification::domain::prediction::Prediction;
use crate::detection::domain::detection::Detection;
use crate::detection::domain::face_locator::{FaceLocator, LocatorConfig};
use crate::shared::frame::Frame;

use super::pipeline_logger::PipelineLogger;

/// Everything found in one frame. `predictions[i]` belongs to `detections[i]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameResult {
    pub detections: Vec<Detection>,
    pub predictions: Vec<Prediction>,
}

/// Per-frame inference step: locate faces, crop them, classify the batch.
pub struct MaskDetector {
    locator: FaceLocator,
    classifier: MaskClassifier,
    config: LocatorConfig,
}

impl MaskDetector {
    pub fn new(locator: FaceLocator, classifier: MaskClassifier, config: LocatorConfig) -> Self {
        Self {
            locator,
            classifier,
            config,
        }
    }

    pub fn detect_and_predict(
        &mut self,
        frame: &Frame,
        logger: &mut dyn PipelineLogger,
    ) -> Result<FrameResult, Box<dyn std::error::Error>> {
        let t0 = Instant::now();
        let detections = self.locator.locate(frame, &self.config)?;
        logger.timing("detect", t0.elapsed().as_secs_f64() * 1000.0);
        logger.metric("faces", detections.len() as f64);

        let t1 = Instant::now();
        let crops: Vec<FaceCrop> = detections
            .iter()
            .map(|d| FaceCrop::from_frame(frame, &d.bbox))
            .collect::<Result<_, _>>()?;
        let predictions = self.classifier.classify(&crops)?;
        // Recorded on faceless frames too so both stage averages cover every frame.
        logger.timing("classify", t1.elapsed().as_secs_f64() * 1000.0);

        Ok(FrameResult {
            detections,
            predictions,
        })
    }
}
