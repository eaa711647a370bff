use crate::classification::domain::prediction::Prediction;
use crate::detection::domain::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for drawing classification results onto a frame.
///
/// Detections and predictions are paired by index; surplus entries on
/// either side are ignored. Implementations modify the frame in place and
/// leave it untouched when there is nothing to draw.
pub trait FrameAnnotator: Send {
    fn annotate(
        &self,
        frame: &mut Frame,
        detections: &[Detection],
        predictions: &[Prediction],
    ) -> Result<(), Box<dyn std::error::Error>>;
}
