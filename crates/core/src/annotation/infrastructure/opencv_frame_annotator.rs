use opencv::core::{Point, Rect, Scalar};
use opencv::imgproc;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::classification::domain::prediction::Prediction;
use crate::detection::domain::detection::Detection;
use crate::shared::constants::{LABEL_FONT_SCALE, LABEL_OFFSET_Y, LINE_THICKNESS};
use crate::shared::frame::Frame;
use crate::shared::mat_conversion::{copy_mat_into_frame, frame_to_mat};

/// Draws a colored box and a `Label: NN.NN%` caption per face using
/// OpenCV's Hershey font.
#[derive(Default)]
pub struct OpencvFrameAnnotator;

impl OpencvFrameAnnotator {
    pub fn new() -> Self {
        Self
    }
}

impl FrameAnnotator for OpencvFrameAnnotator {
    fn annotate(
        &self,
        frame: &mut Frame,
        detections: &[Detection],
        predictions: &[Prediction],
    ) -> Result<(), Box<dyn std::error::Error>> {
        if detections.is_empty() || predictions.is_empty() {
            return Ok(());
        }

        let mut mat = frame_to_mat(frame)?;
        for (detection, prediction) in detections.iter().zip(predictions) {
            let bbox = detection.bbox;
            let color = bgr_scalar(prediction.label().color());
            let (x, y) = (bbox.start_x() as i32, bbox.start_y() as i32);

            imgproc::put_text(
                &mut mat,
                &prediction.caption(),
                Point::new(x, y - LABEL_OFFSET_Y),
                imgproc::FONT_HERSHEY_SIMPLEX,
                LABEL_FONT_SCALE,
                color,
                LINE_THICKNESS,
                imgproc::LINE_8,
                false,
            )?;
            imgproc::rectangle(
                &mut mat,
                Rect::new(x, y, bbox.width() as i32, bbox.height() as i32),
                color,
                LINE_THICKNESS,
                imgproc::LINE_8,
                0,
            )?;
        }
        copy_mat_into_frame(&mat, frame)?;
        Ok(())
    }
}

fn bgr_scalar(bgr: [u8; 3]) -> Scalar {
    Scalar::new(bgr[0] as f64, bgr[1] as f64, bgr[2] as f64, 0.0)
}
