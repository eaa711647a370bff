use crate::shared::bounding_box::BoundingBox;

/// A face found by the detector, with the detector's raw confidence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
}
