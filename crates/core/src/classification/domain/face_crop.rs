use ndarray::{s, Array3, ArrayView3};

use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::CROP_SIZE;
use crate::shared::frame::Frame;

/// MobileNetV2 input scaling: maps `0..=255` onto `-1.0..=1.0`.
const PIXEL_HALF_RANGE: f32 = 127.5;

/// A face cut out of a frame and prepared for the mask classifier:
/// RGB, 224×224, HWC float32 in `[-1, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceCrop {
    pixels: Array3<f32>,
}

impl FaceCrop {
    pub fn from_frame(
        frame: &Frame,
        bbox: &BoundingBox,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let view = frame.as_ndarray();
        let roi = view.slice(s![
            bbox.start_y() as usize..bbox.end_y() as usize,
            bbox.start_x() as usize..bbox.end_x() as usize,
            ..
        ]);
        let face = Frame::new(
            roi.iter().copied().collect(),
            bbox.width(),
            bbox.height(),
            frame.index(),
        );
        let resized = face.resized(CROP_SIZE, CROP_SIZE)?;
        let bgr = resized.as_ndarray();

        // BGR -> RGB while scaling
        let size = CROP_SIZE as usize;
        let pixels = Array3::from_shape_fn((size, size, 3), |(y, x, c)| {
            bgr[[y, x, 2 - c]] as f32 / PIXEL_HALF_RANGE - 1.0
        });
        Ok(Self { pixels })
    }

    pub fn pixels(&self) -> ArrayView3<'_, f32> {
        self.pixels.view()
    }
}
