use ndarray::{ArrayView3, ArrayViewMut3};
use opencv::core::{Mat, Size};
use opencv::imgproc;

use super::mat_conversion::{frame_to_mat, mat_to_frame};

/// Bytes per pixel. Frames are always three-channel BGR.
pub const CHANNELS: usize = 3;

/// A single captured frame: contiguous BGR bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; everything between
/// capture and display works on this type.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// A frame filled with one BGR color.
    pub fn filled(width: u32, height: u32, bgr: [u8; 3], index: usize) -> Self {
        let data = bgr
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self::new(data, width, height, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Bilinear resize (`INTER_LINEAR`) to exactly `width` × `height`,
    /// ignoring aspect ratio. No anti-aliasing when shrinking.
    pub fn resized(&self, width: u32, height: u32) -> Result<Frame, Box<dyn std::error::Error>> {
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let src = frame_to_mat(self)?;
        let mut dst = Mat::default();
        imgproc::resize(
            &src,
            &mut dst,
            Size::new(width as i32, height as i32),
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;
        mat_to_frame(&dst, self.index)
    }

    /// Resize to `width`, scaling the height to keep the aspect ratio.
    pub fn resized_to_width(&self, width: u32) -> Result<Frame, Box<dyn std::error::Error>> {
        let ratio = width as f64 / self.width as f64;
        let height = ((self.height as f64 * ratio) as u32).max(1);
        self.resized(width, height)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }
}
