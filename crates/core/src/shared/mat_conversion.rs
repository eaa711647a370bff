//! Conversions between [`Frame`] and OpenCV `Mat` at the I/O boundary.
use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::prelude::*;

use crate::shared::frame::Frame;

/// Copies a frame into a new `CV_8UC3` matrix.
pub fn frame_to_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(frame.data());
    Ok(mat)
}

/// Copies a `CV_8UC3` matrix into a frame with the given capture index.
pub fn mat_to_frame(mat: &Mat, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    if mat.typ() != CV_8UC3 {
        return Err(format!("Expected an 8-bit BGR image, got Mat type {}", mat.typ()).into());
    }
    let data = if mat.is_continuous() {
        mat.data_bytes()?.to_vec()
    } else {
        mat.try_clone()?.data_bytes()?.to_vec()
    };
    Ok(Frame::new(data, mat.cols() as u32, mat.rows() as u32, index))
}

/// Writes the matrix pixels back over an equally sized frame.
pub fn copy_mat_into_frame(mat: &Mat, frame: &mut Frame) -> opencv::Result<()> {
    frame.data_mut().copy_from_slice(mat.data_bytes()?);
    Ok(())
}
