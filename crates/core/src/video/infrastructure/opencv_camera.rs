use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::mat_conversion::mat_to_frame;
use crate::video::domain::frame_source::FrameSource;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("camera {index} is unavailable")]
    Unavailable { index: i32 },
    #[error("camera {index} stopped delivering frames")]
    ReadFailed { index: i32 },
    #[error("camera {index} was read before it was opened")]
    NotOpened { index: i32 },
}

/// Webcam source backed by `cv::VideoCapture`.
pub struct OpencvCamera {
    index: i32,
    capture: Option<VideoCapture>,
    buffer: Mat,
    frames_read: usize,
}

impl OpencvCamera {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            capture: None,
            buffer: Mat::default(),
            frames_read: 0,
        }
    }
}

impl FrameSource for OpencvCamera {
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let capture = VideoCapture::new(self.index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(CaptureError::Unavailable { index: self.index }.into());
        }
        log::info!("Starting video stream on camera {}", self.index);
        self.capture = Some(capture);
        Ok(())
    }

    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let index = self.index;
        let capture = self
            .capture
            .as_mut()
            .ok_or(CaptureError::NotOpened { index })?;

        // A live camera has no end of stream; an empty grab means it went away.
        if !capture.read(&mut self.buffer)? || self.buffer.empty() {
            return Err(CaptureError::ReadFailed { index }.into());
        }
        let frame = mat_to_frame(&self.buffer, self.frames_read)?;
        self.frames_read += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera {}: {e}", self.index);
            }
            log::info!(
                "Released camera {} after {} frames",
                self.index,
                self.frames_read
            );
        }
    }
}
