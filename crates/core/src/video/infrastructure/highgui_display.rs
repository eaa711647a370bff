use opencv::highgui;

use crate::shared::frame::Frame;
use crate::shared::mat_conversion::frame_to_mat;
use crate::video::domain::frame_display::FrameDisplay;

/// Shows frames in a named HighGUI window.
pub struct HighguiDisplay {
    window: String,
}

impl HighguiDisplay {
    pub fn new(window: &str) -> Self {
        Self {
            window: window.to_string(),
        }
    }
}

impl FrameDisplay for HighguiDisplay {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let mat = frame_to_mat(frame)?;
        highgui::imshow(&self.window, &mat)?;
        Ok(())
    }

    fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<char>, Box<dyn std::error::Error>> {
        let key = highgui::wait_key(timeout_ms)?;
        Ok(decode_key(key))
    }

    fn close(&mut self) {
        if let Err(e) = highgui::destroy_all_windows() {
            log::warn!("Failed to close display windows: {e}");
        }
    }
}

/// `waitKey` returns -1 for no key; the low byte holds the character.
fn decode_key(code: i32) -> Option<char> {
    if code < 0 {
        None
    } else {
        Some(char::from((code & 0xFF) as u8))
    }
}
