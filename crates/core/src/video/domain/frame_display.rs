use crate::shared::frame::Frame;

/// An on-screen surface that shows frames and reports keypresses.
pub trait FrameDisplay: Send {
    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Waits up to `timeout_ms` for a key; `None` if nothing was pressed.
    fn poll_key(&mut self, timeout_ms: i32) -> Result<Option<char>, Box<dyn std::error::Error>>;

    /// Tears down every window this display opened.
    fn close(&mut self);
}
