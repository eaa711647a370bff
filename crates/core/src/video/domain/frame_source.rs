use crate::shared::frame::Frame;

/// Produces frames from a live capture device.
///
/// Implementations own the device handle; the capture loop calls `open`
/// once, `read` once per iteration, and `release` exactly once at the end.
pub trait FrameSource: Send {
    /// Acquires the device. Failing here is fatal to the caller.
    fn open(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Returns the next frame in capture order, or `None` once the source
    /// has no more frames to give.
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the device. Safe to call on a source that never opened.
    fn release(&mut self);
}
