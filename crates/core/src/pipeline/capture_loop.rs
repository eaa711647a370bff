/// Live capture pipeline: read → resize → detect/classify → annotate →
/// display → poll key, as an explicit INIT → RUNNING → STOPPED machine.
use std::thread;
use std::time::{Duration, Instant};

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::constants::{DISPLAY_WIDTH, EXIT_KEY, KEY_TIMEOUT_MS, WARMUP_SECS};
use crate::video::domain::frame_display::FrameDisplay;
use crate::video::domain::frame_source::FrameSource;

use super::mask_detector::MaskDetector;
use super::pipeline_logger::{LogPipelineLogger, PipelineLogger};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Init,
    Running,
    Stopped,
}

/// Decides from the last polled key whether the loop should stop.
pub type ExitPredicate = Box<dyn FnMut(Option<char>) -> bool>;

/// Stops when `key` is pressed.
pub fn quit_on_key(key: char) -> ExitPredicate {
    Box::new(move |pressed| pressed == Some(key))
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaptureConfig {
    /// Frames are resized to this width before detection, keeping aspect ratio.
    pub display_width: u32,
    /// Pause after opening the source so the camera can settle.
    pub warmup: Duration,
    pub key_timeout_ms: i32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            display_width: DISPLAY_WIDTH,
            warmup: Duration::from_secs_f64(WARMUP_SECS),
            key_timeout_ms: KEY_TIMEOUT_MS,
        }
    }
}

pub struct CaptureLoop {
    source: Box<dyn FrameSource>,
    display: Box<dyn FrameDisplay>,
    detector: MaskDetector,
    annotator: Box<dyn FrameAnnotator>,
    logger: Box<dyn PipelineLogger>,
    should_exit: ExitPredicate,
    config: CaptureConfig,
    state: LoopState,
}

impl CaptureLoop {
    /// Builds a loop in the INIT state that exits on `q` and logs through
    /// [`LogPipelineLogger`].
    pub fn new(
        source: Box<dyn FrameSource>,
        display: Box<dyn FrameDisplay>,
        detector: MaskDetector,
        annotator: Box<dyn FrameAnnotator>,
        config: CaptureConfig,
    ) -> Self {
        Self {
            source,
            display,
            detector,
            annotator,
            logger: Box::new(LogPipelineLogger::default()),
            should_exit: quit_on_key(EXIT_KEY),
            config,
            state: LoopState::Init,
        }
    }

    pub fn with_exit_predicate(mut self, should_exit: ExitPredicate) -> Self {
        self.should_exit = should_exit;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Runs the loop to completion and returns the number of frames shown.
    ///
    /// Any error ends the loop; the source and display are released before
    /// the error is returned. A loop runs once.
    pub fn run(&mut self) -> Result<usize, Box<dyn std::error::Error>> {
        if self.state != LoopState::Init {
            return Err(format!("Capture loop cannot run from state {:?}", self.state).into());
        }

        let result = self.start().and_then(|()| {
            self.state = LoopState::Running;
            self.run_frames()
        });
        self.stop();
        result
    }

    fn start(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.source.open()?;
        if !self.config.warmup.is_zero() {
            self.logger.info(&format!(
                "Waiting {:.1}s for the camera to warm up",
                self.config.warmup.as_secs_f64()
            ));
            thread::sleep(self.config.warmup);
        }
        Ok(())
    }

    fn run_frames(&mut self) -> Result<usize, Box<dyn std::error::Error>> {
        let mut shown = 0;
        while self.step()? {
            shown += 1;
        }
        Ok(shown)
    }

    /// One RUNNING iteration. Returns `false` when the loop should stop
    /// without having shown a frame, `true` otherwise; an exit key stops
    /// the loop after the current frame is counted.
    fn step(&mut self) -> Result<bool, Box<dyn std::error::Error>> {
        if self.state != LoopState::Running {
            return Ok(false);
        }
        let Some(captured) = self.source.read()? else {
            self.logger.info("Frame source exhausted");
            self.state = LoopState::Stopped;
            return Ok(false);
        };

        let mut frame = captured.resized_to_width(self.config.display_width)?;
        let result = self
            .detector
            .detect_and_predict(&frame, self.logger.as_mut())?;

        let t0 = Instant::now();
        self.annotator
            .annotate(&mut frame, &result.detections, &result.predictions)?;
        self.logger
            .timing("annotate", t0.elapsed().as_secs_f64() * 1000.0);

        let t1 = Instant::now();
        self.display.show(&frame)?;
        let key = self.display.poll_key(self.config.key_timeout_ms)?;
        self.logger
            .timing("display", t1.elapsed().as_secs_f64() * 1000.0);
        self.logger.frame_done(frame.index());

        if (self.should_exit)(key) {
            self.logger.info("Exit key pressed");
            self.state = LoopState::Stopped;
        }
        Ok(true)
    }

    fn stop(&mut self) {
        self.state = LoopState::Stopped;
        self.display.close();
        self.source.release();
        self.logger.summary();
    }
}
