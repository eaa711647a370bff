use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;

use maskwatch_core::annotation::infrastructure::opencv_frame_annotator::OpencvFrameAnnotator;
use maskwatch_core::classification::domain::mask_classifier::MaskClassifier;
use maskwatch_core::detection::domain::face_locator::{FaceLocator, LocatorConfig};
use maskwatch_core::inference::infrastructure::model_loader;
use maskwatch_core::pipeline::capture_loop::{CaptureConfig, CaptureLoop};
use maskwatch_core::pipeline::mask_detector::MaskDetector;
use maskwatch_core::shared::constants::{
    DEFAULT_FACE_DIR, DEFAULT_MASK_MODEL, KEY_TIMEOUT_MS, WINDOW_TITLE,
};
use maskwatch_core::video::infrastructure::highgui_display::HighguiDisplay;
use maskwatch_core::video::infrastructure::opencv_camera::OpencvCamera;

/// Real-time face mask detection on a webcam stream. Press `q` to quit.
#[derive(Parser)]
#[command(name = "maskwatch")]
struct Cli {
    /// Directory containing the face detector model files.
    #[arg(short, long, default_value = DEFAULT_FACE_DIR)]
    face: PathBuf,

    /// Path to the trained face mask classifier (.onnx or .tflite).
    #[arg(short, long, default_value = DEFAULT_MASK_MODEL)]
    model: PathBuf,

    /// Minimum probability to filter weak face detections (0.0-1.0).
    #[arg(short, long, default_value = "0.5")]
    confidence: f32,

    /// Camera device index.
    #[arg(long, default_value = "0")]
    camera: i32,

    /// Display width in pixels; height follows the camera's aspect ratio.
    #[arg(long, default_value = "500")]
    width: u32,

    /// Seconds to wait for the camera to warm up.
    #[arg(long, default_value = "2.0")]
    warmup: f64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let detector = MaskDetector::new(
        FaceLocator::new(model_loader::load_face_detector(&cli.face)?),
        MaskClassifier::new(model_loader::load_mask_classifier(&cli.model)?),
        LocatorConfig {
            confidence: cli.confidence,
        },
    );

    let config = CaptureConfig {
        display_width: cli.width,
        warmup: warmup(&cli)?,
        key_timeout_ms: KEY_TIMEOUT_MS,
    };

    let mut capture = CaptureLoop::new(
        Box::new(OpencvCamera::new(cli.camera)),
        Box::new(HighguiDisplay::new(WINDOW_TITLE)),
        detector,
        Box::new(OpencvFrameAnnotator::new()),
        config,
    );
    let frames = capture.run()?;
    log::info!("Stopped after {frames} frames");

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.camera < 0 {
        return Err(format!("Camera index must be non-negative, got {}", cli.camera).into());
    }
    if cli.width == 0 {
        return Err("Display width must be positive".into());
    }
    warmup(cli)?;
    Ok(())
}

/// Rejects negative, non-finite and out-of-range values instead of panicking.
fn warmup(cli: &Cli) -> Result<Duration, Box<dyn std::error::Error>> {
    Duration::try_from_secs_f64(cli.warmup).map_err(|_| {
        format!(
            "Warm-up must be a non-negative number of seconds, got {}",
            cli.warmup
        )
        .into()
    })
}
