/// Face-detector network description inside the `--face` directory.
pub const FACE_PROTOTXT_NAME: &str = "deploy.prototxt";
/// Face-detector weights inside the `--face` directory.
pub const FACE_WEIGHTS_NAME: &str = "res10_300x300_ssd_iter_140000.caffemodel";

pub const DEFAULT_FACE_DIR: &str = "face_detector";
pub const DEFAULT_MASK_MODEL: &str = "converted_model.tflite";

/// Side length of the square blob fed to the SSD face detector.
pub const FACE_BLOB_SIZE: u32 = 300;
/// Per-channel means subtracted from the blob, in BGR order.
pub const FACE_BLOB_MEAN: [f32; 3] = [104.0, 177.0, 123.0];
/// Floats per SSD `DetectionOutput` record: image id, class id, confidence, x1, y1, x2, y2.
pub const DETECTION_RECORD_LEN: usize = 7;

pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Side length of the square RGB crop expected by the mask classifier.
pub const CROP_SIZE: u32 = 224;

pub const DISPLAY_WIDTH: u32 = 500;
pub const WARMUP_SECS: f64 = 2.0;
pub const KEY_TIMEOUT_MS: i32 = 1;
pub const EXIT_KEY: char = 'q';
pub const WINDOW_TITLE: &str = "Frame";

/// BGR colors for the two labels.
pub const MASK_COLOR: [u8; 3] = [0, 255, 0];
pub const NO_MASK_COLOR: [u8; 3] = [0, 0, 255];

pub const LABEL_FONT_SCALE: f64 = 0.45;
pub const LABEL_OFFSET_Y: i32 = 10;
pub const LINE_THICKNESS: i32 = 2;
