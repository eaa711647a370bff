pub mod capture_loop;
pub mod mask_detector;
pub mod pipeline_logger;
