//! Real-time face mask detection: SSD face localization, batched
//! mask/no-mask classification, and frame annotation for a live camera
//! stream.

pub mod annotation;
pub mod classification;
pub mod detection;
pub mod inference;
pub mod pipeline;
pub mod shared;
pub mod video;
