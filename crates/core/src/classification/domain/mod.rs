pub mod face_crop;
pub mod mask_classifier;
pub mod prediction;
