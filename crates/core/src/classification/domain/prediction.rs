use std::fmt;

use crate::shared::constants::{MASK_COLOR, NO_MASK_COLOR};

/// Two-class classifier output for one face. Scores are used as the
/// model returns them; nothing here normalizes them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prediction {
    pub mask: f32,
    pub no_mask: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskLabel {
    Mask,
    NoMask,
}

impl Prediction {
    pub fn new(mask: f32, no_mask: f32) -> Self {
        Self { mask, no_mask }
    }

    /// `Mask` only when its score is strictly greater; ties go to `NoMask`.
    pub fn label(&self) -> MaskLabel {
        if self.mask > self.no_mask {
            MaskLabel::Mask
        } else {
            MaskLabel::NoMask
        }
    }

    /// The winning score.
    pub fn score(&self) -> f32 {
        self.mask.max(self.no_mask)
    }

    /// Overlay text, e.g. `Mask: 97.31%`.
    pub fn caption(&self) -> String {
        format!("{}: {:.2}%", self.label(), self.score() * 100.0)
    }
}

impl MaskLabel {
    /// Box and text color in BGR.
    pub fn color(&self) -> [u8; 3] {
        match self {
            MaskLabel::Mask => MASK_COLOR,
            MaskLabel::NoMask => NO_MASK_COLOR,
        }
    }
}

impl fmt::Display for MaskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskLabel::Mask => write!(f, "Mask"),
            MaskLabel::NoMask => write!(f, "No Mask"),
        }
    }
}
