/// An axis-aligned face box in frame pixel coordinates.
///
/// The end corner is exclusive, so the box covers columns
/// `start_x..end_x` and rows `start_y..end_y`. Every constructed box
/// satisfies `0 <= start < end <= frame dimension` on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    start_x: u32,
    start_y: u32,
    end_x: u32,
    end_y: u32,
}

impl BoundingBox {
    /// Builds a box from pixel corners, clamping them into a
    /// `frame_width` × `frame_height` frame.
    ///
    /// Returns `None` when nothing of the box remains after clamping.
    pub fn clamped(
        start_x: i64,
        start_y: i64,
        end_x: i64,
        end_y: i64,
        frame_width: u32,
        frame_height: u32,
    ) -> Option<Self> {
        let (fw, fh) = (frame_width as i64, frame_height as i64);
        let sx = start_x.clamp(0, fw);
        let sy = start_y.clamp(0, fh);
        let ex = end_x.clamp(0, fw);
        let ey = end_y.clamp(0, fh);
        if sx >= ex || sy >= ey {
            return None;
        }
        Some(Self {
            start_x: sx as u32,
            start_y: sy as u32,
            end_x: ex as u32,
            end_y: ey as u32,
        })
    }

    /// Scales corners given as fractions of the frame size to pixels,
    /// truncating toward zero, then clamps.
    pub fn from_normalized(
        corners: [f32; 4],
        frame_width: u32,
        frame_height: u32,
    ) -> Option<Self> {
        let scale = [
            frame_width as f64,
            frame_height as f64,
            frame_width as f64,
            frame_height as f64,
        ];
        let px: Vec<i64> = corners
            .iter()
            .zip(scale)
            .map(|(&c, s)| (c as f64 * s) as i64)
            .collect();
        Self::clamped(px[0], px[1], px[2], px[3], frame_width, frame_height)
    }

    pub fn start_x(&self) -> u32 {
        self.start_x
    }

    pub fn start_y(&self) -> u32 {
        self.start_y
    }

    pub fn end_x(&self) -> u32 {
        self.end_x
    }

    pub fn end_y(&self) -> u32 {
        self.end_y
    }

    pub fn width(&self) -> u32 {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> u32 {
        self.end_y - self.start_y
    }
}
