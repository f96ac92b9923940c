#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned face region reported by a detector.
///
/// The origin may lie outside the frame; use [`FaceRect::clamp_to`] before
/// cropping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceRect {
    /// The X-axis of the top-left corner
    pub x: i32,
    /// The Y-axis of the top-left corner
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl FaceRect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Calculates the Area of the region
    pub const fn area(&self) -> u64 { self.width as u64 * self.height as u64 }

    /// Intersects the region with a `width` × `height` frame.
    ///
    /// Returns `None` when nothing of the region lies inside the frame.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        let x1 = i64::from(self.x).max(0);
        let y1 = i64::from(self.y).max(0);
        let x2 = (i64::from(self.x) + i64::from(self.width)).min(i64::from(width));
        let y2 =
            (i64::from(self.y) + i64::from(self.height)).min(i64::from(height));
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Self {
            x: x1 as i32,
            y: y1 as i32,
            width: (x2 - x1) as u32,
            height: (y2 - y1) as u32,
        })
    }
}

impl From<[f32; 4]> for FaceRect {
    /// Builds a region from two corner points `[x1, y1, x2, y2]`.
    fn from(c: [f32; 4]) -> Self {
        let (x1, y1) = (c[0].min(c[2]), c[1].min(c[3]));
        let (x2, y2) = (c[0].max(c[2]), c[1].max(c[3]));
        Self {
            x: x1.round() as i32,
            y: y1.round() as i32,
            width: (x2 - x1).round() as u32,
            height: (y2 - y1).round() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_is_width_times_height() {
        assert_eq!(FaceRect::new(3, 4, 40, 60).area(), 2400);
        assert_eq!(FaceRect::new(0, 0, 0, 60).area(), 0);
    }

    #[test]
    fn clamp_inside_is_identity() {
        let r = FaceRect::new(10, 10, 20, 20);
        assert_eq!(r.clamp_to(100, 100), Some(r));
    }

    #[test]
    fn clamp_trims_negative_origin_and_far_edges() {
        let r = FaceRect::new(-5, -10, 30, 30);
        assert_eq!(r.clamp_to(100, 100), Some(FaceRect::new(0, 0, 25, 20)));

        let r = FaceRect::new(90, 80, 30, 30);
        assert_eq!(r.clamp_to(100, 100), Some(FaceRect::new(90, 80, 10, 20)));
    }

    #[test]
    fn clamp_outside_is_none() {
        assert_eq!(FaceRect::new(120, 0, 10, 10).clamp_to(100, 100), None);
        assert_eq!(FaceRect::new(-20, 0, 20, 10).clamp_to(100, 100), None);
        assert_eq!(FaceRect::new(0, 0, 0, 10).clamp_to(100, 100), None);
    }

    #[test]
    fn from_corners_orders_points() {
        let r = FaceRect::from([50.4, 20.0, 10.0, 80.0]);
        assert_eq!(r, FaceRect::new(10, 20, 40, 60));
    }
}
