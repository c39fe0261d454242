use super::Vec2;

/// Viewport size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Maps a logical-pixel position (top-left origin, +Y down) to texture UV
    /// space (bottom-left origin, +Y up), clamped to `[0, 1]`.
    ///
    /// Returns `None` for a degenerate viewport or a non-finite position.
    pub fn normalize(self, pos: Vec2) -> Option<Vec2> {
        if !self.is_valid() || !pos.is_finite() {
            return None;
        }

        let uv = Vec2::new(pos.x / self.width, 1.0 - pos.y / self.height);
        Some(uv.clamp01())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_flips_y() {
        let vp = Viewport::new(200.0, 100.0);

        let top_left = vp.normalize(Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(top_left, Vec2::new(0.0, 1.0));

        let bottom_right = vp.normalize(Vec2::new(200.0, 100.0)).unwrap();
        assert_eq!(bottom_right, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn normalize_interior_point() {
        let vp = Viewport::new(400.0, 800.0);
        let uv = vp.normalize(Vec2::new(100.0, 200.0)).unwrap();
        assert_relative_eq!(uv.x, 0.25);
        assert_relative_eq!(uv.y, 0.75);
    }

    #[test]
    fn normalize_clamps_outside_points() {
        let vp = Viewport::new(100.0, 100.0);
        let uv = vp.normalize(Vec2::new(-10.0, 150.0)).unwrap();
        assert_eq!(uv, Vec2::new(0.0, 0.0));
    }

    #[test]
    fn normalize_rejects_degenerate_viewport() {
        assert!(Viewport::new(0.0, 100.0).normalize(Vec2::default()).is_none());
        assert!(Viewport::new(100.0, f32::NAN).normalize(Vec2::default()).is_none());
    }

    #[test]
    fn normalize_rejects_non_finite_position() {
        let vp = Viewport::new(100.0, 100.0);
        assert!(vp.normalize(Vec2::new(f32::NAN, 1.0)).is_none());
    }
}
