use core::ops::Sub;

/// 2D vector.
///
/// Used for both logical-pixel positions (input) and normalized UV points
/// (ripple origins). The meaning is carried by the API that produces it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Squared euclidean length.
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length_squared().sqrt()
    }

    /// Clamps both components into `[0, 1]`.
    #[inline]
    pub fn clamp01(self) -> Self {
        Self::new(self.x.clamp(0.0, 1.0), self.y.clamp(0.0, 1.0))
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(4.0, 5.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn clamp01_limits_both_axes() {
        assert_eq!(Vec2::new(-0.5, 1.5).clamp01(), Vec2::new(0.0, 1.0));
        assert_eq!(Vec2::new(0.25, 0.75).clamp01(), Vec2::new(0.25, 0.75));
    }

    #[test]
    fn non_finite_is_detected() {
        assert!(!Vec2::new(f32::NAN, 0.0).is_finite());
        assert!(!Vec2::new(0.0, f32::INFINITY).is_finite());
        assert!(Vec2::default().is_finite());
    }
}
