//! Bounds, colors and numeric helpers shared by the chunks

use glam::{Vec2, Vec3};

/// Round a value to 5 decimal places so recomputed bounds do not drift
/// between encodes
pub fn round5(v: f32) -> f32 {
    let r = (f64::from(v) * 100_000.0).round() / 100_000.0;
    let r = r as f32;
    if r == 0.0 { 0.0 } else { r }
}

pub fn round5_vec3(v: Vec3) -> Vec3 {
    Vec3::new(round5(v.x), round5(v.y), round5(v.z))
}

/// Half the length of the box diagonal
pub fn bounds_radius(min: Vec3, max: Vec3) -> f32 {
    (max - min).length() / 2.0
}

/// Axis-aligned extent with its bounding radius
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    pub min: Vec3,
    pub max: Vec3,
    pub radius: f32,
}

impl Extent {
    pub const ZERO: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
        radius: 0.0,
    };

    /// Extent with the radius derived from the corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            radius: round5(bounds_radius(min, max)),
        }
    }

    /// Component-wise min/max over a point set; zero for an empty set
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        let mut iter = points.into_iter();
        let Some(first) = iter.next() else {
            return Self::ZERO;
        };
        let (min, max) = iter.fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self::new(round5_vec3(min), round5_vec3(max))
    }

    /// Smallest extent containing both
    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Color in natural RGB order. On the wire the components are reversed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from wire order (blue, green, red)
    pub const fn from_bgr(bgr: [f32; 3]) -> Self {
        Self::new(bgr[2], bgr[1], bgr[0])
    }

    /// Components in wire order (blue, green, red)
    pub const fn to_bgr(self) -> [f32; 3] {
        [self.b, self.g, self.r]
    }
}

pub fn vec2(v: [f32; 2]) -> Vec2 {
    Vec2::from_array(v)
}

pub fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_from_triangle() {
        let points = [
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let extent = Extent::from_points(&points);
        assert_eq!(extent.min, Vec3::ZERO);
        assert_eq!(extent.max, Vec3::new(1.0, 1.0, 0.0));
        assert!((extent.radius - 0.70711).abs() < 1e-6);
    }

    #[test]
    fn test_empty_extent_is_zero() {
        let extent = Extent::from_points(&[] as &[Vec3]);
        assert!(extent.is_zero());
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round5(0.123_456_7), 0.123_46);
        assert_eq!(round5(-0.000_001), 0.0);
        assert!(round5(-0.000_001).is_sign_positive());
    }

    #[test]
    fn test_bgr_order() {
        let color = Rgb::new(1.0, 0.5, 0.25);
        assert_eq!(color.to_bgr(), [0.25, 0.5, 1.0]);
        assert_eq!(Rgb::from_bgr([0.25, 0.5, 1.0]), color);
    }
}
