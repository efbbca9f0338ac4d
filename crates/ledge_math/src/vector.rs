//! 2D vector in pixel space (y grows downwards)

use core::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Position, velocity or impulse in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_squared(self, other: Self) -> f32 {
        let d = self - other;
        d.x * d.x + d.y * d.y
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    #[inline]
    pub fn with_x(self, x: f32) -> Self {
        Self { x, ..self }
    }

    #[inline]
    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

impl From<(i32, i32)> for Vec2 {
    /// Integer pixel coordinates from the physics world
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x as f32, y as f32)
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, scale: f32) -> Self {
        Self::new(self.x * scale, self.y * scale)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_impulse_accumulates() {
        let mut velocity = Vec2::new(4.0, 0.0);
        velocity += Vec2::new(0.0, -2.5);
        assert_eq!(velocity, Vec2::new(4.0, -2.5));
        assert_eq!(-velocity * 2.0, Vec2::new(-8.0, 5.0));
        assert_eq!(velocity.with_y(0.0), Vec2::new(4.0, 0.0));
        assert_eq!(velocity.with_x(-1.0).to_array(), [-1.0, -2.5]);
    }

    #[test]
    fn test_distance() {
        let spawn = Vec2::new(100.0, 500.0);
        let checkpoint = Vec2::new(103.0, 504.0);
        assert_relative_eq!(spawn.distance(checkpoint), 5.0);
        assert_relative_eq!(spawn.distance_squared(checkpoint), 25.0);
        assert_eq!(Vec2::from((3, 4)), Vec2::new(3.0, 4.0));
    }
}
