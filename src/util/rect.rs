//! Axis-aligned rectangle used for bounds, velocities and deviations.
//!
//! The same type carries positions (`left/top/right/bottom` in root
//! coordinates), per-component velocities (units per second) and the
//! deviation offsets of the animator, so component-wise arithmetic is
//! provided through [`Vec4`].

use std::ops::{Add, Mul, Neg, Sub};

use glam::{Vec2, Vec4};

/// A rectangle expressed by its four edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
}

impl Rect {
    /// All four components zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create from edges.
    #[must_use]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create from a top-left offset and a size.
    #[must_use]
    pub fn from_offset_size(offset: Vec2, size: Vec2) -> Self {
        Self::new(offset.x, offset.y, offset.x + size.x, offset.y + size.y)
    }

    /// Top-left corner.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Move all edges by `offset`.
    #[must_use]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(
            self.left + offset.x,
            self.top + offset.y,
            self.right + offset.x,
            self.bottom + offset.y,
        )
    }

    /// Component-wise linear interpolation.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self::from_vec4(self.to_vec4().lerp(other.to_vec4(), t))
    }

    /// Largest absolute component difference to `other`.
    #[must_use]
    pub fn max_component_delta(&self, other: &Self) -> f32 {
        (self.to_vec4() - other.to_vec4()).abs().max_element()
    }

    /// Components as `[left, top, right, bottom]`.
    #[must_use]
    pub fn to_array(&self) -> [f32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    /// Inverse of [`to_array`](Self::to_array).
    #[must_use]
    pub fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    /// Components packed as `(left, top, right, bottom)`.
    #[must_use]
    pub fn to_vec4(&self) -> Vec4 {
        Vec4::new(self.left, self.top, self.right, self.bottom)
    }

    /// Inverse of [`to_vec4`](Self::to_vec4).
    #[must_use]
    pub fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl Add for Rect {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_vec4(self.to_vec4() + rhs.to_vec4())
    }
}

impl Sub for Rect {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_vec4(self.to_vec4() - rhs.to_vec4())
    }
}

impl Mul<f32> for Rect {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::from_vec4(self.to_vec4() * rhs)
    }
}

impl Neg for Rect {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_vec4(-self.to_vec4())
    }
}
