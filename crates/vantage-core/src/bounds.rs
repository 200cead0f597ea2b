//! Axis-aligned bounding boxes

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box as a min/max corner pair.
///
/// The empty box has `min > max` on every axis and absorbs nothing; growing
/// it by a point yields that point's degenerate box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing all the given points
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for p in points {
            aabb.grow(p);
        }
        aabb
    }

    /// Expand the box to contain the given point
    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Expand the box to contain another box
    pub fn union(&mut self, other: &Aabb) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Whether no point has ever been inserted
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// An empty box, a single point, or non-finite extents all count as
    /// degenerate: there is nothing to frame a camera against.
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || !self.min.is_finite() || !self.max.is_finite() || self.max_extent() <= 0.0
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest extent across the three axes
    pub fn max_extent(&self) -> f32 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }

    /// Volume of the box itself (an approximation of the enclosed model's
    /// volume, not an exact figure)
    pub fn volume(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let s = self.size();
        s.x * s.y * s.z
    }

    /// Surface area of the box itself (again an approximation)
    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let s = self.size();
        2.0 * (s.x * s.y + s.y * s.z + s.z * s.x)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_encloses() {
        let aabb = Aabb::from_points([
            Vec3::new(-1.0, 0.0, 2.0),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::new(0.0, 1.0, -1.0),
        ]);
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 1.0, 2.0));
        assert_eq!(aabb.max_extent(), 4.0);
    }

    #[test]
    fn empty_box_is_degenerate() {
        let aabb = Aabb::EMPTY;
        assert!(aabb.is_empty());
        assert!(aabb.is_degenerate());
        assert_eq!(aabb.volume(), 0.0);
        assert_eq!(aabb.surface_area(), 0.0);
    }

    #[test]
    fn single_point_is_degenerate_but_not_empty() {
        let aabb = Aabb::from_points([Vec3::splat(1.0)]);
        assert!(!aabb.is_empty());
        assert!(aabb.is_degenerate());
        assert_eq!(aabb.center(), Vec3::splat(1.0));
    }

    #[test]
    fn unit_cube_measures() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.volume(), 1.0);
        assert_eq!(aabb.surface_area(), 6.0);
        assert_eq!(aabb.center(), Vec3::splat(0.5));
    }
}
