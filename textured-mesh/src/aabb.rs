use euclid::{Box3D, Point3D};

use crate::{MeshSpace, PosCoord, Position};

/// Axis-Aligned Bounding Box of the vertices belonging to a [`RenderBuffer`].
///
/// Structurally identical to <code>[Option]&lt;[Box3D]&gt;</code>, but can be grown one point
/// at a time without checking for the empty case. Publicly, only `Option<Box3D>` is exposed.
///
/// [`RenderBuffer`]: crate::RenderBuffer
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Aabb {
    // If no points have been added, then this box's coordinates are inverted (+inf to -inf).
    // NaN is never stored.
    low: Point3D<PosCoord, MeshSpace>,
    high: Point3D<PosCoord, MeshSpace>,
}

impl Aabb {
    /// The empty box, containing no points.
    pub const EMPTY: Self = Self {
        low: Point3D::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        high: Point3D::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Expand this box to contain the given point.
    ///
    /// Points with a NaN coordinate are ignored; they cannot be rendered anyway.
    #[inline]
    pub fn add_point(&mut self, point: Position) {
        if point.x.is_nan() || point.y.is_nan() || point.z.is_nan() {
            return;
        }
        self.low = Point3D::new(
            self.low.x.min(point.x),
            self.low.y.min(point.y),
            self.low.z.min(point.z),
        );
        self.high = Point3D::new(
            self.high.x.max(point.x),
            self.high.y.max(point.y),
            self.high.z.max(point.z),
        );
    }

    /// Returns the box, or [`None`] if no points were added.
    pub fn to_box(self) -> Option<Box3D<PosCoord, MeshSpace>> {
        if self.is_empty() {
            None
        } else {
            Some(Box3D::new(self.low, self.high))
        }
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
    use euclid::point3;

    #[test]
    fn empty_has_no_box() {
        assert_eq!(Aabb::EMPTY.to_box(), None);
    }

    #[test]
    fn single_point_is_zero_sized_box() {
        let mut aabb = Aabb::EMPTY;
        aabb.add_point(point3(1.0, 2.0, 3.0));
        assert_eq!(
            aabb.to_box(),
            Some(Box3D::new(point3(1.0, 2.0, 3.0), point3(1.0, 2.0, 3.0)))
        );
    }

    #[test]
    fn grows_and_ignores_nan() {
        let mut aabb = Aabb::EMPTY;
        aabb.add_point(point3(1.0, -2.0, 3.0));
        aabb.add_point(point3(f32::NAN, 100.0, 100.0));
        aabb.add_point(point3(-1.0, 2.0, 0.0));
        assert_eq!(
            aabb.to_box(),
            Some(Box3D::new(point3(-1.0, -2.0, 0.0), point3(1.0, 2.0, 3.0)))
        );
    }
}
