//! Coordinate and color types. This module is private but reexported by its parent.

use core::fmt;

use euclid::{Point2D, Point3D, Vector3D};

/// Unit-of-measure identifier used with [`euclid`] for the coordinate system that mesh
/// vertex positions are given in.
#[allow(clippy::exhaustive_enums)]
#[derive(Debug)]
pub enum MeshSpace {}

/// Unit-of-measure identifier used with [`euclid`] for normalized texture coordinates,
/// where `(0, 0)` and `(1, 1)` are opposite corners of the image.
#[allow(clippy::exhaustive_enums)]
#[derive(Debug)]
pub enum TexSpace {}

/// Numeric type of vertex coordinates.
pub type PosCoord = f32;

/// Position of a mesh vertex.
pub type Position = Point3D<PosCoord, MeshSpace>;

/// Normal vector of a mesh vertex. Not required to be of unit length.
pub type Normal = Vector3D<PosCoord, MeshSpace>;

/// Texture coordinates of a mesh vertex.
pub type TexPoint = Point2D<f32, TexSpace>;

/// A triangle, given as three indices into a vertex list.
pub type Face = [u32; 3];

/// A floating-point RGBA color value.
///
/// Components nominally range from 0 to 1 and are not premultiplied by alpha.
/// No range checks are performed on construction; use [`Rgba::clamp()`] where needed.
///
/// The memory layout is `[r, g, b, a]`, so slices of colors may be uploaded directly.
#[derive(Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Rgba([f32; 4]);

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Constructs a color from components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }

    /// Constructs an opaque color from red, green, and blue components.
    #[inline]
    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Returns the red color component.
    #[inline]
    pub const fn red(self) -> f32 {
        self.0[0]
    }
    /// Returns the green color component.
    #[inline]
    pub const fn green(self) -> f32 {
        self.0[1]
    }
    /// Returns the blue color component.
    #[inline]
    pub const fn blue(self) -> f32 {
        self.0[2]
    }
    /// Returns the alpha component.
    #[inline]
    pub const fn alpha(self) -> f32 {
        self.0[3]
    }

    /// Returns this color with the alpha component replaced.
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self::new(self.red(), self.green(), self.blue(), alpha)
    }

    /// Clamp each component to lie within the range 0 to 1, inclusive.
    /// NaN components become 0.
    #[inline]
    #[must_use]
    pub fn clamp(self) -> Self {
        Self(self.0.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) }))
    }

    /// Returns the components as an array `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        self.0
    }

    /// Converts this color lossily to 8-bits-per-component color, without any change
    /// of transfer function.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        self.clamp().0.map(|c| (c * 255.0).round() as u8)
    }
}

impl From<[f32; 4]> for Rgba {
    #[inline]
    fn from(value: [f32; 4]) -> Self {
        Self(value)
    }
}

impl From<Rgba> for [f32; 4] {
    #[inline]
    fn from(value: Rgba) -> Self {
        value.0
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Print compactly on single line even if the formatter is in prettyprint mode.
        let [r, g, b, a] = self.0;
        write!(f, "Rgba({r:?}, {g:?}, {b:?}, {a:?})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_handles_nan_and_range() {
        assert_eq!(
            Rgba::new(f32::NAN, -1.0, 2.0, 0.5).clamp(),
            Rgba::new(0.0, 0.0, 1.0, 0.5)
        );
    }

    #[test]
    fn to_rgba8() {
        assert_eq!(Rgba::new(1.0, 0.5, 0.0, 1.0).to_rgba8(), [255, 128, 0, 255]);
    }

    #[test]
    fn debug_is_single_line() {
        assert_eq!(
            format!("{:#?}", Rgba::RED),
            "Rgba(1.0, 0.0, 0.0, 1.0)"
        );
    }
}
