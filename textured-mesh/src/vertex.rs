//! Mesh vertices.

use core::fmt;

use crate::{Normal, Position, Rgba, TexPoint};

/// Basic vertex data type produced by every assembler in this crate.
/// Implement <code>[`Vertex`]</code> to convert it to a specialized version fit for the target
/// graphics API.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, PartialEq)]
pub struct MeshVertex {
    /// Position in 3D space.
    pub position: Position,

    /// Vertex normal, if the geometry supplied normals for every vertex.
    pub normal: Option<Normal>,

    /// Surface color or texture coordinate.
    pub coloring: Coloring,
}

/// Describes the ways a [`MeshVertex`] may be colored.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, PartialEq)]
pub enum Coloring {
    /// No color of its own; the renderer's material color applies.
    Uncolored,
    /// Solid color.
    Solid(Rgba),
    /// Texture coordinates into the texture bound to the buffer this vertex belongs to.
    Texture(TexPoint),
}

impl fmt::Debug for MeshVertex {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Print compactly on single line even if the formatter is in prettyprint mode.
        let Self {
            position,
            normal,
            coloring,
        } = self;
        write!(
            fmt,
            "{{ p: ({:?}, {:?}, {:?}) ",
            position.x, position.y, position.z
        )?;
        if let Some(n) = normal {
            write!(fmt, "n: ({:?}, {:?}, {:?}) ", n.x, n.y, n.z)?;
        }
        write!(fmt, "c: {coloring:?} }}")
    }
}

impl fmt::Debug for Coloring {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coloring::Uncolored => write!(fmt, "Uncolored"),
            Coloring::Solid(color) => write!(fmt, "Solid({color:?})"),
            Coloring::Texture(uv) => write!(fmt, "Texture({:?}, {:?})", uv.x, uv.y),
        }
    }
}

/// Vertex types for use in [`RenderBuffer`](crate::RenderBuffer)s.
///
/// Implement this trait to provide a vertex data type suitable for a specific rendering system
/// or data format. Every vertex is created from a [`MeshVertex`] as soon as the assembler
/// produces it; the [`MeshVertex`] is never stored.
pub trait Vertex: Copy + Sized + 'static {
    /// Constructs this vertex type from [`MeshVertex`].
    fn from_mesh_vertex(vertex: MeshVertex) -> Self;
}

/// Trivial implementation of [`Vertex`] for testing and inspection.
impl Vertex for MeshVertex {
    #[inline]
    fn from_mesh_vertex(vertex: MeshVertex) -> Self {
        vertex
    }
}

/// Vertex data in a fixed layout suitable for copying directly into a GPU vertex buffer.
///
/// All fields are always present; [`GpuVertex::flags`] tells the shader which of them are
/// meaningful.
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
#[allow(clippy::exhaustive_structs)]
pub struct GpuVertex {
    /// Position in 3D space.
    pub position: [f32; 3],
    /// Vertex normal, or zero if [`GpuVertex::HAS_NORMAL`] is not set.
    pub normal: [f32; 3],
    /// RGBA color, or opaque white if [`GpuVertex::HAS_COLOR`] is not set.
    pub color: [f32; 4],
    /// Texture coordinates, or zero if [`GpuVertex::HAS_TEXTURE`] is not set.
    pub tex_coord: [f32; 2],
    /// Bit set of `HAS_*` constants.
    pub flags: u32,
}

impl GpuVertex {
    /// Flag bit: [`GpuVertex::normal`] is meaningful.
    pub const HAS_NORMAL: u32 = 1 << 0;
    /// Flag bit: [`GpuVertex::color`] is meaningful.
    pub const HAS_COLOR: u32 = 1 << 1;
    /// Flag bit: [`GpuVertex::tex_coord`] is meaningful.
    pub const HAS_TEXTURE: u32 = 1 << 2;
}

impl Vertex for GpuVertex {
    fn from_mesh_vertex(vertex: MeshVertex) -> Self {
        let mut flags = 0;
        let normal = match vertex.normal {
            Some(n) => {
                flags |= Self::HAS_NORMAL;
                n.to_array()
            }
            None => [0.0; 3],
        };
        let (color, tex_coord) = match vertex.coloring {
            Coloring::Uncolored => (Rgba::WHITE, [0.0; 2]),
            Coloring::Solid(color) => {
                flags |= Self::HAS_COLOR;
                (color, [0.0; 2])
            }
            Coloring::Texture(uv) => {
                flags |= Self::HAS_TEXTURE;
                (Rgba::WHITE, uv.to_array())
            }
        };
        GpuVertex {
            position: vertex.position.to_array(),
            normal,
            color: color.to_array(),
            tex_coord,
            flags,
        }
    }
}
