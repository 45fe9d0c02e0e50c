use euclid::Box3D;

use crate::{Aabb, IndexSlice, IndexVec, MeshSpace, MeshVertex, PosCoord, Vertex};

/// How the indices of a [`RenderBuffer`] are grouped into primitives.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(clippy::exhaustive_enums)]
pub enum Topology {
    /// Each consecutive three indices denote a triangle.
    Triangles,
    /// Each consecutive two indices denote a line segment.
    Lines,
}

impl Topology {
    /// Number of indices making up one primitive.
    pub const fn indices_per_primitive(self) -> usize {
        match self {
            Topology::Triangles => 3,
            Topology::Lines => 2,
        }
    }
}

/// A vertex list and index list, ready to be copied into GPU buffers.
///
/// Indices always refer to positions in this buffer's own vertex list, in the order the
/// vertices were appended; a buffer never shares vertices with another buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderBuffer<V> {
    topology: Topology,
    vertices: Vec<V>,
    indices: IndexVec,
    bounding_box: Aabb,
}

impl<V: Vertex> RenderBuffer<V> {
    /// Creates an empty buffer with room for the given number of vertices and indices.
    pub(crate) fn with_capacity(topology: Topology, vertices: usize, indices: usize) -> Self {
        Self {
            topology,
            vertices: Vec::with_capacity(vertices),
            indices: IndexVec::with_capacity(indices, vertices),
            bounding_box: Aabb::EMPTY,
        }
    }

    /// Appends a vertex and returns its index.
    #[inline]
    pub(crate) fn push_vertex(&mut self, vertex: MeshVertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.bounding_box.add_point(vertex.position);
        self.vertices.push(V::from_mesh_vertex(vertex));
        index
    }

    /// Appends one triangle.
    ///
    /// The caller is responsible for the indices being in range.
    #[inline]
    pub(crate) fn push_triangle(&mut self, triangle: [u32; 3]) {
        debug_assert_eq!(self.topology, Topology::Triangles);
        self.indices.extend(triangle);
    }

    /// Appends one line segment.
    #[inline]
    pub(crate) fn push_line(&mut self, line: [u32; 2]) {
        debug_assert_eq!(self.topology, Topology::Lines);
        self.indices.extend(line);
    }

    /// Appends three new vertices and the triangle connecting them.
    #[inline]
    pub(crate) fn push_detached_triangle(&mut self, corners: [MeshVertex; 3]) {
        let indices = corners.map(|corner| self.push_vertex(corner));
        self.push_triangle(indices);
    }

    /// Returns how the indices are grouped into primitives.
    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// The vertices of the buffer, in the order they were appended.
    #[inline]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// The indices of the buffer, grouped according to [`Self::topology()`].
    #[inline]
    pub fn indices(&self) -> IndexSlice<'_> {
        self.indices.as_slice()
    }

    /// Number of triangles or line segments.
    #[inline]
    pub fn primitive_count(&self) -> usize {
        self.indices.len() / self.topology.indices_per_primitive()
    }

    /// Returns the primitives as arrays of `N` indices.
    ///
    /// `N` should equal [`Topology::indices_per_primitive()`]; any remainder is not returned.
    pub fn primitives<const N: usize>(&self) -> impl Iterator<Item = [u32; N]> + '_ {
        let mut iter = self.indices().iter_u32();
        core::iter::from_fn(move || {
            let mut primitive = [0; N];
            for slot in &mut primitive {
                *slot = iter.next()?;
            }
            Some(primitive)
        })
    }

    /// True if there is nothing to draw.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.len() == 0
    }

    /// Returns the bounding box of all vertices, or [`None`] if there are none.
    pub fn bounding_box(&self) -> Option<Box3D<PosCoord, MeshSpace>> {
        self.bounding_box.to_box()
    }

    /// Returns the total memory (not counting allocator overhead) occupied by this
    /// buffer and all its owned objects.
    pub fn total_byte_size(&self) -> usize {
        size_of::<Self>()
            + self.vertices.capacity() * size_of::<V>()
            + self.indices.capacity_bytes()
    }

    #[cfg(test)]
    pub(crate) fn consistency_check(&self) {
        assert!(
            self.indices
                .len()
                .is_multiple_of(self.topology.indices_per_primitive())
        );
        for index in self.indices().iter_u32() {
            assert!((index as usize) < self.vertices.len(), "index {index} out of range");
        }
    }
}

impl<V: Vertex + bytemuck::Pod> RenderBuffer<V> {
    /// Returns the vertex data as bytes, for uploading.
    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coloring, GpuVertex};
    use euclid::point3;

    fn v(x: f32) -> MeshVertex {
        MeshVertex {
            position: point3(x, 0.0, 0.0),
            normal: None,
            coloring: Coloring::Uncolored,
        }
    }

    #[test]
    fn detached_triangles_are_locally_indexed() {
        let mut buffer = RenderBuffer::<MeshVertex>::with_capacity(Topology::Triangles, 6, 6);
        buffer.push_detached_triangle([v(0.0), v(1.0), v(2.0)]);
        buffer.push_detached_triangle([v(3.0), v(4.0), v(5.0)]);
        buffer.consistency_check();
        assert_eq!(
            buffer.primitives::<3>().collect::<Vec<_>>(),
            vec![[0, 1, 2], [3, 4, 5]]
        );
        assert_eq!(buffer.primitive_count(), 2);
        assert_eq!(
            buffer.bounding_box(),
            Some(Box3D::new(point3(0.0, 0.0, 0.0), point3(5.0, 0.0, 0.0)))
        );
    }

    #[test]
    fn empty_buffer() {
        let buffer = RenderBuffer::<MeshVertex>::with_capacity(Topology::Lines, 0, 0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.bounding_box(), None);
        assert_eq!(buffer.primitives::<2>().count(), 0);
    }

    #[test]
    fn vertex_bytes_length() {
        let mut buffer = RenderBuffer::<GpuVertex>::with_capacity(Topology::Lines, 2, 2);
        let a = buffer.push_vertex(v(0.0));
        let b = buffer.push_vertex(v(1.0));
        buffer.push_line([a, b]);
        assert_eq!(buffer.vertex_bytes().len(), 2 * size_of::<GpuVertex>());
        assert_eq!(buffer.indices().as_bytes().len(), 2 * 2);
    }
}
