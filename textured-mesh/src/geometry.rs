use crate::{Face, MeshError, Normal, Position};

/// Validated mesh geometry: vertex positions, triangles, and optionally one normal per vertex.
///
/// This is the source data that every representation of a mesh is derived from. It is retained
/// for as long as the geometry is current, so that derived buffers (in particular the normal
/// overlay) can always be rebuilt from the original arrays rather than from other derived
/// buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    vertices: Vec<Position>,
    faces: Vec<Face>,
    normals: Option<Vec<Normal>>,
}

impl Geometry {
    /// Minimum number of vertices a mesh must have.
    pub const MIN_VERTICES: usize = 3;

    /// Validates and wraps geometry.
    ///
    /// * Fails with [`MeshError::InsufficientGeometry`] if there are fewer than
    ///   [`Self::MIN_VERTICES`] vertices or no faces.
    /// * Fails with [`MeshError::IndexOutOfRange`] if any face refers to a nonexistent vertex.
    /// * `normals` are kept only if there is exactly one per vertex. Otherwise they are
    ///   discarded (with a logged warning if any were given); this is not an error.
    pub fn new(
        vertices: Vec<Position>,
        faces: Vec<Face>,
        normals: Vec<Normal>,
    ) -> Result<Self, MeshError> {
        if vertices.len() < Self::MIN_VERTICES || faces.is_empty() {
            return Err(MeshError::InsufficientGeometry {
                vertices: vertices.len(),
                faces: faces.len(),
            });
        }
        if let Some(&index) = faces.iter().flatten().find(|&&i| i as usize >= vertices.len()) {
            return Err(MeshError::IndexOutOfRange {
                what: "face vertex",
                index: index as usize,
                len: vertices.len(),
            });
        }

        let normals = if normals.len() == vertices.len() {
            log::info!("received {} vertex normals", normals.len());
            Some(normals)
        } else {
            if !normals.is_empty() {
                log::warn!(
                    "received {} vertex normals for {} vertices; ignoring vertex normals",
                    normals.len(),
                    vertices.len()
                );
            }
            None
        };

        Ok(Self {
            vertices,
            faces,
            normals,
        })
    }

    /// The vertex positions. A vertex's index in this slice is its identity.
    #[inline]
    pub fn vertices(&self) -> &[Position] {
        &self.vertices
    }

    /// The triangles, as indices into [`Self::vertices()`].
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// One normal per vertex, if they were provided.
    #[inline]
    pub fn normals(&self) -> Option<&[Normal]> {
        self.normals.as_deref()
    }

    /// Number of vertices; every per-vertex array must have this length.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the normal of the given vertex, if normals are present.
    #[inline]
    pub(crate) fn normal(&self, vertex: usize) -> Option<Normal> {
        self.normals.as_ref().map(|normals| normals[vertex])
    }

    /// Checks that a per-vertex array of length `len` matches this geometry.
    pub(crate) fn check_vertex_count(
        &self,
        what: &'static str,
        len: usize,
    ) -> Result<(), MeshError> {
        if len == self.vertex_count() {
            Ok(())
        } else {
            Err(MeshError::CardinalityMismatch {
                what,
                expected: self.vertex_count(),
                actual: len,
            })
        }
    }
}
