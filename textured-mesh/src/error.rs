use crate::MeshUuid;

/// Kinds of update that a [`MeshState`](crate::MeshState) accepts.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, displaydoc::Display)]
#[expect(clippy::exhaustive_enums)]
pub enum UpdateKind {
    /// geometry
    Geometry,
    /// vertex colors
    VertexColors,
    /// vertex costs
    VertexCosts,
    /// materials
    Materials,
    /// texture
    Texture,
}

/// Reasons an update to a [`MeshState`](crate::MeshState) was rejected.
///
/// All of these except [`MeshError::ResourceExhausted`] leave the mesh state exactly as it was
/// before the rejected update, except that a rejected geometry update leaves the state empty.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum MeshError {
    /// The update names a mesh other than the one whose geometry is current.
    #[error(
        "{kind} update for mesh {got} does not match the current mesh {}",
        uuid_or_none(.expected)
    )]
    IdentityMismatch {
        /// What kind of update was rejected.
        kind: UpdateKind,
        /// Identity of the current geometry, if any.
        expected: Option<MeshUuid>,
        /// Identity named by the update.
        got: MeshUuid,
    },

    /// The same kind of data was already accepted for this geometry.
    #[error("{kind} were already received for mesh {uuid}")]
    DuplicateSubmission {
        /// What kind of update was rejected.
        kind: UpdateKind,
        /// Identity of the current geometry.
        uuid: MeshUuid,
    },

    /// An array does not have the length required by the rest of the data.
    #[error("expected {expected} {what}, got {actual}")]
    CardinalityMismatch {
        /// Name of the mismatched array's elements.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Provided length.
        actual: usize,
    },

    /// An index refers past the end of the array it indexes.
    #[error("{what} index {index} is out of range for length {len}")]
    IndexOutOfRange {
        /// Name of the kind of index.
        what: &'static str,
        /// The offending index.
        index: usize,
        /// Length of the indexed array.
        len: usize,
    },

    /// The geometry has too few vertices or no faces to form a mesh.
    #[error("not enough geometry for a mesh: {vertices} vertices, {faces} faces")]
    InsufficientGeometry {
        /// Number of vertices provided.
        vertices: usize,
        /// Number of faces provided.
        faces: usize,
    },

    /// A cost range is empty or inverted, so costs cannot be normalized.
    #[error("illegal vertex cost limits: [{min}, {max}]")]
    DegenerateRange {
        /// Lower limit.
        min: f32,
        /// Upper limit.
        max: f32,
    },

    /// A scale factor is not a finite number.
    #[error("scale factor {0} is not finite")]
    InvalidScale(f32),

    /// The texture allocator could not create a texture. The mesh has been reset.
    #[error("could not allocate a texture for slot {slot}")]
    ResourceExhausted {
        /// Texture slot that was being bound.
        slot: usize,
    },
}

fn uuid_or_none(uuid: &Option<MeshUuid>) -> &str {
    uuid.as_ref().map_or("(none)", MeshUuid::as_str)
}
