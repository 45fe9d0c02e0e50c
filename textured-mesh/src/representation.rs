//! Identification of the independently visible representations of a mesh.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// One of the render representations that a [`MeshState`](crate::MeshState) maintains.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, displaydoc::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[expect(clippy::exhaustive_enums)]
pub enum Representation {
    /// The geometry as given, uncolored. Also the target of the wireframe pass.
    #[displaydoc("base")]
    Base,
    /// Line segments depicting the vertex normals.
    #[displaydoc("normals")]
    NormalOverlay,
    /// The geometry with per-vertex colors.
    #[displaydoc("vertex-colors")]
    VertexColored,
    /// The geometry colored by per-vertex costs.
    #[displaydoc("vertex-costs")]
    CostColored,
    /// Cluster groups with textured materials.
    #[displaydoc("textured")]
    TexturedClusters,
    /// Cluster groups with flat-colored materials.
    #[displaydoc("flat")]
    FlatClusters,
}

impl Representation {
    /// All representations.
    pub const ALL: [Self; 6] = [
        Self::Base,
        Self::NormalOverlay,
        Self::VertexColored,
        Self::CostColored,
        Self::TexturedClusters,
        Self::FlatClusters,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of [`Representation`]s, used to record which of them are visible.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct VisibilitySet(u8);

impl VisibilitySet {
    /// No representation visible.
    pub const NONE: Self = Self(0);

    /// Returns whether `representation` is in the set.
    #[inline]
    pub const fn contains(self, representation: Representation) -> bool {
        self.0 & representation.bit() != 0
    }

    /// Adds or removes `representation`.
    #[inline]
    pub fn set(&mut self, representation: Representation, visible: bool) {
        if visible {
            self.0 |= representation.bit();
        } else {
            self.0 &= !representation.bit();
        }
    }

    /// Returns the set with `representation` added.
    #[must_use]
    pub const fn with(self, representation: Representation) -> Self {
        Self(self.0 | representation.bit())
    }

    /// Iterates over the members of the set.
    pub fn iter(self) -> impl Iterator<Item = Representation> {
        Representation::ALL
            .into_iter()
            .filter(move |&r| self.contains(r))
    }
}

impl FromIterator<Representation> for VisibilitySet {
    fn from_iter<T: IntoIterator<Item = Representation>>(iter: T) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

impl fmt::Debug for VisibilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one [`MeshState`](crate::MeshState) for its whole lifetime, across resets.
///
/// Issued by [`MeshState::new()`](crate::MeshState::new); never reused within a process.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MeshId(u64);

impl MeshId {
    pub(crate) fn new() -> Self {
        Self(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mesh{}", self.0)
    }
}

impl fmt::Debug for MeshId {
    #[mutants::skip] // trivial
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MeshId({})", self.0)
    }
}

/// Identifies one drawable object of a mesh: a representation, and for the cluster
/// representations, which group within it.
///
/// Its [`Display`](fmt::Display) form is unique among all meshes and suitable as a name for
/// the host's corresponding scene object.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[allow(clippy::exhaustive_structs)]
pub struct RepresentationId {
    /// The mesh.
    pub mesh: MeshId,
    /// The representation.
    pub representation: Representation,
    /// Index of the group within [`Representation::TexturedClusters`] or
    /// [`Representation::FlatClusters`]; [`None`] for other representations.
    pub group: Option<usize>,
}

impl fmt::Display for RepresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mesh, self.representation)?;
        if let Some(group) = self.group {
            write!(f, "/{group}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn visibility_set() {
        let mut set = VisibilitySet::NONE;
        set.set(Representation::CostColored, true);
        set.set(Representation::Base, true);
        set.set(Representation::Base, true);
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Representation::Base, Representation::CostColored]
        );
        set.set(Representation::Base, false);
        assert!(!set.contains(Representation::Base));
        assert_eq!(format!("{set:?}"), "{CostColored}");
        assert_eq!(
            Representation::ALL.into_iter().collect::<VisibilitySet>().iter().count(),
            6
        );
    }

    #[test]
    fn ids_are_unique() {
        let (a, b) = (MeshId::new(), MeshId::new());
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn representation_id_display() {
        let mesh = MeshId(7);
        assert_eq!(
            RepresentationId {
                mesh,
                representation: Representation::VertexColored,
                group: None
            }
            .to_string(),
            "mesh7/vertex-colors"
        );
        assert_eq!(
            RepresentationId {
                mesh,
                representation: Representation::TexturedClusters,
                group: Some(2)
            }
            .to_string(),
            "mesh7/textured/2"
        );
    }
}
