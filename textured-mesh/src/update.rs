//! Inbound update messages. Their transport is the host's concern; these types describe only
//! their content.

use core::fmt;
use std::sync::Arc;

use crate::texture::TextureImage;
use crate::{ColorMap, Face, Normal, Position, Rgba, TexPoint};

/// Opaque identity token correlating a geometry update with the color, cost, material, and
/// texture updates that depend on it.
///
/// Cloning is cheap.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub struct MeshUuid(Arc<str>);

impl MeshUuid {
    /// Returns the token as a string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MeshUuid {
    fn from(value: &str) -> Self {
        Self(Arc::from(value))
    }
}

impl From<String> for MeshUuid {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<MeshUuid> for String {
    fn from(value: MeshUuid) -> Self {
        String::from(&*value.0)
    }
}

impl fmt::Display for MeshUuid {
    #[mutants::skip] // trivial
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for MeshUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MeshUuid({:?})", &*self.0)
    }
}

/// New geometry for a mesh. Replaces everything previously known about the mesh.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::exhaustive_structs)]
pub struct GeometryUpdate {
    /// Identity of the new geometry.
    pub uuid: MeshUuid,
    /// Vertex positions.
    pub vertices: Vec<Position>,
    /// Triangles, as indices into `vertices`.
    pub faces: Vec<Face>,
    /// Per-vertex normals. Empty if the mesh has none; ignored unless there is exactly one
    /// per vertex.
    #[cfg_attr(feature = "serde", serde(default))]
    pub normals: Vec<Normal>,
}

/// One color per vertex of the current geometry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::exhaustive_structs)]
pub struct VertexColorUpdate {
    /// Identity of the geometry these colors belong to.
    pub uuid: MeshUuid,
    /// Colors, indexed like the geometry's vertices.
    pub colors: Vec<Rgba>,
}

/// One scalar cost per vertex of the current geometry, to be displayed through a colormap.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::exhaustive_structs)]
pub struct VertexCostUpdate {
    /// Identity of the geometry these costs belong to.
    pub uuid: MeshUuid,
    /// Costs, indexed like the geometry's vertices.
    pub costs: Vec<f32>,
    /// How to turn normalized costs into colors.
    #[cfg_attr(feature = "serde", serde(default))]
    pub colormap: ColorMap,
    /// Cost mapped to the low end of the colormap. If absent, the smallest cost is used.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_cost: Option<f32>,
    /// Cost mapped to the high end of the colormap. If absent, the largest cost is used.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_cost: Option<f32>,
}

/// A named group of faces sharing one material.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::exhaustive_structs)]
pub struct Cluster {
    /// Label for diagnostics.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Indices into the geometry's faces.
    pub faces: Vec<u32>,
}

/// Appearance of a cluster: a flat color, or a texture.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::exhaustive_structs)]
pub struct Material {
    /// Flat color of the cluster. Used when the material has no texture, and also when it has
    /// one but the mesh has no texture coordinates.
    pub color: Rgba,
    /// Texture slot holding this material's image, if it is textured.
    #[cfg_attr(feature = "serde", serde(default))]
    pub texture_slot: Option<usize>,
}

impl Material {
    /// A material without texture.
    pub const fn flat(color: Rgba) -> Self {
        Self {
            color,
            texture_slot: None,
        }
    }

    /// A material whose image will be provided in the given texture slot.
    pub const fn textured(slot: usize) -> Self {
        Self {
            color: Rgba::WHITE,
            texture_slot: Some(slot),
        }
    }
}

/// Assignment of materials to clusters of faces of the current geometry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::exhaustive_structs)]
pub struct MaterialUpdate {
    /// Identity of the geometry these materials belong to.
    pub uuid: MeshUuid,
    /// Clusters of faces.
    pub clusters: Vec<Cluster>,
    /// For each cluster, the index of its material in `materials`.
    pub cluster_materials: Vec<u32>,
    /// Materials referred to by `cluster_materials`.
    pub materials: Vec<Material>,
    /// Texture coordinates, one per vertex of the geometry, with `v` increasing upward.
    /// Empty if the mesh has none, in which case textured clusters are drawn flat.
    #[cfg_attr(feature = "serde", serde(default))]
    pub tex_coords: Vec<TexPoint>,
}

/// Image for one texture slot of the current mesh's materials.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::exhaustive_structs)]
pub struct TextureUpdate {
    /// Identity of the geometry.
    pub uuid: MeshUuid,
    /// Identity of the materials this texture belongs to.
    pub materials_uuid: MeshUuid,
    /// Texture slot index, as referred to by [`Material::texture_slot`].
    pub slot: usize,
    /// The pixels.
    pub image: TextureImage,
}

/// Any update to a mesh, for hosts that deliver all updates over one channel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[expect(clippy::exhaustive_enums)]
pub enum MeshUpdate {
    /// See [`GeometryUpdate`].
    Geometry(GeometryUpdate),
    /// See [`VertexColorUpdate`].
    VertexColors(VertexColorUpdate),
    /// See [`VertexCostUpdate`].
    VertexCosts(VertexCostUpdate),
    /// See [`MaterialUpdate`].
    Materials(MaterialUpdate),
    /// See [`TextureUpdate`].
    Texture(TextureUpdate),
}

impl MeshUpdate {
    /// Returns the identity of the geometry this update belongs to (or establishes).
    pub fn uuid(&self) -> &MeshUuid {
        match self {
            MeshUpdate::Geometry(u) => &u.uuid,
            MeshUpdate::VertexColors(u) => &u.uuid,
            MeshUpdate::VertexCosts(u) => &u.uuid,
            MeshUpdate::Materials(u) => &u.uuid,
            MeshUpdate::Texture(u) => &u.uuid,
        }
    }
}
