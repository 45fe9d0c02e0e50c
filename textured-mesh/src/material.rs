//! Per-cluster buffers, split into textured and flat-colored groups.

use core::fmt;

use euclid::point2;

use crate::{
    Coloring, Geometry, MaterialUpdate, MeshError, MeshTypes, MeshVertex, RenderBuffer, Rgba,
    TexPoint, Topology, Vertex,
};

/// Buffer for one cluster whose material is textured.
///
/// The texture itself may arrive later than the buffer is built; until then
/// [`TexturedGroup::texture()`] is [`None`] and the host should draw the group with a fallback
/// appearance.
pub struct TexturedGroup<M: MeshTypes> {
    pub(crate) cluster: usize,
    pub(crate) name: String,
    pub(crate) slot: usize,
    pub(crate) buffer: RenderBuffer<M::Vertex>,
    pub(crate) texture: Option<M::Texture>,
}

impl<M: MeshTypes> TexturedGroup<M> {
    /// Index of the cluster this group was built from.
    pub fn cluster(&self) -> usize {
        self.cluster
    }

    /// Name of the cluster this group was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Texture slot whose image this group is drawn with.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Triangles of the cluster, with texture coordinates.
    pub fn buffer(&self) -> &RenderBuffer<M::Vertex> {
        &self.buffer
    }

    /// The bound texture, if the slot's image has arrived.
    pub fn texture(&self) -> Option<&M::Texture> {
        self.texture.as_ref()
    }
}

impl<M: MeshTypes> fmt::Debug for TexturedGroup<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TexturedGroup")
            .field("cluster", &self.cluster)
            .field("name", &self.name)
            .field("slot", &self.slot)
            .field("triangles", &self.buffer.primitive_count())
            .field("texture", &self.texture)
            .finish()
    }
}

/// Buffer for one cluster drawn in a single flat color.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatGroup<V> {
    pub(crate) cluster: usize,
    pub(crate) name: String,
    pub(crate) color: Rgba,
    pub(crate) buffer: RenderBuffer<V>,
}

impl<V: Vertex> FlatGroup<V> {
    /// Index of the cluster this group was built from.
    pub fn cluster(&self) -> usize {
        self.cluster
    }

    /// Name of the cluster this group was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color of every vertex of the group.
    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Triangles of the cluster, with [`Self::color()`] as their vertex colors.
    pub fn buffer(&self) -> &RenderBuffer<V> {
        &self.buffer
    }
}

/// All per-cluster buffers of a mesh, in cluster order within each group kind.
pub struct ClusterMeshes<M: MeshTypes> {
    pub(crate) textured: Vec<TexturedGroup<M>>,
    pub(crate) flat: Vec<FlatGroup<M::Vertex>>,
}

impl<M: MeshTypes> ClusterMeshes<M> {
    /// Groups of clusters with textured materials.
    pub fn textured(&self) -> &[TexturedGroup<M>] {
        &self.textured
    }

    /// Groups of clusters drawn in a flat color.
    pub fn flat(&self) -> &[FlatGroup<M::Vertex>] {
        &self.flat
    }

    /// Returns whether any textured group draws from `slot`.
    pub fn uses_slot(&self, slot: usize) -> bool {
        self.textured.iter().any(|group| group.slot == slot)
    }

    /// Returns the total memory (not counting allocator overhead) occupied by the buffers.
    pub fn total_byte_size(&self) -> usize {
        self.textured
            .iter()
            .map(|g| g.buffer.total_byte_size())
            .chain(self.flat.iter().map(|g| g.buffer.total_byte_size()))
            .sum()
    }
}

impl<M: MeshTypes> fmt::Debug for ClusterMeshes<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterMeshes")
            .field("textured", &self.textured)
            .field("flat", &self.flat)
            .finish()
    }
}

/// Partitions the faces of `geometry` into one buffer per cluster of `materials`.
///
/// Each cluster's vertices are copied per face, so every group's buffer is indexed from 0 and
/// carries its own texture coordinates and normals. Textured groups are built without a
/// texture; binding is done separately by [`TextureResolver`](crate::TextureResolver).
///
/// If `materials` has no texture coordinates (or not one per vertex), clusters with textured
/// materials are built as flat groups of the material's color instead.
///
/// Errors:
/// * [`MeshError::CardinalityMismatch`] if the numbers of clusters and cluster materials
///   differ.
/// * [`MeshError::IndexOutOfRange`] if a cluster refers to a nonexistent material or face.
pub fn assemble_clusters<M: MeshTypes>(
    geometry: &Geometry,
    materials: &MaterialUpdate,
) -> Result<ClusterMeshes<M>, MeshError> {
    let MaterialUpdate {
        uuid: _,
        clusters,
        cluster_materials,
        materials,
        tex_coords,
    } = materials;

    if clusters.len() != cluster_materials.len() {
        return Err(MeshError::CardinalityMismatch {
            what: "cluster materials",
            expected: clusters.len(),
            actual: cluster_materials.len(),
        });
    }

    let tex_coords: Option<&[TexPoint]> = if tex_coords.len() == geometry.vertex_count() {
        Some(tex_coords)
    } else {
        if !tex_coords.is_empty() {
            log::warn!(
                "received {} texture coordinates for {} vertices; ignoring texture coordinates",
                tex_coords.len(),
                geometry.vertex_count()
            );
        }
        None
    };

    let mut meshes = ClusterMeshes {
        textured: Vec::new(),
        flat: Vec::new(),
    };
    for (cluster_index, (cluster, &material_index)) in
        clusters.iter().zip(cluster_materials).enumerate()
    {
        let material = materials.get(material_index as usize).ok_or(
            MeshError::IndexOutOfRange {
                what: "material",
                index: material_index as usize,
                len: materials.len(),
            },
        )?;

        let mut buffer = RenderBuffer::<M::Vertex>::with_capacity(
            Topology::Triangles,
            cluster.faces.len() * 3,
            cluster.faces.len() * 3,
        );
        let textured = material.texture_slot.zip(tex_coords);
        for &face_index in &cluster.faces {
            let face = geometry.faces().get(face_index as usize).copied().ok_or(
                MeshError::IndexOutOfRange {
                    what: "cluster face",
                    index: face_index as usize,
                    len: geometry.faces().len(),
                },
            )?;
            buffer.push_detached_triangle(face.map(|vertex| {
                let vertex = vertex as usize;
                MeshVertex {
                    position: geometry.vertices()[vertex],
                    normal: geometry.normal(vertex),
                    coloring: match textured {
                        // Image rows are stored top-down.
                        Some((_, tc)) => {
                            Coloring::Texture(point2(tc[vertex].x, 1.0 - tc[vertex].y))
                        }
                        None => Coloring::Solid(material.color),
                    },
                }
            }));
        }

        match textured {
            Some((slot, _)) => meshes.textured.push(TexturedGroup {
                cluster: cluster_index,
                name: cluster.name.clone(),
                slot,
                buffer,
                texture: None,
            }),
            None => meshes.flat.push(FlatGroup {
                cluster: cluster_index,
                name: cluster.name.clone(),
                color: material.color,
                buffer,
            }),
        }
    }

    log::debug!(
        "assembled {} textured and {} flat cluster groups",
        meshes.textured.len(),
        meshes.flat.len()
    );
    Ok(meshes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestMt, quad, quad_with_normals};
    use crate::{Cluster, Material, MeshUuid};
    use pretty_assertions::assert_eq;

    fn update(
        clusters: Vec<Vec<u32>>,
        cluster_materials: Vec<u32>,
        materials: Vec<Material>,
        tex_coords: Vec<TexPoint>,
    ) -> MaterialUpdate {
        MaterialUpdate {
            uuid: MeshUuid::from("m"),
            clusters: clusters
                .into_iter()
                .enumerate()
                .map(|(i, faces)| Cluster {
                    name: format!("c{i}"),
                    faces,
                })
                .collect(),
            cluster_materials,
            materials,
            tex_coords,
        }
    }

    fn quad_tex_coords() -> Vec<TexPoint> {
        vec![
            point2(0.0, 0.0),
            point2(1.0, 0.0),
            point2(1.0, 1.0),
            point2(0.0, 0.25),
        ]
    }

    #[test]
    fn textured_and_flat() {
        let meshes = assemble_clusters::<TestMt>(
            &quad_with_normals(),
            &update(
                vec![vec![0], vec![1]],
                vec![1, 0],
                vec![Material::flat(Rgba::RED), Material::textured(0)],
                quad_tex_coords(),
            ),
        )
        .unwrap();

        assert_eq!(meshes.textured().len(), 1);
        assert_eq!(meshes.flat().len(), 1);
        assert!(meshes.uses_slot(0));
        assert!(!meshes.uses_slot(1));

        let textured = &meshes.textured()[0];
        assert_eq!((textured.cluster(), textured.name()), (0, "c0"));
        assert!(textured.texture().is_none());
        textured.buffer().consistency_check();
        assert_eq!(
            textured.buffer().primitives::<3>().collect::<Vec<_>>(),
            vec![[0, 1, 2]]
        );
        // Face 0 is vertices 0, 1, 2; v is flipped.
        assert_eq!(
            textured
                .buffer()
                .vertices()
                .iter()
                .map(|v| v.coloring)
                .collect::<Vec<_>>(),
            vec![
                Coloring::Texture(point2(0.0, 1.0)),
                Coloring::Texture(point2(1.0, 1.0)),
                Coloring::Texture(point2(1.0, 0.0)),
            ]
        );
        assert!(textured.buffer().vertices().iter().all(|v| v.normal.is_some()));

        let flat = &meshes.flat()[0];
        assert_eq!((flat.cluster(), flat.color()), (1, Rgba::RED));
        // Locally re-indexed from 0 even though it is the second face.
        assert_eq!(
            flat.buffer().primitives::<3>().collect::<Vec<_>>(),
            vec![[0, 1, 2]]
        );
        assert!(
            flat.buffer()
                .vertices()
                .iter()
                .all(|v| v.coloring == Coloring::Solid(Rgba::RED))
        );
    }

    #[test]
    fn vertices_are_duplicated_per_face() {
        let meshes = assemble_clusters::<TestMt>(
            &quad(),
            &update(vec![vec![0, 1]], vec![0], vec![Material::flat(Rgba::BLUE)], vec![]),
        )
        .unwrap();
        let buffer = meshes.flat()[0].buffer();
        assert_eq!(buffer.vertices().len(), 6);
        assert_eq!(
            buffer.primitives::<3>().collect::<Vec<_>>(),
            vec![[0, 1, 2], [3, 4, 5]]
        );
        assert_eq!(buffer.vertices()[3].position, quad().vertices()[0]);
    }

    #[test]
    fn textured_degrades_to_flat_without_tex_coords() {
        let meshes = assemble_clusters::<TestMt>(
            &quad(),
            &update(
                vec![vec![0, 1]],
                vec![0],
                vec![Material {
                    color: Rgba::GREEN,
                    texture_slot: Some(0),
                }],
                quad_tex_coords()[..3].to_vec(),
            ),
        )
        .unwrap();
        assert!(meshes.textured().is_empty());
        assert_eq!(meshes.flat()[0].color(), Rgba::GREEN);
    }

    #[test]
    fn cluster_material_count_mismatch() {
        let result = assemble_clusters::<TestMt>(
            &quad(),
            &update(vec![vec![0], vec![1]], vec![0], vec![Material::flat(Rgba::RED)], vec![]),
        );
        assert!(matches!(
            result,
            Err(MeshError::CardinalityMismatch {
                what: "cluster materials",
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn material_index_out_of_range() {
        let result = assemble_clusters::<TestMt>(
            &quad(),
            &update(vec![vec![0]], vec![3], vec![Material::flat(Rgba::RED)], vec![]),
        );
        assert!(matches!(
            result,
            Err(MeshError::IndexOutOfRange {
                what: "material",
                index: 3,
                len: 1
            })
        ));
    }

    #[test]
    fn face_index_out_of_range() {
        let result = assemble_clusters::<TestMt>(
            &quad(),
            &update(vec![vec![0, 2]], vec![0], vec![Material::flat(Rgba::RED)], vec![]),
        );
        assert!(matches!(
            result,
            Err(MeshError::IndexOutOfRange {
                what: "cluster face",
                index: 2,
                len: 2
            })
        ));
    }
}
