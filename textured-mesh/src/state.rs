use core::fmt;

use crate::{
    ClusterMeshes, ColorMap, CostRange, DisplayOptions, DisplayPlan, Geometry, GeometryUpdate,
    MaterialUpdate, MeshError, MeshId, MeshStatus, MeshTypes, MeshUpdate, MeshUuid,
    RenderBuffer, Representation, RepresentationId, TextureBinding, TextureResolver,
    TextureUpdate, UpdateKind, VertexColorUpdate, VertexCostUpdate, VisibilitySet,
    assemble_clusters, build_base, build_colored, build_cost_colored, build_normal_overlay,
};

/// All render representations of one logical mesh, kept consistent with the updates
/// describing it.
///
/// A geometry update replaces everything; every other update must name the identity
/// ([`MeshUuid`]) of the current geometry and is rejected otherwise. Each update is applied
/// completely or not at all: a rejected update leaves the state as it was (except that a
/// rejected geometry update still discards the previous geometry).
///
/// Visibility flags and the normal overlay scale are display settings, not mesh data, and
/// persist across geometry updates and [`MeshState::reset()`].
///
/// Type parameter `M` chooses the vertex type and the texture allocator.
pub struct MeshState<M: MeshTypes> {
    id: MeshId,
    allocator: M::Alloc,
    current: Option<Current<M>>,
    textures: TextureResolver<M>,
    visible: VisibilitySet,
    normals_scale: f32,
}

/// Everything derived from the current geometry.
struct Current<M: MeshTypes> {
    uuid: MeshUuid,
    geometry: Geometry,
    base: RenderBuffer<M::Vertex>,
    normal_overlay: Option<RenderBuffer<M::Vertex>>,
    vertex_colored: Option<RenderBuffer<M::Vertex>>,
    costs: Option<CostColoring<M::Vertex>>,
    clusters: Option<ClusterMeshes<M>>,
}

struct CostColoring<V> {
    buffer: RenderBuffer<V>,
    range: CostRange,
    colormap: ColorMap,
}

impl<M: MeshTypes> MeshState<M> {
    /// Creates an empty mesh state which will create textures using `allocator`.
    ///
    /// Only [`Representation::Base`] is initially visible; use
    /// [`Self::apply_display_options()`] or [`Self::set_visibility()`] to change that.
    pub fn new(allocator: M::Alloc) -> Self {
        let id = MeshId::new();
        log::debug!("created {id}");
        Self {
            id,
            allocator,
            current: None,
            textures: TextureResolver::new(),
            visible: VisibilitySet::NONE.with(Representation::Base),
            normals_scale: DisplayOptions::default().normals_scale,
        }
    }

    /// Identity of this mesh state, for naming host objects.
    pub fn id(&self) -> MeshId {
        self.id
    }

    /// The texture allocator given to [`Self::new()`].
    pub fn allocator(&self) -> &M::Alloc {
        &self.allocator
    }

    /// Identity of the current geometry, if any.
    pub fn uuid(&self) -> Option<&MeshUuid> {
        self.current.as_ref().map(|c| &c.uuid)
    }

    /// The current geometry, if any.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.current.as_ref().map(|c| &c.geometry)
    }

    /// Summarizes which data has been accepted for the current geometry.
    pub fn status(&self) -> MeshStatus {
        match &self.current {
            None => MeshStatus::EMPTY,
            Some(c) => MeshStatus {
                geometry: true,
                normals: c.geometry.normals().is_some(),
                vertex_colors: c.vertex_colored.is_some(),
                vertex_costs: c.costs.is_some(),
                materials: c.clusters.is_some(),
            },
        }
    }

    /// The plain mesh.
    pub fn base(&self) -> Option<&RenderBuffer<M::Vertex>> {
        self.current.as_ref().map(|c| &c.base)
    }

    /// The normal overlay, if the geometry has normals.
    pub fn normal_overlay(&self) -> Option<&RenderBuffer<M::Vertex>> {
        self.current.as_ref()?.normal_overlay.as_ref()
    }

    /// The mesh with vertex colors, if they have been accepted.
    pub fn vertex_colored(&self) -> Option<&RenderBuffer<M::Vertex>> {
        self.current.as_ref()?.vertex_colored.as_ref()
    }

    /// The mesh colored by costs, if they have been accepted.
    pub fn cost_colored(&self) -> Option<&RenderBuffer<M::Vertex>> {
        Some(&self.current.as_ref()?.costs.as_ref()?.buffer)
    }

    /// The range and colormap the current cost coloring was built with.
    pub fn cost_coloring(&self) -> Option<(CostRange, ColorMap)> {
        let costs = self.current.as_ref()?.costs.as_ref()?;
        Some((costs.range, costs.colormap))
    }

    /// The per-cluster groups, if materials have been accepted.
    pub fn clusters(&self) -> Option<&ClusterMeshes<M>> {
        self.current.as_ref()?.clusters.as_ref()
    }

    /// The texture resolver, for inspecting which texture slots are pending or bound.
    pub fn textures(&self) -> &TextureResolver<M> {
        &self.textures
    }

    /// Current scale of the normal overlay.
    pub fn normals_scale(&self) -> f32 {
        self.normals_scale
    }

    /// Returns the identifiers of all drawable objects that currently exist, whether
    /// visible or not.
    pub fn representation_ids(&self) -> Vec<RepresentationId> {
        let id = |representation, group| RepresentationId {
            mesh: self.id,
            representation,
            group,
        };
        let Some(current) = &self.current else {
            return Vec::new();
        };
        let mut ids = vec![id(Representation::Base, None)];
        if current.normal_overlay.is_some() {
            ids.push(id(Representation::NormalOverlay, None));
        }
        if current.vertex_colored.is_some() {
            ids.push(id(Representation::VertexColored, None));
        }
        if current.costs.is_some() {
            ids.push(id(Representation::CostColored, None));
        }
        if let Some(clusters) = &current.clusters {
            ids.extend(
                (0..clusters.textured.len())
                    .map(|i| id(Representation::TexturedClusters, Some(i))),
            );
            ids.extend((0..clusters.flat.len()).map(|i| id(Representation::FlatClusters, Some(i))));
        }
        ids
    }

    /// Returns the total memory (not counting allocator overhead) occupied by the buffers.
    pub fn total_byte_size(&self) -> usize {
        let Some(c) = &self.current else {
            return 0;
        };
        c.base.total_byte_size()
            + c.normal_overlay.as_ref().map_or(0, RenderBuffer::total_byte_size)
            + c.vertex_colored.as_ref().map_or(0, RenderBuffer::total_byte_size)
            + c.costs.as_ref().map_or(0, |costs| costs.buffer.total_byte_size())
            + c.clusters.as_ref().map_or(0, ClusterMeshes::total_byte_size)
    }

    /// Applies any kind of update.
    ///
    /// The outcome of texture binding is logged but not returned; use
    /// [`Self::add_texture()`] directly to observe it.
    pub fn apply(&mut self, update: MeshUpdate) -> Result<(), MeshError> {
        match update {
            MeshUpdate::Geometry(u) => self.set_geometry(u),
            MeshUpdate::VertexColors(u) => self.set_vertex_colors(u),
            MeshUpdate::VertexCosts(u) => self.set_vertex_costs(u),
            MeshUpdate::Materials(u) => self.set_materials(u),
            MeshUpdate::Texture(u) => self.add_texture(u).map(|_binding| ()),
        }
    }

    /// Replaces the geometry, discarding everything derived from the previous one
    /// (including cached texture images).
    ///
    /// On failure the state is left empty.
    pub fn set_geometry(&mut self, update: GeometryUpdate) -> Result<(), MeshError> {
        self.reset();
        let GeometryUpdate {
            uuid,
            vertices,
            faces,
            normals,
        } = update;
        let geometry = Geometry::new(vertices, faces, normals)
            .inspect_err(|error| log::warn!("rejected geometry for mesh {uuid}: {error}"))?;
        log::info!(
            "received geometry for mesh {uuid}: {} vertices, {} faces",
            geometry.vertex_count(),
            geometry.faces().len()
        );

        self.current = Some(Current {
            base: build_base(&geometry),
            normal_overlay: build_normal_overlay(&geometry, self.normals_scale),
            vertex_colored: None,
            costs: None,
            clusters: None,
            uuid,
            geometry,
        });
        Ok(())
    }

    /// Accepts one color per vertex and builds the vertex-colored mesh.
    ///
    /// Fails if `update` is not for the current geometry, if colors were already accepted
    /// for it, or if the number of colors differs from the number of vertices.
    pub fn set_vertex_colors(&mut self, update: VertexColorUpdate) -> Result<(), MeshError> {
        let current = current_for(&mut self.current, UpdateKind::VertexColors, &update.uuid)?;
        if current.vertex_colored.is_some() {
            return Err(duplicate(UpdateKind::VertexColors, &update.uuid));
        }
        let buffer = build_colored(&current.geometry, &update.colors)
            .inspect_err(|error| log::warn!("ignoring vertex colors: {error}"))?;
        log::info!("received {} vertex colors", update.colors.len());
        current.vertex_colored = Some(buffer);
        Ok(())
    }

    /// Accepts one cost per vertex and builds the cost-colored mesh.
    ///
    /// Unlike other updates, costs may be submitted again for the same geometry; the new
    /// coloring replaces the old one.
    ///
    /// Fails if `update` is not for the current geometry, if the number of costs differs from
    /// the number of vertices, or if the cost range is degenerate. On failure any previous
    /// cost coloring is kept.
    pub fn set_vertex_costs(&mut self, update: VertexCostUpdate) -> Result<(), MeshError> {
        let current = current_for(&mut self.current, UpdateKind::VertexCosts, &update.uuid)?;
        let VertexCostUpdate {
            uuid: _,
            costs,
            colormap,
            min_cost,
            max_cost,
        } = update;

        let result = current
            .geometry
            .check_vertex_count("vertex costs", costs.len())
            .and_then(|()| CostRange::resolve(&costs, min_cost, max_cost))
            .and_then(|range| {
                let buffer = build_cost_colored(&current.geometry, &costs, colormap, range)?;
                Ok(CostColoring {
                    buffer,
                    range,
                    colormap,
                })
            });
        let coloring = result.inspect_err(|error| log::warn!("ignoring vertex costs: {error}"))?;
        log::info!(
            "received {} vertex costs in [{}, {}]",
            costs.len(),
            coloring.range.min(),
            coloring.range.max()
        );
        if current.costs.replace(coloring).is_some() {
            log::warn!("overwrote previously received vertex costs");
        }
        Ok(())
    }

    /// Accepts the cluster materials and builds the per-cluster groups, binding any texture
    /// images already received for their slots.
    ///
    /// Fails if `update` is not for the current geometry, if materials were already accepted
    /// for it, or if the clusters are inconsistent (see [`assemble_clusters()`]).
    /// If a texture cannot be allocated, the whole mesh is reset and
    /// [`MeshError::ResourceExhausted`] returned.
    pub fn set_materials(&mut self, update: MaterialUpdate) -> Result<(), MeshError> {
        let current = current_for(&mut self.current, UpdateKind::Materials, &update.uuid)?;
        if current.clusters.is_some() {
            return Err(duplicate(UpdateKind::Materials, &update.uuid));
        }
        let mut clusters = assemble_clusters::<M>(&current.geometry, &update)
            .inspect_err(|error| log::warn!("ignoring materials: {error}"))?;
        log::info!(
            "received {} materials for {} clusters",
            update.materials.len(),
            update.clusters.len()
        );

        match self.textures.bind_ready(&mut clusters, &self.allocator) {
            Ok(bound) => {
                log::debug!("bound {bound} previously received textures");
                current.clusters = Some(clusters);
                Ok(())
            }
            Err(error) => {
                drop(clusters);
                self.reset();
                Err(error)
            }
        }
    }

    /// Accepts the image for one texture slot, binding it to the groups that use the slot
    /// if materials have been accepted, and otherwise keeping it until they are.
    ///
    /// Fails if `update.uuid` or `update.materials_uuid` is not the identity of the current
    /// geometry. If the texture cannot be allocated, the whole mesh is reset and
    /// [`MeshError::ResourceExhausted`] returned.
    pub fn add_texture(&mut self, update: TextureUpdate) -> Result<TextureBinding, MeshError> {
        let TextureUpdate {
            uuid,
            materials_uuid,
            slot,
            image,
        } = update;
        let current = current_for(&mut self.current, UpdateKind::Texture, &uuid)?;
        if materials_uuid != current.uuid {
            let error = MeshError::IdentityMismatch {
                kind: UpdateKind::Texture,
                expected: Some(current.uuid.clone()),
                got: materials_uuid,
            };
            log::warn!("{error}");
            return Err(error);
        }
        log::info!(
            "received {}×{} texture for slot {slot}",
            image.width(),
            image.height()
        );

        let result =
            self.textures
                .submit_image(slot, image, current.clusters.as_mut(), &self.allocator);
        if result.is_err() {
            self.reset();
        }
        result
    }

    /// Sets whether a representation should be drawn. This has no effect on buffer contents.
    pub fn set_visibility(&mut self, representation: Representation, visible: bool) {
        self.visible.set(representation, visible);
    }

    /// Returns whether a representation should be drawn.
    ///
    /// This is the requested visibility; a representation that does not currently exist
    /// has nothing to draw regardless.
    pub fn is_visible(&self, representation: Representation) -> bool {
        self.visible.contains(representation)
    }

    /// All representations that should be drawn.
    pub fn visibility(&self) -> VisibilitySet {
        self.visible
    }

    /// Changes the length of the normal overlay's lines, rebuilding it from the geometry.
    ///
    /// Fails with [`MeshError::InvalidScale`] if `scale` is not finite.
    pub fn set_normals_scale(&mut self, scale: f32) -> Result<(), MeshError> {
        if !scale.is_finite() {
            return Err(MeshError::InvalidScale(scale));
        }
        if scale == self.normals_scale {
            return Ok(());
        }
        self.normals_scale = scale;
        if let Some(current) = &mut self.current {
            log::debug!("rescaling normals of {} by {scale}", self.id);
            current.normal_overlay = build_normal_overlay(&current.geometry, scale);
        }
        Ok(())
    }

    /// Applies display options: rescales the normal overlay and sets visibility as decided
    /// by [`DisplayOptions::plan()`], which is returned for configuring render passes.
    ///
    /// Fails with [`MeshError::InvalidScale`], changing nothing, if the normals scale is not
    /// finite.
    pub fn apply_display_options(
        &mut self,
        options: &DisplayOptions,
    ) -> Result<DisplayPlan, MeshError> {
        self.set_normals_scale(options.normals_scale)?;
        let plan = options.plan(self.status());
        self.visible = plan.visible;
        Ok(plan)
    }

    /// Discards the geometry and everything derived from it, and releases all textures.
    pub fn reset(&mut self) {
        if let Some(current) = self.current.take() {
            log::info!("resetting {} (was mesh {})", self.id, current.uuid);
        }
        self.textures.clear();
    }

    /// Returns the identifier of a representation of this mesh.
    pub fn representation_id(
        &self,
        representation: Representation,
        group: Option<usize>,
    ) -> RepresentationId {
        RepresentationId {
            mesh: self.id,
            representation,
            group,
        }
    }
}

/// Returns the current geometry's state if `uuid` identifies it.
fn current_for<'a, M: MeshTypes>(
    current: &'a mut Option<Current<M>>,
    kind: UpdateKind,
    uuid: &MeshUuid,
) -> Result<&'a mut Current<M>, MeshError> {
    let expected = match current.as_ref() {
        Some(current) if current.uuid == *uuid => None,
        Some(other) => Some(Some(other.uuid.clone())),
        None => Some(None),
    };
    let Some(expected) = expected else {
        return Ok(current.as_mut().expect("checked above"));
    };
    let error = MeshError::IdentityMismatch {
        kind,
        expected,
        got: uuid.clone(),
    };
    log::warn!("{error}");
    Err(error)
}

fn duplicate(kind: UpdateKind, uuid: &MeshUuid) -> MeshError {
    let error = MeshError::DuplicateSubmission {
        kind,
        uuid: uuid.clone(),
    };
    log::warn!("{error}");
    error
}

impl<M: MeshTypes> fmt::Debug for MeshState<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeshState")
            .field("id", &self.id)
            .field("uuid", &self.uuid())
            .field("status", &self.status())
            .field("visible", &self.visible)
            .field("normals_scale", &self.normals_scale)
            .field("textures", &self.textures)
            .finish_non_exhaustive()
    }
}
