//! Display configuration, and the plan of what to draw that it implies for a given mesh.

use crate::{ColorMap, Representation, Rgba, VisibilitySet};

/// Options for how a mesh is displayed, typically set from the host's user interface.
///
/// These never affect the contents of buffers, only which of them are visible and how the
/// host should configure its render passes; see [`DisplayOptions::plan()`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
pub struct DisplayOptions {
    /// Draw the edges of the triangles.
    pub show_wireframe: bool,
    /// Color of the wireframe. Its alpha is ignored in favor of
    /// [`wireframe_alpha`](Self::wireframe_alpha).
    pub wireframe_color: Rgba,
    /// Opacity of the wireframe.
    pub wireframe_alpha: f32,

    /// Fill the triangles, when neither textures nor costs are shown.
    pub show_faces: bool,
    /// Color of filled faces. Its alpha is ignored in favor of
    /// [`faces_alpha`](Self::faces_alpha).
    pub faces_color: Rgba,
    /// Opacity of filled faces.
    pub faces_alpha: f32,
    /// Fill the faces with the per-vertex colors, if the mesh has them, rather than
    /// [`faces_color`](Self::faces_color).
    pub use_vertex_colors: bool,

    /// Show the mesh colored by per-vertex costs, if it has them.
    pub show_vertex_costs: bool,
    /// Colormap that hosts should send along with cost requests. The mesh does not
    /// recolor existing costs when this changes.
    pub colormap: ColorMap,

    /// Show the material cluster groups, if the mesh has materials.
    pub show_textures: bool,
    /// When showing cluster groups, hide those without textures.
    pub show_textured_faces_only: bool,

    /// Show the normal overlay, if the mesh has normals.
    pub show_normals: bool,
    /// Color of the normal overlay. Its alpha is ignored in favor of
    /// [`normals_alpha`](Self::normals_alpha).
    pub normals_color: Rgba,
    /// Opacity of the normal overlay.
    pub normals_alpha: f32,
    /// Length of the normal overlay's lines, as a multiple of the normals' lengths.
    pub normals_scale: f32,
}

impl Default for DisplayOptions {
    /// Faces in solid green with a black wireframe, textures when available, no costs and
    /// no normals.
    fn default() -> Self {
        Self {
            show_wireframe: true,
            wireframe_color: Rgba::BLACK,
            wireframe_alpha: 1.0,
            show_faces: true,
            faces_color: Rgba::GREEN,
            faces_alpha: 1.0,
            use_vertex_colors: false,
            show_vertex_costs: false,
            colormap: ColorMap::Rainbow,
            show_textures: true,
            show_textured_faces_only: false,
            show_normals: false,
            normals_color: Rgba::opaque(1.0, 0.0, 1.0),
            normals_alpha: 1.0,
            normals_scale: 1.0,
        }
    }
}

impl DisplayOptions {
    /// Returns a copy of `self` with every value within its allowed range: alphas and colors
    /// clamped to `[0, 1]`, and a non-finite normals scale replaced with the default.
    #[must_use]
    pub fn repair(mut self) -> Self {
        for alpha in [
            &mut self.wireframe_alpha,
            &mut self.faces_alpha,
            &mut self.normals_alpha,
        ] {
            *alpha = if alpha.is_nan() {
                1.0
            } else {
                alpha.clamp(0.0, 1.0)
            };
        }
        for color in [
            &mut self.wireframe_color,
            &mut self.faces_color,
            &mut self.normals_color,
        ] {
            *color = color.clamp();
        }
        if !self.normals_scale.is_finite() {
            self.normals_scale = Self::default().normals_scale;
        }
        self
    }

    /// Decides which representations to show and which passes to configure, for a mesh
    /// whose accepted data is described by `status`.
    ///
    /// * Faces are filled (on [`Representation::VertexColored`] if
    ///   [`use_vertex_colors`](Self::use_vertex_colors) is set and the mesh has colors,
    ///   otherwise on [`Representation::Base`]) only if neither textures nor costs are
    ///   to be shown.
    /// * Costs are shown if requested and present; likewise the cluster groups, with flat
    ///   groups hidden if only textured faces are wanted.
    /// * The wireframe is drawn over [`Representation::Base`] whenever requested.
    /// * The normal overlay is shown only if the mesh has normals.
    pub fn plan(&self, status: MeshStatus) -> DisplayPlan {
        let mut plan = DisplayPlan {
            visible: VisibilitySet::NONE,
            faces: None,
            wireframe: None,
            normals: None,
        };
        if !status.geometry {
            return plan;
        }

        if !self.show_textures && !self.show_vertex_costs && self.show_faces {
            let vertex_colors = self.use_vertex_colors && status.vertex_colors;
            let target = if vertex_colors {
                Representation::VertexColored
            } else {
                Representation::Base
            };
            plan.visible.set(target, true);
            plan.faces = Some(PassStyle {
                color: self.faces_color.with_alpha(self.faces_alpha),
                lighting: !vertex_colors,
                ..PassStyle::new(target, Fill::Solid, self.faces_alpha)
            });
        }

        if status.vertex_costs && self.show_vertex_costs {
            plan.visible.set(Representation::CostColored, true);
        }

        if status.materials && self.show_textures {
            plan.visible.set(Representation::TexturedClusters, true);
            plan.visible.set(
                Representation::FlatClusters,
                !self.show_textured_faces_only,
            );
        }

        if self.show_wireframe {
            plan.visible.set(Representation::Base, true);
            plan.wireframe = Some(PassStyle {
                color: self.wireframe_color.with_alpha(self.wireframe_alpha),
                ..PassStyle::new(Representation::Base, Fill::Wireframe, self.wireframe_alpha)
            });
        }

        if self.show_normals {
            if status.normals {
                plan.visible.set(Representation::NormalOverlay, true);
                plan.normals = Some(PassStyle {
                    color: self.normals_color.with_alpha(self.normals_alpha),
                    ..PassStyle::new(Representation::NormalOverlay, Fill::Solid, self.normals_alpha)
                });
            } else {
                log::debug!("normals requested but the mesh has none");
            }
        }

        log::trace!("display plan {plan:?}");
        plan
    }
}

/// What a [`MeshState`](crate::MeshState) has accepted for its current geometry.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct MeshStatus {
    /// Geometry is present. If false, all other fields are false.
    pub geometry: bool,
    /// The geometry has one normal per vertex.
    pub normals: bool,
    /// Vertex colors have been accepted.
    pub vertex_colors: bool,
    /// Vertex costs have been accepted.
    pub vertex_costs: bool,
    /// Materials have been accepted.
    pub materials: bool,
}

impl MeshStatus {
    /// Status of a mesh without geometry.
    pub const EMPTY: Self = Self {
        geometry: false,
        normals: false,
        vertex_colors: false,
        vertex_costs: false,
        materials: false,
    };
}

/// Result of [`DisplayOptions::plan()`]: which representations should be visible and how
/// the host should configure the passes drawn over them.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct DisplayPlan {
    /// Representations to make visible; all others should be hidden.
    pub visible: VisibilitySet,
    /// Pass filling the faces with a color or the vertex colors.
    pub faces: Option<PassStyle>,
    /// Pass drawing the triangle edges.
    pub wireframe: Option<PassStyle>,
    /// Pass drawing the normal overlay.
    pub normals: Option<PassStyle>,
}

/// Whether a pass fills triangles or draws their edges.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(clippy::exhaustive_enums)]
pub enum Fill {
    /// Filled triangles (or, for line buffers, plain lines).
    Solid,
    /// Triangle edges only.
    Wireframe,
}

/// Render state for one pass over one representation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct PassStyle {
    /// Representation the pass draws.
    pub target: Representation,
    /// Polygon fill mode.
    pub fill: Fill,
    /// Diffuse and self-illumination color, including alpha.
    pub color: Rgba,
    /// Whether scene lighting applies. Off when drawing per-vertex colors, so they are shown
    /// as given.
    pub lighting: bool,
    /// Whether to alpha-blend. On exactly when alpha is less than 1.
    pub blending: bool,
    /// Whether to write depth. Off exactly when blending.
    pub depth_write: bool,
    /// Whether back faces are culled. Always off; meshes may be open or inconsistently wound.
    pub cull_back_faces: bool,
}

impl PassStyle {
    fn new(target: Representation, fill: Fill, alpha: f32) -> Self {
        let blending = alpha < 1.0;
        Self {
            target,
            fill,
            color: Rgba::WHITE.with_alpha(alpha),
            lighting: true,
            blending,
            depth_write: !blending,
            cull_back_faces: false,
        }
    }
}
