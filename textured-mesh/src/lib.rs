//! Incremental assembly of renderable triangle meshes from independently arriving,
//! partial mesh updates.
//!
//! A logical mesh is described by a sequence of updates which may arrive at different times:
//! geometry (positions, faces, and optionally normals), per-vertex colors, per-vertex scalar
//! costs, per-cluster materials, and texture images. [`MeshState`] accepts these updates,
//! checks that each one belongs to the current geometry, and keeps several independently
//! visible render representations of the same mesh up to date:
//!
//! * the plain mesh,
//! * the mesh with per-vertex colors,
//! * the mesh colored by per-vertex costs through a [`ColorMap`],
//! * one buffer per material cluster, split into textured and flat-colored groups,
//! * a line overlay depicting the vertex normals.
//!
//! All of the algorithms here are independent of graphics API. Nothing is drawn by this crate;
//! it decides what geometry and which color and texture bindings exist, and the host renderer
//! uploads and draws them.
//!
//! # Getting started
//!
//! To support a new API/format, implement the [`Vertex`] and [`texture::Allocator`] traits
//! (or use the provided [`GpuVertex`]), then implement [`MeshTypes`] to bundle them together.
//! Construct a [`MeshState`] with the allocator and feed it [`MeshUpdate`]s in the order they
//! arrive.
//!
//! Restrictions and caveats:
//! * Triangles are emitted with the winding order of the input faces.
//! * Cluster meshes duplicate vertices per face, so that every cluster's buffer is
//!   self-contained. This costs memory in exchange for per-cluster texture coordinates and
//!   normals that never conflict across cluster boundaries.
//! * The crate performs no internal locking. Updates for one mesh must be applied from one
//!   place, one at a time.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

use core::fmt;

mod aabb;
use aabb::Aabb;
mod assemble;
pub use assemble::*;
mod buffer;
pub use buffer::*;
mod colormap;
pub use colormap::*;
mod cost;
pub use cost::*;
mod display;
pub use display::*;
mod error;
pub use error::*;
mod geometry;
pub use geometry::*;
mod index_vec;
pub use index_vec::*;
mod material;
pub use material::*;
mod math;
pub use math::*;
mod representation;
pub use representation::*;
mod resolver;
pub use resolver::*;
mod state;
pub use state::*;
#[doc(hidden)]
pub mod testing;
pub mod texture;
mod update;
pub use update::*;
mod vertex;
pub use vertex::*;


/// Bundle of types chosen to support a specific graphics API or other mesh format.
///
/// Implement this trait (using a placeholder type which need not store any data) to choose the
/// vertex format and the texture objects to be used.
///
/// The rationale of this trait existing is to be able to avoid numerous type parameters passed
/// around separately.
pub trait MeshTypes: 'static {
    /// Mesh vertex type.
    type Vertex: Vertex + fmt::Debug + PartialEq;

    /// Factory for texture objects, injected into [`MeshState::new()`].
    type Alloc: texture::Allocator<Texture = Self::Texture> + fmt::Debug;

    /// Handle to a texture created by [`Self::Alloc`].
    ///
    /// Dropping every clone of a handle must release the texture.
    type Texture: Clone + fmt::Debug + 'static;
}
