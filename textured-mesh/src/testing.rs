//! Test helpers for textured-mesh tests and benches.
//!
//! This module is public but doc(hidden).

use euclid::{point2, point3, vec3};

use crate::texture::{PixelEncoding, TestAllocator, TestTexture, TextureImage};
use crate::{
    Cluster, Face, Geometry, GeometryUpdate, Material, MaterialUpdate, MeshTypes, MeshUuid,
    MeshVertex, Rgba, TexPoint,
};

#[derive(Debug)]
#[allow(clippy::exhaustive_enums)]
pub enum TestMt {}

impl MeshTypes for TestMt {
    type Vertex = MeshVertex;
    type Alloc = TestAllocator;
    type Texture = TestTexture;
}

fn quad_update(uuid: &str, with_normals: bool) -> GeometryUpdate {
    GeometryUpdate {
        uuid: MeshUuid::from(uuid),
        vertices: vec![
            point3(0., 0., 0.),
            point3(1., 0., 0.),
            point3(1., 1., 0.),
            point3(0., 1., 0.),
        ],
        faces: vec![[0, 1, 2], [0, 2, 3]],
        normals: if with_normals {
            vec![vec3(0., 0., 1.); 4]
        } else {
            vec![]
        },
    }
}

fn geometry(update: GeometryUpdate) -> Geometry {
    Geometry::new(update.vertices, update.faces, update.normals).expect("invalid test geometry")
}

/// A unit square in the XY plane made of two triangles, without normals.
pub fn quad() -> Geometry {
    geometry(quad_update("quad", false))
}

/// [`quad()`] with normals pointing toward +Z.
pub fn quad_with_normals() -> Geometry {
    geometry(quad_update("quad", true))
}

/// Geometry update for [`quad_with_normals()`].
pub fn quad_geometry_update(uuid: &str) -> GeometryUpdate {
    quad_update(uuid, true)
}

/// Materials for [`quad()`]: cluster `c0` (face 0) and `c1` (face 1) use textured material 0
/// in slot 0, and `c2` (both faces) uses flat red material 1.
pub fn quad_textured_materials() -> MaterialUpdate {
    quad_textured_materials_for("m")
}

/// [`quad_textured_materials()`] with the given identity.
pub fn quad_textured_materials_for(uuid: &str) -> MaterialUpdate {
    MaterialUpdate {
        uuid: MeshUuid::from(uuid),
        clusters: vec![
            Cluster {
                name: "c0".into(),
                faces: vec![0],
            },
            Cluster {
                name: "c1".into(),
                faces: vec![1],
            },
            Cluster {
                name: "c2".into(),
                faces: vec![0, 1],
            },
        ],
        cluster_materials: vec![0, 0, 1],
        materials: vec![Material::textured(0), Material::flat(Rgba::RED)],
        tex_coords: vec![
            point2(0., 0.),
            point2(1., 0.),
            point2(1., 1.),
            point2(0., 1.),
        ],
    }
}

/// An opaque `size`×`size` image.
pub fn rgba_image(size: u32) -> TextureImage {
    let len = (size * size * 4) as usize;
    TextureImage::packed(size, size, PixelEncoding::Rgba8, vec![255; len])
        .expect("invalid test image")
}

/// A flat `n`×`n` grid of squares with normals and texture coordinates, and materials putting
/// each row of squares in its own cluster, alternating between textured slot 0 and flat.
pub fn grid(uuid: &str, n: u32) -> (GeometryUpdate, MaterialUpdate) {
    let side = n + 1;
    let index = |x: u32, y: u32| y * side + x;

    let mut vertices = Vec::new();
    let mut tex_coords: Vec<TexPoint> = Vec::new();
    for y in 0..side {
        for x in 0..side {
            vertices.push(point3(x as f32, y as f32, 0.));
            tex_coords.push(point2(x as f32 / n as f32, y as f32 / n as f32));
        }
    }
    let mut faces: Vec<Face> = Vec::new();
    let mut clusters = Vec::new();
    for y in 0..n {
        let mut cluster = Cluster {
            name: format!("row{y}"),
            faces: Vec::new(),
        };
        for x in 0..n {
            cluster.faces.extend([faces.len() as u32, faces.len() as u32 + 1]);
            faces.push([index(x, y), index(x + 1, y), index(x + 1, y + 1)]);
            faces.push([index(x, y), index(x + 1, y + 1), index(x, y + 1)]);
        }
        clusters.push(cluster);
    }

    let uuid = MeshUuid::from(uuid);
    let geometry = GeometryUpdate {
        uuid: uuid.clone(),
        normals: vec![vec3(0., 0., 1.); vertices.len()],
        vertices,
        faces,
    };
    let materials = MaterialUpdate {
        uuid,
        cluster_materials: (0..n).map(|y| y % 2).collect(),
        clusters,
        materials: vec![Material::textured(0), Material::flat(Rgba::GREEN)],
        tex_coords,
    };
    (geometry, materials)
}
