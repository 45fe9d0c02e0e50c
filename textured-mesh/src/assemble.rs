//! Buffers sharing the vertices of the geometry: the plain mesh, the vertex-colored mesh,
//! and the normal overlay.

use crate::{Coloring, Geometry, MeshError, MeshVertex, RenderBuffer, Rgba, Topology, Vertex};

/// Builds a triangle buffer whose vertices correspond one-to-one with the geometry's
/// vertices, with the coloring of each vertex given by `coloring`.
pub(crate) fn build_shared<V: Vertex>(
    geometry: &Geometry,
    mut coloring: impl FnMut(usize) -> Coloring,
) -> RenderBuffer<V> {
    let mut buffer = RenderBuffer::<V>::with_capacity(
        Topology::Triangles,
        geometry.vertex_count(),
        geometry.faces().len() * 3,
    );
    for (i, &position) in geometry.vertices().iter().enumerate() {
        buffer.push_vertex(MeshVertex {
            position,
            normal: geometry.normal(i),
            coloring: coloring(i),
        });
    }
    for &face in geometry.faces() {
        buffer.push_triangle(face);
    }
    buffer
}

/// Builds the plain mesh: the geometry's own vertices and faces, uncolored, with normals if
/// the geometry has them.
pub fn build_base<V: Vertex>(geometry: &Geometry) -> RenderBuffer<V> {
    build_shared(geometry, |_| Coloring::Uncolored)
}

/// Builds the mesh with one color per vertex.
///
/// Fails with [`MeshError::CardinalityMismatch`] unless there is exactly one color per vertex.
pub fn build_colored<V: Vertex>(
    geometry: &Geometry,
    colors: &[Rgba],
) -> Result<RenderBuffer<V>, MeshError> {
    geometry.check_vertex_count("vertex colors", colors.len())?;
    Ok(build_shared(geometry, |i| Coloring::Solid(colors[i])))
}

/// Builds the normal overlay: one line segment per vertex, from the vertex to the vertex
/// displaced by `scale` times its normal.
///
/// Returns [`None`] if the geometry has no normals. Endpoints are always computed from the
/// geometry's positions and normals, so rebuilding with any scale is exact.
pub fn build_normal_overlay<V: Vertex>(geometry: &Geometry, scale: f32) -> Option<RenderBuffer<V>> {
    let normals = geometry.normals()?;
    let mut buffer = RenderBuffer::<V>::with_capacity(
        Topology::Lines,
        normals.len() * 2,
        normals.len() * 2,
    );
    for (&position, &normal) in geometry.vertices().iter().zip(normals) {
        let [start, end] = [position, position + normal * scale].map(|position| MeshVertex {
            position,
            normal: None,
            coloring: Coloring::Uncolored,
        });
        let line = [buffer.push_vertex(start), buffer.push_vertex(end)];
        buffer.push_line(line);
    }
    Some(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{quad, quad_with_normals};
    use euclid::point3;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_shares_vertices() {
        let geometry = quad();
        let buffer = build_base::<MeshVertex>(&geometry);
        buffer.consistency_check();
        assert_eq!(buffer.vertices().len(), 4);
        assert_eq!(
            buffer.primitives::<3>().collect::<Vec<_>>(),
            geometry.faces().to_vec()
        );
        assert!(
            buffer
                .vertices()
                .iter()
                .all(|v| v.normal.is_none() && v.coloring == Coloring::Uncolored)
        );
    }

    #[test]
    fn base_attaches_normals() {
        let geometry = quad_with_normals();
        let buffer = build_base::<MeshVertex>(&geometry);
        for (vertex, &normal) in buffer.vertices().iter().zip(geometry.normals().unwrap()) {
            assert_eq!(vertex.normal, Some(normal));
        }
    }

    #[test]
    fn colored() {
        let colors = [Rgba::RED, Rgba::GREEN, Rgba::BLUE, Rgba::WHITE];
        let buffer = build_colored::<MeshVertex>(&quad(), &colors).unwrap();
        assert_eq!(
            buffer.vertices().iter().map(|v| v.coloring).collect::<Vec<_>>(),
            colors.map(Coloring::Solid).to_vec()
        );
    }

    #[test]
    fn colored_count_mismatch() {
        assert_eq!(
            build_colored::<MeshVertex>(&quad(), &[Rgba::RED; 3]),
            Err(MeshError::CardinalityMismatch {
                what: "vertex colors",
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn normal_overlay_requires_normals() {
        assert_eq!(build_normal_overlay::<MeshVertex>(&quad(), 1.0), None);
    }

    #[test]
    fn normal_overlay_endpoints() {
        let geometry = quad_with_normals();
        let buffer = build_normal_overlay::<MeshVertex>(&geometry, 0.5).unwrap();
        buffer.consistency_check();
        assert_eq!(buffer.topology(), Topology::Lines);
        assert_eq!(buffer.primitive_count(), 4);
        let [start, end] = [0, 1].map(|i| buffer.vertices()[i].position);
        assert_eq!(start, point3(0.0, 0.0, 0.0));
        assert_eq!(end, point3(0.0, 0.0, 0.5));
    }

    #[test]
    fn normal_overlay_rescale_does_not_drift() {
        let geometry = quad_with_normals();
        let once = build_normal_overlay::<MeshVertex>(&geometry, 2.0).unwrap();
        let _ = build_normal_overlay::<MeshVertex>(&geometry, 5.0).unwrap();
        let again = build_normal_overlay::<MeshVertex>(&geometry, 2.0).unwrap();
        assert_eq!(once, again);
    }
}
