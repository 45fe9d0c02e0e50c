//! Coloring of meshes by per-vertex scalar costs.

use itertools::{Itertools as _, MinMaxResult};
use ordered_float::NotNan;

use crate::assemble::build_shared;
use crate::{ColorMap, Coloring, Geometry, MeshError, RenderBuffer, Vertex};

/// Range of costs which is mapped onto the full extent of a [`ColorMap`].
///
/// Always finite and of positive width.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CostRange {
    min: NotNan<f32>,
    max: NotNan<f32>,
}

impl CostRange {
    /// Constructs a range.
    ///
    /// Fails with [`MeshError::DegenerateRange`] unless both limits are finite and
    /// `max > min`.
    pub fn new(min: f32, max: f32) -> Result<Self, MeshError> {
        let degenerate = MeshError::DegenerateRange { min, max };
        if !(min.is_finite() && max.is_finite() && max - min > 0.0) {
            return Err(degenerate);
        }
        match (NotNan::new(min), NotNan::new(max)) {
            (Ok(min), Ok(max)) => Ok(Self { min, max }),
            _ => Err(degenerate),
        }
    }

    /// Determines the range to use for `costs`: each of `min` and `max` that is given is used
    /// as is, and each that is absent is taken from the smallest or largest cost.
    ///
    /// NaN costs are ignored.
    pub fn resolve(costs: &[f32], min: Option<f32>, max: Option<f32>) -> Result<Self, MeshError> {
        let (data_min, data_max) = match (min, max) {
            (Some(min), Some(max)) => (min, max),
            _ => data_extent(costs).unwrap_or((f32::NAN, f32::NAN)),
        };
        Self::new(min.unwrap_or(data_min), max.unwrap_or(data_max))
    }

    /// Lower limit; maps to 0.
    #[inline]
    pub fn min(&self) -> f32 {
        self.min.into_inner()
    }

    /// Upper limit; maps to 1.
    #[inline]
    pub fn max(&self) -> f32 {
        self.max.into_inner()
    }

    /// Maps `cost` linearly so that [`Self::min()`] becomes 0 and [`Self::max()`] becomes 1.
    ///
    /// Costs outside the range map outside `[0, 1]`; [`ColorMap::map()`] clamps them.
    #[inline]
    pub fn normalize(&self, cost: f32) -> f32 {
        (cost - self.min()) / (self.max() - self.min())
    }
}

/// Smallest and largest non-NaN cost.
fn data_extent(costs: &[f32]) -> Option<(f32, f32)> {
    match costs
        .iter()
        .filter_map(|&cost| NotNan::new(cost).ok())
        .minmax()
    {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(c) => Some((c.into_inner(), c.into_inner())),
        MinMaxResult::MinMax(min, max) => Some((min.into_inner(), max.into_inner())),
    }
}

/// Builds the mesh colored by per-vertex costs.
///
/// Fails with [`MeshError::CardinalityMismatch`] unless there is exactly one cost per vertex.
pub fn build_cost_colored<V: Vertex>(
    geometry: &Geometry,
    costs: &[f32],
    colormap: ColorMap,
    range: CostRange,
) -> Result<RenderBuffer<V>, MeshError> {
    geometry.check_vertex_count("vertex costs", costs.len())?;
    log::trace!(
        "coloring {} costs in [{}, {}] with {colormap}",
        costs.len(),
        range.min(),
        range.max()
    );
    Ok(build_shared(geometry, |i| {
        Coloring::Solid(colormap.map(range.normalize(costs[i])))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::quad;
    use crate::{MeshVertex, Rgba};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1.0, 1.0)]
    #[case(2.0, 1.0)]
    #[case(f32::NAN, 1.0)]
    #[case(0.0, f32::INFINITY)]
    fn degenerate(#[case] min: f32, #[case] max: f32) {
        assert!(matches!(
            CostRange::new(min, max),
            Err(MeshError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn normalize_endpoints_exactly() {
        let range = CostRange::new(1.0, 3.0).unwrap();
        assert_eq!(range.normalize(1.0), 0.0);
        assert_eq!(range.normalize(2.0), 0.5);
        assert_eq!(range.normalize(3.0), 1.0);
    }

    #[test]
    fn resolve_from_data() {
        let range = CostRange::resolve(&[5.0, f32::NAN, -2.0, 3.0], None, None).unwrap();
        assert_eq!((range.min(), range.max()), (-2.0, 5.0));
    }

    #[test]
    fn resolve_partially_explicit() {
        let range = CostRange::resolve(&[5.0, -2.0], Some(0.0), None).unwrap();
        assert_eq!((range.min(), range.max()), (0.0, 5.0));
        let range = CostRange::resolve(&[5.0, -2.0], None, Some(10.0)).unwrap();
        assert_eq!((range.min(), range.max()), (-2.0, 10.0));
    }

    #[test]
    fn resolve_explicit_ignores_data() {
        let range = CostRange::resolve(&[], Some(0.0), Some(3.0)).unwrap();
        assert_eq!((range.min(), range.max()), (0.0, 3.0));
    }

    #[test]
    fn resolve_constant_costs() {
        assert_eq!(
            CostRange::resolve(&[4.0, 4.0, 4.0], None, None),
            Err(MeshError::DegenerateRange { min: 4.0, max: 4.0 })
        );
    }

    #[test]
    fn resolve_no_usable_costs() {
        assert!(CostRange::resolve(&[f32::NAN], None, None).is_err());
    }

    #[test]
    fn cost_colors() {
        let buffer = build_cost_colored::<MeshVertex>(
            &quad(),
            &[0.0, 1.0, 2.0, 4.0],
            ColorMap::RedGreen,
            CostRange::new(0.0, 4.0).unwrap(),
        )
        .unwrap();
        buffer.consistency_check();
        assert_eq!(
            buffer.vertices().iter().map(|v| v.coloring).collect::<Vec<_>>(),
            vec![
                Coloring::Solid(Rgba::GREEN),
                Coloring::Solid(Rgba::opaque(0.5, 1.0, 0.0)),
                Coloring::Solid(Rgba::opaque(1.0, 1.0, 0.0)),
                Coloring::Solid(Rgba::RED),
            ]
        );
    }

    #[test]
    fn cost_count_mismatch() {
        assert_eq!(
            build_cost_colored::<MeshVertex>(
                &quad(),
                &[0.0; 5],
                ColorMap::Rainbow,
                CostRange::new(0.0, 1.0).unwrap(),
            ),
            Err(MeshError::CardinalityMismatch {
                what: "vertex costs",
                expected: 4,
                actual: 5
            })
        );
    }
}
