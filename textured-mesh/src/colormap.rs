//! Mapping of normalized scalars to colors.

use crate::Rgba;

/// Policy for turning a normalized scalar in `[0, 1]` into a color.
///
/// Every policy is a total function: inputs outside `[0, 1]` are clamped and NaN is treated
/// as 0.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, displaydoc::Display)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
#[non_exhaustive]
pub enum ColorMap {
    /// Sweeps from blue at 0 through cyan, green, and yellow to red at 1.
    #[displaydoc("rainbow")]
    #[default]
    Rainbow,
    /// Green at 0, yellow at 0.5, red at 1.
    #[displaydoc("red-green")]
    RedGreen,
}

impl ColorMap {
    /// All policies, in order of their numeric ids.
    pub const ALL: [Self; 2] = [Self::Rainbow, Self::RedGreen];

    /// Returns the policy with the given numeric id, as used by hosts that select the policy
    /// from a list. Unknown ids fall back to [`ColorMap::Rainbow`].
    pub fn from_id(id: i32) -> Self {
        match usize::try_from(id).ok().and_then(|i| Self::ALL.get(i)) {
            Some(&map) => map,
            None => {
                log::warn!("unknown colormap id {id}; using rainbow");
                Self::Rainbow
            }
        }
    }

    /// Returns the policy with the given name (`"rainbow"` or `"red-green"`).
    /// Unknown names fall back to [`ColorMap::Rainbow`].
    pub fn from_name(name: &str) -> Self {
        match Self::ALL.into_iter().find(|map| map.to_string() == name) {
            Some(map) => map,
            None => {
                log::warn!("unknown colormap {name:?}; using rainbow");
                Self::Rainbow
            }
        }
    }

    /// Returns the numeric id of this policy; the inverse of [`ColorMap::from_id()`].
    pub fn id(self) -> i32 {
        match self {
            ColorMap::Rainbow => 0,
            ColorMap::RedGreen => 1,
        }
    }

    /// Maps `value` to an opaque color.
    pub fn map(self, value: f32) -> Rgba {
        let value = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 1.0)
        };
        match self {
            ColorMap::Rainbow => rainbow(value),
            ColorMap::RedGreen => red_green(value),
        }
    }
}

/// Piecewise-linear hue ramp over four segments.
///
/// `h` runs from 2 to 6; each unit interval of it blends one channel in or out, and the
/// fraction is complemented on even segments so that adjacent segments meet.
fn rainbow(value: f32) -> Rgba {
    let h = value * 4.0 + 2.0;
    let i = h.floor();
    let mut f = h - i;
    if i % 2.0 == 0.0 {
        f = 1.0 - f;
    }
    let n = 1.0 - f;

    if i <= 2.0 {
        Rgba::opaque(0.0, n, 1.0)
    } else if i <= 3.0 {
        Rgba::opaque(0.0, 1.0, n)
    } else if i <= 4.0 {
        Rgba::opaque(n, 1.0, 0.0)
    } else {
        Rgba::opaque(1.0, n, 0.0)
    }
}

fn red_green(value: f32) -> Rgba {
    Rgba::opaque(
        (2.0 * value).min(1.0),
        (2.0 * (1.0 - value)).min(1.0),
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn assert_close(actual: Rgba, expected: Rgba) {
        let close = actual
            .to_array()
            .into_iter()
            .zip(expected.to_array())
            .all(|(a, e)| (a - e).abs() < 1e-6);
        assert!(close, "{actual:?} != {expected:?}");
    }

    #[rstest]
    #[case(0.0, Rgba::BLUE)]
    #[case(0.25, Rgba::opaque(0.0, 1.0, 1.0))]
    #[case(0.5, Rgba::GREEN)]
    #[case(0.75, Rgba::opaque(1.0, 1.0, 0.0))]
    #[case(1.0, Rgba::RED)]
    #[case(0.125, Rgba::opaque(0.0, 0.5, 1.0))]
    #[case(0.625, Rgba::opaque(0.5, 1.0, 0.0))]
    fn rainbow_anchors(#[case] value: f32, #[case] expected: Rgba) {
        assert_close(ColorMap::Rainbow.map(value), expected);
    }

    #[rstest]
    #[case(0.0, Rgba::GREEN)]
    #[case(0.5, Rgba::opaque(1.0, 1.0, 0.0))]
    #[case(1.0, Rgba::RED)]
    #[case(0.25, Rgba::opaque(0.5, 1.0, 0.0))]
    fn red_green_anchors(#[case] value: f32, #[case] expected: Rgba) {
        assert_close(ColorMap::RedGreen.map(value), expected);
    }

    #[rstest]
    fn out_of_range_is_clamped(#[values(ColorMap::Rainbow, ColorMap::RedGreen)] map: ColorMap) {
        assert_eq!(map.map(-3.0), map.map(0.0));
        assert_eq!(map.map(7.0), map.map(1.0));
        assert_eq!(map.map(f32::NAN), map.map(0.0));
        assert_eq!(map.map(f32::INFINITY), map.map(1.0));
    }

    #[test]
    fn ramp_is_continuous() {
        for map in ColorMap::ALL {
            let mut previous = map.map(0.0);
            for step in 1..=1000 {
                let color = map.map(step as f32 / 1000.0);
                for (a, b) in color.to_array().into_iter().zip(previous.to_array()) {
                    assert!((a - b).abs() < 0.01, "{map:?} jumps at step {step}");
                }
                previous = color;
            }
        }
    }

    #[test]
    fn ids_and_names() {
        for map in ColorMap::ALL {
            assert_eq!(ColorMap::from_id(map.id()), map);
            assert_eq!(ColorMap::from_name(&map.to_string()), map);
        }
        assert_eq!(ColorMap::from_id(1), ColorMap::RedGreen);
        assert_eq!(ColorMap::from_id(-1), ColorMap::Rainbow);
        assert_eq!(ColorMap::from_id(17), ColorMap::Rainbow);
        assert_eq!(ColorMap::from_name("viridis"), ColorMap::Rainbow);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&ColorMap::RedGreen).unwrap(),
            r#""red-green""#
        );
        assert_eq!(
            serde_json::from_str::<ColorMap>(r#""rainbow""#).unwrap(),
            ColorMap::Rainbow
        );
    }
}
