//! Sample-point geometry for line-of-site probes.
//!
//! Probe geometry is static for the run: coordinates are computed once
//! during initialization and never updated, so a probe does not follow
//! mesh motion.

use crate::error::ProbeError;
use crate::provision::COORDINATES_FIELD;
use crate::spec::ProbeGroupSpec;
use sonde_mesh::{Coord, MeshBulk, MeshMeta};

/// Evenly spaced sample coordinates from `tail` to `tip`, inclusive.
///
/// With `n` points and step `dx = (tip - tail) / (n - 1)`, point `j`
/// is `tail + j * dx`. Point 0 is exactly `tail` and point `n - 1` is
/// exactly `tip`: the endpoints are pinned rather than accumulated, so
/// rounding in `dx` cannot drift the last sample off the tip.
///
/// `tail` and `tip` must have equal length and `n` must be at least 2.
///
/// # Examples
///
/// ```
/// use sonde_probes::geometry::line_points;
///
/// let points = line_points(&[0.0, 0.0, 0.0], &[0.0, 0.0, 1.0], 3);
/// assert_eq!(points[0].as_slice(), &[0.0, 0.0, 0.0]);
/// assert_eq!(points[1].as_slice(), &[0.0, 0.0, 0.5]);
/// assert_eq!(points[2].as_slice(), &[0.0, 0.0, 1.0]);
/// ```
pub fn line_points(tail: &[f64], tip: &[f64], n: u32) -> Vec<Coord> {
    debug_assert!(n >= 2, "a line-of-site probe needs at least 2 points");
    debug_assert_eq!(tail.len(), tip.len());
    let steps = f64::from(n - 1);
    let dx: Coord = tip
        .iter()
        .zip(tail)
        .map(|(t, a)| (t - a) / steps)
        .collect();
    (0..n)
        .map(|j| {
            if j == n - 1 {
                Coord::from_slice(tip)
            } else {
                tail.iter()
                    .zip(&dx)
                    .map(|(a, d)| a + f64::from(j) * d)
                    .collect()
            }
        })
        .collect()
}

/// Write sample coordinates into every owned probe node.
///
/// Runs after the create phase: only ranks holding node handles write
/// anything. Endpoint components beyond the mesh's spatial dimension
/// are ignored; endpoints with fewer components than the mesh needs
/// are a [`ProbeError::CoordinateDim`].
pub(crate) fn place_all<M>(groups: &[ProbeGroupSpec], mesh: &mut M) -> Result<(), ProbeError>
where
    M: MeshMeta + MeshBulk,
{
    let ndim = mesh.spatial_dimension();
    let coordinates = mesh
        .field(COORDINATES_FIELD)
        .ok_or(ProbeError::MissingCoordinates)?;

    for group in groups {
        for set in &group.sets {
            for probe in 0..set.len() {
                if set.nodes[probe].is_empty() {
                    continue;
                }
                let tail = &set.tails[probe];
                let tip = &set.tips[probe];
                if tail.len() < ndim || tip.len() < ndim {
                    return Err(ProbeError::CoordinateDim {
                        probe: set.part_names[probe].clone(),
                        have: tail.len().min(tip.len()),
                        need: ndim,
                    });
                }
                let points = line_points(&tail[..ndim], &tip[..ndim], set.point_counts[probe]);
                for (node, point) in set.nodes[probe].iter().zip(&points) {
                    let data = mesh
                        .field_data_mut(coordinates, *node)
                        .ok_or(ProbeError::MissingCoordinates)?;
                    data.copy_from_slice(point);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn two_points_are_exactly_tail_and_tip() {
        let points = line_points(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], 2);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(points[1].as_slice(), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn vertical_three_point_line() {
        let points = line_points(&[0.0, 0.0, 0.0], &[0.0, 0.0, 1.0], 3);
        assert_eq!(points[0].as_slice(), &[0.0, 0.0, 0.0]);
        assert_eq!(points[1].as_slice(), &[0.0, 0.0, 0.5]);
        assert_eq!(points[2].as_slice(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn planar_line_stays_planar() {
        let points = line_points(&[-1.0, 2.0], &[1.0, 2.0], 5);
        for (j, point) in points.iter().enumerate() {
            assert_eq!(point.len(), 2);
            assert!((point[0] - (-1.0 + 0.5 * j as f64)).abs() < 1e-12);
            assert_eq!(point[1], 2.0);
        }
    }

    proptest! {
        #[test]
        fn endpoints_are_exact(
            tail in proptest::collection::vec(-1e6f64..1e6, 3),
            tip in proptest::collection::vec(-1e6f64..1e6, 3),
            n in 2u32..64,
        ) {
            let points = line_points(&tail, &tip, n);
            prop_assert_eq!(points.len(), n as usize);
            prop_assert_eq!(points[0].as_slice(), tail.as_slice());
            prop_assert_eq!(points[n as usize - 1].as_slice(), tip.as_slice());
        }

        #[test]
        fn spacing_is_uniform(
            tail in proptest::collection::vec(-1e3f64..1e3, 3),
            tip in proptest::collection::vec(-1e3f64..1e3, 3),
            n in 3u32..32,
        ) {
            let points = line_points(&tail, &tip, n);
            let expected: Vec<f64> = tip
                .iter()
                .zip(&tail)
                .map(|(t, a)| (t - a) / f64::from(n - 1))
                .collect();
            for pair in points.windows(2) {
                for axis in 0..3 {
                    let step = pair[1][axis] - pair[0][axis];
                    prop_assert!((step - expected[axis]).abs() <= 1e-9);
                }
            }
        }
    }
}
