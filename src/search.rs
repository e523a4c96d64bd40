use crate::domain::{PeriodicDomain, PeriodicPolicy};
use crate::error::FinderError;
use nalgebra::Vector3;

/// Every column must hold exactly `n` values.
pub(crate) fn check_columns(n: usize, columns: &[&[f64]]) -> Result<(), FinderError> {
    match columns.iter().find(|c| c.len() != n) {
        Some(c) => Err(FinderError::LengthMismatch {
            expected: n,
            got: c.len(),
        }),
        None => Ok(()),
    }
}

#[inline]
pub(crate) fn point(xs: &[f64], ys: &[f64], zs: &[f64], i: usize) -> Vector3<f64> {
    Vector3::new(xs[i], ys[i], zs[i])
}

/// Inclusive sphere test: spheres that exactly touch count as overlapping.
#[inline]
pub fn within_reach(dist_sq: f64, reach: f64) -> bool {
    reach * reach >= dist_sq
}

/// O(N^2) reference for the self-join. Returns every overlapping pair `(i, j)`
/// with `i < j`.
pub fn brute_force_overlaps(
    domain: &PeriodicDomain,
    xs: &[f64],
    ys: &[f64],
    zs: &[f64],
    rs: &[f64],
    policy: PeriodicPolicy,
) -> Vec<(usize, usize)> {
    let n = rs.len();
    let mut pairs = Vec::new();
    for i in 0..n {
        let pi = point(xs, ys, zs, i);
        for j in (i + 1)..n {
            let pj = point(xs, ys, zs, j);
            let d2 = domain.distance_squared(&pi, &pj, policy);
            if within_reach(d2, rs[i] + rs[j]) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// O(N) reference for the cross-set query. Returns `(index, dist_sq)` for every
/// point inside the sphere, in index order.
pub fn brute_force_in_sphere(
    domain: &PeriodicDomain,
    xs: &[f64],
    ys: &[f64],
    zs: &[f64],
    center: [f64; 3],
    radius: f64,
    policy: PeriodicPolicy,
) -> Vec<(usize, f64)> {
    let c = Vector3::from(center);
    (0..xs.len())
        .filter_map(|j| {
            let d2 = domain.distance_squared(&c, &point(xs, ys, zs, j), policy);
            within_reach(d2, radius).then_some((j, d2))
        })
        .collect()
}
