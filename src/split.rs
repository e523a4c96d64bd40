use crate::bounds::CellRange;
use crate::domain::PeriodicPolicy;
use crate::error::FinderError;
use crate::grid::PeriodicGrid;
use crate::search::{check_columns, point, within_reach};
use nalgebra::Vector3;

/// Finds the halos of one group (A) that fall inside spheres taken from
/// another group (B).
///
/// Built for very large A and large search radii: nothing is memoized and no
/// host lists are kept. Each query overwrites the previous result.
pub struct SplitSubhaloFinder<'a> {
    grid: &'a PeriodicGrid,
    xs: &'a [f64],
    ys: &'a [f64],
    zs: &'a [f64],
    policy: PeriodicPolicy,
    scratch: Vec<usize>,
    idx_buf: Vec<usize>,
    dr2_buf: Vec<f64>,
}

impl<'a> SplitSubhaloFinder<'a> {
    /// `grid` must have been built from `(xs, ys, zs)`. Distances use the
    /// minimum image.
    pub fn new(
        grid: &'a PeriodicGrid,
        xs: &'a [f64],
        ys: &'a [f64],
        zs: &'a [f64],
    ) -> Result<Self, FinderError> {
        Self::with_policy(grid, xs, ys, zs, PeriodicPolicy::MinimumImage)
    }

    pub fn with_policy(
        grid: &'a PeriodicGrid,
        xs: &'a [f64],
        ys: &'a [f64],
        zs: &'a [f64],
        policy: PeriodicPolicy,
    ) -> Result<Self, FinderError> {
        check_columns(grid.len(), &[xs, ys, zs])?;
        Ok(Self {
            grid,
            xs,
            ys,
            zs,
            policy,
            scratch: Vec::new(),
            idx_buf: Vec::new(),
            dr2_buf: Vec::new(),
        })
    }

    pub fn policy(&self) -> PeriodicPolicy {
        self.policy
    }

    /// Returns the indices of every group-A halo within `radius` of `center`,
    /// along with their squared distances. Both slices are internal buffers.
    pub fn find_subhalos(
        &mut self,
        center: [f64; 3],
        radius: f64,
    ) -> Result<(&[usize], &[f64]), FinderError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(FinderError::InvalidRadius {
                index: 0,
                value: radius,
            });
        }
        self.idx_buf.clear();
        self.dr2_buf.clear();

        let grid = self.grid;
        let domain = *grid.domain();
        let c = Vector3::from(center);
        let range = CellRange::around_sphere(center, radius, grid.cell_width(), grid.width());

        for cell in range.cell_indices(grid.cells_per_axis()) {
            for &j in grid.read_indices_growing(cell, &mut self.scratch) {
                let d2 = domain.distance_squared(&c, &point(self.xs, self.ys, self.zs, j), self.policy);
                if within_reach(d2, radius) {
                    self.idx_buf.push(j);
                    self.dr2_buf.push(d2);
                }
            }
        }

        Ok((self.idx_buf.as_slice(), self.dr2_buf.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PeriodicDomain;
    use crate::search::brute_force_in_sphere;
    use approx::assert_relative_eq;

    fn build(cells: usize, width: f64, xs: &[f64], ys: &[f64], zs: &[f64]) -> PeriodicGrid {
        let mut g = PeriodicGrid::new(cells, width, xs.len()).unwrap();
        g.insert(xs, ys, zs).unwrap();
        g
    }

    #[test]
    fn test_periodic_wrap_distance() {
        let width = 50.0;
        let xs = [width - 0.01, 25.0];
        let ys = [10.0, 10.0];
        let zs = [10.0, 10.0];
        let g = build(10, width, &xs, &ys, &zs);

        let mut sf = SplitSubhaloFinder::new(&g, &xs, &ys, &zs).unwrap();
        let (idx, dr2) = sf.find_subhalos([0.02, 10.0, 10.0], 0.1).unwrap();
        assert_eq!(idx, &[0]);
        assert_relative_eq!(dr2[0], 0.03 * 0.03, epsilon = 1e-10);
    }

    #[test]
    fn test_literal_policy_misses_seam() {
        let xs = [9.99];
        let ys = [1.0];
        let zs = [1.0];
        let g = build(5, 10.0, &xs, &ys, &zs);
        let mut sf =
            SplitSubhaloFinder::with_policy(&g, &xs, &ys, &zs, PeriodicPolicy::Literal).unwrap();
        let (idx, _) = sf.find_subhalos([0.02, 1.0, 1.0], 0.1).unwrap();
        assert!(idx.is_empty());
    }

    #[test]
    fn test_buffers_reset_between_calls() {
        let xs = [1.0, 1.2, 7.0];
        let ys = [1.0, 1.0, 7.0];
        let zs = [1.0, 1.0, 7.0];
        let g = build(5, 10.0, &xs, &ys, &zs);
        let mut sf = SplitSubhaloFinder::new(&g, &xs, &ys, &zs).unwrap();

        let (idx, _) = sf.find_subhalos([1.1, 1.0, 1.0], 0.5).unwrap();
        let mut first = idx.to_vec();
        first.sort_unstable();
        assert_eq!(first, vec![0, 1]);

        let (idx, dr2) = sf.find_subhalos([7.0, 7.0, 7.5], 0.5).unwrap();
        assert_eq!(idx, &[2]);
        assert_relative_eq!(dr2[0], 0.25);

        let (idx, dr2) = sf.find_subhalos([4.0, 4.0, 4.0], 0.5).unwrap();
        assert!(idx.is_empty());
        assert!(dr2.is_empty());
    }

    #[test]
    fn test_inclusive_radius_and_validation() {
        let xs = [3.0];
        let ys = [3.0];
        let zs = [3.0];
        let g = build(5, 10.0, &xs, &ys, &zs);
        let mut sf = SplitSubhaloFinder::new(&g, &xs, &ys, &zs).unwrap();
        assert_eq!(sf.find_subhalos([5.0, 3.0, 3.0], 2.0).unwrap().0, &[0]);
        assert!(sf.find_subhalos([5.0, 3.0, 3.0], 1.999).unwrap().0.is_empty());
        assert!(sf.find_subhalos([5.0, 3.0, 3.0], -1.0).is_err());
        assert!(SplitSubhaloFinder::new(&g, &xs, &ys, &[]).is_err());
    }

    #[test]
    fn test_radius_larger_than_box() {
        let xs = [1.0, 4.0, 9.0];
        let ys = [2.0, 5.0, 8.0];
        let zs = [3.0, 6.0, 7.0];
        let g = build(5, 10.0, &xs, &ys, &zs);
        let mut sf = SplitSubhaloFinder::new(&g, &xs, &ys, &zs).unwrap();
        let (idx, _) = sf.find_subhalos([0.0, 0.0, 0.0], 40.0).unwrap();
        let mut all = idx.to_vec();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2]);
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_query_matches_brute_force(
                box_size in 5.0..20.0,
                cells in 1usize..10,
                radius in 0.0..12.0,
                center in (0.0..1.0, 0.0..1.0, 0.0..1.0),
                positions in prop::collection::vec((0.0..1.0, 0.0..1.0, 0.0..1.0), 0..80)
            ) {
                let xs: Vec<f64> = positions.iter().map(|p| p.0 * box_size).collect();
                let ys: Vec<f64> = positions.iter().map(|p| p.1 * box_size).collect();
                let zs: Vec<f64> = positions.iter().map(|p| p.2 * box_size).collect();
                let c = [center.0 * box_size, center.1 * box_size, center.2 * box_size];

                let g = build(cells, box_size, &xs, &ys, &zs);
                let domain = PeriodicDomain::new(box_size).unwrap();
                let mut sf = SplitSubhaloFinder::new(&g, &xs, &ys, &zs).unwrap();

                let (idx, dr2) = sf.find_subhalos(c, radius).unwrap();
                let mut found: Vec<(usize, f64)> =
                    idx.iter().copied().zip(dr2.iter().copied()).collect();
                found.sort_by_key(|&(j, _)| j);

                let expected = brute_force_in_sphere(
                    &domain, &xs, &ys, &zs, c, radius, PeriodicPolicy::MinimumImage,
                );
                prop_assert_eq!(found, expected);
            }
        }
    }
}
