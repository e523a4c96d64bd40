use crate::batch::CrossMatches;
use crate::config;
use crate::domain::PeriodicPolicy;
use crate::error::FinderError;
use crate::grid::PeriodicGrid;
use crate::overlap::{Relations, SubhaloFinder};
use crate::split::SplitSubhaloFinder;

fn split_columns(positions: &[[f64; 3]]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let xs = positions.iter().map(|p| p[0]).collect();
    let ys = positions.iter().map(|p| p[1]).collect();
    let zs = positions.iter().map(|p| p[2]).collect();
    (xs, ys, zs)
}

fn build_grid(
    xs: &[f64],
    ys: &[f64],
    zs: &[f64],
    width: f64,
    cells: usize,
) -> Result<PeriodicGrid, FinderError> {
    let mut grid = PeriodicGrid::new(cells, width, xs.len())?;
    grid.insert(xs, ys, zs)?;
    Ok(grid)
}

/// Build the host/subhalo table for one halo collection.
///
/// Halos must be ordered by priority (usually descending mass). Uses the
/// configured grid resolution and literal center distances.
pub fn find_overlaps(
    positions: &[[f64; 3]],
    radii: &[f64],
    width: f64,
    multiplier: f64,
) -> Result<Relations, FinderError> {
    find_overlaps_with(
        positions,
        radii,
        width,
        multiplier,
        config::get_finder_cells(),
        PeriodicPolicy::Literal,
    )
}

/// [`find_overlaps`] with the configured overlap multiplier.
pub fn find_overlaps_default(
    positions: &[[f64; 3]],
    radii: &[f64],
    width: f64,
) -> Result<Relations, FinderError> {
    find_overlaps(positions, radii, width, config::get_overlap_mult())
}

pub fn find_overlaps_with(
    positions: &[[f64; 3]],
    radii: &[f64],
    width: f64,
    multiplier: f64,
    cells: usize,
    policy: PeriodicPolicy,
) -> Result<Relations, FinderError> {
    let (xs, ys, zs) = split_columns(positions);
    let grid = build_grid(&xs, &ys, &zs, width, cells)?;
    let mut finder = SubhaloFinder::with_policy(&grid, policy);
    finder.find_subhalos(&xs, &ys, &zs, radii, multiplier)?;
    Ok(finder.into_relations())
}

/// All points within `radius` of `center`, using minimum-image distances.
pub fn find_in_sphere(
    positions: &[[f64; 3]],
    width: f64,
    center: [f64; 3],
    radius: f64,
) -> Result<CrossMatches, FinderError> {
    let (xs, ys, zs) = split_columns(positions);
    let grid = build_grid(&xs, &ys, &zs, width, config::get_finder_cells())?;
    let mut finder = SplitSubhaloFinder::new(&grid, &xs, &ys, &zs)?;
    let (indices, dist_sq) = finder.find_subhalos(center, radius)?;
    Ok(CrossMatches {
        indices: indices.to_vec(),
        dist_sq: dist_sq.to_vec(),
    })
}
