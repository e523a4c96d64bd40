use crate::config;
use crate::error::FinderError;
use crate::grid::PeriodicGrid;
use crate::search::check_columns;
use crate::split::SplitSubhaloFinder;
use rayon::prelude::*;
use tracing::info_span;

/// Owned copy of one cross-set query result.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrossMatches {
    pub indices: Vec<usize>,
    pub dist_sq: Vec<f64>,
}

impl CrossMatches {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Runs one cross-set query per target sphere `[x, y, z, r]` against the
/// points indexed by `grid`.
///
/// In parallel mode every rayon worker owns its own finder, since finder
/// buffers are reused between queries. Results come back in target order.
pub fn search_batch(
    grid: &PeriodicGrid,
    xs: &[f64],
    ys: &[f64],
    zs: &[f64],
    targets: &[[f64; 4]],
    parallel: bool,
) -> Result<Vec<CrossMatches>, FinderError> {
    let _span = info_span!("search_batch", n_targets = targets.len(), parallel).entered();

    if parallel && targets.len() >= config::get_parallel_threshold() {
        check_columns(grid.len(), &[xs, ys, zs])?;
        targets
            .par_iter()
            .map_init(
                || SplitSubhaloFinder::new(grid, xs, ys, zs),
                |finder, target| match finder {
                    Ok(f) => query_owned(f, target),
                    Err(e) => Err(e.clone()),
                },
            )
            .collect()
    } else {
        let mut finder = SplitSubhaloFinder::new(grid, xs, ys, zs)?;
        targets
            .iter()
            .map(|target| query_owned(&mut finder, target))
            .collect()
    }
}

fn query_owned(
    finder: &mut SplitSubhaloFinder<'_>,
    target: &[f64; 4],
) -> Result<CrossMatches, FinderError> {
    let (indices, dist_sq) = finder.find_subhalos([target[0], target[1], target[2]], target[3])?;
    Ok(CrossMatches {
        indices: indices.to_vec(),
        dist_sq: dist_sq.to_vec(),
    })
}
