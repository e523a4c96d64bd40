use crate::domain::PeriodicDomain;
use crate::error::FinderError;
use crate::search::check_columns;
use tracing::{debug, info_span};

/// Marks an empty bucket and the end of a bucket's chain.
pub const EMPTY: usize = usize::MAX;

/// Uniform bucket grid over a periodic cube.
///
/// Buckets are singly linked lists threaded through `next`, so building the
/// grid never allocates per cell. The grid only stores indices; coordinates
/// stay with the caller.
#[derive(Clone, Debug)]
pub struct PeriodicGrid {
    domain: PeriodicDomain,
    cells: usize,
    cell_width: f64,
    /// heads[cell] = most recently inserted point in that cell
    heads: Vec<usize>,
    /// next[point] = following point in the same cell
    next: Vec<usize>,
}

impl PeriodicGrid {
    pub fn new(cells: usize, width: f64, n_points: usize) -> Result<Self, FinderError> {
        if cells == 0 {
            return Err(FinderError::NoCells);
        }
        let domain = PeriodicDomain::new(width)?;
        let total = cells
            .checked_mul(cells)
            .and_then(|c| c.checked_mul(cells))
            .ok_or(FinderError::TooManyCells(cells))?;
        Ok(Self {
            domain,
            cells,
            cell_width: width / cells as f64,
            heads: vec![EMPTY; total],
            next: vec![EMPTY; n_points],
        })
    }

    /// Buckets every point. Coordinates must lie within one box width of the
    /// box, i.e. in `[-width, 2 * width)`.
    pub fn insert(&mut self, xs: &[f64], ys: &[f64], zs: &[f64]) -> Result<(), FinderError> {
        let _span = info_span!("PeriodicGrid::insert", n_points = xs.len()).entered();
        let n = self.next.len();
        check_columns(n, &[xs, ys, zs])?;
        for (i, value) in xs.iter().chain(ys).chain(zs).enumerate() {
            if !self.domain.contains_single_wrap(*value) {
                return Err(FinderError::OutOfRange {
                    index: i % n,
                    value: *value,
                    width: self.domain.width(),
                });
            }
        }

        self.heads.fill(EMPTY);
        for i in 0..n {
            let cell = self.cell_of(xs[i], ys[i], zs[i]);
            self.next[i] = self.heads[cell];
            self.heads[cell] = i;
        }
        Ok(())
    }

    /// Linear index of the cell holding the given (possibly unwrapped) point.
    pub fn cell_of(&self, x: f64, y: f64, z: f64) -> usize {
        let ix = self.axis_cell(x);
        let iy = self.axis_cell(y);
        let iz = self.axis_cell(z);
        ix + iy * self.cells + iz * self.cells * self.cells
    }

    #[inline]
    fn axis_cell(&self, v: f64) -> usize {
        let w = self.domain.wrap(v);
        // w can round up to exactly `width` when a tiny negative value is wrapped.
        ((w / self.cell_width).floor().max(0.0) as usize).min(self.cells - 1)
    }

    pub fn cells_per_axis(&self) -> usize {
        self.cells
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn width(&self) -> f64 {
        self.domain.width()
    }

    pub fn domain(&self) -> &PeriodicDomain {
        &self.domain
    }

    pub fn total_cells(&self) -> usize {
        self.heads.len()
    }

    /// Number of points the grid indexes.
    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    pub fn cell_point_count(&self, cell: usize) -> usize {
        self.iter_cell(cell).count()
    }

    /// Size of the fullest bucket. Scans every cell.
    pub fn max_cell_point_count(&self) -> usize {
        let max = (0..self.total_cells())
            .map(|cell| self.cell_point_count(cell))
            .max()
            .unwrap_or(0);
        debug!(max_cell_points = max, "scanned bucket sizes");
        max
    }

    pub fn average_points_per_cell(&self) -> f64 {
        self.len() as f64 / self.total_cells() as f64
    }

    pub fn iter_cell(&self, cell: usize) -> CellIter<'_> {
        CellIter {
            next: &self.next,
            current: self.heads[cell],
        }
    }

    /// Copies the indices of `cell` into the front of `scratch`.
    ///
    /// Fails instead of truncating when the bucket does not fit.
    pub fn read_indices<'s>(
        &self,
        cell: usize,
        scratch: &'s mut [usize],
    ) -> Result<&'s [usize], FinderError> {
        let mut n = 0;
        for idx in self.iter_cell(cell) {
            if n == scratch.len() {
                return Err(FinderError::ScratchTooSmall {
                    cell,
                    capacity: scratch.len(),
                    needed: self.cell_point_count(cell),
                });
            }
            scratch[n] = idx;
            n += 1;
        }
        Ok(&scratch[..n])
    }

    /// Like [`read_indices`](Self::read_indices), but grows `scratch` as needed.
    pub fn read_indices_growing<'s>(&self, cell: usize, scratch: &'s mut Vec<usize>) -> &'s [usize] {
        scratch.clear();
        scratch.extend(self.iter_cell(cell));
        scratch
    }
}

/// Walks one bucket's chain.
pub struct CellIter<'a> {
    next: &'a [usize],
    current: usize,
}

impl Iterator for CellIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.current == EMPTY {
            return None;
        }
        let idx = self.current;
        self.current = self.next[idx];
        Some(idx)
    }
}
