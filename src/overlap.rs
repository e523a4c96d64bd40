use crate::bounds::CellRange;
use crate::domain::PeriodicPolicy;
use crate::error::FinderError;
use crate::grid::PeriodicGrid;
use crate::search::{check_columns, point, within_reach};
use tracing::{debug, info_span};

// Expected relations per halo when sizing the relation buffer.
const RELATION_CAPACITY_FACTOR: f64 = 2.5;

/// Per-halo overlap lists in compressed row form.
///
/// `indices[starts[i]..starts[i + 1]]` is the ascending list of halos whose
/// spheres overlap halo `i`. Entries below `i` are hosts, entries above `i`
/// are subhalos.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Relations {
    starts: Vec<usize>,
    indices: Vec<usize>,
}

impl Relations {
    /// Number of halos.
    pub fn len(&self) -> usize {
        self.starts.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of stored entries. Every overlapping pair is stored twice.
    pub fn total_entries(&self) -> usize {
        self.indices.len()
    }

    pub fn intersects(&self, i: usize) -> &[usize] {
        &self.indices[self.starts[i]..self.starts[i + 1]]
    }

    pub fn intersect_count(&self, i: usize) -> usize {
        self.starts[i + 1] - self.starts[i]
    }

    pub fn host_count(&self, i: usize) -> usize {
        self.intersects(i).partition_point(|&j| j < i)
    }

    pub fn subhalo_count(&self, i: usize) -> usize {
        self.intersect_count(i) - self.host_count(i)
    }

    pub fn hosts(&self, i: usize) -> &[usize] {
        &self.intersects(i)[..self.host_count(i)]
    }

    pub fn subhalos(&self, i: usize) -> &[usize] {
        &self.intersects(i)[self.host_count(i)..]
    }

    /// True if any higher-priority halo overlaps halo `i`.
    pub fn is_subhalo(&self, i: usize) -> bool {
        self.host_count(i) > 0
    }

    /// Builds the symmetric table from forward lists, where
    /// `forward[forward_starts[i]..forward_starts[i + 1]]` holds the partners
    /// `j > i` found for halo `i`.
    ///
    /// Hosts are gathered with a counting sort, so this is linear in the
    /// number of halos plus relations.
    fn from_forward(forward_starts: &[usize], forward: &[usize]) -> Self {
        let _span = info_span!("Relations::from_forward", n_pairs = forward.len()).entered();
        let n = forward_starts.len().saturating_sub(1);

        let mut counts = vec![0usize; n];
        for &j in forward {
            counts[j] += 1;
        }

        let mut host_starts = vec![0usize; n + 1];
        for j in 0..n {
            host_starts[j + 1] = host_starts[j] + counts[j];
        }

        let mut fill = host_starts.clone();
        let mut hosts = vec![0usize; forward.len()];
        for i in 0..n {
            for &j in &forward[forward_starts[i]..forward_starts[i + 1]] {
                hosts[fill[j]] = i;
                fill[j] += 1;
            }
        }

        let mut starts = Vec::with_capacity(n + 1);
        let mut indices = Vec::with_capacity(2 * forward.len());
        for i in 0..n {
            let start = indices.len();
            starts.push(start);
            indices.extend_from_slice(&hosts[host_starts[i]..host_starts[i + 1]]);
            indices.extend_from_slice(&forward[forward_starts[i]..forward_starts[i + 1]]);
            indices[start..].sort_unstable();
        }
        starts.push(indices.len());

        Self { starts, indices }
    }
}

/// Finds which halos in one collection overlap each other.
///
/// Halo order is priority order: when two spheres overlap, the one with the
/// lower index is the host. Callers usually sort by descending mass first.
pub struct SubhaloFinder<'g> {
    grid: &'g PeriodicGrid,
    policy: PeriodicPolicy,
    relations: Relations,
    scratch: Vec<usize>,
}

impl<'g> SubhaloFinder<'g> {
    /// Uses literal coordinate differences for the final distance check.
    pub fn new(grid: &'g PeriodicGrid) -> Self {
        Self::with_policy(grid, PeriodicPolicy::Literal)
    }

    pub fn with_policy(grid: &'g PeriodicGrid, policy: PeriodicPolicy) -> Self {
        Self {
            grid,
            policy,
            relations: Relations::default(),
            scratch: Vec::new(),
        }
    }

    pub fn policy(&self) -> PeriodicPolicy {
        self.policy
    }

    /// Computes the overlap table for halos with centers `(xs, ys, zs)` and
    /// radii `rs * multiplier`. The grid must have been built from the same
    /// centers. `rs` is left untouched.
    pub fn find_subhalos(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        zs: &[f64],
        rs: &[f64],
        multiplier: f64,
    ) -> Result<(), FinderError> {
        let n = self.grid.len();
        check_columns(n, &[xs, ys, zs, rs])?;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(FinderError::InvalidMultiplier(multiplier));
        }
        if let Some((index, &value)) = rs
            .iter()
            .enumerate()
            .find(|&(_, r)| !r.is_finite() || *r < 0.0)
        {
            return Err(FinderError::InvalidRadius { index, value });
        }

        let _span = info_span!("SubhaloFinder::find_subhalos", n_halos = n).entered();

        let radii: Vec<f64> = rs.iter().map(|r| r * multiplier).collect();
        let reach = cumulative_max(&radii);

        let cells = self.grid.cells_per_axis();
        let cell_width = self.grid.cell_width();
        let width = self.grid.width();
        let domain = *self.grid.domain();

        let mut forward_starts = Vec::with_capacity(n + 1);
        let mut forward = Vec::with_capacity((RELATION_CAPACITY_FACTOR * n as f64) as usize);
        let mut visited_cells = 0i64;

        for i in 0..n {
            forward_starts.push(forward.len());
            let center = point(xs, ys, zs, i);

            // Any partner j > i has radius at most reach[i].
            let range = CellRange::around_sphere(
                [center.x, center.y, center.z],
                radii[i] + reach[i],
                cell_width,
                width,
            );
            visited_cells = visited_cells.saturating_add(range.volume());

            for cell in range.cell_indices(cells) {
                for &j in self.grid.read_indices_growing(cell, &mut self.scratch) {
                    if j <= i {
                        continue;
                    }
                    let d2 = domain.distance_squared(&center, &point(xs, ys, zs, j), self.policy);
                    if within_reach(d2, radii[i] + radii[j]) {
                        forward.push(j);
                    }
                }
            }
        }
        forward_starts.push(forward.len());

        debug!(
            n_halos = n,
            n_pairs = forward.len(),
            visited_cells,
            "overlap scan finished"
        );

        self.relations = Relations::from_forward(&forward_starts, &forward);
        Ok(())
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    pub fn into_relations(self) -> Relations {
        self.relations
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn intersect_count(&self, i: usize) -> usize {
        self.relations.intersect_count(i)
    }

    pub fn intersects(&self, i: usize) -> &[usize] {
        self.relations.intersects(i)
    }

    pub fn host_count(&self, i: usize) -> usize {
        self.relations.host_count(i)
    }

    pub fn subhalo_count(&self, i: usize) -> usize {
        self.relations.subhalo_count(i)
    }

    pub fn hosts(&self, i: usize) -> &[usize] {
        self.relations.hosts(i)
    }

    pub fn subhalos(&self, i: usize) -> &[usize] {
        self.relations.subhalos(i)
    }

    pub fn is_subhalo(&self, i: usize) -> bool {
        self.relations.is_subhalo(i)
    }
}

/// `out[i] = max(xs[i..])`.
fn cumulative_max(xs: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; xs.len()];
    let mut max = f64::NEG_INFINITY;
    for i in (0..xs.len()).rev() {
        max = max.max(xs[i]);
        out[i] = max;
    }
    out
}
