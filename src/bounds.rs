/// Cell-aligned box covering a sphere in a periodic grid.
///
/// `origin` is in cell units and may lie outside `[0, cells)`; iteration
/// wraps it back into the grid. The box may be larger than the sphere but is
/// never smaller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub origin: [i64; 3],
    pub span: [i64; 3],
}

impl CellRange {
    pub fn around_sphere(center: [f64; 3], radius: f64, cell_width: f64, width: f64) -> Self {
        let mut origin = [0; 3];
        let mut span = [0; 3];
        for axis in 0..3 {
            let c = if center[axis] < 0.0 {
                center[axis] + width
            } else if center[axis] >= width {
                center[axis] - width
            } else {
                center[axis]
            };
            let mut min = c - radius;
            let mut max = c + radius;
            // A sphere at least as wide as the box keeps its raw extent; the
            // span then covers the whole axis.
            if min < 0.0 && 2.0 * radius < width {
                min += width;
                if min > max {
                    max += width;
                }
            }
            let min_cell = (min / cell_width).floor() as i64;
            let max_cell = (max / cell_width).floor() as i64;
            origin[axis] = min_cell;
            span[axis] = max_cell.saturating_sub(min_cell).saturating_add(1);
        }
        Self { origin, span }
    }

    /// Maps a raw cell coordinate to its offset from `origin`, wrapping
    /// negative offsets by one grid length.
    pub fn convert_to_grid_index(&self, raw: [i64; 3], cells: usize) -> [i64; 3] {
        let c = cells as i64;
        let mut out = [0; 3];
        for axis in 0..3 {
            let v = raw[axis] - self.origin[axis];
            out[axis] = if v < 0 { v + c } else { v };
        }
        out
    }

    /// Periodic containment along one axis. Not used on the search path.
    pub fn contains(&self, value: i64, cells: usize, axis: usize) -> bool {
        let c = cells as i64;
        let lo = self.origin[axis];
        let hi = lo + self.span[axis];
        let v = if value >= hi {
            value - c
        } else if value < lo {
            value + c
        } else {
            value
        };
        v >= lo && v < hi
    }

    /// Number of cells spanned, before any capping at the grid size.
    pub fn volume(&self) -> i64 {
        self.span.iter().fold(1i64, |acc, &s| acc.saturating_mul(s))
    }

    /// Linear indices of every grid cell in the range.
    ///
    /// Spans wider than the grid are capped at `cells`, so each cell is
    /// produced at most once no matter how large the sphere is.
    pub fn cell_indices(&self, cells: usize) -> impl Iterator<Item = usize> {
        let c = cells as i64;
        let origin = self.origin;
        let [sx, sy, sz] = self.span.map(|s| s.clamp(0, c));
        (0..sz).flat_map(move |dz| {
            let z = (origin[2] + dz).rem_euclid(c) as usize;
            (0..sy).flat_map(move |dy| {
                let y = (origin[1] + dy).rem_euclid(c) as usize;
                (0..sx).map(move |dx| {
                    let x = (origin[0] + dx).rem_euclid(c) as usize;
                    x + cells * (y + cells * z)
                })
            })
        })
    }
}
