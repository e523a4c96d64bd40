use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

// Defaults used by the halo tools this finder was tuned against.
const DEFAULT_FINDER_CELLS: usize = 150;
const DEFAULT_OVERLAP_MULT: f64 = 3.0;
const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

static FINDER_CELLS: AtomicUsize = AtomicUsize::new(DEFAULT_FINDER_CELLS);
// f64 stored as raw bits; 0 means "unset" and reads back as the default.
static OVERLAP_MULT_BITS: AtomicU64 = AtomicU64::new(0);
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Grid cells per axis used by the convenience entry points.
pub fn get_finder_cells() -> usize {
    FINDER_CELLS.load(Ordering::Relaxed)
}

pub fn set_finder_cells(val: usize) {
    FINDER_CELLS.store(val.max(1), Ordering::Relaxed);
}

/// Factor applied to every halo radius before testing for overlap.
pub fn get_overlap_mult() -> f64 {
    match OVERLAP_MULT_BITS.load(Ordering::Relaxed) {
        0 => DEFAULT_OVERLAP_MULT,
        bits => f64::from_bits(bits),
    }
}

/// Ignores values that are not positive and finite.
pub fn set_overlap_mult(val: f64) {
    if val.is_finite() && val > 0.0 {
        OVERLAP_MULT_BITS.store(val.to_bits(), Ordering::Relaxed);
    }
}

/// Minimum number of query spheres before batch searches go parallel.
pub fn get_parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

pub fn set_parallel_threshold(val: usize) {
    PARALLEL_THRESHOLD.store(val, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(get_finder_cells(), DEFAULT_FINDER_CELLS);
        assert_eq!(get_overlap_mult(), DEFAULT_OVERLAP_MULT);
    }

    #[test]
    fn test_overlap_mult_rejects_invalid() {
        let before = get_overlap_mult();
        set_overlap_mult(-1.0);
        set_overlap_mult(f64::NAN);
        set_overlap_mult(0.0);
        assert_eq!(get_overlap_mult(), before);
    }
}
