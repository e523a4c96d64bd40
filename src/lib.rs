//! Periodic bucket grid and halo overlap resolver.
//!
//! Halos are spheres in a periodic cubic box. [`SubhaloFinder`] finds every
//! overlapping pair within one collection and splits each halo's partners
//! into hosts (higher priority, lower index) and subhalos.
//! [`SplitSubhaloFinder`] finds the members of one collection inside a
//! sphere taken from another.
//!
//! ```
//! use subhalo_finder::{PeriodicGrid, SubhaloFinder};
//!
//! let xs = [1.0, 2.0, 8.0];
//! let ys = [1.0, 1.0, 8.0];
//! let zs = [1.0, 1.0, 8.0];
//! let rs = [1.5, 0.3, 0.2];
//!
//! let mut grid = PeriodicGrid::new(5, 10.0, xs.len()).unwrap();
//! grid.insert(&xs, &ys, &zs).unwrap();
//!
//! let mut finder = SubhaloFinder::new(&grid);
//! finder.find_subhalos(&xs, &ys, &zs, &rs, 1.0).unwrap();
//! assert_eq!(finder.subhalos(0), &[1]);
//! assert!(finder.is_subhalo(1));
//! ```

pub mod api;
pub mod batch;
pub mod bounds;
pub mod config;
pub mod domain;
pub mod error;
pub mod grid;
pub mod overlap;
pub mod search;
pub mod selection;
pub mod split;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

pub use api::{find_in_sphere, find_overlaps, find_overlaps_default, find_overlaps_with};
pub use batch::{CrossMatches, search_batch};
pub use bounds::CellRange;
pub use domain::{PeriodicDomain, PeriodicPolicy};
pub use error::FinderError;
pub use grid::PeriodicGrid;
pub use overlap::{Relations, SubhaloFinder};
pub use selection::{HostMember, IdIndex};
pub use split::SplitSubhaloFinder;

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber. `RUST_LOG` takes precedence over
/// `level`, which defaults to `info`. Later calls are ignored.
pub fn init_logging(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("info")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_thread_ids(true)
        .try_init();
}
