use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinderError {
    #[error("Grid must have at least one cell per axis")]
    NoCells,
    #[error("{0} cells per axis overflows the total cell count")]
    TooManyCells(usize),
    #[error("Domain width must be positive and finite, got {0}")]
    InvalidWidth(f64),
    #[error("Expected {expected} values, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    /// The coordinate cannot be brought into the box with a single shift.
    #[error("Coordinate {value} of point {index} is outside [-{width}, 2*{width})")]
    OutOfRange { index: usize, value: f64, width: f64 },
    #[error("Scratch buffer holds {capacity} indices but cell {cell} contains {needed}")]
    ScratchTooSmall {
        cell: usize,
        capacity: usize,
        needed: usize,
    },
    #[error("Radius multiplier must be positive and finite, got {0}")]
    InvalidMultiplier(f64),
    #[error("Radius of halo {index} must be non-negative and finite, got {value}")]
    InvalidRadius { index: usize, value: f64 },
    #[error("Halo ID {0} is not in the catalog")]
    UnknownId(i64),
}
