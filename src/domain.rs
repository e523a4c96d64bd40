use crate::error::FinderError;
use nalgebra::Vector3;

/// How the distance between two halo centers treats the periodic seam.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodicPolicy {
    /// Plain difference of the stored coordinates. Pairs that only touch
    /// through the boundary are not found.
    Literal,
    /// Each axis is shifted by one box width when it exceeds half the box.
    MinimumImage,
}

/// A cubic box with opposite faces identified.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicDomain {
    width: f64,
}

impl PeriodicDomain {
    pub fn new(width: f64) -> Result<Self, FinderError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(FinderError::InvalidWidth(width));
        }
        Ok(Self { width })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// True if `x` can be brought into `[0, width)` by a single shift.
    pub fn contains_single_wrap(&self, x: f64) -> bool {
        x.is_finite() && x >= -self.width && x < 2.0 * self.width
    }

    /// Shifts `x` by at most one box width toward `[0, width)`.
    pub fn wrap(&self, x: f64) -> f64 {
        if x >= self.width {
            x - self.width
        } else if x < 0.0 {
            x + self.width
        } else {
            x
        }
    }

    pub fn displacement(
        &self,
        a: &Vector3<f64>,
        b: &Vector3<f64>,
        policy: PeriodicPolicy,
    ) -> Vector3<f64> {
        let d = a - b;
        match policy {
            PeriodicPolicy::Literal => d,
            PeriodicPolicy::MinimumImage => d.map(|v| self.minimum_image(v)),
        }
    }

    pub fn distance_squared(
        &self,
        a: &Vector3<f64>,
        b: &Vector3<f64>,
        policy: PeriodicPolicy,
    ) -> f64 {
        self.displacement(a, b, policy).norm_squared()
    }

    fn minimum_image(&self, d: f64) -> f64 {
        let half = self.width / 2.0;
        if d > half {
            d - self.width
        } else if d < -half {
            d + self.width
        } else {
            d
        }
    }
}
