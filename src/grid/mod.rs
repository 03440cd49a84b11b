// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Regular (u,v) grid geometry and irregular-to-regular indexing.

mod error;

pub use error::GridError;

use serde::{Deserialize, Serialize};

use crate::constants::GRID_UNIFORMITY_TOL;
use crate::types::ModelVisibility;

/// The axes of the Fourier plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UvAxis {
    U,
    V,
}

impl std::fmt::Display for UvAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            UvAxis::U => write!(f, "u"),
            UvAxis::V => write!(f, "v"),
        }
    }
}

/// What to do with a sample whose kernel footprint leaves the grid.
///
/// One policy applies to both the indexing and the weight-evaluation steps;
/// there is no way to get a footprint that was rejected by one but used by
/// the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OobPolicy {
    /// Refuse the sample with [`GridError::OutOfBounds`]. Nothing is ever
    /// silently clamped. This is the default.
    #[default]
    Reject,

    /// Clamp footprint node indices to the grid edge. Taps pushed onto the
    /// same edge cell accumulate their weight there.
    Clamp,
}

/// One axis of a regular grid: a start coordinate, a uniform (possibly
/// negative) node spacing, and a node count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridAxis {
    /// The coordinate of node 0 \[λ\].
    pub start: f64,

    /// The node spacing \[λ\]. Negative for descending axes.
    pub step: f64,

    /// The number of nodes.
    pub len: usize,
}

impl GridAxis {
    /// Derive an axis from its node coordinate vector. The nodes must be
    /// uniformly spaced (within [`GRID_UNIFORMITY_TOL`], relative) so that
    /// direct arithmetic indexing is valid; ascending and descending vectors
    /// are both accepted.
    pub fn from_coords(axis: UvAxis, coords: &[f64]) -> Result<GridAxis, GridError> {
        if coords.len() < 2 {
            return Err(GridError::TooFewNodes {
                axis,
                num: coords.len(),
            });
        }
        let step = coords[1] - coords[0];
        if step == 0.0 || !step.is_finite() {
            return Err(GridError::ZeroSpacing { axis });
        }
        for (i, pair) in coords.windows(2).enumerate() {
            let diff = (pair[1] - pair[0]) - step;
            if !(diff.abs() <= GRID_UNIFORMITY_TOL * step.abs()) {
                return Err(GridError::NonUniform {
                    axis,
                    index: i + 1,
                    step,
                    diff,
                });
            }
        }

        Ok(GridAxis {
            start: coords[0],
            step,
            len: coords.len(),
        })
    }

    /// The coordinate of node `i` \[λ\].
    pub fn coord(&self, i: usize) -> f64 {
        self.start + i as f64 * self.step
    }

    /// The smallest node coordinate \[λ\].
    pub fn min(&self) -> f64 {
        self.coord(self.len - 1).min(self.start)
    }

    /// The largest node coordinate \[λ\].
    pub fn max(&self) -> f64 {
        self.coord(self.len - 1).max(self.start)
    }

    /// The index of the node at-or-below `x` in index space, and the
    /// fractional offset of `x` above it in cell units (in `[0, 1)`).
    ///
    /// The cast saturates for coordinates grossly off the grid; callers
    /// either validate with [`GridAxis::check_support`] first (reject) or
    /// clamp the resulting footprint (clamp).
    pub(crate) fn cell_frac(&self, x: f64) -> (isize, f64) {
        let t = (x - self.start) / self.step;
        let i0 = t.floor();
        (i0 as isize, t - i0)
    }

    /// Check that a sample's kernel footprint (the `2R` nodes around its
    /// enclosing cell) stays on the grid, under the given policy.
    pub(crate) fn check_support(
        &self,
        axis: UvAxis,
        sample_index: usize,
        x: f64,
        half_support: usize,
        policy: OobPolicy,
    ) -> Result<(), GridError> {
        let oob = || GridError::OutOfBounds {
            axis,
            sample_index,
            coord: x,
            half_support,
            min: self.min(),
            max: self.max(),
        };

        if !x.is_finite() {
            return Err(oob());
        }
        match policy {
            OobPolicy::Clamp => Ok(()),
            OobPolicy::Reject => {
                // Compare in index space as floats; this cannot overflow for
                // any finite coordinate.
                let i0 = ((x - self.start) / self.step).floor();
                let first = i0 - (half_support as f64 - 1.0);
                let last = i0 + half_support as f64;
                if first < 0.0 || last > (self.len - 1) as f64 {
                    Err(oob())
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A regular Fourier-plane grid: a u axis and a v axis. The axes may have
/// different lengths (and neither needs to be a power of two).
#[derive(Debug, Clone, PartialEq)]
pub struct UvGrid {
    pub u: GridAxis,
    pub v: GridAxis,
}

impl UvGrid {
    /// Derive a grid from u and v node coordinate vectors.
    pub fn from_coords(u_coords: &[f64], v_coords: &[f64]) -> Result<UvGrid, GridError> {
        Ok(UvGrid {
            u: GridAxis::from_coords(UvAxis::U, u_coords)?,
            v: GridAxis::from_coords(UvAxis::V, v_coords)?,
        })
    }

    /// Derive the grid a [`ModelVisibility`] is defined on.
    pub fn from_model(model: &ModelVisibility) -> Result<UvGrid, GridError> {
        UvGrid::from_coords(&model.uu, &model.vv)
    }
}
