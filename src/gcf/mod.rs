// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gridding convolution functions.
//!
//! All kernels share one interface: given the offset between a sample and a
//! grid node in cell units, return a weight. A kernel with half-support `R`
//! is non-zero only for offsets inside `(-R, R)`, so each sample touches the
//! `2R` nodes around its enclosing cell along each axis, and the 2-D weight
//! of a (u,v) node pair is the product of the two 1-D weights (the kernels
//! are separable).


use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

// Rational-polynomial coefficients for the zeroth-order prolate spheroidal
// wave function with support parameter m = 6 and weighting exponent α = 1
// (Schwab's approximation). Two intervals: |η| ≤ 0.75 and 0.75 < |η| ≤ 1.
const SPHEROIDAL_P: [[f64; 5]; 2] = [
    [
        8.203343e-2,
        -3.644705e-1,
        6.278660e-1,
        -5.335581e-1,
        2.312756e-1,
    ],
    [
        4.028559e-3,
        -3.697768e-2,
        1.021332e-1,
        -1.201436e-1,
        6.412774e-2,
    ],
];
const SPHEROIDAL_Q: [[f64; 3]; 2] = [
    [1.0, 8.212018e-1, 2.078043e-1],
    [1.0, 9.599102e-1, 2.918724e-1],
];

/// The spheroidal kernel's fixed half-support (full width 6 cells).
const SPHEROIDAL_HALF_SUPPORT: usize = 3;

/// `sin(πx)/(πx)`.
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = std::f64::consts::PI * x;
        px.sin() / px
    }
}

/// `(1 - η²)·ψ(η)` for the Schwab spheroidal approximation, with `η` the
/// offset as a fraction of the half-support. 1 at η = 0, 0 at |η| ≥ 1.
fn spheroidal(eta: f64) -> f64 {
    let eta2 = eta * eta;
    if eta2 >= 1.0 {
        return 0.0;
    }
    let (part, x) = if eta.abs() <= 0.75 {
        (0, eta2 - 0.5625)
    } else {
        (1, eta2 - 1.0)
    };
    let num = SPHEROIDAL_P[part].iter().rev().fold(0.0, |acc, &p| acc * x + p);
    let den = SPHEROIDAL_Q[part].iter().rev().fold(0.0, |acc, &q| acc * x + q);
    (1.0 - eta2) * num / den
}

/// A gridding convolution function. `Copy` configuration; pick one per
/// [`GcfCache`](crate::GcfCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GcfKernel {
    /// Nearest-neighbour cell assignment: along each axis, weight 1 for the
    /// single node with offset in `[-0.5, 0.5)`, 0 elsewhere. Half-support 1.
    Pillbox,

    /// A truncated Gaussian with `σ = R/3`, so the kernel has fallen to
    /// `e^{-4.5} ≈ 0.011` of its peak at the support edge.
    Gaussian { half_support: NonZeroUsize },

    /// Schwab's rational approximation to the zeroth-order prolate spheroidal
    /// wave function (m = 6, α = 1), the standard gridding function. Fixed
    /// half-support 3; vanishes at the support edge.
    Spheroidal,

    /// A sinc windowed by a stretched sinc (a Lanczos kernel):
    /// `sinc(d)·sinc(d/R)`. Interpolates exactly at grid nodes; weights can
    /// be negative.
    SincWindowed { half_support: NonZeroUsize },
}

impl Default for GcfKernel {
    fn default() -> GcfKernel {
        GcfKernel::Spheroidal
    }
}

impl GcfKernel {
    /// The radius, in grid cells, over which this kernel is non-zero.
    pub fn half_support(self) -> usize {
        match self {
            GcfKernel::Pillbox => 1,
            GcfKernel::Gaussian { half_support } => half_support.get(),
            GcfKernel::Spheroidal => SPHEROIDAL_HALF_SUPPORT,
            GcfKernel::SincWindowed { half_support } => half_support.get(),
        }
    }

    /// The number of nodes a sample touches along one axis (`2R`).
    pub fn num_taps(self) -> usize {
        2 * self.half_support()
    }

    /// The 1-D kernel value at an offset of `d` grid cells from a node.
    /// Finite for every input; 0 outside the support.
    pub fn weight(self, d: f64) -> f64 {
        match self {
            GcfKernel::Pillbox => {
                if (-0.5..0.5).contains(&d) {
                    1.0
                } else {
                    0.0
                }
            }

            GcfKernel::Gaussian { half_support } => {
                let r = half_support.get() as f64;
                if d.abs() >= r {
                    0.0
                } else {
                    let sigma = r / 3.0;
                    (-0.5 * (d / sigma) * (d / sigma)).exp()
                }
            }

            GcfKernel::Spheroidal => spheroidal(d / SPHEROIDAL_HALF_SUPPORT as f64),

            GcfKernel::SincWindowed { half_support } => {
                let r = half_support.get() as f64;
                if d.abs() >= r {
                    0.0
                } else {
                    sinc(d) * sinc(d / r)
                }
            }
        }
    }

    /// Fill `weights` (length `2R`) with the 1-D weights for the footprint
    /// nodes of a sample at fractional offset `frac ∈ [0, 1)` above its
    /// enclosing node. Tap `j` corresponds to node `i0 - (R-1) + j`, i.e. an
    /// offset of `frac + R - 1 - j` cells.
    pub(crate) fn eval_axis(self, frac: f64, weights: &mut [f64]) {
        let r = self.half_support() as f64;
        debug_assert_eq!(weights.len(), self.num_taps());
        for (j, w) in weights.iter_mut().enumerate() {
            *w = self.weight(frac + r - 1.0 - j as f64);
        }
    }
}
