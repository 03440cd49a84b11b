// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use super::UvAxis;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("the {axis} grid has {num} node(s); at least 2 are needed to establish a spacing")]
    TooFewNodes { axis: UvAxis, num: usize },

    #[error("the {axis} grid has a zero or non-finite node spacing")]
    ZeroSpacing { axis: UvAxis },

    #[error("the {axis} grid is not uniformly spaced: the gap before node {index} deviates from the leading spacing ({step} λ) by {diff} λ")]
    NonUniform {
        axis: UvAxis,
        index: usize,
        step: f64,
        diff: f64,
    },

    #[error("the {axis} coordinate of sample {sample_index} ({coord} λ) puts a kernel footprint of half-support {half_support} outside the grid ({min} λ to {max} λ)")]
    OutOfBounds {
        axis: UvAxis,
        sample_index: usize,
        coord: f64,
        half_support: usize,
        min: f64,
        max: f64,
    },
}
