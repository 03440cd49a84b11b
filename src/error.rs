// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all degrid-related errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DegridError {
    #[error("{0}")]
    Shape(#[from] crate::types::ShapeMismatchError),

    #[error("{0}")]
    Grid(#[from] crate::grid::GridError),

    #[error("{0}")]
    Cache(#[from] crate::cache::CacheError),

    #[error("{0}")]
    Sample(#[from] crate::sample::SampleError),
}
