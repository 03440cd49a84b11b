// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::grid::GridError;

#[derive(Error, Debug)]
pub enum SampleError {
    #[error("the model visibilities have {model} channels, but the gridding weights were built from a dataset with {data} channels")]
    ChannelMismatch { model: usize, data: usize },

    #[error("the model's (u,v) grid is not the grid the gridding weights were built against")]
    GridMismatch,

    #[error("{0}")]
    Grid(#[from] GridError),
}
