// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::grid::GridError;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("the cached gridding weights were built from different (u,v) sample coordinates than this dataset's ({holder_samples} cached samples vs {data_samples} in the dataset); the cache entry is stale or misapplied")]
    KeyMismatch {
        holder_samples: usize,
        data_samples: usize,
    },

    #[error("{0}")]
    Grid(#[from] GridError),
}
