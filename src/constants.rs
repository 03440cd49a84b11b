// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision; `degrid` does every calculation in
double precision.
 */

use std::num::NonZeroUsize;

/// The speed of light \[km/s\].
pub const VEL_C_KMS: f64 = marlu::constants::VEL_C / 1e3;

/// Grid node spacings deviating from the first spacing by more than this
/// relative tolerance make the grid degenerate for direct arithmetic
/// indexing.
pub const GRID_UNIFORMITY_TOL: f64 = 1e-8;

/// The number of gridding-weight holders a [`GcfCache`](crate::GcfCache)
/// retains before evicting the least recently used.
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(16) {
    Some(c) => c,
    None => unreachable!(),
};
