// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sampling model visibilities at observed (u,v) points.

mod error;
#[cfg(test)]
mod tests;

pub use error::SampleError;

use std::sync::Arc;

use marlu::c64;
use ndarray::prelude::*;
use num_complex::Complex;
use num_traits::Zero;
use rayon::prelude::*;

use crate::cache::{GcfCache, GcfHolder};
use crate::error::DegridError;
use crate::grid::UvGrid;
use crate::types::{ModelVisibility, Visibility};

/// Interpolate `model` at the (u,v) samples the holder's weights were built
/// from.
///
/// Per sample, the model is gathered at the footprint cells, weighted by the
/// gridding convolution function, summed, and normalised by the total kernel
/// mass. Channels are handled independently; the output is (sample, channel)
/// in the holder's sample order, directly comparable against the observed
/// [`Visibility::vis`].
pub fn sample(model: &ModelVisibility, holder: &GcfHolder) -> Result<Array2<c64>, SampleError> {
    let (_, num_u, num_chans) = model.vis.dim();
    let data_chans = holder.data.freqs.len();
    if num_chans != data_chans {
        return Err(SampleError::ChannelMismatch {
            model: num_chans,
            data: data_chans,
        });
    }
    let grid = UvGrid::from_model(model)?;
    if grid != holder.grid {
        return Err(SampleError::GridMismatch);
    }

    let mut out = Array2::from_elem((holder.uu.len(), num_chans), Complex::zero());
    out.outer_iter_mut()
        .into_par_iter()
        .zip(holder.index_arr.outer_iter())
        .zip(holder.gcf_arr.outer_iter())
        .enumerate()
        .for_each(|(k, ((mut out_row, idx), gcf))| {
            for (&cell, &weight) in idx.iter().zip(gcf) {
                if weight == 0.0 {
                    continue;
                }
                let (iv, iu) = (cell / num_u, cell % num_u);
                let lane = model.vis.slice(s![iv, iu, ..]);
                out_row.zip_mut_with(&lane, |o, &m| *o += m * weight);
            }
            let w = holder.w_arr[k];
            out_row.mapv_inplace(|x| x / w);
        });

    Ok(out)
}

/// The usual entry point: derive the grid from the model, fetch or build the
/// dataset's gridding weights through the cache, and sample.
pub fn sample_model(
    model: &ModelVisibility,
    data: &Arc<Visibility>,
    cache: &mut GcfCache,
) -> Result<Array2<c64>, DegridError> {
    let grid = UvGrid::from_model(model)?;
    let holder = cache.get_or_build(data, &grid)?;
    Ok(sample(model, &holder)?)
}
