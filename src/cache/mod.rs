// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Caching of gridding-convolution index/weight arrays.
//!
//! Gridding is O(K·R²) over K (u,v) samples, and a fitting loop evaluates
//! many trial models against the *same* observed geometry; the weights only
//! depend on that geometry, the grid and the kernel, so they are computed
//! once per dataset and reused.

mod error;

pub use error::CacheError;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;

use indexmap::IndexMap;
use itertools::izip;
use log::debug;
use ndarray::{prelude::*, Zip};

use crate::constants::DEFAULT_CACHE_CAPACITY;
use crate::gcf::GcfKernel;
use crate::grid::{GridError, OobPolicy, UvAxis, UvGrid};
use crate::types::Visibility;

fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// The gridding-convolution arrays for one observed dataset against one grid
/// and kernel. Immutable once built; a changed dataset gets a new holder.
#[derive(Debug)]
pub struct GcfHolder {
    /// Flattened grid-cell indices (`iv * num_u + iu`), indexed
    /// (sample, tap). Each row covers the sample's `(2R)²` footprint.
    pub index_arr: Array2<usize>,

    /// Kernel weights matching `index_arr` entry for entry.
    pub gcf_arr: Array2<f64>,

    /// Per-sample total kernel mass, `gcf_arr.row(k).sum()`; the
    /// normalisation divisor that corrects for the kernel mass not summing
    /// to 1.
    pub w_arr: Array1<f64>,

    /// The sample u coordinates these weights were built from \[λ\].
    pub uu: Vec<f64>,

    /// The sample v coordinates these weights were built from \[λ\].
    pub vv: Vec<f64>,

    /// The grid geometry the cell indices refer to.
    pub grid: UvGrid,

    /// The kernel the weights were evaluated with.
    pub kernel: GcfKernel,

    /// The originating dataset, retained so that repeat evaluations against
    /// the same geometry need not reload or re-validate it.
    pub data: Arc<Visibility>,
}

impl GcfHolder {
    /// Grid a dataset's (u,v) samples: validate every sample against the
    /// grid under the out-of-bounds policy, then compute the footprint cell
    /// indices, kernel weights and total kernel mass for each sample.
    pub fn build(
        data: Arc<Visibility>,
        grid: &UvGrid,
        kernel: GcfKernel,
        policy: OobPolicy,
    ) -> Result<GcfHolder, GridError> {
        let half_support = kernel.half_support();
        for (i, (&u, &v)) in izip!(&data.uu, &data.vv).enumerate() {
            grid.u.check_support(UvAxis::U, i, u, half_support, policy)?;
            grid.v.check_support(UvAxis::V, i, v, half_support, policy)?;
        }

        let num_vis = data.num_samples();
        let num_taps = kernel.num_taps();
        let num_u = grid.u.len;
        let mut index_arr = Array2::zeros((num_vis, num_taps * num_taps));
        let mut gcf_arr = Array2::zeros((num_vis, num_taps * num_taps));
        let mut w_arr = Array1::zeros(num_vis);

        Zip::indexed(index_arr.rows_mut())
            .and(gcf_arr.rows_mut())
            .and(&mut w_arr)
            .par_for_each(|i, mut idx_row, mut gcf_row, w| {
                let (iu0, fu) = grid.u.cell_frac(data.uu[i]);
                let (iv0, fv) = grid.v.cell_frac(data.vv[i]);
                let mut wu = vec![0.0; num_taps];
                let mut wv = vec![0.0; num_taps];
                kernel.eval_axis(fu, &mut wu);
                kernel.eval_axis(fv, &mut wv);

                // Under the reject policy the footprint was validated above
                // and the clamps are no-ops; under the clamp policy edge
                // cells absorb the out-of-grid taps.
                let first_u = iu0.saturating_sub(half_support as isize - 1);
                let first_v = iv0.saturating_sub(half_support as isize - 1);
                let mut total = 0.0;
                for (jv, &wvj) in wv.iter().enumerate() {
                    let iv = clamp_index(first_v.saturating_add(jv as isize), grid.v.len);
                    for (ju, &wuj) in wu.iter().enumerate() {
                        let iu = clamp_index(first_u.saturating_add(ju as isize), num_u);
                        let weight = wvj * wuj;
                        let tap = jv * num_taps + ju;
                        idx_row[tap] = iv * num_u + iu;
                        gcf_row[tap] = weight;
                        total += weight;
                    }
                }
                *w = total;
            });

        debug!(
            "gridded {num_vis} (u,v) samples with {kernel:?} ({num_taps}×{num_taps} taps each)"
        );

        Ok(GcfHolder {
            index_arr,
            gcf_arr,
            w_arr,
            uu: data.uu.clone(),
            vv: data.vv.clone(),
            grid: grid.clone(),
            kernel,
            data,
        })
    }

    /// Are these weights valid for the given sample coordinates? The match
    /// must be bit-exact; coordinates that drifted through re-binning or
    /// re-calculation require a rebuild, not a near-match.
    pub fn matches(&self, uu: &[f64], vv: &[f64]) -> bool {
        fn bits_eq(a: &[f64], b: &[f64]) -> bool {
            a.len() == b.len() && izip!(a, b).all(|(x, y)| x.to_bits() == y.to_bits())
        }
        bits_eq(&self.uu, uu) && bits_eq(&self.vv, vv)
    }

    /// Check that this holder belongs to `data`, for callers handing holders
    /// around separately from their datasets.
    pub fn verify(&self, data: &Visibility) -> Result<(), CacheError> {
        if self.matches(&data.uu, &data.vv) {
            Ok(())
        } else {
            Err(CacheError::KeyMismatch {
                holder_samples: self.uu.len(),
                data_samples: data.num_samples(),
            })
        }
    }
}

fn cache_key(uu: &[f64], vv: &[f64], grid: &UvGrid) -> u64 {
    let mut hasher = DefaultHasher::new();
    for &x in uu {
        x.to_bits().hash(&mut hasher);
    }
    for &x in vv {
        x.to_bits().hash(&mut hasher);
    }
    for axis in [&grid.u, &grid.v] {
        axis.start.to_bits().hash(&mut hasher);
        axis.step.to_bits().hash(&mut hasher);
        axis.len.hash(&mut hasher);
    }
    hasher.finish()
}

/// A bounded cache of [`GcfHolder`]s, keyed by the bit patterns of a
/// dataset's (u,v) coordinates and the grid geometry.
///
/// This is an explicit object; pass it (or a mutex around it) through the
/// pipeline. Entries are evicted least-recently-used once the capacity is
/// exceeded, and can be dropped explicitly with [`GcfCache::evict`] or
/// [`GcfCache::clear`] when a session moves between datasets.
#[derive(Debug)]
pub struct GcfCache {
    kernel: GcfKernel,
    policy: OobPolicy,
    capacity: NonZeroUsize,
    entries: IndexMap<u64, Arc<GcfHolder>>,
}

impl Default for GcfCache {
    fn default() -> GcfCache {
        GcfCache::new(
            GcfKernel::default(),
            OobPolicy::default(),
            DEFAULT_CACHE_CAPACITY,
        )
    }
}

impl GcfCache {
    pub fn new(kernel: GcfKernel, policy: OobPolicy, capacity: NonZeroUsize) -> GcfCache {
        GcfCache {
            kernel,
            policy,
            capacity,
            entries: IndexMap::with_capacity(capacity.get()),
        }
    }

    pub fn kernel(&self) -> GcfKernel {
        self.kernel
    }

    pub fn policy(&self) -> OobPolicy {
        self.policy
    }

    /// The number of holders currently cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the cached holder for this dataset and grid, building and
    /// inserting it first if there isn't one.
    ///
    /// A hit requires the dataset's (u,v) coordinates to match the holder's
    /// bit for bit (the key is hashed for lookup, then verified); anything
    /// less rebuilds. A hit refreshes the entry to most-recently-used.
    pub fn get_or_build(
        &mut self,
        data: &Arc<Visibility>,
        grid: &UvGrid,
    ) -> Result<Arc<GcfHolder>, CacheError> {
        let key = cache_key(&data.uu, &data.vv, grid);

        let hit = match self.entries.get_full(&key) {
            Some((index, _, holder))
                if holder.matches(&data.uu, &data.vv) && holder.grid == *grid =>
            {
                Some((index, Arc::clone(holder)))
            }
            _ => None,
        };
        if let Some((index, holder)) = hit {
            debug!("gcf cache hit for {} (u,v) samples", data.num_samples());
            let last = self.entries.len() - 1;
            self.entries.move_index(index, last);
            return Ok(holder);
        }

        debug!(
            "gcf cache miss; gridding {} (u,v) samples onto a {}×{} grid",
            data.num_samples(),
            grid.u.len,
            grid.v.len
        );
        let holder = Arc::new(GcfHolder::build(
            Arc::clone(data),
            grid,
            self.kernel,
            self.policy,
        )?);
        // Any entry still here under this key failed the bit-exact check
        // (hash collision); last writer wins.
        self.entries.shift_remove(&key);
        self.entries.insert(key, Arc::clone(&holder));
        while self.entries.len() > self.capacity.get() {
            self.entries.shift_remove_index(0);
        }
        Ok(holder)
    }

    /// Drop every cached holder built from this dataset's (u,v) coordinates,
    /// on any grid. Returns whether anything was dropped.
    pub fn evict(&mut self, data: &Visibility) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|_, holder| !holder.matches(&data.uu, &data.vv));
        self.entries.len() != before
    }

    /// Drop every cached holder.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
