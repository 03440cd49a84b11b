// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Containers for images and visibilities, with unit-tagged fields.

mod error;

pub use error::ShapeMismatchError;

use marlu::c64;
use ndarray::prelude::*;
use vec1::{vec1, Vec1};

use crate::constants::VEL_C_KMS;

/// The reference frequency is either supplied explicitly or taken as the mean
/// of the channel frequencies. Resolved exactly once, at construction.
fn resolve_rfreq(freqs: &Vec1<f64>, rfreq: Option<f64>) -> f64 {
    rfreq.unwrap_or_else(|| freqs.iter().sum::<f64>() / freqs.len() as f64)
}

/// Doppler velocities of the channel frequencies relative to the reference
/// frequency \[km/s\].
fn doppler_vels(freqs: &Vec1<f64>, rfreq: f64) -> Vec1<f64> {
    freqs.mapped_ref(|&f| (rfreq - f) / rfreq * VEL_C_KMS)
}

/// A sky image: per-pixel flux densities on a regular RA/Dec raster, one
/// plane per channel.
///
/// Both RA and Dec increase with increasing array index; the FFT that turns
/// one of these into a [`ModelVisibility`] relies on that phase convention.
/// To display an image in the traditional sky orientation (north up, east to
/// the left), put the first element at the lower-left corner *and* flip the
/// array along the RA axis; `degrid` itself never performs that flip.
#[derive(Debug, Clone)]
pub struct SkyImage {
    /// Flux densities, indexed (RA, Dec, channel) \[Jy/pixel\].
    pub data: Array3<f64>,

    /// RA pixel coordinates \[arcsec\].
    pub ra: Vec<f64>,

    /// Dec pixel coordinates \[arcsec\].
    pub dec: Vec<f64>,

    /// Channel frequencies \[Hz\].
    pub freqs: Vec1<f64>,

    /// The reference frequency \[Hz\].
    pub rfreq: f64,

    /// Doppler velocities of the channels relative to `rfreq` \[km/s\].
    pub vels: Vec1<f64>,
}

impl SkyImage {
    /// Create a [`SkyImage`] from a (RA, Dec, channel) cube. The channel axis
    /// must match the number of supplied frequencies.
    pub fn new(
        data: Array3<f64>,
        ra: Vec<f64>,
        dec: Vec<f64>,
        freqs: Vec1<f64>,
        rfreq: Option<f64>,
    ) -> Result<SkyImage, ShapeMismatchError> {
        let (num_ra, num_dec, num_chans) = data.dim();
        if num_ra != ra.len() || num_dec != dec.len() || num_chans != freqs.len() {
            return Err(ShapeMismatchError::Image {
                data_ra: num_ra,
                data_dec: num_dec,
                data_chans: num_chans,
                ra: ra.len(),
                dec: dec.len(),
                chans: freqs.len(),
            });
        }

        let rfreq = resolve_rfreq(&freqs, rfreq);
        let vels = doppler_vels(&freqs, rfreq);
        Ok(SkyImage {
            data,
            ra,
            dec,
            freqs,
            rfreq,
            vels,
        })
    }

    /// Create a single-channel [`SkyImage`] from a 2-D (RA, Dec) plane. A
    /// trailing channel axis of length 1 is synthesised.
    pub fn from_plane(
        data: Array2<f64>,
        ra: Vec<f64>,
        dec: Vec<f64>,
        freq: f64,
        rfreq: Option<f64>,
    ) -> Result<SkyImage, ShapeMismatchError> {
        SkyImage::new(data.insert_axis(Axis(2)), ra, dec, vec1![freq], rfreq)
    }
}

/// An observed visibility dataset. There is no implied regular grid; the
/// samples are a sparse point list, with one (u,v) pair shared by all
/// channels of a sample.
#[derive(Debug, Clone)]
pub struct Visibility {
    /// Complex visibilities, indexed (sample, channel) \[Jy\].
    pub vis: Array2<c64>,

    /// Sample u coordinates \[λ\].
    pub uu: Vec<f64>,

    /// Sample v coordinates \[λ\].
    pub vv: Vec<f64>,

    /// Visibility weights, same shape as `vis` \[Jy⁻²\].
    pub wgts: Array2<f64>,

    /// Channel frequencies \[Hz\].
    pub freqs: Vec1<f64>,

    /// The reference frequency \[Hz\].
    pub rfreq: f64,

    /// Doppler velocities of the channels relative to `rfreq` \[km/s\].
    pub vels: Vec1<f64>,
}

impl Visibility {
    /// Create a [`Visibility`] from parallel sample arrays. `uu`, `vv` and
    /// the rows of `vis` and `wgts` must all have the same length, and the
    /// channel axes must match the number of supplied frequencies.
    pub fn new(
        vis: Array2<c64>,
        uu: Vec<f64>,
        vv: Vec<f64>,
        wgts: Array2<f64>,
        freqs: Vec1<f64>,
        rfreq: Option<f64>,
    ) -> Result<Visibility, ShapeMismatchError> {
        let (num_vis, num_chans) = vis.dim();
        let (num_wgts, num_wgt_chans) = wgts.dim();
        if num_vis != uu.len() || num_vis != vv.len() || num_vis != num_wgts {
            return Err(ShapeMismatchError::VisNotParallel {
                rows: num_vis,
                uu: uu.len(),
                vv: vv.len(),
                wgt_rows: num_wgts,
            });
        }
        if num_chans != freqs.len() || num_wgt_chans != freqs.len() {
            return Err(ShapeMismatchError::VisChannels {
                chans: num_chans,
                wgt_chans: num_wgt_chans,
                freqs: freqs.len(),
            });
        }

        let rfreq = resolve_rfreq(&freqs, rfreq);
        let vels = doppler_vels(&freqs, rfreq);
        Ok(Visibility {
            vis,
            uu,
            vv,
            wgts,
            freqs,
            rfreq,
            vels,
        })
    }

    /// The number of (u,v) samples.
    pub fn num_samples(&self) -> usize {
        self.uu.len()
    }
}

/// Model visibilities on a regular (u,v) grid. Unlike [`Visibility`], these
/// are unweighted, and the u and v node vectors may have different lengths.
#[derive(Debug, Clone)]
pub struct ModelVisibility {
    /// Complex visibilities, indexed (v node, u node, channel) \[Jy\].
    pub vis: Array3<c64>,

    /// Grid u node coordinates \[λ\].
    pub uu: Vec<f64>,

    /// Grid v node coordinates \[λ\].
    pub vv: Vec<f64>,

    /// Channel frequencies \[Hz\].
    pub freqs: Vec1<f64>,

    /// The reference frequency \[Hz\].
    pub rfreq: f64,

    /// Doppler velocities of the channels relative to `rfreq` \[km/s\].
    pub vels: Vec1<f64>,
}

impl ModelVisibility {
    /// Create a [`ModelVisibility`] from a (v, u, channel) cube and its grid
    /// node vectors.
    pub fn new(
        vis: Array3<c64>,
        uu: Vec<f64>,
        vv: Vec<f64>,
        freqs: Vec1<f64>,
        rfreq: Option<f64>,
    ) -> Result<ModelVisibility, ShapeMismatchError> {
        let (num_v, num_u, num_chans) = vis.dim();
        if num_v != vv.len() || num_u != uu.len() || num_chans != freqs.len() {
            return Err(ShapeMismatchError::Model {
                d0: num_v,
                d1: num_u,
                d2: num_chans,
                v: vv.len(),
                u: uu.len(),
                chans: freqs.len(),
            });
        }

        let rfreq = resolve_rfreq(&freqs, rfreq);
        let vels = doppler_vels(&freqs, rfreq);
        Ok(ModelVisibility {
            vis,
            uu,
            vv,
            freqs,
            rfreq,
            vels,
        })
    }
}
