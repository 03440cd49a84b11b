// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Gridding-convolution sampling of radio-interferometric model visibilities.

Model visibilities live on a regular Fourier-plane (u,v) grid; observed
visibilities are an irregular point list. This crate interpolates the model at
the observed (u,v) locations with a finite-support gridding convolution
function (GCF), and caches the per-dataset index/weight arrays so that
repeated model evaluations against the same observed geometry (e.g. the inner
loop of an MCMC fit) don't re-grid anything.

The image-to-grid FFT, visibility file I/O and any fitting machinery are
deliberately not here; this is an in-process numerical library.
 */

pub mod cache;
pub mod constants;
mod error;
pub mod gcf;
pub mod grid;
pub mod sample;
pub mod types;

// Re-exports.
pub use cache::{GcfCache, GcfHolder};
pub use error::DegridError;
pub use gcf::GcfKernel;
pub use grid::{GridAxis, OobPolicy, UvAxis, UvGrid};
pub use sample::{sample, sample_model};
pub use types::{ModelVisibility, SkyImage, Visibility};

// External re-exports.
pub use marlu::c64;
