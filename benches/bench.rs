// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::sync::Arc;

use criterion::*;
use ndarray::{Array2, Array3};
use vec1::Vec1;

use degrid::{c64, sample, GcfHolder, GcfKernel, ModelVisibility, OobPolicy, UvGrid, Visibility};

const NUM_VIS: usize = 10_000;
const NUM_CHANS: usize = 16;
const GRID_SIZE: usize = 256;

fn setup() -> (Arc<Visibility>, ModelVisibility, UvGrid) {
    let freqs: Vec1<f64> =
        Vec1::try_from_vec((0..NUM_CHANS).map(|i| 100e6 + i as f64 * 1e6).collect()).unwrap();

    // A deterministic golden-ratio scatter of (u,v) samples, comfortably
    // inside the grid.
    let uu: Vec<f64> = (0..NUM_VIS)
        .map(|i| ((i as f64 * 0.618_033_988_7).fract() - 0.5) * 10_000.0)
        .collect();
    let vv: Vec<f64> = (0..NUM_VIS)
        .map(|i| ((i as f64 * 0.754_877_666_2).fract() - 0.5) * 10_000.0)
        .collect();
    let vis = Array2::from_elem((NUM_VIS, NUM_CHANS), c64::new(1.0, 0.0));
    let wgts = Array2::ones((NUM_VIS, NUM_CHANS));
    let data = Arc::new(Visibility::new(vis, uu, vv, wgts, freqs.clone(), None).unwrap());

    let coords: Vec<f64> = (0..GRID_SIZE)
        .map(|i| (i as f64 - GRID_SIZE as f64 / 2.0) * 50.0)
        .collect();
    let model_vis = Array3::from_elem((GRID_SIZE, GRID_SIZE, NUM_CHANS), c64::new(1.0, 0.0));
    let model =
        ModelVisibility::new(model_vis, coords.clone(), coords, freqs, None).unwrap();
    let grid = UvGrid::from_model(&model).unwrap();

    (data, model, grid)
}

fn gridding(c: &mut Criterion) {
    let (data, model, grid) = setup();

    c.bench_function("build spheroidal gridding weights, 10k samples", |b| {
        b.iter(|| {
            GcfHolder::build(
                Arc::clone(&data),
                &grid,
                GcfKernel::Spheroidal,
                OobPolicy::Reject,
            )
            .unwrap()
        })
    });

    let holder = GcfHolder::build(
        Arc::clone(&data),
        &grid,
        GcfKernel::Spheroidal,
        OobPolicy::Reject,
    )
    .unwrap();
    c.bench_function("sample 10k points over 16 channels", |b| {
        b.iter(|| sample(&model, &holder).unwrap())
    });
}

criterion_group!(benches, gridding);
criterion_main!(benches);
