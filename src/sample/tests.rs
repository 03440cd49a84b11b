// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::num::NonZeroUsize;

use approx::assert_abs_diff_eq;
use ndarray::Array3;
use vec1::Vec1;

use super::*;
use crate::gcf::GcfKernel;
use crate::grid::OobPolicy;

fn freqs(num_chans: usize) -> Vec1<f64> {
    Vec1::try_from_vec((0..num_chans).map(|i| 100e6 + i as f64 * 1e6).collect()).unwrap()
}

fn test_vis(uu: Vec<f64>, vv: Vec<f64>, num_chans: usize) -> Arc<Visibility> {
    let num_vis = uu.len();
    let vis = Array2::from_elem((num_vis, num_chans), c64::new(1.0, 0.0));
    let wgts = Array2::ones((num_vis, num_chans));
    Arc::new(Visibility::new(vis, uu, vv, wgts, freqs(num_chans), None).unwrap())
}

/// A 9×9 model grid on [-4, 4] λ, spatially constant per channel.
fn constant_model(values: &[c64]) -> ModelVisibility {
    let coords: Vec<f64> = (-4..=4).map(f64::from).collect();
    let mut vis = Array3::from_elem((9, 9, values.len()), c64::new(0.0, 0.0));
    for (chan, &value) in values.iter().enumerate() {
        vis.slice_mut(ndarray::s![.., .., chan]).fill(value);
    }
    ModelVisibility::new(vis, coords.clone(), coords, freqs(values.len()), None).unwrap()
}

#[test]
fn test_constant_model_samples_to_the_constant() {
    // Normalising by the total kernel mass makes the interpolation exact for
    // a spatially constant model, at any in-bounds (u,v).
    let model = constant_model(&[c64::new(10.0, 0.0)]);
    let data = test_vis(
        vec![0.3, 0.0, -1.2, 1.5],
        vec![-0.4, 0.0, 0.7, -1.5],
        1,
    );
    let grid = UvGrid::from_model(&model).unwrap();

    for kernel in [
        GcfKernel::Pillbox,
        GcfKernel::Gaussian {
            half_support: NonZeroUsize::new(2).unwrap(),
        },
        GcfKernel::Spheroidal,
    ] {
        let holder =
            GcfHolder::build(Arc::clone(&data), &grid, kernel, OobPolicy::Reject).unwrap();
        let sampled = sample(&model, &holder).unwrap();
        assert_eq!(sampled.dim(), (4, 1));
        for &value in &sampled {
            assert_abs_diff_eq!(value.re, 10.0, epsilon = 1e-12);
            assert_abs_diff_eq!(value.im, 0.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_zero_spatial_frequency_recovers_the_total_flux() {
    // The (0,0) visibility of a model built from a constant-flux image is
    // the image's total flux, and the model grid is flat at that value;
    // sampling at (u,v) = (0,0) must reproduce it.
    let total_flux = 3.7;
    let model = constant_model(&[c64::new(total_flux, 0.0)]);
    let data = test_vis(vec![0.0], vec![0.0], 1);
    let grid = UvGrid::from_model(&model).unwrap();
    let holder =
        GcfHolder::build(data, &grid, GcfKernel::Spheroidal, OobPolicy::Reject).unwrap();

    let sampled = sample(&model, &holder).unwrap();
    assert_abs_diff_eq!(sampled[(0, 0)].re, total_flux, epsilon = 1e-12);
    assert_abs_diff_eq!(sampled[(0, 0)].im, 0.0, epsilon = 1e-12);
}

#[test]
fn test_channels_are_sampled_independently() {
    let model = constant_model(&[c64::new(1.0, 0.0), c64::new(2.0, -0.5)]);
    let data = test_vis(vec![0.3, -0.7], vec![-0.4, 1.1], 2);
    let grid = UvGrid::from_model(&model).unwrap();
    let holder =
        GcfHolder::build(data, &grid, GcfKernel::Spheroidal, OobPolicy::Reject).unwrap();

    let sampled = sample(&model, &holder).unwrap();
    assert_eq!(sampled.dim(), (2, 2));
    for k in 0..2 {
        assert_abs_diff_eq!(sampled[(k, 0)].re, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sampled[(k, 0)].im, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sampled[(k, 1)].re, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sampled[(k, 1)].im, -0.5, epsilon = 1e-12);
    }
}

#[test]
fn test_pillbox_gathers_the_nearest_node_exactly() {
    // Encode each node's indices in its value; nearest-neighbour sampling
    // must return the enclosing node's value untouched.
    let coords: Vec<f64> = (-2..=2).map(f64::from).collect();
    let mut vis = Array3::from_elem((5, 5, 1), c64::new(0.0, 0.0));
    for iv in 0..5 {
        for iu in 0..5 {
            vis[(iv, iu, 0)] = c64::new(iu as f64, iv as f64);
        }
    }
    let model = ModelVisibility::new(vis, coords.clone(), coords, freqs(1), None).unwrap();
    let data = test_vis(vec![0.3], vec![-0.4], 1);
    let grid = UvGrid::from_model(&model).unwrap();
    let holder = GcfHolder::build(data, &grid, GcfKernel::Pillbox, OobPolicy::Reject).unwrap();

    let sampled = sample(&model, &holder).unwrap();
    // u = 0.3 encloses to u node 2; v = -0.4 to v node 2.
    assert_eq!(sampled[(0, 0)], c64::new(2.0, 2.0));
}

#[test]
fn test_sampling_is_idempotent() {
    let model = constant_model(&[c64::new(1.25, -0.75), c64::new(-0.5, 2.0)]);
    let data = test_vis(vec![0.3, -0.7, 1.4], vec![-0.4, 1.1, 0.2], 2);
    let grid = UvGrid::from_model(&model).unwrap();
    let holder =
        GcfHolder::build(data, &grid, GcfKernel::Spheroidal, OobPolicy::Reject).unwrap();

    let first = sample(&model, &holder).unwrap();
    let second = sample(&model, &holder).unwrap();
    // Bit-identical, not merely close.
    assert_eq!(first, second);
}

#[test]
fn test_channel_count_mismatch_is_an_error() {
    let model = constant_model(&[c64::new(1.0, 0.0), c64::new(2.0, 0.0)]);
    let data = test_vis(vec![0.3], vec![-0.4], 1);
    let grid = UvGrid::from_model(&model).unwrap();
    let holder =
        GcfHolder::build(data, &grid, GcfKernel::Spheroidal, OobPolicy::Reject).unwrap();

    let result = sample(&model, &holder);
    assert!(matches!(
        result,
        Err(SampleError::ChannelMismatch { model: 2, data: 1 })
    ));
}

#[test]
fn test_mismatched_grid_is_an_error() {
    let model = constant_model(&[c64::new(1.0, 0.0)]);
    let data = test_vis(vec![0.3], vec![-0.4], 1);
    let grid = UvGrid::from_model(&model).unwrap();
    let holder =
        GcfHolder::build(data, &grid, GcfKernel::Spheroidal, OobPolicy::Reject).unwrap();

    // A model with the same shape on a stretched grid: the holder's cell
    // indices don't apply to it.
    let stretched: Vec<f64> = (-4..=4).map(|i| i as f64 * 2.0).collect();
    let other_model = ModelVisibility::new(
        model.vis.clone(),
        stretched.clone(),
        stretched,
        freqs(1),
        None,
    )
    .unwrap();

    let result = sample(&other_model, &holder);
    assert!(matches!(result, Err(SampleError::GridMismatch)));
}

#[test]
fn test_sample_model_builds_through_the_cache() {
    let mut cache = GcfCache::default();
    let model = constant_model(&[c64::new(4.2, 0.0)]);
    let data = test_vis(vec![0.3, -0.7], vec![-0.4, 1.1], 1);

    let through_cache = sample_model(&model, &data, &mut cache).unwrap();
    assert_eq!(cache.len(), 1);

    let grid = UvGrid::from_model(&model).unwrap();
    let holder = cache.get_or_build(&data, &grid).unwrap();
    let direct = sample(&model, &holder).unwrap();
    assert_eq!(through_cache, direct);

    // The second pass was a hit, not a rebuild.
    assert_eq!(cache.len(), 1);
}
