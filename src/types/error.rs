// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShapeMismatchError {
    #[error("sky image data has shape ({data_ra}, {data_dec}, {data_chans}), but there are {ra} RA coordinates, {dec} Dec coordinates and {chans} frequencies")]
    Image {
        data_ra: usize,
        data_dec: usize,
        data_chans: usize,
        ra: usize,
        dec: usize,
        chans: usize,
    },

    #[error("visibility arrays are not parallel: {rows} rows of visibilities, {uu} u coordinates, {vv} v coordinates, {wgt_rows} rows of weights")]
    VisNotParallel {
        rows: usize,
        uu: usize,
        vv: usize,
        wgt_rows: usize,
    },

    #[error("visibility data has {chans} channels ({wgt_chans} weight channels), but {freqs} frequencies were supplied")]
    VisChannels {
        chans: usize,
        wgt_chans: usize,
        freqs: usize,
    },

    #[error("model visibility data has shape ({d0}, {d1}, {d2}), but there are {v} v nodes, {u} u nodes and {chans} frequencies")]
    Model {
        d0: usize,
        d1: usize,
        d2: usize,
        v: usize,
        u: usize,
        chans: usize,
    },
}
