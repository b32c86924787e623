// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Support code for path benchmarks.

use ibpath::TablePort;
use ibpath_api::Gid;
use ibpath_api::Lid;
use ibpath_api::Pkey;
use rand::Rng;

/// Build a port with `gids` GID-table entries and `pkeys` partition
/// table entries. Values are random, so a lookup that walks the table
/// cannot be short-circuited; positions are what benchmarks key on.
pub fn synthetic_port(gids: usize, pkeys: usize) -> TablePort {
    let mut rng = rand::rng();
    TablePort {
        lid: Lid::new(0x400),
        subnet_timeout: 18,
        gids: (0..gids)
            .map(|_| Gid::from_parts(Gid::DEFAULT_PREFIX, rng.random()))
            .collect(),
        pkeys: (0..pkeys).map(|_| Pkey::new(rng.random())).collect(),
    }
}
