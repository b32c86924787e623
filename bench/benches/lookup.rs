// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Derived-accessor microbenchmarks.
//!
//! The point of memoizing table positions on the path is that a
//! repeat read costs nothing while a cold read walks the port's
//! table, so each accessor is measured from both sides of the cache.

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use ibpath::IbPath;
use ibpath::LidPathCfg;
use ibpath::TablePort;
use ibpath_api::Grh;
use ibpath_api::Lid;
use ibpath_api::Qpn;
use ibpath_bench::synthetic_port;
use std::hint::black_box;

/// A path whose SGID and PKey sit at the far end of the port's
/// tables, the worst case for a linear scan.
fn far_end_cfg(port: &TablePort) -> LidPathCfg {
    LidPathCfg {
        dlid: Lid::new(9),
        slid: Lid::new(0x400),
        pkey: port.pkeys[port.pkeys.len() - 1],
        dqpn: Some(Qpn::GSI),
        sqpn: Some(Qpn::GSI),
        grh: Some(Grh {
            sgid: port.gids[port.gids.len() - 1],
            dgid: port.gids[0],
            hop_limit: 64,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Benchmark [`IbPath::sgid_index`] cold and cached across GID-table
/// sizes.
fn sgid_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("path/sgid_index");
    for size in [8, 32, 128, 256] {
        let port = synthetic_port(size, 16);

        let mut path = IbPath::new(&port, far_end_cfg(&port));
        group.bench_with_input(BenchmarkId::new("cold", size), &size, |b, _| {
            b.iter(|| {
                path.drop_cache();
                black_box(path.sgid_index())
            })
        });

        let mut path = IbPath::new(&port, far_end_cfg(&port));
        let _ = path.sgid_index();
        group.bench_with_input(
            BenchmarkId::new("cached", size),
            &size,
            |b, _| b.iter(|| black_box(path.sgid_index())),
        );
    }
    group.finish();
}

/// Benchmark [`IbPath::pkey_index`] the same way across PKey-table
/// sizes.
fn pkey_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("path/pkey_index");
    for size in [4, 16, 64] {
        let port = synthetic_port(32, size);

        let mut path = IbPath::new(&port, far_end_cfg(&port));
        group.bench_with_input(BenchmarkId::new("cold", size), &size, |b, _| {
            b.iter(|| {
                path.drop_cache();
                black_box(path.pkey_index())
            })
        });

        let mut path = IbPath::new(&port, far_end_cfg(&port));
        let _ = path.pkey_index();
        group.bench_with_input(
            BenchmarkId::new("cached", size),
            &size,
            |b, _| b.iter(|| black_box(path.pkey_index())),
        );
    }
    group.finish();
}

/// Benchmark reversal and the timeout bound, both of which run once
/// per received MAD.
fn reverse_and_timeout(c: &mut Criterion) {
    let mut group = c.benchmark_group("path");
    let port = synthetic_port(32, 16);

    let mut path = IbPath::new(&port, far_end_cfg(&port));
    group.bench_function("reverse", |b| b.iter(|| path.reverse()));

    let mut path = IbPath::new(&port, far_end_cfg(&port));
    group.bench_function("mad_timeout/cold", |b| {
        b.iter(|| {
            path.drop_cache();
            black_box(path.mad_timeout())
        })
    });
    group.finish();
}

criterion_group!(lookups, sgid_index, pkey_index, reverse_and_timeout);
criterion_main!(lookups);
