// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! InfiniBand path descriptions.
//!
//! A path collects every addressing field needed to send to, or make
//! sense of a packet from, some remote port: LIDs, GIDs, partition
//! key, queue pair numbers, service level, routing mode. Alongside
//! the raw fields it serves several derived values (address-table
//! indices, the MAD round-trip bound) that are memoized per path; see
//! [`path::IbPath`] for the caching rules.
//!
//! Nothing here performs I/O. The single external dependency is the
//! owning [`port::EndPort`], queried read-only for table lookups.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unreachable_patterns)]
#![deny(unused_must_use)]

#[macro_use]
extern crate alloc;

pub mod cfg;
pub mod path;
pub mod port;

pub use cfg::DrPathCfg;
pub use cfg::LidPathCfg;
pub use ibpath_api as api;
pub use path::IbPath;
pub use path::PathError;
pub use port::EndPort;
pub use port::TablePort;
