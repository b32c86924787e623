// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Addressing types for an InfiniBand fabric, shared by anything that
//! builds or consumes a path description.

#![no_std]
#![deny(unreachable_patterns)]
#![deny(unused_must_use)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[macro_use]
extern crate alloc;

pub mod gid;
pub mod grh;
pub mod lid;
pub mod pkey;
pub mod qp;

pub use gid::*;
pub use grh::*;
pub use lid::*;
pub use pkey::*;
pub use qp::*;
