// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! The end port a path hangs off of.

use alloc::vec::Vec;
use ibpath_api::Gid;
use ibpath_api::Lid;
use ibpath_api::Pkey;

/// A local fabric port, as a path sees it.
///
/// Paths borrow their end port and query it for address-table
/// lookups, the base LID, and the subnet timeout; they never write
/// back through this trait. Positional lookups answer `None` for an
/// index past the end of the table; value lookups answer `None` when
/// the value is absent.
///
/// A path caches table positions it has resolved. Implementations
/// must keep `gids` and `pkeys` stable while any such cache is live,
/// or the cached indices silently go stale; a caller that reorders a
/// table owns the job of calling [`crate::IbPath::drop_cache`] on
/// every path built over it.
pub trait EndPort {
    /// The port's base LID.
    fn lid(&self) -> Lid;

    /// The port-wide default packet lifetime exponent, from PortInfo.
    fn subnet_timeout(&self) -> u8;

    /// The GID at `index` in the port's GID table.
    fn gid(&self, index: usize) -> Option<Gid>;

    /// The position of `gid` in the port's GID table.
    fn gid_index(&self, gid: Gid) -> Option<usize>;

    /// The partition key at `index` in the port's PKey table.
    fn pkey(&self, index: usize) -> Option<Pkey>;

    /// The position of `pkey` in the port's PKey table.
    fn pkey_index(&self, pkey: Pkey) -> Option<usize>;
}

/// An end port described by plain tables.
///
/// Callers that have queried a device's port attributes drop them in
/// here; tests use it as a stand-in fabric. Lookups are linear scans,
/// which is what makes caching the resolved positions on the path
/// worth the trouble.
#[derive(Clone, Debug, Default)]
pub struct TablePort {
    pub lid: Lid,
    pub subnet_timeout: u8,
    pub gids: Vec<Gid>,
    pub pkeys: Vec<Pkey>,
}

impl EndPort for TablePort {
    fn lid(&self) -> Lid {
        self.lid
    }

    fn subnet_timeout(&self) -> u8 {
        self.subnet_timeout
    }

    fn gid(&self, index: usize) -> Option<Gid> {
        self.gids.get(index).copied()
    }

    fn gid_index(&self, gid: Gid) -> Option<usize> {
        self.gids.iter().position(|g| *g == gid)
    }

    fn pkey(&self, index: usize) -> Option<Pkey> {
        self.pkeys.get(index).copied()
    }

    fn pkey_index(&self, pkey: Pkey) -> Option<usize> {
        self.pkeys.iter().position(|p| *p == pkey)
    }
}
