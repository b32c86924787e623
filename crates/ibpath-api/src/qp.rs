// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

use alloc::string::String;
use core::fmt;
use serde::Deserialize;
use serde::Serialize;

/// A queue pair number.
///
/// QPNs occupy 24 bits on the wire (IBA 9.3.5); the constructor
/// refuses anything wider.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct Qpn(u32);

impl Qpn {
    /// QP0, the subnet management interface.
    pub const SMI: Self = Self(0);

    /// QP1, the general services interface.
    pub const GSI: Self = Self(1);

    pub fn new(qpn: u32) -> Result<Self, String> {
        if qpn >= 1 << 24 {
            return Err(format!("bad QPN: {qpn}"));
        }

        Ok(Self(qpn))
    }

    pub const fn val(&self) -> u32 {
        self.0
    }

    /// The QPN as the three bytes it occupies in a base transport
    /// header.
    pub fn bytes(&self) -> [u8; 3] {
        let b = self.0.to_be_bytes();
        [b[1], b[2], b[3]]
    }
}

impl TryFrom<u32> for Qpn {
    type Error = String;

    fn try_from(qpn: u32) -> Result<Self, Self::Error> {
        Self::new(qpn)
    }
}

impl From<Qpn> for u32 {
    fn from(qpn: Qpn) -> u32 {
        qpn.0
    }
}

impl fmt::Display for Qpn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A queue key.
///
/// Q_Keys gate access to unconnected QPs. Keys with the high bit set
/// are controlled: a consumer cannot supply one from a work request,
/// reserving them for privileged users (IBA 10.2.4).
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct QKey(u32);

impl QKey {
    /// The well-known Q_Key for management traffic on QP0 and QP1.
    pub const DEFAULT_QP0: Self = Self(0x8001_0000);

    pub const fn new(qkey: u32) -> Self {
        Self(qkey)
    }

    pub const fn val(&self) -> u32 {
        self.0
    }

    /// Return `true` if this is a controlled Q_Key.
    pub const fn is_controlled(&self) -> bool {
        self.0 & 0x8000_0000 != 0
    }
}

impl From<u32> for QKey {
    fn from(qkey: u32) -> Self {
        Self(qkey)
    }
}

impl From<QKey> for u32 {
    fn from(qkey: QKey) -> u32 {
        qkey.0
    }
}

impl fmt::Display for QKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
