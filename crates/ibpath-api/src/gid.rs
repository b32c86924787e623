// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

use alloc::string::String;
use core::fmt;
use core::ops::Deref;
use core::result;
use core::str::FromStr;
use serde::Deserialize;
use serde::Serialize;

/// An InfiniBand global identifier.
///
/// A GID shares its layout and text form with an IPv6 address: a
/// 64-bit subnet prefix followed by a 64-bit interface identifier
/// (IBA 4.1.1). Routers forward on it; switches never look at it.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Gid {
    inner: [u8; 16],
}

impl Gid {
    /// The zero GID, i.e. `::` or all zeros. Marks a GID field that
    /// has not been assigned.
    pub const ANY: Self = Self { inner: [0; 16] };

    /// The subnet prefix every port starts with before a subnet
    /// manager assigns a real one.
    pub const DEFAULT_PREFIX: u64 = 0xFE80_0000_0000_0000;

    pub const fn from_const(words: [u16; 8]) -> Self {
        let w0 = words[0].to_be_bytes();
        let w1 = words[1].to_be_bytes();
        let w2 = words[2].to_be_bytes();
        let w3 = words[3].to_be_bytes();
        let w4 = words[4].to_be_bytes();
        let w5 = words[5].to_be_bytes();
        let w6 = words[6].to_be_bytes();
        let w7 = words[7].to_be_bytes();
        Self {
            inner: [
                w0[0], w0[1], w1[0], w1[1], w2[0], w2[1], w3[0], w3[1], w4[0],
                w4[1], w5[0], w5[1], w6[0], w6[1], w7[0], w7[1],
            ],
        }
    }

    /// Build a GID from its two halves.
    pub const fn from_parts(subnet_prefix: u64, interface_id: u64) -> Self {
        let p = subnet_prefix.to_be_bytes();
        let i = interface_id.to_be_bytes();
        Self {
            inner: [
                p[0], p[1], p[2], p[3], p[4], p[5], p[6], p[7], i[0], i[1],
                i[2], i[3], i[4], i[5], i[6], i[7],
            ],
        }
    }

    /// The 64-bit subnet prefix, in host order.
    pub const fn subnet_prefix(&self) -> u64 {
        let b = &self.inner;
        u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
    }

    /// The 64-bit interface identifier (EUI-64), in host order.
    pub const fn interface_id(&self) -> u64 {
        let b = &self.inner;
        u64::from_be_bytes([b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]])
    }

    /// Return `true` if the subnet prefix is still the well-known
    /// default, meaning the GID is only usable within its own subnet.
    pub const fn is_default_prefix(&self) -> bool {
        self.subnet_prefix() == Self::DEFAULT_PREFIX
    }

    /// Return `true` if this is a multicast GID, and `false` otherwise.
    pub const fn is_multicast(&self) -> bool {
        self.inner[0] == 0xFF
    }

    /// Return the bytes of the GID.
    pub fn bytes(&self) -> [u8; 16] {
        self.inner
    }
}

impl fmt::Display for Gid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ip6 = core::net::Ipv6Addr::from(self.inner);
        write!(f, "{ip6}")
    }
}

impl From<core::net::Ipv6Addr> for Gid {
    fn from(ip6: core::net::Ipv6Addr) -> Self {
        Self { inner: ip6.octets() }
    }
}

impl From<Gid> for core::net::Ipv6Addr {
    fn from(gid: Gid) -> Self {
        Self::from(gid.inner)
    }
}

impl From<&[u8; 16]> for Gid {
    fn from(bytes: &[u8; 16]) -> Gid {
        Gid { inner: *bytes }
    }
}

impl From<[u8; 16]> for Gid {
    fn from(bytes: [u8; 16]) -> Gid {
        Gid { inner: bytes }
    }
}

impl From<[u16; 8]> for Gid {
    fn from(words: [u16; 8]) -> Gid {
        let tmp = words.map(u16::to_be_bytes);
        let mut gid = [0; 16];
        for (i, pair) in tmp.iter().enumerate() {
            gid[i * 2] = pair[0];
            gid[(i * 2) + 1] = pair[1];
        }

        Gid { inner: gid }
    }
}

impl From<u128> for Gid {
    fn from(i: u128) -> Gid {
        Self::from(i.to_be_bytes())
    }
}

impl From<Gid> for u128 {
    fn from(gid: Gid) -> u128 {
        u128::from_be_bytes(gid.bytes())
    }
}

impl FromStr for Gid {
    type Err = String;

    fn from_str(val: &str) -> result::Result<Self, Self::Err> {
        let ip6 = val
            .parse::<core::net::Ipv6Addr>()
            .map_err(|_| format!("bad GID: {val}"))?;
        Ok(ip6.into())
    }
}

impl AsRef<[u8]> for Gid {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

impl Deref for Gid {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
