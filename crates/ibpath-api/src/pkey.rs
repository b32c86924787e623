// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

use alloc::string::String;
use core::fmt;
use core::result;
use core::str::FromStr;
use serde::Deserialize;
use serde::Serialize;

/// An InfiniBand partition key.
///
/// The low 15 bits name the partition; the top bit is the membership
/// type, full (1) or limited (0). Two limited members cannot talk to
/// each other (IBA 10.9.2).
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct Pkey(u16);

impl Pkey {
    /// The default partition key, full membership. Every port belongs
    /// to the default partition until a subnet manager says otherwise.
    pub const DEFAULT: Self = Self(0xFFFF);

    /// The default partition key, limited membership.
    pub const DEFAULT_LIMITED: Self = Self(0x7FFF);

    pub const fn new(pkey: u16) -> Self {
        Self(pkey)
    }

    pub const fn val(&self) -> u16 {
        self.0
    }

    /// Return `true` if the membership bit grants full membership.
    pub const fn is_full_member(&self) -> bool {
        self.0 & 0x8000 != 0
    }

    /// The 15-bit partition number, with the membership bit cleared.
    pub const fn base(&self) -> u16 {
        self.0 & 0x7FFF
    }
}

impl Default for Pkey {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u16> for Pkey {
    fn from(pkey: u16) -> Self {
        Self(pkey)
    }
}

impl From<Pkey> for u16 {
    fn from(pkey: Pkey) -> u16 {
        pkey.0
    }
}

impl fmt::Display for Pkey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl FromStr for Pkey {
    type Err = String;

    fn from_str(val: &str) -> result::Result<Self, Self::Err> {
        let digits = val.strip_prefix("0x").unwrap_or(val);
        let pkey = u16::from_str_radix(digits, 16)
            .map_err(|_| format!("bad PKey: {val}"))?;
        Ok(Self(pkey))
    }
}
