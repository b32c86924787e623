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

/// An InfiniBand local identifier.
///
/// LIDs address ports within a single subnet (IBA 4.1.3) and are
/// assigned by the subnet manager. A port with a nonzero LMC owns a
/// block of 2^LMC consecutive LIDs; the low bits select among
/// distinct switch routes to the same port.
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
pub struct Lid(u16);

impl Lid {
    /// LID 0 is reserved, marking a field that has not been assigned.
    pub const RESERVED: Self = Self(0);

    /// The permissive LID. Any port accepts a packet addressed to it,
    /// which is how directed-route probes cross an unconfigured
    /// fabric.
    pub const PERMISSIVE: Self = Self(0xFFFF);

    pub const fn new(lid: u16) -> Self {
        Self(lid)
    }

    pub const fn val(&self) -> u16 {
        self.0
    }

    pub const fn is_reserved(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_permissive(&self) -> bool {
        self.0 == 0xFFFF
    }

    /// Return `true` if this LID falls in the multicast range.
    pub const fn is_multicast(&self) -> bool {
        self.0 >= 0xC000 && self.0 <= 0xFFFE
    }

    /// The low eight bits, which select one of the port's LMC routes.
    pub const fn path_bits(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Compose a base LID with path-selection bits.
    ///
    /// The bits are ORed in, matching how a port's LID block is
    /// aligned: the base LID has its low LMC bits clear.
    pub const fn with_path_bits(&self, bits: u8) -> Self {
        Self(self.0 | bits as u16)
    }
}

impl From<u16> for Lid {
    fn from(lid: u16) -> Self {
        Self(lid)
    }
}

impl From<Lid> for u16 {
    fn from(lid: Lid) -> u16 {
        lid.0
    }
}

impl fmt::Display for Lid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Lid {
    type Err = String;

    fn from_str(val: &str) -> result::Result<Self, Self::Err> {
        let lid = val.parse::<u16>().map_err(|_| format!("bad LID: {val}"))?;
        Ok(Self(lid))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::string::ToString;

    #[test]
    fn lid_classes() {
        assert!(Lid::RESERVED.is_reserved());
        assert!(Lid::PERMISSIVE.is_permissive());
        assert!(!Lid::PERMISSIVE.is_multicast());
        assert!(Lid::new(0xC000).is_multicast());
        assert!(Lid::new(0xFFFE).is_multicast());
        assert!(!Lid::new(0xBFFF).is_multicast());
    }

    #[test]
    fn lid_path_bits() {
        // A base LID with LMC 3 has its low three bits clear.
        let base = Lid::new(0x48);
        assert_eq!(base.path_bits(), 0x48);
        assert_eq!(base.with_path_bits(0x5), Lid::new(0x4D));
        assert_eq!(base.with_path_bits(0x5).path_bits(), 0x4D);
    }

    #[test]
    fn lid_text() {
        assert_eq!("49".parse(), Ok(Lid::new(49)));
        assert_eq!(Lid::new(49).to_string(), "49");
        let msg = "bad LID: 0x31".to_string();
        assert_eq!("0x31".parse::<Lid>(), Err(msg));
    }
}
