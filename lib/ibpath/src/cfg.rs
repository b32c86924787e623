// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! Construction-time path configuration.
//!
//! A path is built from one of these structs plus a borrowed end
//! port. Anything not set by the caller takes the defaults below;
//! tests and callers lean on struct-update syntax for the rest:
//!
//! ```text
//! IbPath::new(&port, LidPathCfg {
//!     dlid: Lid::new(9),
//!     ..Default::default()
//! })
//! ```

use alloc::vec::Vec;
use ibpath_api::Grh;
use ibpath_api::Lid;
use ibpath_api::Pkey;
use ibpath_api::QKey;
use ibpath_api::Qpn;
use serde::Deserialize;
use serde::Serialize;

/// The response-time exponent assumed of a remote end that has not
/// advertised one.
pub const DEFAULT_RESP_TIME: u8 = 20;

/// Configuration for a LID-routed path.
///
/// The default is a path addressed to nothing: both LIDs reserved,
/// the default partition, no connectionless block, no global route.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LidPathCfg {
    /// LID of the remote port.
    pub dlid: Lid,

    /// LID the local port sends as, base LID plus any path bits.
    pub slid: Lid,

    /// Service level.
    pub sl: u8,

    /// Partition key carried in the BTH.
    pub pkey: Pkey,

    /// Response-time exponent of the remote end, one input to the MAD
    /// round-trip bound.
    pub resp_time: u8,

    /// Times a request may be resent before the sender gives up.
    pub retries: u8,

    /// Remote QP, for connectionless use. Connected transports bind
    /// the QP at connection setup instead.
    pub dqpn: Option<Qpn>,

    /// Local QP, for connectionless use.
    pub sqpn: Option<Qpn>,

    /// Q_Key the remote QP expects.
    pub qkey: Option<QKey>,

    /// Global route section, when the path leaves the subnet.
    pub grh: Option<Grh>,

    /// Explicit packet lifetime exponent. When unset, the owning
    /// port's subnet timeout stands in.
    pub packet_life_time: Option<u8>,

    /// Handle of the management agent this path was resolved for.
    pub agent_id: Option<u32>,
}

impl Default for LidPathCfg {
    fn default() -> Self {
        Self {
            dlid: Lid::RESERVED,
            slid: Lid::RESERVED,
            sl: 0,
            pkey: Pkey::DEFAULT,
            resp_time: DEFAULT_RESP_TIME,
            retries: 0,
            dqpn: None,
            sqpn: None,
            qkey: None,
            grh: None,
            packet_life_time: None,
            agent_id: None,
        }
    }
}

/// Configuration for a directed-route path.
///
/// The default is a ready-to-send probe of the local port itself:
/// the hop list is the single leading zero every directed route
/// starts with, both directed-route LIDs and the DLID are permissive,
/// and the SMI QPs and management Q_Key are preset. Callers override
/// individual fields on top of that, most commonly `hops` and, for a
/// partially LID-routed probe, `dr_slid`/`slid`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DrPathCfg {
    /// The directed-route hop list: the output port to take at each
    /// switch. Entry zero is always zero (IBA 14.2.2.1); the list
    /// grows one byte per hop outward.
    pub hops: Vec<u8>,

    /// LID responses return to once they exit the routed segment,
    /// permissive for a pure directed route.
    pub dr_slid: Lid,

    /// LID addressing the far end of any leading LID-routed segment,
    /// permissive for a pure directed route.
    pub dr_dlid: Lid,

    /// LID of the first hop; directed-route probes address it
    /// permissively.
    pub dlid: Lid,

    /// Source LID, reserved until the port has one worth claiming.
    pub slid: Lid,

    /// Service level.
    pub sl: u8,

    /// Partition key.
    pub pkey: Pkey,

    /// Response-time exponent of the remote end.
    pub resp_time: u8,

    /// Times a request may be resent.
    pub retries: u8,

    /// Remote QP; directed-route traffic runs on the SMI.
    pub dqpn: Qpn,

    /// Local QP.
    pub sqpn: Qpn,

    /// Q_Key for the SMI.
    pub qkey: QKey,

    /// Explicit packet lifetime exponent.
    pub packet_life_time: Option<u8>,

    /// Handle of the management agent this path was resolved for.
    pub agent_id: Option<u32>,
}

impl Default for DrPathCfg {
    fn default() -> Self {
        Self {
            hops: vec![0],
            dr_slid: Lid::PERMISSIVE,
            dr_dlid: Lid::PERMISSIVE,
            dlid: Lid::PERMISSIVE,
            slid: Lid::RESERVED,
            sl: 0,
            pkey: Pkey::DEFAULT,
            resp_time: DEFAULT_RESP_TIME,
            retries: 0,
            dqpn: Qpn::SMI,
            sqpn: Qpn::SMI,
            qkey: QKey::DEFAULT_QP0,
            packet_life_time: None,
            agent_id: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dr_defaults() {
        let cfg = DrPathCfg::default();
        assert_eq!(cfg.hops, vec![0]);
        assert!(cfg.dr_slid.is_permissive());
        assert!(cfg.dr_dlid.is_permissive());
        assert!(cfg.dlid.is_permissive());
        assert!(cfg.slid.is_reserved());
        assert_eq!(cfg.dqpn, Qpn::SMI);
        assert_eq!(cfg.sqpn, Qpn::SMI);
        assert_eq!(cfg.qkey, QKey::DEFAULT_QP0);
    }

    #[test]
    fn lid_defaults() {
        let cfg = LidPathCfg::default();
        assert_eq!(cfg.pkey, Pkey::DEFAULT);
        assert_eq!(cfg.resp_time, DEFAULT_RESP_TIME);
        assert_eq!(cfg.retries, 0);
        assert!(cfg.dqpn.is_none());
        assert!(cfg.grh.is_none());
        assert!(cfg.packet_life_time.is_none());
    }
}
