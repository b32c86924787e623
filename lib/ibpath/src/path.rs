// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

//! The path description itself.

use crate::cfg::DrPathCfg;
use crate::cfg::LidPathCfg;
use crate::port::EndPort;
use alloc::vec::Vec;
use core::fmt;
use core::mem;
use core::time::Duration;
use ibpath_api::Gid;
use ibpath_api::Grh;
use ibpath_api::Lid;
use ibpath_api::Pkey;
use ibpath_api::QKey;
use ibpath_api::Qpn;

/// Failure of a path accessor or of reversal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathError {
    /// The path's SGID is absent from the port's GID table.
    GidNotFound(Gid),

    /// The path's PKey is absent from the port's PKey table.
    PkeyNotFound(Pkey),

    /// A GID index write past the end of the table.
    GidIndexOutOfRange(usize),

    /// A PKey index write past the end of the table.
    PkeyIndexOutOfRange(usize),

    /// Directed-route paths never resolve an SGID.
    SgidOnDrPath,

    /// The accessor needs a global route section this path was built
    /// without.
    MissingGrh,

    /// Reversal needs both QPNs of a connectionless path.
    MissingQpn,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::GidNotFound(gid) => {
                write!(f, "GID {gid} not in the port's GID table")
            }
            Self::PkeyNotFound(pkey) => {
                write!(f, "PKey {pkey} not in the port's PKey table")
            }
            Self::GidIndexOutOfRange(index) => {
                write!(f, "GID index {index} out of range")
            }
            Self::PkeyIndexOutOfRange(index) => {
                write!(f, "PKey index {index} out of range")
            }
            Self::SgidOnDrPath => {
                write!(f, "directed-route paths have no SGID index")
            }
            Self::MissingGrh => {
                write!(f, "path has no global route section")
            }
            Self::MissingQpn => {
                write!(f, "path has no QPNs to reverse")
            }
        }
    }
}

pub type Result<T> = core::result::Result<T, PathError>;

/// One tick of the management timeout computation, 4.096 us
/// (IBA C13-13.1.1), in nanoseconds.
const TIMEOUT_TICK_NS: u128 = 4096;

const NANOS: u128 = 1_000_000_000;

/// 2^exp in timeout ticks. Wire formats cap these exponents at six
/// bits; clamp so the shift stays in range whatever a caller stored.
fn pow2(exp: u32) -> u128 {
    1u128 << exp.min(63)
}

fn mad_round_trip(life_time: u8, resp_time: u8) -> Duration {
    let ticks = pow2(life_time as u32 + 1) + pow2(resp_time as u32);
    let ns = TIMEOUT_TICK_NS * ticks;
    Duration::new((ns / NANOS) as u64, (ns % NANOS) as u32)
}

/// The memoized derived values, dropped as one unit.
#[derive(Clone, Copy, Debug, Default)]
struct PathCache {
    sgid_index: Option<usize>,
    pkey_index: Option<usize>,
    mad_timeout: Option<Duration>,
}

/// How packets on this path find the far end.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Route {
    /// Switched by LID, with a global route section when the path
    /// leaves the subnet.
    Lid { grh: Option<Grh> },

    /// Source-routed by an explicit hop list.
    Dr { dr_slid: Lid, dr_dlid: Lid, hops: Vec<u8> },
}

/// A description of one path through the fabric, owned by the local
/// port it was resolved against.
///
/// Every field reads as if a packet were being *sent from* the owning
/// end port: `slid`, `sgid`, and `sqpn` name this side; `dlid`,
/// `dgid`, and `dqpn` name the remote side. A path describing a
/// *received* packet therefore has reversed sense, and
/// [`IbPath::reverse`] turns it into the path for answering
/// (IBA 13.5.4).
///
/// Two routing modes share the type: LID-routed paths, optionally
/// carrying a global route section, and directed-route paths built by
/// [`IbPath::new_dr`], which name an explicit hop list so management
/// packets can probe a fabric the subnet manager has not configured
/// yet. A directed-route path never carries a GRH and never resolves
/// an SGID: [`IbPath::has_grh`] is fixed false and
/// [`IbPath::sgid_index`] always fails for it.
///
/// Reading [`IbPath::sgid_index`], [`IbPath::pkey_index`], or
/// [`IbPath::mad_timeout`] memoizes the answer, which is why those
/// take `&mut self`. The paired write accessors seed the memo with
/// the index they were handed, so writing an index and reading it
/// back never rescans a table. All memos drop as one unit via
/// [`IbPath::drop_cache`]; there is no piecemeal invalidation.
/// Reversal and the write accessors keep the cache consistent on
/// their own. The plain setters ([`IbPath::set_resp_time`],
/// [`IbPath::set_packet_life_time`]) deliberately do not: an already
/// cached `mad_timeout` keeps its old value until the next
/// `drop_cache()`.
#[derive(Clone)]
pub struct IbPath<'a> {
    port: &'a dyn EndPort,
    route: Route,
    dlid: Lid,
    slid: Lid,
    sl: u8,
    pkey: Pkey,
    resp_time: u8,
    retries: u8,
    dqpn: Option<Qpn>,
    sqpn: Option<Qpn>,
    qkey: Option<QKey>,
    life_time: Option<u8>,
    agent_id: Option<u32>,
    cache: PathCache,
}

impl<'a> IbPath<'a> {
    /// Build a LID-routed path over `port`.
    pub fn new(port: &'a dyn EndPort, cfg: LidPathCfg) -> Self {
        Self {
            port,
            route: Route::Lid { grh: cfg.grh },
            dlid: cfg.dlid,
            slid: cfg.slid,
            sl: cfg.sl,
            pkey: cfg.pkey,
            resp_time: cfg.resp_time,
            retries: cfg.retries,
            dqpn: cfg.dqpn,
            sqpn: cfg.sqpn,
            qkey: cfg.qkey,
            life_time: cfg.packet_life_time,
            agent_id: cfg.agent_id,
            cache: PathCache::default(),
        }
    }

    /// Build a directed-route path over `port`.
    pub fn new_dr(port: &'a dyn EndPort, cfg: DrPathCfg) -> Self {
        Self {
            port,
            route: Route::Dr {
                dr_slid: cfg.dr_slid,
                dr_dlid: cfg.dr_dlid,
                hops: cfg.hops,
            },
            dlid: cfg.dlid,
            slid: cfg.slid,
            sl: cfg.sl,
            pkey: cfg.pkey,
            resp_time: cfg.resp_time,
            retries: cfg.retries,
            dqpn: Some(cfg.dqpn),
            sqpn: Some(cfg.sqpn),
            qkey: Some(cfg.qkey),
            life_time: cfg.packet_life_time,
            agent_id: cfg.agent_id,
            cache: PathCache::default(),
        }
    }

    /// The end port this path was built against.
    pub fn end_port(&self) -> &'a dyn EndPort {
        self.port
    }

    pub fn dlid(&self) -> Lid {
        self.dlid
    }

    pub fn slid(&self) -> Lid {
        self.slid
    }

    pub fn sl(&self) -> u8 {
        self.sl
    }

    pub fn pkey(&self) -> Pkey {
        self.pkey
    }

    pub fn resp_time(&self) -> u8 {
        self.resp_time
    }

    pub fn retries(&self) -> u8 {
        self.retries
    }

    pub fn dqpn(&self) -> Option<Qpn> {
        self.dqpn
    }

    pub fn sqpn(&self) -> Option<Qpn> {
        self.sqpn
    }

    pub fn qkey(&self) -> Option<QKey> {
        self.qkey
    }

    pub fn agent_id(&self) -> Option<u32> {
        self.agent_id
    }

    /// The global route section, if this path carries one.
    pub fn grh(&self) -> Option<&Grh> {
        match &self.route {
            Route::Lid { grh } => grh.as_ref(),
            Route::Dr { .. } => None,
        }
    }

    /// Whether a global route header would be put on the wire.
    /// Structurally false for directed-route paths.
    pub fn has_grh(&self) -> bool {
        self.grh().is_some()
    }

    pub fn sgid(&self) -> Option<Gid> {
        self.grh().map(|grh| grh.sgid)
    }

    pub fn dgid(&self) -> Option<Gid> {
        self.grh().map(|grh| grh.dgid)
    }

    pub fn is_dr(&self) -> bool {
        matches!(self.route, Route::Dr { .. })
    }

    pub fn dr_slid(&self) -> Option<Lid> {
        match &self.route {
            Route::Dr { dr_slid, .. } => Some(*dr_slid),
            Route::Lid { .. } => None,
        }
    }

    pub fn dr_dlid(&self) -> Option<Lid> {
        match &self.route {
            Route::Dr { dr_dlid, .. } => Some(*dr_dlid),
            Route::Lid { .. } => None,
        }
    }

    /// The directed-route hop list, for a directed-route path.
    pub fn dr_hops(&self) -> Option<&[u8]> {
        match &self.route {
            Route::Dr { hops, .. } => Some(hops),
            Route::Lid { .. } => None,
        }
    }

    /// Set the remote end's response-time exponent.
    ///
    /// Does not refresh a cached `mad_timeout`; call
    /// [`IbPath::drop_cache`] afterwards to see the new bound.
    pub fn set_resp_time(&mut self, resp_time: u8) {
        self.resp_time = resp_time;
    }

    pub fn set_retries(&mut self, retries: u8) {
        self.retries = retries;
    }

    /// Attach the handle of the management agent consuming this path.
    pub fn set_agent_id(&mut self, agent_id: u32) {
        self.agent_id = Some(agent_id);
    }

    /// Forget every memoized derived value.
    ///
    /// The next read of each derived accessor recomputes from the
    /// current fields and tables. The packet lifetime override is
    /// caller intent, not a derived value, and survives.
    pub fn drop_cache(&mut self) {
        self.cache = PathCache::default();
    }

    /// Position of this path's SGID in the owning port's GID table.
    ///
    /// The lookup is memoized until [`IbPath::drop_cache`].
    pub fn sgid_index(&mut self) -> Result<usize> {
        match &self.route {
            Route::Dr { .. } => Err(PathError::SgidOnDrPath),
            Route::Lid { grh } => {
                if let Some(index) = self.cache.sgid_index {
                    return Ok(index);
                }

                let grh = grh.as_ref().ok_or(PathError::MissingGrh)?;
                let index = self
                    .port
                    .gid_index(grh.sgid)
                    .ok_or(PathError::GidNotFound(grh.sgid))?;
                self.cache.sgid_index = Some(index);
                Ok(index)
            }
        }
    }

    /// Point the SGID at entry `index` of the port's GID table.
    ///
    /// Seeds the memo with `index` directly, so a following
    /// [`IbPath::sgid_index`] answers without a table scan.
    pub fn set_sgid_index(&mut self, index: usize) -> Result<()> {
        let port = self.port;
        match &mut self.route {
            Route::Dr { .. } => Err(PathError::SgidOnDrPath),
            Route::Lid { grh } => {
                let sgid = port
                    .gid(index)
                    .ok_or(PathError::GidIndexOutOfRange(index))?;
                let grh = grh.as_mut().ok_or(PathError::MissingGrh)?;
                grh.sgid = sgid;
                self.cache.sgid_index = Some(index);
                Ok(())
            }
        }
    }

    /// Position of this path's PKey in the owning port's PKey table.
    ///
    /// The lookup is memoized until [`IbPath::drop_cache`].
    pub fn pkey_index(&mut self) -> Result<usize> {
        if let Some(index) = self.cache.pkey_index {
            return Ok(index);
        }

        let index = self
            .port
            .pkey_index(self.pkey)
            .ok_or(PathError::PkeyNotFound(self.pkey))?;
        self.cache.pkey_index = Some(index);
        Ok(index)
    }

    /// Take the PKey from entry `index` of the port's PKey table,
    /// seeding the memo with `index`.
    pub fn set_pkey_index(&mut self, index: usize) -> Result<()> {
        let pkey = self
            .port
            .pkey(index)
            .ok_or(PathError::PkeyIndexOutOfRange(index))?;
        self.pkey = pkey;
        self.cache.pkey_index = Some(index);
        Ok(())
    }

    /// The path-selection bits of the SLID: its low byte. Cheap, so
    /// never cached.
    pub fn slid_bits(&self) -> u8 {
        self.slid.path_bits()
    }

    /// Rebuild the SLID from the port's base LID plus `bits`.
    pub fn set_slid_bits(&mut self, bits: u8) {
        self.slid = self.port.lid().with_path_bits(bits);
    }

    /// The packet lifetime exponent: an explicit override if one was
    /// set, otherwise the port's subnet timeout, read live.
    pub fn packet_life_time(&self) -> u8 {
        match self.life_time {
            Some(life_time) => life_time,
            None => self.port.subnet_timeout(),
        }
    }

    /// Pin the packet lifetime exponent, e.g. from a PathRecord.
    ///
    /// The override is caller intent: [`IbPath::drop_cache`] leaves
    /// it in place. A cached `mad_timeout` built from the old value
    /// still stands until the next `drop_cache()`.
    pub fn set_packet_life_time(&mut self, life_time: u8) {
        self.life_time = Some(life_time);
    }

    /// Bound on one management datagram round trip: worst-case packet
    /// lifetime out and back plus the responder's advertised
    /// turnaround, 4.096 us * (2^(packet_life_time + 1) +
    /// 2^resp_time) (IBA 13.4.6.2).
    ///
    /// Memoized until [`IbPath::drop_cache`]; the inputs changing
    /// does not refresh an already cached value.
    pub fn mad_timeout(&mut self) -> Duration {
        if let Some(timeout) = self.cache.mad_timeout {
            return timeout;
        }

        let timeout = mad_round_trip(self.packet_life_time(), self.resp_time);
        self.cache.mad_timeout = Some(timeout);
        timeout
    }

    /// Turn this path, in place, into the same physical path walked
    /// the other way (IBA 13.5.4): destination and source LIDs and
    /// QPNs swap; a global route section swaps its GIDs and raises
    /// `hop_limit` to 0xFF, the reverse hop count being unknown until
    /// discovered. Directed-route identifiers and the hop list stay
    /// as they are.
    ///
    /// Every memoized value is dropped. Fails, touching nothing, if
    /// the QPNs were never filled in.
    pub fn reverse(&mut self) -> Result<()> {
        let dqpn = self.dqpn.ok_or(PathError::MissingQpn)?;
        let sqpn = self.sqpn.ok_or(PathError::MissingQpn)?;

        mem::swap(&mut self.dlid, &mut self.slid);
        self.dqpn = Some(sqpn);
        self.sqpn = Some(dqpn);

        if let Route::Lid { grh: Some(grh) } = &mut self.route {
            mem::swap(&mut grh.sgid, &mut grh.dgid);
            grh.hop_limit = 0xFF;
        }

        self.drop_cache();
        Ok(())
    }
}

impl fmt::Display for IbPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.route {
            Route::Lid { grh } => {
                write!(
                    f,
                    "IB path {} => {} sl {} {}",
                    self.slid, self.dlid, self.sl, self.pkey
                )?;
                if let Some(grh) = grh {
                    write!(f, " grh {} => {}", grh.sgid, grh.dgid)?;
                }
                Ok(())
            }
            Route::Dr { hops, .. } => {
                write!(f, "IB DR path {hops:?}")
            }
        }
    }
}

// The borrowed port carries no Debug bound; leave it out.
impl fmt::Debug for IbPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IbPath")
            .field("route", &self.route)
            .field("dlid", &self.dlid)
            .field("slid", &self.slid)
            .field("sl", &self.sl)
            .field("pkey", &self.pkey)
            .field("resp_time", &self.resp_time)
            .field("retries", &self.retries)
            .field("dqpn", &self.dqpn)
            .field("sqpn", &self.sqpn)
            .field("qkey", &self.qkey)
            .field("life_time", &self.life_time)
            .field("agent_id", &self.agent_id)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
