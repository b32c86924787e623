// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2025 Oxide Computer Company

use crate::gid::Gid;
use serde::Deserialize;
use serde::Serialize;

/// The global route section of a path.
///
/// Only paths that cross a router carry one; traffic that stays
/// inside the subnet is addressed by LID alone (IBA 8.3). The GIDs
/// follow the same orientation as the rest of a path description:
/// `sgid` is the sender, `dgid` the remote end.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Grh {
    /// GID of the sending port.
    pub sgid: Gid,

    /// GID of the destination port.
    pub dgid: Gid,

    /// Router hops the packet may still take. A sender that does not
    /// know the real distance uses the maximum, 0xFF.
    pub hop_limit: u8,

    /// Traffic class carried end to end.
    pub traffic_class: u8,

    /// Flow label; 20 bits on the wire.
    pub flow_label: u32,
}
