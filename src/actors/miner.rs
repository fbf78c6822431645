// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use fvm_ipld_encoding::strict_bytes;
use fvm_ipld_encoding::tuple::*;
use fvm_shared::address::Address;
use fvm_shared::sector::SectorSize;

/// Storage miner actor state, reduced to the static information this crate
/// consumes. The operational parts of the state (deadlines, sectors, vesting
/// funds) are owned by the miner actor itself and never read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct State {
    pub info: MinerInfo,
}

/// Static configuration of a storage miner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct MinerInfo {
    /// Account that owns this miner.
    /// - Income and returned collateral are paid to this address.
    /// - This address is also allowed to change the worker address for the miner.
    pub owner: Address,

    /// Worker account for this miner. This key signs blocks and the
    /// operational messages the miner sends on chain, including deal
    /// publication.
    pub worker: Address,

    /// Libp2p identity that should be used when connecting to this miner.
    #[serde(with = "strict_bytes")]
    pub peer_id: Vec<u8>,

    /// Amount of space in each sector committed to the network by this miner.
    pub sector_size: SectorSize,
}
