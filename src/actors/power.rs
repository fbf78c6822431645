// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::HAMT_BIT_WIDTH;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::tuple::*;
use fvm_ipld_hamt::Hamt;
use fvm_shared::address::Address;
use fvm_shared::bigint::bigint_ser;
use fvm_shared::sector::StoragePower;

/// Storage power actor state: the network-wide power accounting plus the
/// per-miner claims registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct State {
    #[serde(with = "bigint_ser")]
    pub total_raw_byte_power: StoragePower,
    #[serde(with = "bigint_ser")]
    pub total_quality_adj_power: StoragePower,

    pub miner_count: i64,

    /// Claimed power for each miner. HAMT[address]Claim
    pub claims: Cid,
}

/// Power claimed by one miner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct Claim {
    /// Sum of raw byte power for a miner's sectors.
    #[serde(with = "bigint_ser")]
    pub raw_byte_power: StoragePower,
    /// Sum of quality adjusted power for a miner's sectors.
    #[serde(with = "bigint_ser")]
    pub quality_adj_power: StoragePower,
}

impl State {
    /// Walks the claims registry in trie key order, handing each entry to
    /// `f` as a parsed miner address and its claim.
    ///
    /// A claim key that does not parse as an address means the registry is
    /// corrupt; the walk aborts on the spot and the error propagates. The
    /// callback aborting has the same effect. Key order is deterministic but
    /// carries no meaning beyond determinism.
    pub fn for_each_claim<BS, F>(&self, store: &BS, mut f: F) -> anyhow::Result<()>
    where
        BS: Blockstore,
        F: FnMut(Address, &Claim) -> anyhow::Result<()>,
    {
        let claims: Hamt<&BS, Claim> =
            Hamt::load_with_bit_width(&self.claims, store, HAMT_BIT_WIDTH)?;
        claims.for_each(|key, claim| {
            let address = Address::from_bytes(&key.0)?;
            f(address, claim)
        })?;
        Ok(())
    }
}
