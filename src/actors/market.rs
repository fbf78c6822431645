// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::tuple::*;
use fvm_ipld_hamt::{BytesKey, Hamt};
use fvm_shared::address::Address;
use fvm_shared::clock::ChainEpoch;
use fvm_shared::crypto::signature::Signature;
use fvm_shared::deal::DealID;
use fvm_shared::econ::TokenAmount;
use fvm_shared::piece::PaddedPieceSize;
use fvm_shared::METHOD_CONSTRUCTOR;
use num_derive::FromPrimitive;
use num_traits::Zero;

/// Bit width of the escrow and locked balance tables.
pub const BALANCE_TABLE_BITWIDTH: u32 = 6;

/// Storage market actor methods available
#[derive(FromPrimitive)]
#[repr(u64)]
pub enum Method {
    Constructor = METHOD_CONSTRUCTOR,
    AddBalance = 2,
    WithdrawBalance = 3,
    PublishStorageDeals = 4,
    VerifyDealsForActivation = 5,
    ActivateDeals = 6,
    OnMinerSectorsTerminate = 7,
    ComputeDataCommitment = 8,
    CronTick = 9,
}

/// Storage market actor state, reduced to the tables this crate reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct State {
    /// Deals that have been proposed and not yet cleaned up after expiry or
    /// termination. AMT[DealID]DealProposal
    pub proposals: Cid,

    /// State for deals that have been activated and not yet cleaned up.
    /// Exists only for a subset of `proposals`. AMT[DealID]DealState
    pub states: Cid,

    /// Total amount held in escrow, indexed by actor address (including both
    /// locked and unlocked amounts). HAMT[address]TokenAmount
    pub escrow_table: Cid,

    /// Amount locked, indexed by actor address. Only ever a portion of the
    /// total escrow amount. HAMT[address]TokenAmount
    pub locked_table: Cid,

    /// Deal id state sequential incrementer
    pub next_id: DealID,
}

impl State {
    pub fn escrow_table<'bs, BS: Blockstore>(
        &self,
        store: &'bs BS,
    ) -> Result<BalanceTable<'bs, BS>, fvm_ipld_hamt::Error> {
        BalanceTable::from_root(store, &self.escrow_table)
    }

    pub fn locked_table<'bs, BS: Blockstore>(
        &self,
        store: &'bs BS,
    ) -> Result<BalanceTable<'bs, BS>, fvm_ipld_hamt::Error> {
        BalanceTable::from_root(store, &self.locked_table)
    }
}

/// Balance table which handles getting and updating token balances
/// specifically
pub struct BalanceTable<'bs, BS>(Hamt<&'bs BS, TokenAmount>);

impl<'bs, BS> BalanceTable<'bs, BS>
where
    BS: Blockstore,
{
    /// Initializes a new empty balance table
    pub fn new(store: &'bs BS) -> Self {
        Self(Hamt::new_with_bit_width(store, BALANCE_TABLE_BITWIDTH))
    }

    /// Initializes a balance table from a root Cid
    pub fn from_root(store: &'bs BS, root: &Cid) -> Result<Self, fvm_ipld_hamt::Error> {
        Ok(Self(Hamt::load_with_bit_width(
            root,
            store,
            BALANCE_TABLE_BITWIDTH,
        )?))
    }

    /// Retrieve root from balance table
    pub fn root(&mut self) -> Result<Cid, fvm_ipld_hamt::Error> {
        self.0.flush()
    }

    /// Gets token amount for given address in balance table. An address with
    /// no entry holds a zero balance.
    pub fn get(&self, key: &Address) -> Result<TokenAmount, fvm_ipld_hamt::Error> {
        Ok(self
            .0
            .get(&BytesKey(key.to_bytes()))?
            .cloned()
            .unwrap_or_else(TokenAmount::zero))
    }

    /// Adds token amount to the balance recorded for an address.
    pub fn add(&mut self, key: &Address, value: &TokenAmount) -> Result<(), fvm_ipld_hamt::Error> {
        let prev = self.get(key)?;
        self.0.set(key.to_bytes().into(), &prev + value)?;
        Ok(())
    }
}

/// A proposal for a storage deal: the exact terms the client and provider are
/// bound to. Equality is structural over every field; two proposals differing
/// in any term are different deals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct DealProposal {
    pub piece_cid: Cid,
    pub piece_size: PaddedPieceSize,
    pub client: Address,
    pub provider: Address,

    pub start_epoch: ChainEpoch,
    pub end_epoch: ChainEpoch,
    pub storage_price_per_epoch: TokenAmount,

    pub provider_collateral: TokenAmount,
    pub client_collateral: TokenAmount,
}

impl DealProposal {
    pub fn duration(&self) -> ChainEpoch {
        self.end_epoch - self.start_epoch
    }

    pub fn total_storage_fee(&self) -> TokenAmount {
        TokenAmount::from_atto(self.storage_price_per_epoch.atto() * self.duration())
    }

    pub fn client_balance_requirement(&self) -> TokenAmount {
        self.client_collateral.clone() + self.total_storage_fee()
    }

    pub fn provider_balance_requirement(&self) -> &TokenAmount {
        &self.provider_collateral
    }
}

/// ClientDealProposal is a DealProposal signed by a client
#[derive(Clone, Debug, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct ClientDealProposal {
    pub proposal: DealProposal,
    pub client_signature: Signature,
}

/// On-chain state of an activated deal. Epochs are undefined (-1) until the
/// corresponding event has happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct DealState {
    pub sector_start_epoch: ChainEpoch,
    pub last_updated_epoch: ChainEpoch,
    pub slash_epoch: ChainEpoch,
}

impl Default for DealState {
    fn default() -> Self {
        use fvm_shared::clock::EPOCH_UNDEFINED;
        Self {
            sector_start_epoch: EPOCH_UNDEFINED,
            last_updated_epoch: EPOCH_UNDEFINED,
            slash_epoch: EPOCH_UNDEFINED,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct PublishStorageDealsParams {
    pub deals: Vec<ClientDealProposal>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct PublishStorageDealsReturn {
    /// Deal ids assigned by the market actor, positionally matching the
    /// proposals in the publish parameters.
    pub ids: Vec<DealID>,
}
