// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Node-side storage market client: verification of published deals, funds
//! assurance and provider discovery over primitive chain data.

mod client;
mod errors;

pub use client::StorageMarketClient;
pub use errors::Error;

use crate::actors::market::{DealProposal, DealState};
use cid::Cid;
use fvm_shared::address::Address;
use fvm_shared::deal::DealID;
use fvm_shared::econ::TokenAmount;
use fvm_shared::sector::SectorSize;

/// A deal tracked by the local client, together with a reference to the
/// chain message that allegedly published it.
///
/// Both fields are claims until [`StorageMarketClient::validate_published_deal`]
/// has reconstructed the publication from chain data.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientDeal {
    pub proposal: DealProposal,
    pub publish_message: Cid,
}

/// Read-only snapshot of one storage provider, assembled during a registry
/// walk. Built fresh on every walk and never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageProviderInfo {
    pub address: Address,
    pub owner: Address,
    pub worker: Address,
    pub sector_size: SectorSize,
    pub peer_id: Vec<u8>,
}

/// A published deal paired with its on-chain activation state.
#[derive(Clone, Debug, PartialEq)]
pub struct StorageDeal {
    pub deal_id: DealID,
    pub proposal: DealProposal,
    pub state: DealState,
}

/// Escrow funds held for an address in the storage market actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarketBalance {
    pub escrow: TokenAmount,
    pub locked: TokenAmount,
}

impl MarketBalance {
    /// Funds not currently locked under an active agreement.
    pub fn available(&self) -> TokenAmount {
        &self.escrow - &self.locked
    }
}

/// Returns the amount missing from `available` to cover `required`, if any.
///
/// `available >= required` is sufficient; an exactly-funded address is left
/// untouched.
pub(crate) fn shortfall(
    available: &TokenAmount,
    required: &TokenAmount,
) -> Option<TokenAmount> {
    if available >= required {
        None
    } else {
        Some(required - available)
    }
}
