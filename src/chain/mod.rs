// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Contracts for the chain collaborators this crate consumes.
//!
//! The ledger and market logic never touch a chain store directly; a node
//! embedding this crate implements these traits over its own stores and
//! message pool. All reads are against a fixed tipset and must either return
//! promptly or fail; nothing here blocks indefinitely and no locks are held
//! across calls.

use crate::blocks::TipsetKey;
use crate::message::SignedMessage;
use async_trait::async_trait;
use cid::Cid;
use fvm_ipld_encoding::RawBytes;
use fvm_shared::address::Address;
use fvm_shared::clock::ChainEpoch;
use fvm_shared::crypto::signature::Signature;
use fvm_shared::econ::TokenAmount;
use fvm_shared::receipt::Receipt;
use fvm_shared::MethodNum;
use serde::de::DeserializeOwned;

/// A historical message located in the chain, paired with the receipt of its
/// execution.
///
/// Finding a message proves nothing by itself: consumers re-validate sender,
/// recipient and method before trusting it.
#[derive(Clone, Debug)]
pub struct MessageLookup {
    pub message: SignedMessage,
    pub receipt: Receipt,
}

/// Predicate over a candidate message and its canonical CID.
pub type MessagePredicate = dyn Fn(&SignedMessage, &Cid) -> bool + Send + Sync;

/// Searches historical chain messages.
#[async_trait]
pub trait MessageIndex: Send + Sync {
    /// Returns the first message matching `predicate` together with its
    /// execution receipt, or `None` if no message matches.
    async fn find(&self, predicate: &MessagePredicate) -> anyhow::Result<Option<MessageLookup>>;
}

/// Read-only access to actor state at a fixed point in chain history.
pub trait ChainReader {
    /// Returns the decoded state of the actor at `addr`, as of the tipset
    /// `key` identifies. The state schema is chosen by the caller.
    fn get_actor_state_at<S: DeserializeOwned>(
        &self,
        key: &TipsetKey,
        addr: &Address,
    ) -> anyhow::Result<S>;

    /// The current heaviest tipset and its epoch.
    fn chain_head(&self) -> anyhow::Result<(TipsetKey, ChainEpoch)>;
}

/// Submits messages for signing and broadcast.
#[async_trait]
pub trait Outbox: Send + Sync {
    /// Queues a message and returns its CID. Retry policy lives behind this
    /// trait, not in front of it.
    async fn send(
        &self,
        from: &Address,
        to: &Address,
        value: TokenAmount,
        method: MethodNum,
        params: RawBytes,
    ) -> anyhow::Result<Cid>;
}

/// Signs raw bytes with the key held for an address.
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign_bytes(&self, addr: &Address, data: &[u8]) -> anyhow::Result<Signature>;
}
