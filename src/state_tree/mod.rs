// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Ledger records for on-chain actors and the trie that stores them.

mod errors;
#[cfg(test)]
mod tests;

pub use errors::Error;

use crate::actors::{is_account_actor, HAMT_BIT_WIDTH};
use crate::utils::cid::CidCborExt;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::tuple::*;
use fvm_ipld_hamt::{BytesKey, Hamt};
use fvm_shared::address::Address;
use fvm_shared::econ::TokenAmount;

/// The persisted record of a single on-chain actor.
///
/// Both individual accounts and contracts are represented as actors. At the
/// ledger level an actor is nothing more than a balance, a replay-protection
/// sequence counter and optional references to executable code and private
/// state. Value sent to a previously unknown address materializes an *empty*
/// actor: a balance with no code and no state. Code references must therefore
/// be checked for presence before being compared against a known code CID.
///
/// Encodes as a fixed 4-tuple `(code, state, sequence, balance)`; absent
/// references encode as CBOR null so the arity never varies.
///
/// Not safe for concurrent access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct ActorState {
    /// Reference to the code of this actor's implementation. `None` for an
    /// uninitialized actor that exists only because it has received value.
    pub code: Option<Cid>,
    /// Reference to the root of the actor's state tree. `None` until the
    /// actor is initialized.
    pub state: Option<Cid>,
    /// Sequence number expected on the next message from this actor.
    /// Messages are processed in strict, contiguous sequence order.
    pub sequence: u64,
    /// Token balance held by the actor. Never negative.
    pub balance: TokenAmount,
}

impl ActorState {
    /// Constructs a new actor with a zero sequence number and no state root.
    pub fn new(code: Option<Cid>, balance: TokenAmount) -> Self {
        Self {
            code,
            state: None,
            sequence: 0,
            balance,
        }
    }

    /// Tests whether the actor's code is defined.
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
    }

    /// Increments the sequence number by 1. The caller has already validated
    /// acceptance of the message this accounts for.
    pub fn inc_sequence(&mut self) {
        self.sequence += 1;
    }

    /// Adds `amount` to the actor's balance.
    pub fn deposit_funds(&mut self, amount: &TokenAmount) {
        self.balance = &self.balance + amount;
    }

    /// Removes exactly `amount` from the actor's balance, failing if that
    /// would take the balance below zero.
    pub fn withdraw_funds(&mut self, amount: &TokenAmount) -> Result<(), Error> {
        if &self.balance < amount {
            return Err(Error::InsufficientFunds {
                balance: self.balance.clone(),
                required: amount.clone(),
            });
        }
        self.balance = &self.balance - amount;
        Ok(())
    }

    /// Returns the canonical CID for the actor record, derived from its full
    /// serialized state.
    ///
    /// A serialization failure here means the in-memory record is corrupt and
    /// must propagate to the caller.
    pub fn cid(&self) -> Result<Cid, Error> {
        Ok(Cid::from_cbor_blake2b256(self)?)
    }
}

/// Returns the sequence number expected on the next message from an actor.
///
/// An actor that has never been touched (`None`) expects 0. Sequence
/// semantics are only defined for account and empty actors; requesting the
/// next sequence of any other code class is a protocol error.
pub fn next_sequence(actor: Option<&ActorState>) -> Result<u64, Error> {
    let Some(actor) = actor else {
        return Ok(0);
    };
    match &actor.code {
        None => Ok(actor.sequence),
        Some(code) if is_account_actor(code) => Ok(actor.sequence),
        Some(_) => Err(Error::UnsupportedActorKind),
    }
}

/// Address-keyed trie of [`ActorState`] records.
///
/// The tree is the single owner of the records it holds: mutation goes
/// through `&mut self`, so a caller can hold either one mutable handle or any
/// number of read-only snapshots, never both. Should only be used in sync
/// contexts.
pub struct StateTree<BS> {
    hamt: Hamt<BS, ActorState>,
}

impl<BS> StateTree<BS>
where
    BS: Blockstore,
{
    /// Initializes a new, empty state tree.
    pub fn new(store: BS) -> Self {
        Self {
            hamt: Hamt::new_with_bit_width(store, HAMT_BIT_WIDTH),
        }
    }

    /// Loads a state tree from a previously flushed root.
    pub fn new_from_root(store: BS, root: &Cid) -> Result<Self, Error> {
        Ok(Self {
            hamt: Hamt::load_with_bit_width(root, store, HAMT_BIT_WIDTH)?,
        })
    }

    /// Returns the actor record for `addr`, or `None` if the address has
    /// never been touched.
    pub fn get_actor(&self, addr: &Address) -> Result<Option<ActorState>, Error> {
        Ok(self.hamt.get(&BytesKey(addr.to_bytes()))?.cloned())
    }

    /// Writes the actor record for `addr`.
    pub fn set_actor(&mut self, addr: &Address, actor: ActorState) -> Result<(), Error> {
        self.hamt.set(addr.to_bytes().into(), actor)?;
        Ok(())
    }

    /// Flushes pending writes and returns the new root.
    pub fn flush(&mut self) -> Result<Cid, Error> {
        Ok(self.hamt.flush()?)
    }
}
