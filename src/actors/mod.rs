// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Builtin actor ABI: singleton addresses, code identifiers and the state
//! schemas this crate reads off chain.

pub mod account;
pub mod market;
pub mod miner;
pub mod power;

use cid::Cid;
use fvm_ipld_encoding::IPLD_RAW;
use fvm_shared::address::Address;
use fvm_shared::ActorID;
use lazy_static::lazy_static;
use multihash::Multihash;

/// Bit width used for all address-keyed actor tries.
pub const HAMT_BIT_WIDTH: u32 = 5;

pub const SYSTEM_ACTOR_ADDR: Address = Address::new_id(0);
pub const INIT_ACTOR_ADDR: Address = Address::new_id(1);
pub const STORAGE_POWER_ACTOR_ADDR: Address = Address::new_id(4);
pub const STORAGE_MARKET_ACTOR_ADDR: Address = Address::new_id(5);
pub const BURNT_FUNDS_ACTOR_ADDR: Address = Address::new_id(99);

/// Defines first available ID address after builtin actors
pub const FIRST_NON_SINGLETON_ADDR: ActorID = 100;

lazy_static! {
    pub static ref ACCOUNT_ACTOR_CODE_ID: Cid = make_builtin(b"fil/account");
    pub static ref MINER_ACTOR_CODE_ID: Cid = make_builtin(b"fil/storageminer");
    pub static ref POWER_ACTOR_CODE_ID: Cid = make_builtin(b"fil/storagepower");
    pub static ref MARKET_ACTOR_CODE_ID: Cid = make_builtin(b"fil/storagemarket");
}

/// Returns an identity CID naming a builtin actor implementation.
fn make_builtin(bz: &[u8]) -> Cid {
    Cid::new_v1(IPLD_RAW, Multihash::wrap(0, bz).expect("name too long"))
}

/// Tests whether a code CID identifies the canonical account actor.
pub fn is_account_actor(code: &Cid) -> bool {
    code == &*ACCOUNT_ACTOR_CODE_ID
}
