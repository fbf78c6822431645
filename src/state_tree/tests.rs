// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::*;
use crate::actors::{ACCOUNT_ACTOR_CODE_ID, MINER_ACTOR_CODE_ID};
use fvm_ipld_blockstore::MemoryBlockstore;
use fvm_ipld_encoding::{from_slice, to_vec};
use quickcheck_macros::quickcheck;

fn account_actor(sequence: u64, balance: u64) -> ActorState {
    ActorState {
        code: Some(*ACCOUNT_ACTOR_CODE_ID),
        state: None,
        sequence,
        balance: TokenAmount::from_atto(balance),
    }
}

#[test]
fn untouched_actor_expects_sequence_zero() {
    assert_eq!(next_sequence(None).unwrap(), 0);
}

#[test]
fn account_and_empty_actors_expose_their_sequence() {
    let account = account_actor(42, 0);
    assert_eq!(next_sequence(Some(&account)).unwrap(), 42);

    let empty = ActorState::new(None, TokenAmount::from_atto(10));
    assert_eq!(next_sequence(Some(&empty)).unwrap(), 0);
}

#[test]
fn sequence_increments_by_exactly_one() {
    let mut actor = account_actor(7, 0);
    actor.inc_sequence();
    assert_eq!(next_sequence(Some(&actor)).unwrap(), 8);
    actor.inc_sequence();
    assert_eq!(next_sequence(Some(&actor)).unwrap(), 9);
}

#[test]
fn non_account_contract_has_no_sequence() {
    let miner = ActorState {
        code: Some(*MINER_ACTOR_CODE_ID),
        state: None,
        sequence: 3,
        balance: TokenAmount::from_atto(100),
    };
    assert!(matches!(
        next_sequence(Some(&miner)),
        Err(Error::UnsupportedActorKind)
    ));
}

#[test]
fn emptiness_ignores_balance_and_sequence() {
    let mut actor = ActorState::new(None, TokenAmount::from_atto(1_000_000));
    actor.inc_sequence();
    assert!(actor.is_empty());

    let initialized = account_actor(0, 0);
    assert!(!initialized.is_empty());
}

#[test]
fn withdraw_never_goes_negative() {
    let mut actor = ActorState::new(None, TokenAmount::from_atto(10));
    actor.withdraw_funds(&TokenAmount::from_atto(4)).unwrap();
    assert_eq!(actor.balance, TokenAmount::from_atto(6));

    let err = actor.withdraw_funds(&TokenAmount::from_atto(7)).unwrap_err();
    assert!(matches!(err, Error::InsufficientFunds { .. }));
    // the failed withdrawal must leave the balance untouched
    assert_eq!(actor.balance, TokenAmount::from_atto(6));

    actor.deposit_funds(&TokenAmount::from_atto(1));
    actor.withdraw_funds(&TokenAmount::from_atto(7)).unwrap();
    assert_eq!(actor.balance, TokenAmount::from_atto(0));
}

#[quickcheck]
fn actor_record_round_trips(has_code: bool, has_state: bool, sequence: u64, balance: u64) {
    use crate::utils::cid::CidCborExt;
    let actor = ActorState {
        code: has_code.then_some(*ACCOUNT_ACTOR_CODE_ID),
        state: has_state.then(|| Cid::from_cbor_blake2b256(&sequence).unwrap()),
        sequence,
        balance: TokenAmount::from_atto(balance),
    };
    let decoded: ActorState = from_slice(&to_vec(&actor).unwrap()).unwrap();
    assert_eq!(decoded, actor);
    assert_eq!(decoded.cid().unwrap(), actor.cid().unwrap());
}

#[test]
fn canonical_cid_tracks_every_field() {
    let actor = account_actor(1, 10);
    let mut changed = actor.clone();
    changed.inc_sequence();
    assert_ne!(actor.cid().unwrap(), changed.cid().unwrap());

    let mut funded = actor.clone();
    funded.deposit_funds(&TokenAmount::from_atto(1));
    assert_ne!(actor.cid().unwrap(), funded.cid().unwrap());
}

#[test]
fn state_tree_round_trips_actor_records() {
    let store = MemoryBlockstore::default();
    let addr = Address::new_id(1234);

    let mut tree = StateTree::new(&store);
    assert_eq!(tree.get_actor(&addr).unwrap(), None);

    let actor = account_actor(5, 500);
    tree.set_actor(&addr, actor.clone()).unwrap();
    let root = tree.flush().unwrap();

    let reloaded = StateTree::new_from_root(&store, &root).unwrap();
    assert_eq!(reloaded.get_actor(&addr).unwrap(), Some(actor));
}
