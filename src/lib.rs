// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Ledger-level actor state and storage-market verification for a Filecoin
//! node.
//!
//! This crate holds the state primitives a node needs to account for on-chain
//! actors (balances, replay-protection sequence numbers, code and state
//! references) together with the trust-minimized client-side protocol that
//! checks a storage deal was really published on chain: locate the publish
//! message, authenticate its sender against the provider's worker key, match
//! the proposal bit-for-bit against the decoded parameters and read the
//! assigned deal id out of the receipt.
//!
//! Chain access (message search, state reads at a tipset, outbound message
//! submission, signing) is abstracted behind the traits in [`chain`]; the
//! caller wires in its own chain store and message pool.

pub mod actors;
pub mod blocks;
pub mod chain;
pub mod markets;
pub mod message;
pub mod state_tree;
pub mod utils;
