// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use fvm_shared::econ::TokenAmount;
use thiserror::Error;

/// State tree error.
#[derive(Debug, Error)]
pub enum Error {
    /// Sequence numbers are only defined for account and empty actors;
    /// asking for one on any other code class is a protocol error and is
    /// never retried.
    #[error("next sequence is only defined for account or empty actors")]
    UnsupportedActorKind,

    /// A balance mutation would have taken the balance below zero.
    #[error("not enough funds: balance {balance}, required {required}")]
    InsufficientFunds {
        balance: TokenAmount,
        required: TokenAmount,
    },

    /// The canonical encoding of a record failed. This indicates upstream
    /// corruption and is always fatal.
    #[error("failed to serialize actor state: {0}")]
    Serialization(#[from] fvm_ipld_encoding::Error),

    /// Error originating from the underlying actor trie.
    #[error(transparent)]
    Hamt(#[from] fvm_ipld_hamt::Error),
}
