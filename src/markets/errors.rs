// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use fvm_shared::address::Address;
use fvm_shared::MethodNum;
use thiserror::Error;

/// Storage market error.
///
/// Verification failures are distinguished by cause, not call site: each
/// variant carries a different retry policy for the caller, so they are
/// surfaced verbatim and never coalesced into a boolean.
#[derive(Debug, Error)]
pub enum Error {
    /// No chain message matches the claimed publish message. The claim is
    /// unsubstantiated for now; it may become visible after further sync.
    #[error("could not find published deal message {0}")]
    PublishedDealNotFound(Cid),

    /// The publish message was sent by a key other than the provider's
    /// worker. Content equality does not matter; the wrong signer cannot
    /// represent the provider's intent.
    #[error("deal was not published by the provider worker: from={from}, worker={worker}")]
    UnauthorizedPublisher { from: Address, worker: Address },

    /// The publish message was addressed to the wrong actor or invoked the
    /// wrong method; it is not evidence of publication.
    #[error("deal publish message has the wrong target: to={to}, method={method}")]
    WrongMessageTarget { to: Address, method: MethodNum },

    /// The published parameters contain no proposal equal to the one under
    /// verification. Matching is exact over every field.
    #[error("published deals do not match the proposal under verification")]
    ProposalMismatch,

    /// The publish message executed but its receipt cannot be read. Distinct
    /// from not-found: publication itself is no longer in doubt, the outcome
    /// is. Fatal for these inputs.
    #[error("failed to decode publish receipt: {0}")]
    ReceiptDecode(String),

    /// Declared capability gap.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// Error originating from state
    #[error("{0}")]
    State(String),

    /// Any other error that does not need to be handled by kind
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
