// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use fvm_ipld_encoding::{from_slice, to_vec, Error as EncodingError};
use serde::{Deserialize, Serialize};

/// A set of CIDs forming a unique key for a tipset.
///
/// Equal keys will have equivalent iteration order. The CIDs are maintained
/// in the order they were inserted, which is expected to match the canonical
/// block ordering of the tipset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TipsetKey(Vec<Cid>);

impl TipsetKey {
    pub fn new(cids: Vec<Cid>) -> Self {
        Self(cids)
    }

    /// Block CIDs this key is composed of.
    pub fn cids(&self) -> &[Cid] {
        &self.0
    }
}

impl std::fmt::Display for TipsetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .0
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{{{s}}}")
    }
}

/// Opaque reference to a fixed point in chain history, used for consistent
/// reads against historical state.
///
/// The token is the canonical CBOR encoding of a [`TipsetKey`]. Holders treat
/// it as a black box; only code that actually resolves chain state decodes it
/// back into a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TipsetToken(Vec<u8>);

impl TipsetToken {
    pub fn new(key: &TipsetKey) -> Result<Self, EncodingError> {
        Ok(Self(to_vec(key)?))
    }

    /// Decodes the token back into the tipset key it was built from.
    pub fn key(&self) -> Result<TipsetKey, EncodingError> {
        from_slice(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
