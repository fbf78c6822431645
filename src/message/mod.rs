// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod signed_message;

pub use signed_message::SignedMessage;

use fvm_ipld_encoding::{de::Deserializer, ser::Serializer, RawBytes};
use fvm_shared::address::Address;
use fvm_shared::econ::TokenAmount;
pub use fvm_shared::{MethodNum, METHOD_SEND};
use serde::{Deserialize, Serialize};

/// An unsigned chain message.
///
/// Messages are processed in strict, contiguous `sequence` order per sender;
/// the sequence number doubles as replay protection.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Message {
    pub version: u64,
    pub from: Address,
    pub to: Address,
    pub sequence: u64,
    pub value: TokenAmount,
    pub method_num: MethodNum,
    pub params: RawBytes,
    pub gas_limit: u64,
    pub gas_fee_cap: TokenAmount,
    pub gas_premium: TokenAmount,
}

impl Message {
    /// Creates a new message transferring `value` from `from` to `to` with no
    /// method invocation.
    pub fn transfer(from: Address, to: Address, value: TokenAmount) -> Self {
        Message {
            from,
            to,
            value,
            method_num: METHOD_SEND,
            ..Default::default()
        }
    }

    /// Canonical content identifier of the message.
    pub fn cid(&self) -> cid::Cid {
        use crate::utils::cid::CidCborExt;
        cid::Cid::from_cbor_blake2b256(self).expect("message serialization is infallible")
    }

    /// Tests if a message is equivalent to another replacing message.
    /// A replacing message is a message with a different CID,
    /// any of Gas values, and different signature, but with all
    /// other parameters matching (source/destination, nonce, parameters, etc.)
    pub fn equal_call(&self, other: &Self) -> bool {
        self.version == other.version
            && self.from == other.from
            && self.to == other.to
            && self.sequence == other.sequence
            && self.value == other.value
            && self.method_num == other.method_num
            && self.params == other.params
    }
}

impl Serialize for Message {
    fn serialize<S>(&self, s: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (
            &self.version,
            &self.to,
            &self.from,
            &self.sequence,
            &self.value,
            &self.gas_limit,
            &self.gas_fee_cap,
            &self.gas_premium,
            &self.method_num,
            &self.params,
        )
            .serialize(s)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (
            version,
            to,
            from,
            sequence,
            value,
            gas_limit,
            gas_fee_cap,
            gas_premium,
            method_num,
            params,
        ) = Deserialize::deserialize(deserializer)?;
        Ok(Self {
            version,
            from,
            to,
            sequence,
            value,
            method_num,
            params,
            gas_limit,
            gas_fee_cap,
            gas_premium,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fvm_ipld_encoding::{from_slice, to_vec};
    use num_traits::Zero;

    #[test]
    fn transfer_message_sends_value_only() {
        let msg = Message::transfer(
            Address::new_id(1),
            Address::new_id(2),
            TokenAmount::from_atto(42),
        );
        assert_eq!(msg.method_num, METHOD_SEND);
        assert!(msg.params.is_empty());
        assert!(msg.gas_fee_cap.is_zero());
    }

    #[test]
    fn message_round_trips_and_keeps_its_cid() {
        let msg = Message {
            from: Address::new_id(10),
            to: Address::new_id(11),
            sequence: 3,
            value: TokenAmount::from_atto(1_000),
            method_num: 4,
            params: RawBytes::new(vec![1, 2, 3]),
            ..Default::default()
        };
        let decoded: Message = from_slice(&to_vec(&msg).unwrap()).unwrap();
        assert_eq!(decoded, msg);
        assert_eq!(decoded.cid(), msg.cid());
    }

    #[test]
    fn replacing_message_is_an_equal_call() {
        let msg = Message::transfer(
            Address::new_id(1),
            Address::new_id(2),
            TokenAmount::from_atto(7),
        );
        let mut replacing = msg.clone();
        replacing.gas_limit = 123_456;
        assert!(msg.equal_call(&replacing));
        assert_ne!(msg.cid(), replacing.cid());
    }
}
