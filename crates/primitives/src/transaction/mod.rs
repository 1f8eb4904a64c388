//! Safe transaction types
//!
//! A [MetaTransaction] is what the user wants to happen. The [SafeTransactionData] wraps it
//! with the execution parameters of `Safe.execTransaction` and is the unit that owners sign.

mod request;

use crate::{relay::RelayFee, utils::as_checksum_addr};
use ethers::types::{Address, Bytes, Signature, H256, U256};
pub use request::MetaTransactionRequest;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Operation kind of a Safe transaction
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumString,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab_case")]
#[serde(into = "u8", try_from = "u8")]
pub enum OperationType {
    /// Plain call from the Safe
    #[default]
    Call = 0,
    /// Delegate call, the target code runs in the Safe's context
    DelegateCall = 1,
}

impl From<OperationType> for u8 {
    fn from(value: OperationType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for OperationType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Call),
            1 => Ok(Self::DelegateCall),
            other => Err(format!("unknown operation type {other}")),
        }
    }
}

/// Transaction intent executed by the Safe
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTransaction {
    /// Target of the call
    #[serde(serialize_with = "as_checksum_addr")]
    pub to: Address,
    /// Native value sent along
    pub value: U256,
    /// Call data
    pub data: Bytes,
    /// Call or delegate call
    pub operation: OperationType,
}

impl MetaTransaction {
    /// Plain call without value
    pub fn call(to: Address, data: Bytes) -> Self {
        Self { to, value: U256::zero(), data, operation: OperationType::Call }
    }
}

/// Unsigned Safe transaction, the `SafeTx` message of the EIP-712 schema
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTransactionData {
    #[serde(serialize_with = "as_checksum_addr")]
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: OperationType,
    /// Gas forwarded to the inner call, 0 means all available gas
    pub safe_tx_gas: U256,
    /// Gas independent of the inner call that is refunded (0 when sponsored)
    pub base_gas: U256,
    /// Refund gas price (0 when sponsored)
    pub gas_price: U256,
    /// Refund token, zero address is the native token
    #[serde(serialize_with = "as_checksum_addr")]
    pub gas_token: Address,
    /// Refund receiver, zero address refunds `tx.origin`
    #[serde(serialize_with = "as_checksum_addr")]
    pub refund_receiver: Address,
    /// Replay protection counter of the Safe
    pub nonce: U256,
}

impl SafeTransactionData {
    /// Sponsored transaction, no refund is paid by the Safe
    pub fn sponsored(tx: MetaTransaction, nonce: U256) -> Self {
        Self {
            to: tx.to,
            value: tx.value,
            data: tx.data,
            operation: tx.operation,
            nonce,
            ..Default::default()
        }
    }

    /// Transaction that refunds the relay `fee` with a gas price of 1
    pub fn refunding(tx: MetaTransaction, nonce: U256, fee: &RelayFee) -> Self {
        Self {
            base_gas: fee.amount,
            gas_price: U256::one(),
            gas_token: fee.gas_token,
            refund_receiver: fee.refund_receiver,
            ..Self::sponsored(tx, nonce)
        }
    }
}

/// Signature of one owner over the Safe transaction hash
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeSignature {
    /// Owner that produced the signature
    #[serde(serialize_with = "as_checksum_addr")]
    pub signer: Address,
    /// `r ++ s ++ v` with `v` in {27, 28}
    pub data: Bytes,
}

impl SafeSignature {
    pub fn new(signer: Address, signature: Signature) -> Self {
        Self { signer, data: signature.to_vec().into() }
    }

    /// Recovers the signing address for the given Safe transaction hash
    pub fn recover(&self, safe_tx_hash: H256) -> eyre::Result<Address> {
        let signature = Signature::try_from(self.data.as_ref())?;
        Ok(signature.recover(safe_tx_hash)?)
    }
}

/// Safe transaction together with the collected owner signatures
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeTransaction {
    pub data: SafeTransactionData,
    pub signatures: Vec<SafeSignature>,
}

impl SafeTransaction {
    pub fn new(data: SafeTransactionData) -> Self {
        Self { data, signatures: vec![] }
    }

    /// Adds a signature, replacing an earlier one from the same owner
    pub fn add_signature(&mut self, signature: SafeSignature) {
        self.signatures.retain(|s| s.signer != signature.signer);
        self.signatures.push(signature);
    }

    /// Signatures concatenated in ascending owner order, as `execTransaction` checks them
    pub fn encoded_signatures(&self) -> Bytes {
        let mut signatures = self.signatures.iter().collect::<Vec<_>>();
        signatures.sort_by_key(|s| s.signer);
        signatures.iter().flat_map(|s| s.data.to_vec()).collect::<Vec<u8>>().into()
    }
}
