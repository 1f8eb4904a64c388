//! Relay-related primitives

use crate::{
    constants::relay::{DEFAULT_GAS_LIMIT, TASK_STATUS_PATH},
    utils::as_checksum_addr,
};
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gas options of a relayed transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTransactionOptions {
    /// Gas limit the relay uses for the transaction
    pub gas_limit: U256,
    /// Gas paid from the sponsor's relay balance, otherwise the fee is paid in `gas_token`
    pub is_sponsored: bool,
    /// Fee token when not sponsored, `None` is the native token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_token: Option<Address>,
}

impl Default for MetaTransactionOptions {
    fn default() -> Self {
        Self { gas_limit: U256::from(DEFAULT_GAS_LIMIT), is_sponsored: true, gas_token: None }
    }
}

/// Refund a Safe pays the relay for a call that isn't sponsored
///
/// The Safe refunds `baseGas * gasPrice` in `gasToken`, so the fee is carried as the base
/// gas with a gas price of 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayFee {
    /// Fee in the smallest unit of `gas_token`
    pub amount: U256,
    /// Refund token, zero address is the native token
    #[serde(serialize_with = "as_checksum_addr")]
    pub gas_token: Address,
    /// Fee collector of the relay
    #[serde(serialize_with = "as_checksum_addr")]
    pub refund_receiver: Address,
}

/// Fully encoded transaction handed to the relay
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayTransaction {
    /// Contract the relay calls (the Safe, or MultiSendCallOnly when deploying)
    #[serde(serialize_with = "as_checksum_addr")]
    pub target: Address,
    /// ABI-encoded call data, embeds the owner signatures
    pub encoded_transaction: Bytes,
    pub chain_id: u64,
    pub options: MetaTransactionOptions,
}

/// Task handle returned by the relay
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayTaskHandle {
    pub task_id: String,
}

impl RelayTaskHandle {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self { task_id: task_id.into() }
    }

    /// Status lookup URL of the task on the given relay
    pub fn status_url(&self, relay_url: &str) -> String {
        format!("{}/{TASK_STATUS_PATH}/{}", relay_url.trim_end_matches('/'), self.task_id)
    }
}

impl fmt::Display for RelayTaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.task_id)
    }
}
