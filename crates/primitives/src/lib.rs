//! Safe smart account primitive types
//!
//! This crate contains the Safe account configuration, transaction and typed data types, signer
//! capabilities and helper functions shared by the gasless relay flow.

pub mod constants;
pub mod deployment;
pub mod eip712;
mod error;
pub mod multi_send;
pub mod provider;
pub mod relay;
pub mod safe;
pub mod signer;
pub mod transaction;
pub mod utils;
mod wallet;

pub use deployment::{DeploymentState, DeploymentStatus};
pub use eip712::SafeTxTypedData;
pub use error::GaslessError;
pub use provider::ChainReader;
pub use relay::{MetaTransactionOptions, RelayFee, RelayTaskHandle, RelayTransaction};
pub use safe::{SafeAccountConfig, SafeContracts, SafeDeploymentConfig, SafeVersion};
pub use signer::{sign_safe_transaction, AccountSigner, TypedDataSigner};
pub use transaction::{
    MetaTransaction, MetaTransactionRequest, OperationType, SafeSignature, SafeTransaction,
    SafeTransactionData,
};
pub use wallet::{KeyPair, Wallet};
