//! Signing capabilities and the Safe transaction signer
//!
//! A signer advertises structured-data signing through [AccountSigner::typed_data_signer].
//! Signers without that capability (e.g. a raw key pair that only signs digests) are rejected
//! before anything is signed.

use crate::{
    eip712::SafeTxTypedData,
    error::GaslessError,
    transaction::{SafeSignature, SafeTransactionData},
};
use ethers::types::{transaction::eip712::TypedData, Address, Signature, U256};
use tracing::{debug, trace};

/// Capability of signing EIP-712 typed data
#[async_trait::async_trait]
pub trait TypedDataSigner: Send + Sync {
    /// Signs the typed data, returns the `r ++ s ++ v` signature of its EIP-712 digest
    async fn sign_typed_data(&self, typed_data: &TypedData) -> eyre::Result<Signature>;
}

/// Holder of an owner key
pub trait AccountSigner: Send + Sync {
    /// Address of the owner
    fn address(&self) -> Address;

    /// Typed data signing capability, if the signer has one
    fn typed_data_signer(&self) -> Option<&dyn TypedDataSigner> {
        None
    }
}

/// Signs a Safe transaction with the owner's typed data capability
///
/// # Arguments
/// * `tx` - The unsigned [SafeTransactionData](SafeTransactionData)
/// * `safe_address` - Address of the Safe (verifying contract)
/// * `chain_id` - Chain the transaction is executed on
/// * `signer` - Owner signer
///
/// # Returns
/// * `SafeSignature` - The owner's signature over the Safe transaction hash
pub async fn sign_safe_transaction(
    tx: &SafeTransactionData,
    safe_address: Address,
    chain_id: U256,
    signer: &dyn AccountSigner,
) -> Result<SafeSignature, GaslessError> {
    let owner = signer.address();
    let typed_signer = signer
        .typed_data_signer()
        .ok_or_else(|| GaslessError::UnsupportedSigner { signer: format!("{owner:?}") })?;

    let payload = SafeTxTypedData::new(tx.clone(), safe_address, chain_id);
    let safe_tx_hash = payload.safe_tx_hash();
    let typed_data = payload.to_typed_data()?;
    trace!("Typed data to sign: {typed_data:?}");

    let signature = typed_signer
        .sign_typed_data(&typed_data)
        .await
        .map_err(|e| GaslessError::Signing { inner: format!("{e:?}") })?;

    let signature = SafeSignature::new(owner, signature);
    let recovered = signature
        .recover(safe_tx_hash)
        .map_err(|e| GaslessError::Signing { inner: format!("{e:?}") })?;
    if recovered != owner {
        return Err(GaslessError::Signing {
            inner: format!("signature recovers to {recovered:?} instead of owner {owner:?}"),
        });
    }

    debug!("Owner {owner:?} signed safe tx {safe_tx_hash:?} for safe {safe_address:?}");

    Ok(signature)
}
