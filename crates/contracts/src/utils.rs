use crate::gen::{
    multi_send_api::MultiSendCall,
    safe_api::{ExecTransactionCall, SetupCall},
    safe_proxy_factory_api::CreateProxyWithNonceCall,
    SELECTORS_NAMES,
};
use ethers::{
    abi::{AbiDecode, AbiEncode},
    types::{Address, Bytes, Selector, U256},
};
use safe_relay_primitives::{
    multi_send::{decode_multi_send_data, encode_multi_send_data},
    GaslessError, MetaTransaction, SafeAccountConfig, SafeContracts, SafeTransaction,
};
use std::{future::Future, time::Duration};

/// Encodes `Safe.setup` for a Safe without modules and without a deployment refund
pub fn encode_setup(config: &SafeAccountConfig, contracts: &SafeContracts) -> Bytes {
    SetupCall {
        owners: config.owners.clone(),
        threshold: config.threshold.into(),
        to: Address::zero(),
        data: Bytes::default(),
        fallback_handler: config.fallback_handler.unwrap_or(contracts.fallback_handler),
        payment_token: Address::zero(),
        payment: U256::zero(),
        payment_receiver: Address::zero(),
    }
    .encode()
    .into()
}

/// Encodes `Safe.execTransaction` with the collected signatures
pub fn encode_exec_transaction(tx: &SafeTransaction) -> Bytes {
    let data = &tx.data;
    ExecTransactionCall {
        to: data.to,
        value: data.value,
        data: data.data.clone(),
        operation: data.operation.into(),
        safe_tx_gas: data.safe_tx_gas,
        base_gas: data.base_gas,
        gas_price: data.gas_price,
        gas_token: data.gas_token,
        refund_receiver: data.refund_receiver,
        signatures: tx.encoded_signatures(),
    }
    .encode()
    .into()
}

/// Encodes `SafeProxyFactory.createProxyWithNonce`
pub fn encode_create_proxy_with_nonce(
    singleton: Address,
    initializer: Bytes,
    salt_nonce: U256,
) -> Bytes {
    CreateProxyWithNonceCall { singleton, initializer, salt_nonce }.encode().into()
}

/// Encodes `multiSend(bytes)` of the packed transactions
pub fn encode_multi_send(txs: &[MetaTransaction]) -> Bytes {
    MultiSendCall { transactions: encode_multi_send_data(txs) }.encode().into()
}

/// Decodes `multiSend(bytes)` call data into the packed transactions
pub fn parse_multi_send(data: &[u8]) -> Result<Vec<MetaTransaction>, GaslessError> {
    let call = MultiSendCall::decode(data)
        .map_err(|e| GaslessError::encoding(format!("not a multiSend call: {e}")))?;
    decode_multi_send_data(&call.transactions)
}

/// Decodes `execTransaction` call data
pub fn parse_exec_transaction(data: &[u8]) -> Option<ExecTransactionCall> {
    ExecTransactionCall::decode(data).ok()
}

/// Name of the known Safe function the call data invokes
pub fn function_name(data: &[u8]) -> Option<&'static str> {
    if data.len() < 4 {
        return None;
    }
    let selector: Selector = [data[0], data[1], data[2], data[3]];
    SELECTORS_NAMES.get(&selector).map(|name| name.as_str())
}

/// Runs a node read, a failure or an elapsed timeout is [GaslessError::ResolutionUnavailable]
pub async fn read_with_timeout<T, F>(
    timeout: Duration,
    what: &str,
    fut: F,
) -> Result<T, GaslessError>
where
    F: Future<Output = eyre::Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(res)) => Ok(res),
        Ok(Err(err)) => Err(GaslessError::resolution_unavailable(format!("{what}: {err:?}"))),
        Err(_) => Err(GaslessError::resolution_unavailable(format!(
            "{what}: timed out after {timeout:?}"
        ))),
    }
}
