//! Counterfactual address of a Safe deployed through the proxy factory

use crate::{
    gen::safe_proxy_factory_api::ProxyCreationCodeCall,
    utils::{encode_setup, read_with_timeout},
};
use ethers::{
    abi::{AbiDecode, AbiEncode},
    types::{Address, Bytes, H256},
    utils::{get_create2_address_from_hash, keccak256},
};
use safe_relay_primitives::{
    ChainReader, GaslessError, SafeAccountConfig, SafeContracts, SafeDeploymentConfig,
};
use std::{sync::Arc, time::Duration};
use tracing::debug;

/// Predicts the address `createProxyWithNonce` deploys the Safe to
///
/// # Arguments
/// * `config` - Owners and threshold of the Safe
/// * `deployment` - Salt nonce and version
/// * `contracts` - Singleton, proxy factory and fallback handler of the version
/// * `proxy_creation_code` - The factory's `proxyCreationCode()`
///
/// # Returns
/// * `Address` - The counterfactual Safe address
pub fn predict_safe_address(
    config: &SafeAccountConfig,
    deployment: &SafeDeploymentConfig,
    contracts: &SafeContracts,
    proxy_creation_code: &[u8],
) -> Result<Address, GaslessError> {
    config.validate()?;

    let initializer = encode_setup(config, contracts);

    let mut salt_nonce = [0u8; 32];
    deployment.salt_nonce.to_big_endian(&mut salt_nonce);
    let salt = keccak256([keccak256(&initializer).as_slice(), &salt_nonce[..]].concat());

    let init_code_hash =
        keccak256([proxy_creation_code, H256::from(contracts.singleton).as_bytes()].concat());

    Ok(get_create2_address_from_hash(contracts.proxy_factory, salt, init_code_hash))
}

/// Address predictor bound to the creation code of one proxy factory
#[derive(Clone, Debug)]
pub struct SafeAddressPredictor {
    contracts: SafeContracts,
    proxy_creation_code: Bytes,
}

impl SafeAddressPredictor {
    pub fn new(contracts: SafeContracts, proxy_creation_code: Bytes) -> Self {
        Self { contracts, proxy_creation_code }
    }

    /// Fetches `proxyCreationCode()` from the proxy factory once
    pub async fn connect<C: ChainReader + ?Sized>(
        reader: Arc<C>,
        contracts: SafeContracts,
        timeout: Duration,
    ) -> Result<Self, GaslessError> {
        let res = read_with_timeout(
            timeout,
            "proxy creation code",
            reader.call_contract(contracts.proxy_factory, ProxyCreationCodeCall.encode().into()),
        )
        .await?;

        let code = Bytes::decode(res).map_err(|e| {
            GaslessError::resolution_unavailable(format!("proxy creation code: {e:?}"))
        })?;
        if code.is_empty() {
            return Err(GaslessError::resolution_unavailable(format!(
                "proxy factory {:?} returned empty creation code",
                contracts.proxy_factory
            )));
        }

        debug!("Fetched proxy creation code ({} bytes) of {:?}", code.len(), contracts.proxy_factory);

        Ok(Self::new(contracts, code))
    }

    pub fn predict(
        &self,
        config: &SafeAccountConfig,
        deployment: &SafeDeploymentConfig,
    ) -> Result<Address, GaslessError> {
        predict_safe_address(config, deployment, &self.contracts, &self.proxy_creation_code)
    }
}
