//! Deployment state and nonce of a Safe

use crate::{gen::safe_api::NonceCall, utils::read_with_timeout};
use ethers::{
    abi::{AbiDecode, AbiEncode},
    types::{Address, U256},
};
use safe_relay_primitives::{ChainReader, DeploymentState, DeploymentStatus, GaslessError};
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

/// Reads deployment state, nonce and chain id from the node
#[derive(Debug)]
pub struct DeploymentResolver<C: ChainReader + ?Sized> {
    reader: Arc<C>,
    timeout: Duration,
}

impl<C: ChainReader + ?Sized> Clone for DeploymentResolver<C> {
    fn clone(&self) -> Self {
        Self { reader: self.reader.clone(), timeout: self.timeout }
    }
}

impl<C: ChainReader + ?Sized> DeploymentResolver<C> {
    pub fn new(reader: Arc<C>, timeout: Duration) -> Self {
        Self { reader, timeout }
    }

    /// Looks up the code at the address. Never fails, a read that didn't complete is
    /// [DeploymentStatus::Unknown].
    pub async fn status(&self, address: Address) -> DeploymentStatus {
        match read_with_timeout(self.timeout, "get code", self.reader.get_code_at(address)).await {
            Ok(code) if code.is_empty() => DeploymentStatus::NotDeployed,
            Ok(_) => DeploymentStatus::Deployed,
            Err(err) => {
                warn!("Deployment lookup of {address:?} failed: {err}");
                DeploymentStatus::Unknown(err.to_string())
            }
        }
    }

    /// Resolves whether the Safe is deployed, failing when the node can't tell
    pub async fn resolve(&self, address: Address) -> Result<DeploymentState, GaslessError> {
        let state = self.status(address).await.into_state()?;
        debug!("Safe {address:?} is {state}");
        Ok(state)
    }

    /// Current nonce of the Safe, a Safe that isn't deployed yet starts at 0
    pub async fn nonce(
        &self,
        address: Address,
        state: DeploymentState,
    ) -> Result<U256, GaslessError> {
        if !state.is_deployed() {
            return Ok(U256::zero());
        }

        let res = read_with_timeout(
            self.timeout,
            "safe nonce",
            self.reader.call_contract(address, NonceCall.encode().into()),
        )
        .await?;

        U256::decode(res)
            .map_err(|e| GaslessError::resolution_unavailable(format!("safe nonce: {e:?}")))
    }

    /// Chain id of the connected network
    pub async fn chain_id(&self) -> Result<u64, GaslessError> {
        read_with_timeout(self.timeout, "chain id", self.reader.get_chain_id()).await
    }
}
