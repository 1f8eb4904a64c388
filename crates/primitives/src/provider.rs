//! Utils for creating ethers providers and reading chain state

use ethers::{
    providers::{Http, JsonRpcClient, Middleware, Provider},
    types::{transaction::eip2718::TypedTransaction, Address, Bytes, Chain, TransactionRequest},
};
use std::time::Duration;
use url::Url;

/// Creates ethers provider with HTTP connection
///
/// Every request, including the chain id lookup done here, fails after `timeout`.
pub async fn create_http_provider(addr: &str, timeout: Duration) -> eyre::Result<Provider<Http>> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let provider = Provider::new(Http::new_with_client(Url::parse(addr)?, client));

    let chain_id = provider.get_chainid().await?;

    Ok(provider.interval(if chain_id == Chain::Dev.into() {
        Duration::from_millis(5u64)
    } else {
        Duration::from_millis(500u64)
    }))
}

/// Read-only view of the chain used by the gasless flow
///
/// Only the latest block is ever read.
#[async_trait::async_trait]
pub trait ChainReader: Send + Sync {
    /// Deployed bytecode at the address, empty when there's none
    async fn get_code_at(&self, address: Address) -> eyre::Result<Bytes>;

    /// Chain id of the connected network
    async fn get_chain_id(&self) -> eyre::Result<u64>;

    /// `eth_call` of `data` against `to`
    async fn call_contract(&self, to: Address, data: Bytes) -> eyre::Result<Bytes>;
}

#[async_trait::async_trait]
impl<P: JsonRpcClient> ChainReader for Provider<P> {
    async fn get_code_at(&self, address: Address) -> eyre::Result<Bytes> {
        Ok(self.get_code(address, None).await?)
    }

    async fn get_chain_id(&self) -> eyre::Result<u64> {
        Ok(self.get_chainid().await?.as_u64())
    }

    async fn call_contract(&self, to: Address, data: Bytes) -> eyre::Result<Bytes> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        Ok(self.call(&tx, None).await?)
    }
}
