use crate::flow::RelayOp;
use ethers::{
    types::{Address, Bytes, U256},
    utils::to_checksum,
};
use safe_relay_primitives::{
    constants::{
        network::REQUEST_TIMEOUT,
        relay::{
            CALL_WITH_SYNC_FEE_PATH, FEE_ORACLE_PATH, GAS_EXECUTION_OVERHEAD, GELATO_FEE_COLLECTOR,
            GELATO_RELAY_URL, NATIVE_TOKEN, SPONSORED_CALL_PATH,
        },
    },
    utils::as_dec_string,
    GaslessError, MetaTransactionOptions, RelayFee, RelayTaskHandle, RelayTransaction,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{str::FromStr, time::Duration};
use tracing::{debug, trace};
use url::Url;

/// Connection settings of the relay service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    /// Base URL of the relay
    pub url: String,
    /// Sponsor API key, required for sponsored calls
    pub api_key: Option<String>,
    /// Timeout of a whole relay request
    pub timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: GELATO_RELAY_URL.into(),
            api_key: None,
            timeout: Duration::from_secs(REQUEST_TIMEOUT),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SponsoredCallRequest<'a> {
    chain_id: String,
    target: String,
    data: &'a Bytes,
    sponsor_api_key: &'a str,
    #[serde(serialize_with = "as_dec_string")]
    gas_limit: U256,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CallWithSyncFeeRequest<'a> {
    chain_id: String,
    target: String,
    data: &'a Bytes,
    fee_token: String,
    is_relay_context: bool,
    #[serde(serialize_with = "as_dec_string")]
    gas_limit: U256,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayResponse {
    task_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeeEstimateResponse {
    estimated_fee: serde_json::Value,
}

#[derive(Deserialize)]
struct RelayErrorResponse {
    message: String,
}

/// Client of the Gelato relay HTTP API
#[derive(Clone, Debug)]
pub struct GelatoRelay {
    client: reqwest::Client,
    config: RelayConfig,
}

impl GelatoRelay {
    /// Create a Gelato relay client
    ///
    /// # Arguments
    /// * `config` - Relay URL, API key and request timeout
    ///
    /// # Returns
    /// * `GelatoRelay` - The client, requests fail after `config.timeout`
    pub fn new(config: RelayConfig) -> eyre::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Status lookup URL of a submitted task
    pub fn status_url(&self, handle: &RelayTaskHandle) -> String {
        handle.status_url(&self.config.url)
    }

    fn endpoint(&self, path: &str) -> eyre::Result<Url> {
        let base = Url::parse(&format!("{}/", self.config.url.trim_end_matches('/')))?;
        Ok(base.join(path)?)
    }

    async fn post<T: Serialize>(&self, path: &str, body: &T) -> eyre::Result<RelayTaskHandle> {
        let url = self.endpoint(path)?;
        trace!("Sending relay request to {url}: {}", serde_json::to_string(body)?);

        let res: RelayResponse = Self::read_response(self.client.post(url).json(body).send().await?).await?;
        Ok(RelayTaskHandle::new(res.task_id))
    }

    async fn read_response<T: DeserializeOwned>(res: reqwest::Response) -> eyre::Result<T> {
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<RelayErrorResponse>(&body)
                .map(|err| err.message)
                .unwrap_or(body);
            debug!("Relay rejected the request with {status}: {message}");
            return Err(GaslessError::RelayRejected { inner: message }.into());
        }

        Ok(serde_json::from_str::<T>(&body).map_err(|_| GaslessError::RelayRejected {
            inner: format!("unexpected relay response: {body}"),
        })?)
    }

    /// Token the relay is paid in, the native token placeholder when none is set
    fn fee_token(options: &MetaTransactionOptions) -> eyre::Result<Address> {
        match options.gas_token {
            Some(token) if !token.is_zero() => Ok(token),
            _ => Ok(Address::from_str(NATIVE_TOKEN)?),
        }
    }
}

#[async_trait::async_trait]
impl RelayOp for GelatoRelay {
    /// Submit the transaction to the sponsored or the sync fee endpoint
    ///
    /// # Arguments
    /// * `tx` - The [RelayTransaction](RelayTransaction) to relay
    ///
    /// # Returns
    /// * `RelayTaskHandle` - The task id assigned by Gelato
    async fn relay_transaction(&self, tx: &RelayTransaction) -> eyre::Result<RelayTaskHandle> {
        let chain_id = tx.chain_id.to_string();
        let target = to_checksum(&tx.target, None);

        self.check_options(&tx.options)?;

        if tx.options.is_sponsored {
            let api_key = self.config.api_key.as_deref().unwrap_or_default();
            let body = SponsoredCallRequest {
                chain_id,
                target,
                data: &tx.encoded_transaction,
                sponsor_api_key: api_key,
                gas_limit: tx.options.gas_limit,
            };
            self.post(SPONSORED_CALL_PATH, &body).await
        } else {
            let fee_token = Self::fee_token(&tx.options)?;
            let body = CallWithSyncFeeRequest {
                chain_id,
                target,
                data: &tx.encoded_transaction,
                fee_token: to_checksum(&fee_token, None),
                is_relay_context: false,
                gas_limit: tx.options.gas_limit,
            };
            self.post(CALL_WITH_SYNC_FEE_PATH, &body).await
        }
    }

    /// Query the Gelato fee oracle for the fee of a sync fee call
    ///
    /// The relay's execution overhead is added to the gas limit of the call.
    async fn estimate_fee(
        &self,
        chain_id: u64,
        options: &MetaTransactionOptions,
    ) -> eyre::Result<RelayFee> {
        let fee_token = Self::fee_token(options)?;
        let gas_limit = options.gas_limit + U256::from(GAS_EXECUTION_OVERHEAD);

        let mut url = self.endpoint(&format!("{FEE_ORACLE_PATH}/{chain_id}/estimate"))?;
        url.query_pairs_mut()
            .append_pair("paymentToken", &to_checksum(&fee_token, None))
            .append_pair("gasLimit", &gas_limit.to_string())
            .append_pair("isHighPriority", "false");
        trace!("Requesting relay fee estimate from {url}");

        let res: FeeEstimateResponse = Self::read_response(self.client.get(url).send().await?).await?;
        let amount = match &res.estimated_fee {
            serde_json::Value::String(fee) => U256::from_dec_str(fee).ok(),
            serde_json::Value::Number(fee) => fee.as_u64().map(U256::from),
            _ => None,
        }
        .ok_or_else(|| GaslessError::RelayRejected {
            inner: format!("unexpected fee estimate: {}", res.estimated_fee),
        })?;

        let native = Address::from_str(NATIVE_TOKEN)?;
        Ok(RelayFee {
            amount,
            gas_token: if fee_token == native { Address::zero() } else { fee_token },
            refund_receiver: Address::from_str(GELATO_FEE_COLLECTOR)?,
        })
    }

    fn check_options(&self, options: &MetaTransactionOptions) -> Result<(), GaslessError> {
        if options.is_sponsored && self.config.api_key.is_none() {
            return Err(GaslessError::invalid_configuration(
                "sponsored relay calls require an API key",
            ));
        }
        Ok(())
    }
}
