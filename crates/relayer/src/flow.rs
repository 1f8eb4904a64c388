use crate::assembler::{SafeAccount, TransactionAssembler};
use ethers::types::{Address, H256};
use safe_relay_contracts::{DeploymentResolver, SafeAddressPredictor};
use safe_relay_primitives::{
    constants::network::REQUEST_TIMEOUT, sign_safe_transaction, AccountSigner, ChainReader,
    GaslessError, MetaTransaction, MetaTransactionOptions, RelayFee, RelayTaskHandle, RelayTransaction,
    SafeAccountConfig, SafeContracts, SafeDeploymentConfig, SafeTransaction, SafeTxTypedData,
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, trace};

/// A trait for submitting encoded Safe transactions to a relay service
#[async_trait::async_trait]
pub trait RelayOp: Send + Sync + 'static {
    /// Submit a relay transaction
    ///
    /// # Arguments
    /// * `tx` - The [RelayTransaction](RelayTransaction) to submit
    ///
    /// # Returns
    /// * `RelayTaskHandle` - The task id assigned by the relay
    async fn relay_transaction(&self, tx: &RelayTransaction) -> eyre::Result<RelayTaskHandle>;

    /// Estimate the fee the Safe refunds for a call that isn't sponsored
    ///
    /// # Arguments
    /// * `chain_id` - Chain the transaction is relayed on
    /// * `options` - Gas limit and fee token of the call
    ///
    /// # Returns
    /// * `RelayFee` - The fee amount, token and receiver
    async fn estimate_fee(
        &self,
        chain_id: u64,
        options: &MetaTransactionOptions,
    ) -> eyre::Result<RelayFee>;

    /// Checks the relay accepts calls with `options`, before anything is read or signed
    fn check_options(&self, _options: &MetaTransactionOptions) -> Result<(), GaslessError> {
        Ok(())
    }
}

/// Settings of the gasless flow, built once at start
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowConfig {
    /// Contracts of the Safe version in use
    pub contracts: SafeContracts,
    /// Salt nonce and version of counterfactual deployments
    pub deployment: SafeDeploymentConfig,
    /// Gas options handed to the relay
    pub options: MetaTransactionOptions,
    /// Timeout of every node read
    pub read_timeout: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        let deployment = SafeDeploymentConfig::default();
        Self {
            contracts: SafeContracts::canonical(deployment.safe_version, false),
            deployment,
            options: MetaTransactionOptions::default(),
            read_timeout: Duration::from_secs(REQUEST_TIMEOUT),
        }
    }
}

/// Signed Safe transaction, ready to be submitted
///
/// The deployment state and nonce are resolved once in [GaslessFlow::prepare] and aren't
/// checked again on submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedTransaction {
    pub account: SafeAccount,
    pub transaction: SafeTransaction,
    pub safe_tx_hash: H256,
    pub chain_id: u64,
}

/// Prepares, signs and relays Safe transactions paid by a sponsor
#[derive(Debug)]
pub struct GaslessFlow<C, R>
where
    C: ChainReader + ?Sized,
    R: RelayOp,
{
    /// Connection to the Ethereum execution client
    pub reader: Arc<C>,
    /// Client that submits the transactions to the relay
    pub relay: Arc<R>,
    pub config: FlowConfig,
    resolver: DeploymentResolver<C>,
    assembler: TransactionAssembler,
}

impl<C, R> GaslessFlow<C, R>
where
    C: ChainReader + ?Sized,
    R: RelayOp,
{
    pub fn new(reader: Arc<C>, relay: Arc<R>, config: FlowConfig) -> Self {
        let resolver = DeploymentResolver::new(reader.clone(), config.read_timeout);
        let assembler = TransactionAssembler::new(config.contracts);
        Self { reader, relay, config, resolver, assembler }
    }

    /// Counterfactual address of the Safe owned by `config`
    pub async fn predict_address(&self, config: &SafeAccountConfig) -> Result<Address, GaslessError> {
        config.validate()?;

        let predictor = SafeAddressPredictor::connect(
            self.reader.clone(),
            self.config.contracts,
            self.config.read_timeout,
        )
        .await?;
        predictor.predict(config, &self.config.deployment)
    }

    /// Predicts the Safe address and resolves its deployment state
    pub async fn account(&self, config: SafeAccountConfig) -> Result<SafeAccount, GaslessError> {
        let address = self.predict_address(&config).await?;
        let state = self.resolver.resolve(address).await?;

        Ok(SafeAccount { address, config, deployment: self.config.deployment.clone(), state })
    }

    /// Builds the Safe transaction for the intents and signs it with the owner
    ///
    /// # Arguments
    /// * `signer` - Owner signing the transaction, must support typed data signing
    /// * `config` - Owners and threshold of the Safe
    /// * `intents` - Transactions the Safe executes
    ///
    /// # Returns
    /// * `PreparedTransaction` - The transaction with the owner's signature
    pub async fn prepare(
        &self,
        signer: &dyn AccountSigner,
        config: SafeAccountConfig,
        intents: Vec<MetaTransaction>,
    ) -> Result<PreparedTransaction, GaslessError> {
        let owner = Self::check_owner(signer, &config)?;
        self.relay.check_options(&self.config.options)?;
        if intents.is_empty() {
            return Err(GaslessError::encoding("no transactions to execute"));
        }

        let chain_id = self.resolver.chain_id().await?;
        let account = self.account(config).await?;
        let nonce = self.resolver.nonce(account.address, account.state).await?;

        info!(
            "Preparing {} transaction(s) for safe {:?} ({}) with nonce {nonce}, owner: {owner:?}",
            intents.len(),
            account.address,
            account.state
        );

        let fee = if self.config.options.is_sponsored {
            None
        } else {
            let fee = self
                .relay
                .estimate_fee(chain_id, &self.config.options)
                .await
                .map_err(into_relay_error)?;
            debug!("Relay fee of {} in {:?} refunded to {:?}", fee.amount, fee.gas_token, fee.refund_receiver);
            Some(fee)
        };

        let data = self.assembler.create_transaction(&intents, nonce, fee.as_ref())?;
        let safe_tx_hash =
            SafeTxTypedData::new(data.clone(), account.address, chain_id.into()).safe_tx_hash();

        let signature = sign_safe_transaction(&data, account.address, chain_id.into(), signer)
        .await?;

        let mut transaction = SafeTransaction::new(data);
        transaction.add_signature(signature);

        Ok(PreparedTransaction { account, transaction, safe_tx_hash, chain_id })
    }

    /// Adds the signature of another owner to a prepared transaction
    pub async fn add_signature(
        &self,
        prepared: &mut PreparedTransaction,
        signer: &dyn AccountSigner,
    ) -> Result<(), GaslessError> {
        Self::check_owner(signer, &prepared.account.config)?;

        let signature = sign_safe_transaction(
            &prepared.transaction.data,
            prepared.account.address,
            prepared.chain_id.into(),
            signer,
        )
        .await?;
        prepared.transaction.add_signature(signature);

        Ok(())
    }

    /// Encodes the prepared transaction and submits it to the relay, once
    pub async fn submit(
        &self,
        prepared: &PreparedTransaction,
    ) -> Result<RelayTaskHandle, GaslessError> {
        let relay_tx = self.assembler.build_relay_transaction(
            &prepared.transaction,
            &prepared.account,
            prepared.chain_id,
            self.config.options.clone(),
        )?;
        trace!("Relay transaction: {relay_tx:?}");

        let handle =
            self.relay.relay_transaction(&relay_tx).await.map_err(into_relay_error)?;

        info!(
            "Safe transaction successfully relayed, task: {handle}, safe: {:?}, safe tx hash: {:?}, deployed with it: {}",
            prepared.account.address,
            prepared.safe_tx_hash,
            !prepared.account.state.is_deployed()
        );

        Ok(handle)
    }

    /// Prepares, signs and submits the intents in one go
    pub async fn relay(
        &self,
        signer: &dyn AccountSigner,
        config: SafeAccountConfig,
        intents: Vec<MetaTransaction>,
    ) -> Result<RelayTaskHandle, GaslessError> {
        let prepared = self.prepare(signer, config, intents).await?;
        self.submit(&prepared).await
    }

    /// Checks the signer can sign typed data and owns the Safe, before anything is read
    fn check_owner(
        signer: &dyn AccountSigner,
        config: &SafeAccountConfig,
    ) -> Result<Address, GaslessError> {
        let owner = signer.address();
        if signer.typed_data_signer().is_none() {
            return Err(GaslessError::UnsupportedSigner { signer: format!("{owner:?}") });
        }

        config.validate()?;
        if !config.owners.contains(&owner) {
            return Err(GaslessError::invalid_configuration(format!(
                "signer {owner:?} is not an owner of the safe"
            )));
        }

        Ok(owner)
    }
}

/// Keeps errors the relay client already tagged, anything else is a rejection
fn into_relay_error(err: eyre::Report) -> GaslessError {
    match err.downcast::<GaslessError>() {
        Ok(err) => err,
        Err(err) => GaslessError::RelayRejected { inner: format!("{err:?}") },
    }
}
