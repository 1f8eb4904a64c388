use crate::utils::{
    parse_chain, parse_operation, parse_safe_version, parse_u256, unwrap_path_or_home,
    validate_private_key,
};
use alloy_chains::NamedChain;
use clap::Parser;
use ethers::types::{Address, Bytes, U256};
use expanded_pathbuf::ExpandedPathBuf;
use safe_relay_primitives::{
    constants::{
        deployment::PREDETERMINED_SALT_NONCE,
        network::{ETH_CLIENT_ADDRESS, REQUEST_TIMEOUT},
        relay::{DEFAULT_GAS_LIMIT, GELATO_RELAY_URL},
    },
    utils::{parse_address, parse_amount, parse_bytes},
    AccountSigner, MetaTransaction, MetaTransactionOptions, MetaTransactionRequest, OperationType,
    SafeAccountConfig, SafeContracts, SafeDeploymentConfig, SafeVersion, Wallet,
};
use safe_relay_relayer::{FlowConfig, RelayConfig};
use std::{fs::File, str::FromStr, time::Duration};

/// `increment()`
const INCREMENT_CALL_DATA: &str = "0xd09de08a";

/// Ethereum execution client CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct ChainArgs {
    /// Ethereum execution client RPC endpoint.
    #[clap(long, env = "ETH_CLIENT_ADDRESS", default_value = ETH_CLIENT_ADDRESS)]
    pub eth_client_address: String,

    /// Chain the execution client is expected to serve.
    #[clap(long, value_parser = parse_chain)]
    pub chain: Option<NamedChain>,

    /// Timeout of a single node read (in seconds).
    #[clap(long = "eth-client.timeout", default_value_t = REQUEST_TIMEOUT)]
    pub eth_client_timeout: u64,
}

impl ChainArgs {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.eth_client_timeout)
    }
}

/// Safe account CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct SafeArgs {
    /// Owners of the Safe, the signer is the only owner when omitted.
    #[clap(long, value_delimiter = ',', value_parser = parse_address)]
    pub owners: Vec<Address>,

    /// Number of owner signatures required to execute a transaction.
    #[clap(long, default_value_t = 1)]
    pub threshold: u64,

    /// Version of the Safe contracts.
    #[clap(long, default_value = "1.3.0", value_parser = parse_safe_version)]
    pub safe_version: SafeVersion,

    /// Salt nonce of the deployment.
    #[clap(long, value_parser = parse_u256)]
    pub salt_nonce: Option<U256>,

    /// Whether to deploy the singleton without event emission instead of the L2 singleton.
    #[clap(long, default_value_t = false)]
    pub l1_singleton: bool,

    /// Fallback handler of the Safe.
    #[clap(long, value_parser = parse_address)]
    pub fallback_handler: Option<Address>,
}

impl SafeArgs {
    /// Safe account config, owned by `signer` unless owners are given
    pub fn account_config(&self, signer: Option<Address>) -> eyre::Result<SafeAccountConfig> {
        let owners = match (self.owners.is_empty(), signer) {
            (false, _) => self.owners.clone(),
            (true, Some(signer)) => vec![signer],
            (true, None) => return Err(eyre::eyre!("Either owners or an owner key is required")),
        };

        Ok(SafeAccountConfig {
            owners,
            threshold: self.threshold,
            fallback_handler: self.fallback_handler,
        })
    }

    pub fn deployment_config(&self) -> SafeDeploymentConfig {
        SafeDeploymentConfig {
            salt_nonce: self.salt_nonce.unwrap_or(*PREDETERMINED_SALT_NONCE),
            safe_version: self.safe_version,
        }
    }

    pub fn contracts(&self) -> SafeContracts {
        SafeContracts::canonical(self.safe_version, self.l1_singleton)
    }
}

/// Owner key CLI args
#[derive(Debug, Clone, Parser)]
pub struct SignerArgs {
    /// Private key of the owner.
    #[clap(long, env = "PRIVATE_KEY", hide_env_values = true, value_parser = validate_private_key)]
    pub private_key: Option<String>,

    /// Path to the mnemonic file of the owner.
    #[clap(long, conflicts_with = "private_key")]
    pub mnemonic_file: Option<ExpandedPathBuf>,
}

impl SignerArgs {
    /// Loads the owner wallet, if a key is given
    pub fn wallet(&self, chain_id: u64) -> eyre::Result<Option<Wallet>> {
        match (&self.private_key, &self.mnemonic_file) {
            (Some(key), _) => Ok(Some(Wallet::from_private_key(key, chain_id)?)),
            (None, Some(path)) => Ok(Some(Wallet::from_file(path.clone(), chain_id)?)),
            (None, None) => Ok(None),
        }
    }

    /// Address of the owner, if a key is given
    pub fn address(&self) -> eyre::Result<Option<Address>> {
        Ok(self.wallet(1)?.map(|wallet| wallet.address()))
    }
}

/// Relay CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct RelayArgs {
    /// Base URL of the Gelato relay.
    #[clap(long = "relay.url", default_value = GELATO_RELAY_URL)]
    pub relay_url: String,

    /// Sponsor API key of the Gelato relay.
    #[clap(long = "relay.api-key", env = "GELATO_RELAY_API_KEY", hide_env_values = true)]
    pub relay_api_key: Option<String>,

    /// Timeout of the relay request (in seconds).
    #[clap(long = "relay.timeout", default_value_t = REQUEST_TIMEOUT)]
    pub relay_timeout: u64,

    /// Gas limit the relay executes the transaction with.
    #[clap(long, default_value_t = DEFAULT_GAS_LIMIT)]
    pub gas_limit: u64,

    /// Whether the relay fee is paid by the transaction instead of the sponsor.
    #[clap(long, default_value_t = false)]
    pub fee_paying: bool,

    /// Token the relay fee is paid in when fee paying, the native token when omitted.
    #[clap(long, value_parser = parse_address)]
    pub fee_token: Option<Address>,
}

impl RelayArgs {
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            url: self.relay_url.clone(),
            api_key: self.relay_api_key.clone(),
            timeout: Duration::from_secs(self.relay_timeout),
        }
    }

    pub fn options(&self) -> MetaTransactionOptions {
        MetaTransactionOptions {
            gas_limit: self.gas_limit.into(),
            is_sponsored: !self.fee_paying,
            gas_token: self.fee_token.filter(|_| self.fee_paying),
        }
    }
}

/// Transaction CLI args
#[derive(Debug, Clone, Parser)]
pub struct TransactionArgs {
    /// Target of the call.
    #[clap(long, value_parser = parse_address, required_unless_present = "transactions_file")]
    pub to: Option<Address>,

    /// Native value sent along (in wei).
    #[clap(long, default_value = "0", value_parser = parse_amount)]
    pub value: U256,

    /// Call data, `increment()` when omitted.
    #[clap(long, value_parser = parse_bytes)]
    pub data: Option<Bytes>,

    /// Operation of the call.
    #[clap(long, default_value = "call", value_parser = parse_operation)]
    pub operation: OperationType,

    /// JSON file with a list of transactions `{to, value, data, operation}` executed in a batch.
    #[clap(long, conflicts_with = "to")]
    pub transactions_file: Option<ExpandedPathBuf>,
}

impl TransactionArgs {
    pub fn meta_transactions(&self) -> eyre::Result<Vec<MetaTransaction>> {
        if let Some(path) = &self.transactions_file {
            let requests: Vec<MetaTransactionRequest> =
                serde_json::from_reader(File::open(path.as_path())?)?;
            return Ok(requests
                .into_iter()
                .map(MetaTransaction::try_from)
                .collect::<Result<Vec<_>, _>>()?);
        }

        let to = self.to.ok_or_else(|| eyre::eyre!("Either --to or --transactions-file is required"))?;
        let data = match &self.data {
            Some(data) => data.clone(),
            None => Bytes::from_str(INCREMENT_CALL_DATA)?,
        };
        Ok(vec![MetaTransaction { to, value: self.value, data, operation: self.operation }])
    }
}

/// Builds the flow config from the CLI args
pub fn flow_config(chain: &ChainArgs, safe: &SafeArgs, relay: &RelayArgs) -> FlowConfig {
    FlowConfig {
        contracts: safe.contracts(),
        deployment: safe.deployment_config(),
        options: relay.options(),
        read_timeout: chain.read_timeout(),
    }
}

/// Create wallet CLI args
#[derive(Debug, Clone, Parser)]
pub struct CreateWalletArgs {
    /// The path where the wallet will be stored.
    #[clap(long, short)]
    pub output_path: Option<ExpandedPathBuf>,

    /// The chain id.
    #[clap(long, default_value_t = 1)]
    pub chain_id: u64,
}

impl CreateWalletArgs {
    pub fn output_path(&self) -> eyre::Result<ExpandedPathBuf> {
        unwrap_path_or_home(self.output_path.clone())
    }
}

/// Decode CLI args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct DecodeArgs {
    /// Call data relayed to the Safe or to MultiSendCallOnly.
    #[clap(value_parser = parse_bytes)]
    pub data: Bytes,
}
