use super::args::{
    flow_config, ChainArgs, CreateWalletArgs, DecodeArgs, RelayArgs, SafeArgs, SignerArgs,
    TransactionArgs,
};
use alloy_chains::{Chain, NamedChain};
use clap::Parser;
use ethers::{
    abi::AbiDecode,
    providers::{Http, Middleware, Provider},
    utils::to_checksum,
};
use safe_relay_contracts::{
    multi_send_api::MultiSendCall, safe_api::SafeAPICalls,
    safe_proxy_factory_api::SafeProxyFactoryAPICalls, utils::function_name, DeploymentResolver,
    SafeAddressPredictor,
};
use safe_relay_primitives::{
    multi_send::decode_multi_send_data, provider::create_http_provider, AccountSigner, Wallet,
};
use safe_relay_relayer::{GaslessFlow, GelatoRelay, SafeAccount};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// Predict the address of a Safe and whether it is deployed
#[derive(Debug, Parser)]
pub struct PredictCommand {
    /// Ethereum execution client args
    #[clap(flatten)]
    chain: ChainArgs,

    /// Safe account args
    #[clap(flatten)]
    safe: SafeArgs,

    /// Owner key args
    #[clap(flatten)]
    signer: SignerArgs,
}

impl PredictCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let eth_client = Arc::new(
            create_http_provider(&self.chain.eth_client_address, self.chain.read_timeout()).await?,
        );
        let chain_id = check_connected_chain(&eth_client, self.chain.chain).await?;

        let config = self.safe.account_config(self.signer.address()?)?;
        let deployment = self.safe.deployment_config();

        let predictor = SafeAddressPredictor::connect(
            eth_client.clone(),
            self.safe.contracts(),
            self.chain.read_timeout(),
        )
        .await?;
        let address = predictor.predict(&config, &deployment)?;

        let resolver = DeploymentResolver::new(eth_client, self.chain.read_timeout());
        let state = resolver.resolve(address).await?;
        let nonce = resolver.nonce(address, state).await?;

        info!("Safe {address:?} on chain {chain_id} is {state}, nonce: {nonce}");

        let account = SafeAccount { address, config, deployment, state };
        println!("{}", serde_json::to_string_pretty(&account)?);

        Ok(())
    }
}

/// Sign a Safe transaction and submit it to the relay
#[derive(Debug, Parser)]
pub struct RelayCommand {
    /// Ethereum execution client args
    #[clap(flatten)]
    chain: ChainArgs,

    /// Safe account args
    #[clap(flatten)]
    safe: SafeArgs,

    /// Owner key args
    #[clap(flatten)]
    signer: SignerArgs,

    /// Relay args
    #[clap(flatten)]
    relay: RelayArgs,

    /// Transaction args
    #[clap(flatten)]
    transaction: TransactionArgs,
}

impl RelayCommand {
    /// Execute the command
    pub async fn execute(self) -> eyre::Result<()> {
        let eth_client = Arc::new(
            create_http_provider(&self.chain.eth_client_address, self.chain.read_timeout()).await?,
        );
        let chain_id = check_connected_chain(&eth_client, self.chain.chain).await?;

        let wallet = self
            .signer
            .wallet(chain_id)?
            .ok_or_else(|| eyre::eyre!("An owner key is required to sign the transaction"))?;
        let config = self.safe.account_config(Some(wallet.address()))?;
        let intents = self.transaction.meta_transactions()?;

        let relay = Arc::new(GelatoRelay::new(self.relay.relay_config())?);
        let flow = GaslessFlow::new(
            eth_client,
            relay.clone(),
            flow_config(&self.chain, &self.safe, &self.relay),
        );

        let prepared = flow.prepare(&wallet, config, intents).await?;
        info!(
            "Signed safe tx {:?} with nonce {}",
            prepared.safe_tx_hash, prepared.transaction.data.nonce
        );

        let handle = flow.submit(&prepared).await?;
        let status_url = relay.status_url(&handle);
        info!("Relay task {handle} created, status: {status_url}");
        println!("{}", json!({ "taskId": handle.task_id, "statusUrl": status_url }));

        Ok(())
    }
}

/// Create an owner wallet
#[derive(Debug, Parser)]
pub struct CreateWalletCommand {
    /// All create wallet args
    #[clap(flatten)]
    create_wallet: CreateWalletArgs,
}

impl CreateWalletCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        let path = self.create_wallet.output_path()?;
        info!("Creating owner wallet... Storing to: {path:?}");

        let wallet = Wallet::build_random(path, self.create_wallet.chain_id)?;
        info!("Wallet signer {:?}", wallet.signer);

        Ok(())
    }
}

/// Decode call data submitted to the relay
#[derive(Debug, Parser)]
pub struct DecodeCommand {
    /// All decode args
    #[clap(flatten)]
    decode: DecodeArgs,
}

impl DecodeCommand {
    /// Execute the command
    pub fn execute(self) -> eyre::Result<()> {
        println!("{}", serde_json::to_string_pretty(&decode_call(&self.decode.data))?);
        Ok(())
    }
}

async fn check_connected_chain(
    eth_client: &Provider<Http>,
    chain: Option<NamedChain>,
) -> eyre::Result<u64> {
    let chain_id = eth_client.get_chainid().await?.as_u64();
    let chain_conn = Chain::from_id(chain_id);

    if let Some(chain) = chain {
        if chain_conn.named() != Some(chain) {
            return Err(eyre::format_err!(
                "Tried to connect to the execution client of different chain: {} != {}",
                chain,
                chain_conn
            ));
        }
    }

    Ok(chain_id)
}

/// Decodes Safe, proxy factory and multi send calls, nested calls included
fn decode_call(data: &[u8]) -> Value {
    if let Ok(call) = MultiSendCall::decode(data) {
        let transactions = match decode_multi_send_data(&call.transactions) {
            Ok(txs) => txs
                .iter()
                .map(|tx| {
                    json!({
                        "operation": tx.operation.to_string(),
                        "to": to_checksum(&tx.to, None),
                        "value": tx.value.to_string(),
                        "call": decode_call(&tx.data),
                    })
                })
                .collect(),
            Err(err) => vec![json!({ "error": err.to_string() })],
        };
        return json!({ "function": "multiSend", "transactions": transactions });
    }

    if let Ok(call) = SafeAPICalls::decode(data) {
        match call {
            SafeAPICalls::ExecTransaction(tx) => {
                return json!({
                    "function": "execTransaction",
                    "to": to_checksum(&tx.to, None),
                    "value": tx.value.to_string(),
                    "operation": tx.operation,
                    "safeTxGas": tx.safe_tx_gas.to_string(),
                    "baseGas": tx.base_gas.to_string(),
                    "gasPrice": tx.gas_price.to_string(),
                    "gasToken": to_checksum(&tx.gas_token, None),
                    "refundReceiver": to_checksum(&tx.refund_receiver, None),
                    "signatures": tx.signatures,
                    "call": decode_call(&tx.data),
                });
            }
            SafeAPICalls::Setup(setup) => {
                return json!({
                    "function": "setup",
                    "owners": setup.owners.iter().map(|owner| to_checksum(owner, None)).collect::<Vec<_>>(),
                    "threshold": setup.threshold.to_string(),
                    "fallbackHandler": to_checksum(&setup.fallback_handler, None),
                });
            }
            _ => {}
        }
    }

    if let Ok(SafeProxyFactoryAPICalls::CreateProxyWithNonce(call)) =
        SafeProxyFactoryAPICalls::decode(data)
    {
        return json!({
            "function": "createProxyWithNonce",
            "singleton": to_checksum(&call.singleton, None),
            "saltNonce": call.salt_nonce.to_string(),
            "initializer": decode_call(&call.initializer),
        });
    }

    json!({ "function": function_name(data), "data": ethers::types::Bytes::from(data.to_vec()) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::{Address, Bytes};
    use safe_relay_contracts::utils::{
        encode_create_proxy_with_nonce, encode_exec_transaction, encode_multi_send, encode_setup,
    };
    use safe_relay_primitives::{
        MetaTransaction, SafeAccountConfig, SafeContracts, SafeTransaction, SafeTransactionData,
        SafeVersion,
    };
    use std::str::FromStr;

    #[test]
    fn decode_deployment_bundle() {
        let contracts = SafeContracts::canonical(SafeVersion::V1_3_0, false);
        let owner = Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        let safe = Address::from_low_u64_be(0x5afe);
        let deploy = MetaTransaction::call(
            contracts.proxy_factory,
            encode_create_proxy_with_nonce(
                contracts.singleton,
                encode_setup(&SafeAccountConfig::single_owner(owner), &contracts),
                7.into(),
            ),
        );
        let execute = MetaTransaction::call(
            safe,
            encode_exec_transaction(&SafeTransaction::new(SafeTransactionData {
                to: Address::from_low_u64_be(0xc0),
                data: Bytes::from_str("0xd09de08a").unwrap(),
                ..Default::default()
            })),
        );

        let decoded = decode_call(&encode_multi_send(&[deploy, execute]));
        assert_eq!(decoded["function"], "multiSend");

        let deploy = &decoded["transactions"][0];
        assert_eq!(deploy["operation"], "call");
        assert_eq!(deploy["call"]["function"], "createProxyWithNonce");
        assert_eq!(deploy["call"]["saltNonce"], "7");
        assert_eq!(deploy["call"]["initializer"]["function"], "setup");
        assert_eq!(deploy["call"]["initializer"]["owners"][0], to_checksum(&owner, None));

        let execute = &decoded["transactions"][1];
        assert_eq!(execute["to"], to_checksum(&safe, None));
        assert_eq!(execute["call"]["function"], "execTransaction");
        assert_eq!(execute["call"]["call"]["function"], Value::Null);
        assert_eq!(execute["call"]["call"]["data"], "0xd09de08a");
    }
}
