#![allow(dead_code)]

use ethers::{
    abi::AbiEncode,
    types::{Address, Bytes, U256},
};
use safe_relay_contracts::{safe_api::NonceCall, safe_proxy_factory_api::ProxyCreationCodeCall};
use safe_relay_primitives::ChainReader;
use std::{
    collections::HashMap,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

// Testing keys (first two anvil accounts)
pub const KEY_PHRASE: &str = "test test test test test test test test test test test junk";
pub const SECOND_OWNER_KEY: &str =
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub const CHAIN_ID: u64 = 5;
pub const TASK_ID: &str = "0x93a3defc618ff97c32a37bdd567b15c50748c5c3d2b2c6c6eb0ec4fd6bd6c4dd";
pub const PROXY_CREATION_CODE: &str = "0x608060405234801561001057600080fd5b50";

/// Contract whose `increment()` the tests call
pub fn counter() -> Address {
    Address::from_str("0x0Fd5f1AC1A7F2eD7E5b7B2D4E0c48b1F3c0D5b1a").unwrap()
}

pub fn increment_data() -> Bytes {
    Bytes::from_str("0xd09de08a").unwrap()
}

/// In-memory chain state
#[derive(Debug)]
pub struct FakeChain {
    pub chain_id: u64,
    pub proxy_creation_code: Bytes,
    code: Mutex<HashMap<Address, Bytes>>,
    nonces: Mutex<HashMap<Address, U256>>,
    down: AtomicBool,
    reads: AtomicUsize,
}

impl Default for FakeChain {
    fn default() -> Self {
        Self {
            chain_id: CHAIN_ID,
            proxy_creation_code: Bytes::from_str(PROXY_CREATION_CODE).unwrap(),
            code: Mutex::default(),
            nonces: Mutex::default(),
            down: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
        }
    }
}

impl FakeChain {
    /// Marks the Safe as deployed with the given nonce
    pub fn deploy(&self, safe: Address, nonce: u64) {
        self.code.lock().unwrap().insert(safe, Bytes::from(vec![0x60, 0x80, 0x60, 0x40]));
        self.nonces.lock().unwrap().insert(safe, U256::from(nonce));
    }

    /// Applies an executed relay transaction: deploys the Safe if needed and bumps its nonce
    pub fn execute(&self, safe: Address) {
        let deployed = self.code.lock().unwrap().contains_key(&safe);
        if !deployed {
            self.deploy(safe, 0);
        }
        *self.nonces.lock().unwrap().entry(safe).or_default() += U256::one();
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Number of reads served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn read(&self) -> eyre::Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(eyre::eyre!("connection refused"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ChainReader for FakeChain {
    async fn get_code_at(&self, address: Address) -> eyre::Result<Bytes> {
        self.read()?;
        Ok(self.code.lock().unwrap().get(&address).cloned().unwrap_or_default())
    }

    async fn get_chain_id(&self) -> eyre::Result<u64> {
        self.read()?;
        Ok(self.chain_id)
    }

    async fn call_contract(&self, to: Address, data: Bytes) -> eyre::Result<Bytes> {
        self.read()?;
        if data.as_ref() == ProxyCreationCodeCall.encode().as_slice() {
            return Ok(self.proxy_creation_code.clone().encode().into());
        }
        if data.as_ref() == NonceCall.encode().as_slice() {
            let nonce = self.nonces.lock().unwrap().get(&to).copied().unwrap_or_default();
            return Ok(nonce.encode().into());
        }
        Err(eyre::eyre!("execution reverted"))
    }
}

/// Relay mock answering every request on `endpoint` with `status` and `body`
pub async fn relay_mock(endpoint: &str, status: u16, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

/// Relay mock accepting sponsored calls
pub async fn sponsored_relay_mock() -> MockServer {
    relay_mock("/relays/v2/sponsored-call", 201, serde_json::json!({ "taskId": TASK_ID })).await
}

/// Mounts a fee oracle answering estimates for `CHAIN_ID` with `fee`
pub async fn mount_fee_oracle(server: &MockServer, fee: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/oracles/{CHAIN_ID}/estimate")))
        .and(query_param("isHighPriority", "false"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "estimatedFee": fee })),
        )
        .mount(server)
        .await;
}

/// JSON bodies of the transactions the relay received, fee estimates are left out
pub async fn relay_requests(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| !req.body.is_empty())
        .map(|req| req.body_json::<serde_json::Value>().unwrap())
        .collect()
}

/// Query strings of the fee estimates the relay received
pub async fn fee_estimates(server: &MockServer) -> Vec<HashMap<String, String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| req.url.path().ends_with("/estimate"))
        .map(|req| req.url.query_pairs().into_owned().collect())
        .collect()
}
