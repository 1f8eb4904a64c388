//! Owner key holders
//!
//! A [Wallet] is a wrapper around an ethers wallet that can sign typed data. A [KeyPair] only
//! signs raw digests and therefore can't authorize Safe transactions.
use crate::signer::{AccountSigner, TypedDataSigner};
use ethers::{
    prelude::{k256::ecdsa::SigningKey, rand},
    signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer},
    types::{transaction::eip712::TypedData, Address, Signature, H256},
};
use expanded_pathbuf::ExpandedPathBuf;
use std::fs;

const DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Wrapper around ethers wallet
#[derive(Clone, Debug)]
pub struct Wallet {
    /// Signing key of the owner
    pub signer: ethers::signers::Wallet<SigningKey>,
}

impl Wallet {
    /// Builds a `Wallet` from a randomly generated mnemonic phrase
    ///
    /// # Arguments
    /// * `path` - The directory where the mnemonic phrase will be written
    /// * `chain_id` - The chain id of the blockchain network to be used
    ///
    /// # Returns
    /// * `Self` - A new `Wallet` instance
    pub fn build_random(path: ExpandedPathBuf, chain_id: u64) -> eyre::Result<Self> {
        let mut rng = rand::thread_rng();

        fs::create_dir_all(path.as_path())?;

        let wallet = MnemonicBuilder::<English>::default()
            .write_to(path.to_path_buf())
            .derivation_path(DERIVATION_PATH)?
            .build_random(&mut rng)?;

        Ok(Self { signer: wallet.with_chain_id(chain_id) })
    }

    /// Create a new wallet from the given file containing the mnemonic phrase
    pub fn from_file(path: ExpandedPathBuf, chain_id: u64) -> eyre::Result<Self> {
        let wallet = MnemonicBuilder::<English>::default()
            .phrase(path.to_path_buf())
            .derivation_path(DERIVATION_PATH)?
            .build()?;

        Ok(Self { signer: wallet.with_chain_id(chain_id) })
    }

    /// Create a new wallet from the given mnemonic phrase
    pub fn from_phrase(phrase: &str, chain_id: u64) -> eyre::Result<Self> {
        let wallet = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .derivation_path(DERIVATION_PATH)?
            .build()?;

        Ok(Self { signer: wallet.with_chain_id(chain_id) })
    }

    /// Create a new wallet from a hex private key
    pub fn from_private_key(key: &str, chain_id: u64) -> eyre::Result<Self> {
        let wallet = key.trim().parse::<LocalWallet>()?;
        Ok(Self { signer: wallet.with_chain_id(chain_id) })
    }
}

impl AccountSigner for Wallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn typed_data_signer(&self) -> Option<&dyn TypedDataSigner> {
        Some(self)
    }
}

#[async_trait::async_trait]
impl TypedDataSigner for Wallet {
    async fn sign_typed_data(&self, typed_data: &TypedData) -> eyre::Result<Signature> {
        Ok(self.signer.sign_typed_data(typed_data).await?)
    }
}

/// Plain key pair, signs 32-byte digests only
#[derive(Clone, Debug)]
pub struct KeyPair {
    key: LocalWallet,
}

impl KeyPair {
    pub fn new(key: LocalWallet) -> Self {
        Self { key }
    }

    /// Signs a raw digest
    pub fn sign_hash(&self, hash: H256) -> eyre::Result<Signature> {
        Ok(self.key.sign_hash(hash)?)
    }
}

impl AccountSigner for KeyPair {
    fn address(&self) -> Address {
        self.key.address()
    }
}
