//! EIP-712 encoding of Safe transactions
//!
//! The domain only carries `chainId` and `verifyingContract` (Safe >= 1.3.0). Field order of
//! `SafeTx` is part of the signed schema, see [SAFE_TX_FIELDS].

use crate::{
    constants::eip712::{DOMAIN_FIELDS, SAFE_TX_FIELDS, SAFE_TX_TYPE},
    error::GaslessError,
    transaction::SafeTransactionData,
};
use ethers::{
    abi::{encode, Token},
    types::{
        transaction::eip712::{EIP712Domain, Eip712, TypedData},
        Address, H256, U256,
    },
    utils::{keccak256, to_checksum},
};
use serde_json::json;
use std::convert::Infallible;

/// Builds the `Name(type field,...)` encoding of a struct type
pub fn encode_type(name: &str, fields: &[(&str, &str)]) -> String {
    let members =
        fields.iter().map(|(field, ty)| format!("{ty} {field}")).collect::<Vec<_>>().join(",");
    format!("{name}({members})")
}

fn type_members(fields: &[(&str, &str)]) -> serde_json::Value {
    fields.iter().map(|(name, ty)| json!({ "name": name, "type": ty })).collect()
}

/// Safe transaction bound to the Safe and chain it's going to be executed on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeTxTypedData {
    /// Safe address (verifying contract)
    pub safe_address: Address,
    /// Chain id
    pub chain_id: U256,
    /// The `SafeTx` message
    pub tx: SafeTransactionData,
}

impl SafeTxTypedData {
    pub fn new(tx: SafeTransactionData, safe_address: Address, chain_id: U256) -> Self {
        Self { safe_address, chain_id, tx }
    }

    /// Safe transaction hash, the digest owners sign
    pub fn safe_tx_hash(&self) -> H256 {
        H256::from(self.encode_eip712().unwrap_or_else(|e| match e {}))
    }

    /// Generic typed data (domain, types, primary type, message) handed to signers
    pub fn to_typed_data(&self) -> Result<TypedData, GaslessError> {
        self.typed_data_with_fields(&SAFE_TX_FIELDS)
    }

    pub(crate) fn typed_data_with_fields(
        &self,
        fields: &[(&str, &str)],
    ) -> Result<TypedData, GaslessError> {
        let tx = &self.tx;

        let mut types = serde_json::Map::new();
        types.insert("EIP712Domain".into(), type_members(&DOMAIN_FIELDS));
        types.insert(SAFE_TX_TYPE.into(), type_members(fields));

        let typed_data = json!({
            "types": types,
            "primaryType": SAFE_TX_TYPE,
            "domain": {
                "chainId": self.chain_id.to_string(),
                "verifyingContract": to_checksum(&self.safe_address, None),
            },
            "message": {
                "to": to_checksum(&tx.to, None),
                "value": tx.value.to_string(),
                "data": tx.data.to_string(),
                "operation": u8::from(tx.operation),
                "safeTxGas": tx.safe_tx_gas.to_string(),
                "baseGas": tx.base_gas.to_string(),
                "gasPrice": tx.gas_price.to_string(),
                "gasToken": to_checksum(&tx.gas_token, None),
                "refundReceiver": to_checksum(&tx.refund_receiver, None),
                "nonce": tx.nonce.to_string(),
            },
        });

        serde_json::from_value(typed_data)
            .map_err(|e| GaslessError::encoding(format!("typed data for safe tx: {e}")))
    }
}

impl Eip712 for SafeTxTypedData {
    type Error = Infallible;

    fn domain(&self) -> Result<EIP712Domain, Self::Error> {
        Ok(EIP712Domain {
            name: None,
            version: None,
            chain_id: Some(self.chain_id),
            verifying_contract: Some(self.safe_address),
            salt: None,
        })
    }

    fn type_hash() -> Result<[u8; 32], Self::Error> {
        Ok(keccak256(encode_type(SAFE_TX_TYPE, &SAFE_TX_FIELDS)))
    }

    fn struct_hash(&self) -> Result<[u8; 32], Self::Error> {
        let tx = &self.tx;
        let tokens = [
            Token::FixedBytes(Self::type_hash()?.to_vec()),
            Token::Address(tx.to),
            Token::Uint(tx.value),
            Token::FixedBytes(keccak256(&tx.data).to_vec()),
            Token::Uint(U256::from(u8::from(tx.operation))),
            Token::Uint(tx.safe_tx_gas),
            Token::Uint(tx.base_gas),
            Token::Uint(tx.gas_price),
            Token::Address(tx.gas_token),
            Token::Address(tx.refund_receiver),
            Token::Uint(tx.nonce),
        ];
        Ok(keccak256(encode(&tokens)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::OperationType;
    use ethers::types::Bytes;
    use std::str::FromStr;

    const SAFE: &str = "0x1f9840a85D5aF5bf1D1762F925BDADdC4201F984";

    fn increment_tx() -> SafeTransactionData {
        SafeTransactionData {
            to: "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D".parse().unwrap(),
            data: Bytes::from_str("0xd09de08a").unwrap(),
            ..Default::default()
        }
    }

    fn refund_tx() -> SafeTransactionData {
        SafeTransactionData {
            to: "0xA238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761".parse().unwrap(),
            value: U256::exp10(18),
            data: Bytes::default(),
            operation: OperationType::DelegateCall,
            safe_tx_gas: 50_000.into(),
            base_gas: 21_000.into(),
            gas_price: 1.into(),
            gas_token: "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE".parse().unwrap(),
            refund_receiver: "0x3E5c63644E683549055b9Be8653de26E0B4CD36E".parse().unwrap(),
            nonce: 3.into(),
        }
    }

    fn typed(tx: SafeTransactionData) -> SafeTxTypedData {
        SafeTxTypedData::new(tx, SAFE.parse().unwrap(), 5.into())
    }

    #[test]
    fn type_hashes_match_safe_contracts() {
        assert_eq!(
            H256::from(SafeTxTypedData::type_hash().unwrap()),
            H256::from_str("0xbb8310d486368db6bd6f849402fdd73ad53d316b5a4b2644ad6efe0f941286d8")
                .unwrap()
        );
        assert_eq!(
            H256::from(keccak256(encode_type("EIP712Domain", &DOMAIN_FIELDS))),
            H256::from_str("0x47e79534a245952e8b16893a336b85a3d9ea9fa8c573f3d803afb92a79469218")
                .unwrap()
        );
    }

    #[test]
    fn digest_matches_reference_vectors() {
        let increment = typed(increment_tx());
        assert_eq!(
            H256::from(increment.domain_separator().unwrap()),
            H256::from_str("0x18c69bfc5173ab9345508640b1330aef6794946577fb616242433f0ad8fdbe9f")
                .unwrap()
        );
        assert_eq!(
            H256::from(increment.struct_hash().unwrap()),
            H256::from_str("0xb238cc8b5f7f41db7b9c7c772a9d109d791eba0abf856821754feb64b05aba83")
                .unwrap()
        );
        assert_eq!(
            increment.safe_tx_hash(),
            H256::from_str("0xd41311547702f894f1573a453ab2323d4b00d42c65a8b9f4e9a6f57fbc0d8cfe")
                .unwrap()
        );

        assert_eq!(
            typed(refund_tx()).safe_tx_hash(),
            H256::from_str("0x671aa33aa9bc37360a4758016285c4ec7796afc3fc17ac84f5cdbd370c5ec9fa")
                .unwrap()
        );
    }

    #[test]
    fn digest_is_stable_across_runs_and_encoders() {
        for tx in [increment_tx(), refund_tx()] {
            let data = typed(tx);
            let generic = data.to_typed_data().unwrap();
            assert_eq!(data.safe_tx_hash(), data.clone().safe_tx_hash());
            assert_eq!(generic.encode_eip712().unwrap(), data.safe_tx_hash().0);
        }
    }

    #[test]
    fn field_order_is_part_of_the_digest() {
        let mut permuted = SAFE_TX_FIELDS;
        permuted.swap(4, 5);
        assert_ne!(
            keccak256(encode_type(SAFE_TX_TYPE, &permuted)),
            SafeTxTypedData::type_hash().unwrap()
        );

        let data = typed(refund_tx());
        let reordered = data.typed_data_with_fields(&permuted).unwrap();
        assert_ne!(reordered.encode_eip712().unwrap(), data.safe_tx_hash().0);
    }

    #[test]
    fn digest_is_bound_to_chain_and_safe() {
        let data = typed(increment_tx());
        let other_chain = SafeTxTypedData { chain_id: 1.into(), ..data.clone() };
        let other_safe = SafeTxTypedData { safe_address: Address::random(), ..data.clone() };
        assert_ne!(data.safe_tx_hash(), other_chain.safe_tx_hash());
        assert_ne!(data.safe_tx_hash(), other_safe.safe_tx_hash());
    }
}
