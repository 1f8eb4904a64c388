//! Packed transaction encoding of the `MultiSend` contracts
//!
//! Every transaction is `uint8 operation ++ address to ++ uint256 value ++ uint256 dataLength ++
//! bytes data`, concatenated without padding.

use crate::{
    error::GaslessError,
    transaction::{MetaTransaction, OperationType},
};
use ethers::types::{Address, Bytes, U256};

const HEADER_LEN: usize = 1 + 20 + 32 + 32;

/// Encodes transactions for `multiSend(bytes transactions)`
pub fn encode_multi_send_data(txs: &[MetaTransaction]) -> Bytes {
    let mut buf = Vec::with_capacity(txs.iter().map(|tx| HEADER_LEN + tx.data.len()).sum());
    for tx in txs {
        let mut word = [0u8; 32];
        buf.push(u8::from(tx.operation));
        buf.extend_from_slice(tx.to.as_bytes());
        tx.value.to_big_endian(&mut word);
        buf.extend_from_slice(&word);
        U256::from(tx.data.len()).to_big_endian(&mut word);
        buf.extend_from_slice(&word);
        buf.extend_from_slice(&tx.data);
    }
    buf.into()
}

/// Decodes the packed `multiSend` payload back into transactions
pub fn decode_multi_send_data(buf: &[u8]) -> Result<Vec<MetaTransaction>, GaslessError> {
    let mut txs = vec![];
    let mut rest = buf;

    while !rest.is_empty() {
        if rest.len() < HEADER_LEN {
            return Err(GaslessError::encoding(format!(
                "multi send transaction {} is truncated",
                txs.len()
            )));
        }

        let operation = OperationType::try_from(rest[0]).map_err(GaslessError::encoding)?;
        let to = Address::from_slice(&rest[1..21]);
        let value = U256::from_big_endian(&rest[21..53]);
        let data_len = U256::from_big_endian(&rest[53..85]);
        if data_len > U256::from(rest.len() - HEADER_LEN) {
            return Err(GaslessError::encoding(format!(
                "multi send transaction {} declares {data_len} bytes of data",
                txs.len()
            )));
        }
        let data_len = data_len.as_usize();
        let data = Bytes::from(rest[HEADER_LEN..HEADER_LEN + data_len].to_vec());

        txs.push(MetaTransaction { to, value, data, operation });
        rest = &rest[HEADER_LEN + data_len..];
    }

    Ok(txs)
}
