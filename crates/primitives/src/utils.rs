//! Misc utils

use crate::error::GaslessError;
use ethers::{
    types::{Address, Bytes, U256},
    utils::to_checksum,
};
use std::str::FromStr;

/// Converts address to checksum address
pub fn as_checksum_addr<S>(val: &Address, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&to_checksum(val, None))
}

/// Serializes U256 as decimal string
pub fn as_dec_string<S>(val: &U256, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&val.to_string())
}

/// Parses a hex address
pub fn parse_address(s: &str) -> Result<Address, GaslessError> {
    let s = s.trim();
    if !s.starts_with("0x") || s.len() != 42 {
        return Err(GaslessError::encoding(format!("{s:?} is not a valid address")));
    }
    Address::from_str(s).map_err(|_| GaslessError::encoding(format!("{s:?} is not a valid address")))
}

/// Parses an unsigned amount, decimal or `0x`-prefixed hex
pub fn parse_amount(s: &str) -> Result<U256, GaslessError> {
    let s = s.trim();
    if s.starts_with('-') {
        return Err(GaslessError::encoding(format!("value {s:?} is negative")));
    }
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16).ok(),
        None => U256::from_dec_str(s).ok(),
    };
    parsed.ok_or_else(|| GaslessError::encoding(format!("value {s:?} is not an unsigned integer")))
}

/// Parses hex call data, empty string and `0x` are empty data
pub fn parse_bytes(s: &str) -> Result<Bytes, GaslessError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Bytes::default());
    }
    Bytes::from_str(s).map_err(|_| GaslessError::encoding(format!("data {s:?} is not hex")))
}
