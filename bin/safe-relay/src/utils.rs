use alloy_chains::NamedChain;
use dirs::home_dir;
use ethers::types::U256;
use expanded_pathbuf::ExpandedPathBuf;
use pin_utils::pin_mut;
use safe_relay_primitives::{
    constants::supported_chains::CHAINS, OperationType, SafeVersion,
};
use std::{future::Future, str::FromStr};
use tracing::info;

/// Unwrap path or returns home directory
pub fn unwrap_path_or_home(path: Option<ExpandedPathBuf>) -> eyre::Result<ExpandedPathBuf> {
    if let Some(path) = path {
        Ok(path)
    } else {
        home_dir()
            .map(|h| h.join(".safe-relay"))
            .ok_or_else(|| eyre::eyre!("Get Home directory error"))
            .map(ExpandedPathBuf)
    }
}

/// Parses U256 from string
pub fn parse_u256(s: &str) -> Result<U256, String> {
    U256::from_dec_str(s).map_err(|_| format!("String {s} is not a valid U256"))
}

/// Parses SafeVersion from string
pub fn parse_safe_version(s: &str) -> Result<SafeVersion, String> {
    SafeVersion::from_str(s).map_err(|_| format!("String {s} is not a supported Safe version"))
}

/// Parses OperationType from string
pub fn parse_operation(s: &str) -> Result<OperationType, String> {
    OperationType::from_str(s).map_err(|_| format!("String {s} is not a valid operation"))
}

/// Parses a supported chain name
pub fn parse_chain(s: &str) -> Result<NamedChain, String> {
    NamedChain::from_str(s)
        .ok()
        .filter(|chain| CHAINS.contains(chain))
        .ok_or_else(|| format!("Chain {s} is not supported"))
}

/// Runs the future to completion or until:
/// - `ctrl-c` is received.
/// - `SIGTERM` is received (unix only).
pub async fn run_until_ctrl_c<F, E>(fut: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: Send + Sync + 'static + From<std::io::Error>,
{
    let ctrl_c = tokio::signal::ctrl_c();

    let mut stream = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let sigterm = stream.recv();
    pin_mut!(sigterm, ctrl_c, fut);

    tokio::select! {
        _ = ctrl_c => {
            info!("Received ctrl-c signal.");
        },
        _ = sigterm => {
            info!("Received SIGTERM signal.");
        },
        res = fut => res?,
    }

    Ok(())
}

/// Checks the private key is 32 hex bytes, `0x` prefix optional
pub fn validate_private_key(hex_string: &str) -> Result<String, String> {
    let key = hex_string.strip_prefix("0x").unwrap_or(hex_string);

    if key.len() != 64 {
        return Err("private key must be 32 bytes".into());
    }

    if !key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err("private key is not a valid hexadecimal string".into());
    }

    Ok(String::from(key))
}
