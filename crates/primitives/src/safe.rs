//! Safe account and deployment configuration

use crate::{
    constants::{
        deployment::{PREDETERMINED_SALT_NONCE, SENTINEL_OWNERS},
        safe_deployments::{v1_3_0, v1_4_1},
    },
    error::GaslessError,
    utils::as_checksum_addr,
};
use ethers::types::{Address, U256};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, str::FromStr};
use strum_macros::{Display, EnumString, EnumVariantNames};

lazy_static! {
    static ref SENTINEL: Address = parse_constant(SENTINEL_OWNERS);
    static ref SAFE_V1_3_0: CanonicalDeployment = CanonicalDeployment {
        singleton: parse_constant(v1_3_0::SAFE_SINGLETON),
        l2_singleton: parse_constant(v1_3_0::SAFE_L2_SINGLETON),
        proxy_factory: parse_constant(v1_3_0::PROXY_FACTORY),
        multi_send: parse_constant(v1_3_0::MULTI_SEND),
        multi_send_call_only: parse_constant(v1_3_0::MULTI_SEND_CALL_ONLY),
        fallback_handler: parse_constant(v1_3_0::FALLBACK_HANDLER),
    };
    static ref SAFE_V1_4_1: CanonicalDeployment = CanonicalDeployment {
        singleton: parse_constant(v1_4_1::SAFE_SINGLETON),
        l2_singleton: parse_constant(v1_4_1::SAFE_L2_SINGLETON),
        proxy_factory: parse_constant(v1_4_1::PROXY_FACTORY),
        multi_send: parse_constant(v1_4_1::MULTI_SEND),
        multi_send_call_only: parse_constant(v1_4_1::MULTI_SEND_CALL_ONLY),
        fallback_handler: parse_constant(v1_4_1::FALLBACK_HANDLER),
    };
}

fn parse_constant(addr: &str) -> Address {
    Address::from_str(addr).expect("address constant is valid")
}

/// Addresses of one canonical Safe release
struct CanonicalDeployment {
    singleton: Address,
    l2_singleton: Address,
    proxy_factory: Address,
    multi_send: Address,
    multi_send_call_only: Address,
    fallback_handler: Address,
}

/// Safe contracts version
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumString,
    EnumVariantNames,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum SafeVersion {
    #[default]
    #[strum(serialize = "1.3.0")]
    #[serde(rename = "1.3.0")]
    V1_3_0,
    #[strum(serialize = "1.4.1")]
    #[serde(rename = "1.4.1")]
    V1_4_1,
}

/// Owners and threshold of a Safe. Immutable once the Safe is deployed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeAccountConfig {
    /// Owners of the Safe
    pub owners: Vec<Address>,
    /// Number of owner signatures required to execute a transaction
    pub threshold: u64,
    /// Fallback handler, defaults to the canonical compatibility fallback handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_handler: Option<Address>,
}

impl SafeAccountConfig {
    /// Single owner Safe with threshold 1
    pub fn single_owner(owner: Address) -> Self {
        Self { owners: vec![owner], threshold: 1, fallback_handler: None }
    }

    /// Checks the configuration can be passed to `Safe.setup`
    pub fn validate(&self) -> Result<(), GaslessError> {
        if self.owners.is_empty() {
            return Err(GaslessError::invalid_configuration("owner list is empty"));
        }

        if self.threshold == 0 || self.threshold > self.owners.len() as u64 {
            return Err(GaslessError::invalid_configuration(format!(
                "threshold {} is outside [1, {}]",
                self.threshold,
                self.owners.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.owners.len());
        for owner in &self.owners {
            if owner.is_zero() || *owner == *SENTINEL {
                return Err(GaslessError::invalid_configuration(format!(
                    "owner {owner:?} is a reserved address"
                )));
            }
            if !seen.insert(owner) {
                return Err(GaslessError::invalid_configuration(format!(
                    "owner {owner:?} is duplicated"
                )));
            }
        }

        Ok(())
    }
}

/// Parameters of the counterfactual deployment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeDeploymentConfig {
    /// Salt nonce passed to `createProxyWithNonce`
    pub salt_nonce: U256,
    /// Safe contracts version
    pub safe_version: SafeVersion,
}

impl Default for SafeDeploymentConfig {
    fn default() -> Self {
        Self { salt_nonce: *PREDETERMINED_SALT_NONCE, safe_version: SafeVersion::default() }
    }
}

/// Addresses of the contracts a Safe deployment depends on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeContracts {
    /// Singleton the proxy delegates to
    #[serde(serialize_with = "as_checksum_addr")]
    pub singleton: Address,
    /// Proxy factory deploying the Safe with CREATE2
    #[serde(serialize_with = "as_checksum_addr")]
    pub proxy_factory: Address,
    /// MultiSend (delegate called for batched intents)
    #[serde(serialize_with = "as_checksum_addr")]
    pub multi_send: Address,
    /// MultiSendCallOnly (called to bundle deployment with execution)
    #[serde(serialize_with = "as_checksum_addr")]
    pub multi_send_call_only: Address,
    /// Default fallback handler
    #[serde(serialize_with = "as_checksum_addr")]
    pub fallback_handler: Address,
}

impl SafeContracts {
    /// Canonical deployments of the given version. `l1_singleton` selects the singleton
    /// without event emission, the L2 singleton is used otherwise.
    pub fn canonical(version: SafeVersion, l1_singleton: bool) -> Self {
        let release: &CanonicalDeployment = match version {
            SafeVersion::V1_3_0 => &SAFE_V1_3_0,
            SafeVersion::V1_4_1 => &SAFE_V1_4_1,
        };

        Self {
            singleton: if l1_singleton { release.singleton } else { release.l2_singleton },
            proxy_factory: release.proxy_factory,
            multi_send: release.multi_send,
            multi_send_call_only: release.multi_send_call_only,
            fallback_handler: release.fallback_handler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(n: u8) -> Address {
        Address::from_low_u64_be(0x1000 + n as u64)
    }

    #[test]
    fn validate_accepts_single_owner() {
        assert_eq!(SafeAccountConfig::single_owner(owner(1)).validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_threshold() {
        let empty = SafeAccountConfig { owners: vec![], threshold: 1, fallback_handler: None };
        assert!(matches!(empty.validate(), Err(GaslessError::InvalidConfiguration { .. })));

        let zero = SafeAccountConfig { owners: vec![owner(1)], threshold: 0, fallback_handler: None };
        assert!(matches!(zero.validate(), Err(GaslessError::InvalidConfiguration { .. })));

        let above = SafeAccountConfig {
            owners: vec![owner(1), owner(2)],
            threshold: 3,
            fallback_handler: None,
        };
        assert!(matches!(above.validate(), Err(GaslessError::InvalidConfiguration { .. })));
    }

    #[test]
    fn validate_rejects_reserved_and_duplicated_owners() {
        let zero = SafeAccountConfig::single_owner(Address::zero());
        assert!(matches!(zero.validate(), Err(GaslessError::InvalidConfiguration { .. })));

        let sentinel = SafeAccountConfig::single_owner(Address::from_low_u64_be(1));
        assert!(matches!(sentinel.validate(), Err(GaslessError::InvalidConfiguration { .. })));

        let duplicated = SafeAccountConfig {
            owners: vec![owner(1), owner(1)],
            threshold: 1,
            fallback_handler: None,
        };
        assert!(matches!(duplicated.validate(), Err(GaslessError::InvalidConfiguration { .. })));
    }

    #[test]
    fn safe_version_from_str() {
        assert_eq!(SafeVersion::from_str("1.3.0").unwrap(), SafeVersion::V1_3_0);
        assert_eq!(SafeVersion::from_str("1.4.1").unwrap(), SafeVersion::V1_4_1);
        assert!(SafeVersion::from_str("1.2.0").is_err());
        assert_eq!(SafeVersion::V1_3_0.to_string(), "1.3.0");
    }

    #[test]
    fn canonical_contracts_select_singleton() {
        let l2 = SafeContracts::canonical(SafeVersion::V1_3_0, false);
        let l1 = SafeContracts::canonical(SafeVersion::V1_3_0, true);
        assert_eq!(l2.singleton, v1_3_0::SAFE_L2_SINGLETON.parse::<Address>().unwrap());
        assert_eq!(l1.singleton, v1_3_0::SAFE_SINGLETON.parse::<Address>().unwrap());
        assert_eq!(l1.proxy_factory, l2.proxy_factory);
    }

    #[test]
    fn canonical_contracts_of_each_release() {
        for (version, singleton, factory, multi_send, call_only, handler) in [
            (
                SafeVersion::V1_3_0,
                v1_3_0::SAFE_SINGLETON,
                v1_3_0::PROXY_FACTORY,
                v1_3_0::MULTI_SEND,
                v1_3_0::MULTI_SEND_CALL_ONLY,
                v1_3_0::FALLBACK_HANDLER,
            ),
            (
                SafeVersion::V1_4_1,
                v1_4_1::SAFE_SINGLETON,
                v1_4_1::PROXY_FACTORY,
                v1_4_1::MULTI_SEND,
                v1_4_1::MULTI_SEND_CALL_ONLY,
                v1_4_1::FALLBACK_HANDLER,
            ),
        ] {
            let contracts = SafeContracts::canonical(version, true);
            assert_eq!(contracts.singleton, singleton.parse::<Address>().unwrap());
            assert_eq!(contracts.proxy_factory, factory.parse::<Address>().unwrap());
            assert_eq!(contracts.multi_send, multi_send.parse::<Address>().unwrap());
            assert_eq!(contracts.multi_send_call_only, call_only.parse::<Address>().unwrap());
            assert_eq!(contracts.fallback_handler, handler.parse::<Address>().unwrap());
            assert_eq!(SafeContracts::canonical(version, true), contracts);
        }
    }

    #[test]
    fn default_salt_is_predetermined() {
        let salt = SafeDeploymentConfig::default().salt_nonce;
        assert_eq!(
            format!("{salt:#x}"),
            "0xb1073742015cbcf5a3a4d9d1ae33ecf619439710b89475f92e2abd2117e90f90"
        );
    }
}
