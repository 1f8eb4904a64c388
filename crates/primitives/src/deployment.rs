//! Deployment state of a counterfactual Safe

use crate::error::GaslessError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether wallet code exists at the predicted address
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeploymentState {
    Deployed,
    NotDeployed,
}

impl DeploymentState {
    pub fn is_deployed(&self) -> bool {
        matches!(self, Self::Deployed)
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deployed => write!(f, "already deployed"),
            Self::NotDeployed => write!(f, "not yet deployed"),
        }
    }
}

/// Outcome of probing the chain for wallet code
///
/// "Not deployed" is a regular answer, not an error. A lookup that couldn't complete is
/// [Unknown](DeploymentStatus::Unknown) and must never be read as "not deployed".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeploymentStatus {
    Deployed,
    NotDeployed,
    Unknown(String),
}

impl DeploymentStatus {
    /// Turns the lookup outcome into a definite state, failing on [Unknown](Self::Unknown)
    pub fn into_state(self) -> Result<DeploymentState, GaslessError> {
        match self {
            Self::Deployed => Ok(DeploymentState::Deployed),
            Self::NotDeployed => Ok(DeploymentState::NotDeployed),
            Self::Unknown(reason) => Err(GaslessError::ResolutionUnavailable { inner: reason }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_not_conflated_with_not_deployed() {
        assert_eq!(DeploymentStatus::NotDeployed.into_state(), Ok(DeploymentState::NotDeployed));
        assert_eq!(DeploymentStatus::Deployed.into_state(), Ok(DeploymentState::Deployed));
        assert_eq!(
            DeploymentStatus::Unknown("connection refused".into()).into_state(),
            Err(GaslessError::ResolutionUnavailable { inner: "connection refused".into() })
        );
    }
}
