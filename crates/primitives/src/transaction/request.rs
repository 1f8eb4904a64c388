//! Transaction intent as received from a caller (unvalidated string fields)

use super::{MetaTransaction, OperationType};
use crate::{
    error::GaslessError,
    utils::{parse_address, parse_amount, parse_bytes},
};
use serde::{Deserialize, Serialize};

/// Transaction intent with raw fields, validated when converted into a [MetaTransaction]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTransactionRequest {
    pub to: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub operation: OperationType,
}

impl TryFrom<MetaTransactionRequest> for MetaTransaction {
    type Error = GaslessError;

    fn try_from(request: MetaTransactionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            to: parse_address(&request.to)?,
            value: match request.value {
                Some(value) => parse_amount(&value)?,
                None => Default::default(),
            },
            data: match request.data {
                Some(data) => parse_bytes(&data)?,
                None => Default::default(),
            },
            operation: request.operation,
        })
    }
}
