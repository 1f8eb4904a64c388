use ethers::types::{Address, U256};
use safe_relay_contracts::utils::{
    encode_create_proxy_with_nonce, encode_exec_transaction, encode_multi_send, encode_setup,
};
use safe_relay_primitives::{
    DeploymentState, GaslessError, MetaTransaction, MetaTransactionOptions, OperationType,
    RelayFee, RelayTransaction, SafeAccountConfig, SafeContracts, SafeDeploymentConfig, SafeTransaction,
    SafeTransactionData,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Safe the transaction is executed by, with its deployment state at preparation time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeAccount {
    /// Counterfactual (or deployed) address
    pub address: Address,
    pub config: SafeAccountConfig,
    pub deployment: SafeDeploymentConfig,
    pub state: DeploymentState,
}

/// Builds the Safe transaction and the call data handed to the relay
#[derive(Clone, Copy, Debug)]
pub struct TransactionAssembler {
    contracts: SafeContracts,
}

impl TransactionAssembler {
    pub fn new(contracts: SafeContracts) -> Self {
        Self { contracts }
    }

    /// Wraps the intents into an unsigned Safe transaction
    ///
    /// # Arguments
    /// * `intents` - Transactions the Safe executes, more than one are batched through
    ///   `MultiSend` with a delegate call
    /// * `nonce` - Current nonce of the Safe
    /// * `fee` - Relay fee the Safe refunds, `None` when the call is sponsored
    ///
    /// # Returns
    /// * `SafeTransactionData` - The Safe transaction, with zero refund parameters if sponsored
    pub fn create_transaction(
        &self,
        intents: &[MetaTransaction],
        nonce: U256,
        fee: Option<&RelayFee>,
    ) -> Result<SafeTransactionData, GaslessError> {
        let tx = match intents {
            [] => return Err(GaslessError::encoding("no transactions to execute")),
            [intent] => intent.clone(),
            batch => MetaTransaction {
                to: self.contracts.multi_send,
                value: U256::zero(),
                data: encode_multi_send(batch),
                operation: OperationType::DelegateCall,
            },
        };

        Ok(match fee {
            Some(fee) => SafeTransactionData::refunding(tx, nonce, fee),
            None => SafeTransactionData::sponsored(tx, nonce),
        })
    }

    /// Encodes the signed transaction into the relay payload
    ///
    /// A Safe that isn't deployed yet is created and the transaction executed in one
    /// `MultiSendCallOnly.multiSend` call, a deployed Safe is called directly.
    pub fn build_relay_transaction(
        &self,
        tx: &SafeTransaction,
        account: &SafeAccount,
        chain_id: u64,
        options: MetaTransactionOptions,
    ) -> Result<RelayTransaction, GaslessError> {
        if (tx.signatures.len() as u64) < account.config.threshold {
            return Err(GaslessError::Signing {
                inner: format!(
                    "{} of {} required owner signatures collected",
                    tx.signatures.len(),
                    account.config.threshold
                ),
            });
        }

        let exec_transaction = encode_exec_transaction(tx);

        let (target, encoded_transaction) = match account.state {
            DeploymentState::Deployed => (account.address, exec_transaction),
            DeploymentState::NotDeployed => {
                let deploy = MetaTransaction::call(
                    self.contracts.proxy_factory,
                    encode_create_proxy_with_nonce(
                        self.contracts.singleton,
                        encode_setup(&account.config, &self.contracts),
                        account.deployment.salt_nonce,
                    ),
                );
                let execute = MetaTransaction::call(account.address, exec_transaction);
                (self.contracts.multi_send_call_only, encode_multi_send(&[deploy, execute]))
            }
        };

        trace!("Relay payload for {:?} ({}): {encoded_transaction:?}", account.address, account.state);

        Ok(RelayTransaction { target, encoded_transaction, chain_id, options })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Bytes;
    use safe_relay_contracts::utils::{parse_exec_transaction, parse_multi_send};
    use safe_relay_primitives::{SafeSignature, SafeVersion};
    use std::str::FromStr;

    fn contracts() -> SafeContracts {
        SafeContracts::canonical(SafeVersion::V1_3_0, false)
    }

    fn increment() -> MetaTransaction {
        MetaTransaction::call(
            Address::from_low_u64_be(0xc0ffee),
            Bytes::from_str("0xd09de08a").unwrap(),
        )
    }

    fn account(state: DeploymentState) -> SafeAccount {
        SafeAccount {
            address: Address::from_low_u64_be(0x5afe),
            config: SafeAccountConfig::single_owner(Address::from_low_u64_be(0xa11ce)),
            deployment: SafeDeploymentConfig::default(),
            state,
        }
    }

    fn signed(data: SafeTransactionData) -> SafeTransaction {
        let mut tx = SafeTransaction::new(data);
        tx.add_signature(SafeSignature {
            signer: Address::from_low_u64_be(0xa11ce),
            data: Bytes::from(vec![0x11; 65]),
        });
        tx
    }

    #[test]
    fn single_intent_is_executed_directly() {
        let assembler = TransactionAssembler::new(contracts());
        let tx = assembler.create_transaction(&[increment()], 3.into(), None).unwrap();

        assert_eq!(tx.to, increment().to);
        assert_eq!(tx.data, increment().data);
        assert_eq!(tx.operation, OperationType::Call);
        assert_eq!(tx.nonce, 3.into());
        assert!(tx.safe_tx_gas.is_zero() && tx.base_gas.is_zero() && tx.gas_price.is_zero());
        assert!(tx.gas_token.is_zero() && tx.refund_receiver.is_zero());
    }

    #[test]
    fn fee_paying_transaction_refunds_the_relay() {
        let assembler = TransactionAssembler::new(contracts());
        let token = Address::from_low_u64_be(0x70c3);
        let collector = Address::from_low_u64_be(0xfee);
        let fee = RelayFee { amount: U256::from(1_000_000), gas_token: token, refund_receiver: collector };

        let tx = signed(assembler.create_transaction(&[increment()], 0.into(), Some(&fee)).unwrap());
        let relay_tx = assembler
            .build_relay_transaction(
                &tx,
                &account(DeploymentState::Deployed),
                5,
                MetaTransactionOptions { is_sponsored: false, ..Default::default() },
            )
            .unwrap();

        let exec = parse_exec_transaction(&relay_tx.encoded_transaction).unwrap();
        assert_eq!(exec.base_gas, U256::from(1_000_000));
        assert_eq!(exec.gas_price, U256::one());
        assert_eq!(exec.gas_token, token);
        assert_eq!(exec.refund_receiver, collector);
        assert!(exec.safe_tx_gas.is_zero());
    }

    #[test]
    fn batched_intents_delegate_call_multi_send() {
        let assembler = TransactionAssembler::new(contracts());
        let other = MetaTransaction::call(Address::from_low_u64_be(0xbeef), Bytes::default());
        let tx = assembler.create_transaction(&[increment(), other.clone()], 0.into(), None).unwrap();

        assert_eq!(tx.to, contracts().multi_send);
        assert_eq!(tx.operation, OperationType::DelegateCall);
        assert_eq!(parse_multi_send(&tx.data).unwrap(), vec![increment(), other]);
    }

    #[test]
    fn empty_intents_are_rejected() {
        let assembler = TransactionAssembler::new(contracts());
        assert!(matches!(
            assembler.create_transaction(&[], 0.into(), None),
            Err(GaslessError::Encoding { .. })
        ));
    }

    #[test]
    fn undeployed_safe_is_deployed_then_called() {
        let assembler = TransactionAssembler::new(contracts());
        let tx = signed(assembler.create_transaction(&[increment()], 0.into(), None).unwrap());
        let account = account(DeploymentState::NotDeployed);

        let relay_tx = assembler
            .build_relay_transaction(&tx, &account, 5, MetaTransactionOptions::default())
            .unwrap();
        assert_eq!(relay_tx.target, contracts().multi_send_call_only);
        assert_eq!(relay_tx.chain_id, 5);

        let actions = parse_multi_send(&relay_tx.encoded_transaction).unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].to, contracts().proxy_factory);
        assert_eq!(actions[0].data[..4], [0x16, 0x88, 0xf0, 0xb9]);
        assert_eq!(actions[1].to, account.address);
        assert!(actions.iter().all(|action| action.operation == OperationType::Call));

        let exec = parse_exec_transaction(&actions[1].data).unwrap();
        assert_eq!(exec.to, increment().to);
        assert_eq!(exec.signatures, tx.encoded_signatures());
    }

    #[test]
    fn deployed_safe_is_called_without_deployment() {
        let assembler = TransactionAssembler::new(contracts());
        let tx = signed(assembler.create_transaction(&[increment()], 1.into(), None).unwrap());
        let account = account(DeploymentState::Deployed);

        let relay_tx = assembler
            .build_relay_transaction(&tx, &account, 5, MetaTransactionOptions::default())
            .unwrap();
        assert_eq!(relay_tx.target, account.address);
        assert!(parse_multi_send(&relay_tx.encoded_transaction).is_err());
        assert_eq!(parse_exec_transaction(&relay_tx.encoded_transaction).unwrap().to, increment().to);
    }

    #[test]
    fn missing_signatures_are_rejected() {
        let assembler = TransactionAssembler::new(contracts());
        let tx = SafeTransaction::new(assembler.create_transaction(&[increment()], 0.into(), None).unwrap());

        assert!(matches!(
            assembler.build_relay_transaction(
                &tx,
                &account(DeploymentState::Deployed),
                5,
                MetaTransactionOptions::default()
            ),
            Err(GaslessError::Signing { .. })
        ));
    }
}
