use ethers::{
    contract::{abigen, EthCall},
    types::Selector,
};
use lazy_static::lazy_static;
use std::collections::HashMap;

abigen!(
    SafeAPI,
    r#"[
        function setup(address[] owners,uint256 threshold,address to,bytes data,address fallbackHandler,address paymentToken,uint256 payment,address paymentReceiver) external
        function execTransaction(address to,uint256 value,bytes data,uint8 operation,uint256 safeTxGas,uint256 baseGas,uint256 gasPrice,address gasToken,address refundReceiver,bytes signatures) external payable returns (bool success)
        function nonce() external view returns (uint256)
    ]"#
);

abigen!(
    SafeProxyFactoryAPI,
    r#"[
        function createProxyWithNonce(address singleton,bytes initializer,uint256 saltNonce) external returns (address proxy)
        function proxyCreationCode() external pure returns (bytes)
    ]"#
);

abigen!(
    MultiSendAPI,
    r#"[
        function multiSend(bytes transactions) external payable
    ]"#
);

lazy_static! {
    pub static ref SELECTORS_NAMES: HashMap<Selector, String> = {
        let mut map = HashMap::new();
        // safe
        map.insert(safe_api::SetupCall::selector(), safe_api::SetupCall::function_name().into());
        map.insert(safe_api::ExecTransactionCall::selector(), safe_api::ExecTransactionCall::function_name().into());
        map.insert(safe_api::NonceCall::selector(), safe_api::NonceCall::function_name().into());
        // proxy factory
        map.insert(safe_proxy_factory_api::CreateProxyWithNonceCall::selector(), safe_proxy_factory_api::CreateProxyWithNonceCall::function_name().into());
        map.insert(safe_proxy_factory_api::ProxyCreationCodeCall::selector(), safe_proxy_factory_api::ProxyCreationCodeCall::function_name().into());
        // multi send
        map.insert(multi_send_api::MultiSendCall::selector(), multi_send_api::MultiSendCall::function_name().into());

        map
    };
}
