//! Safe smart account contract interfaces
//!
//! Call encoders for the Safe, proxy factory and multi send contracts, the counterfactual address
//! predictor and the deployment state resolver.

mod gen;
pub mod predictor;
pub mod resolver;
pub mod utils;

pub use gen::{
    multi_send_api, safe_api, safe_proxy_factory_api, MultiSendAPI, SafeAPI, SafeProxyFactoryAPI,
    SELECTORS_NAMES,
};
pub use predictor::{predict_safe_address, SafeAddressPredictor};
pub use resolver::DeploymentResolver;
