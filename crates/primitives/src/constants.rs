//! Safe-related constants

/// Canonical Safe contract deployments
pub mod safe_deployments {
    /// Safe v1.3.0 (EIP-155 deployments)
    pub mod v1_3_0 {
        pub const SAFE_SINGLETON: &str = "0xd9Db270c1B5E3Bd161E8c8503c55cEABeE709552";
        pub const SAFE_L2_SINGLETON: &str = "0x3E5c63644E683549055b9Be8653de26E0B4CD36E";
        pub const PROXY_FACTORY: &str = "0xa6B71E26C5e0845f74c812102Ca7114b6a896AB2";
        pub const MULTI_SEND: &str = "0xA238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761";
        pub const MULTI_SEND_CALL_ONLY: &str = "0x40A2aCCbd92BCA938b02010E17A5b8929b49130D";
        pub const FALLBACK_HANDLER: &str = "0xf48f2B2d2a534e402487b3ee7C18c33Aec0Fe5e4";
    }

    /// Safe v1.4.1
    pub mod v1_4_1 {
        pub const SAFE_SINGLETON: &str = "0x41675C099F32341bf84BFc5382aF534df5C7461a";
        pub const SAFE_L2_SINGLETON: &str = "0x29fcB43b46531BcA003ddC8FCB67FFE91900C762";
        pub const PROXY_FACTORY: &str = "0x4e1DCf7AD4e460CfD30791CCC4F9c8a4f820ec67";
        pub const MULTI_SEND: &str = "0x38869bf66a61cF6bDB996A6aE40D5853Fd43B526";
        pub const MULTI_SEND_CALL_ONLY: &str = "0x9641d764fc13c8B624c04430C7356C1C7C8102e2";
        pub const FALLBACK_HANDLER: &str = "0xfd0732Dc9E303f09fCEf3a7388Ad10A83459Ec99";
    }
}

/// Counterfactual deployment
pub mod deployment {
    use ethers::{types::U256, utils::keccak256};
    use lazy_static::lazy_static;

    /// Preimage of the salt nonce shared by every sponsored Safe, so one owner maps to one Safe
    pub const PREDETERMINED_SALT_PREIMAGE: &str = "Safe Account Abstraction";

    lazy_static! {
        /// `keccak256("Safe Account Abstraction")`
        pub static ref PREDETERMINED_SALT_NONCE: U256 =
            U256::from_big_endian(&keccak256(PREDETERMINED_SALT_PREIMAGE));
    }

    /// Owner list sentinel of the Safe `OwnerManager` linked list
    pub const SENTINEL_OWNERS: &str = "0x0000000000000000000000000000000000000001";
}

/// EIP-712 schema of Safe transactions
pub mod eip712 {
    /// Primary type name
    pub const SAFE_TX_TYPE: &str = "SafeTx";

    /// Ordered `SafeTx` fields as `(name, type)`. The order is part of the signed schema.
    pub const SAFE_TX_FIELDS: [(&str, &str); 10] = [
        ("to", "address"),
        ("value", "uint256"),
        ("data", "bytes"),
        ("operation", "uint8"),
        ("safeTxGas", "uint256"),
        ("baseGas", "uint256"),
        ("gasPrice", "uint256"),
        ("gasToken", "address"),
        ("refundReceiver", "address"),
        ("nonce", "uint256"),
    ];

    /// Ordered domain fields. Safe >= 1.3.0 binds only the chain and the Safe itself.
    pub const DOMAIN_FIELDS: [(&str, &str); 2] =
        [("chainId", "uint256"), ("verifyingContract", "address")];
}

/// Relay service
pub mod relay {
    /// Gelato relay API
    pub const GELATO_RELAY_URL: &str = "https://relay.gelato.digital";
    /// Sponsored call endpoint (gas paid from the sponsor's balance)
    pub const SPONSORED_CALL_PATH: &str = "relays/v2/sponsored-call";
    /// Call with sync fee endpoint (gas paid by the target during execution)
    pub const CALL_WITH_SYNC_FEE_PATH: &str = "relays/v2/call-with-sync-fee";
    /// Task status lookup, the task id is appended
    pub const TASK_STATUS_PATH: &str = "tasks/status";
    /// Fee oracle, the chain id and `estimate` are appended
    pub const FEE_ORACLE_PATH: &str = "oracles";
    /// Collector of the fees paid by `callWithSyncFee` targets
    pub const GELATO_FEE_COLLECTOR: &str = "0x3AC05161b76a35c1c28dC99Aa01BEd7B24cEA3bf";
    /// Gas the relay spends around the target call, added to the gas limit when estimating fees
    pub const GAS_EXECUTION_OVERHEAD: u64 = 150_000;
    /// Default gas limit handed to the relay
    pub const DEFAULT_GAS_LIMIT: u64 = 8_000_000;
    /// Placeholder the relay uses for the native token when paying fees
    pub const NATIVE_TOKEN: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";
}

/// Network requests
pub mod network {
    /// Default timeout of a single node or relay request (in seconds)
    pub const REQUEST_TIMEOUT: u64 = 30;
    /// Default Ethereum execution client endpoint
    pub const ETH_CLIENT_ADDRESS: &str = "http://127.0.0.1:8545";
}

/// Supported chains
pub mod supported_chains {
    use alloy_chains::NamedChain;

    pub const CHAINS: [NamedChain; 10] = [
        NamedChain::Dev,
        NamedChain::Mainnet,
        NamedChain::Goerli,
        NamedChain::Sepolia,
        NamedChain::Polygon,
        NamedChain::PolygonMumbai,
        NamedChain::Optimism,
        NamedChain::Arbitrum,
        NamedChain::Base,
        NamedChain::Gnosis,
    ];
}
