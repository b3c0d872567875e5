//! Bridge Configuration
//!
//! Contract addresses, chain IDs, and wait bounds. Defaults pin the
//! Sepolia deployment; every field is overridable by the embedder and
//! nothing is read from the environment.

use std::time::Duration;

use ethers_core::types::U256;

/// Everything the orchestrator needs to know about the two vaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Ethereum vault (payable lock contract)
    pub eth_vault_address: String,
    /// Starknet vault (lock contract)
    pub strk_vault_address: String,
    /// ERC-20 token the Starknet vault locks; approval target
    pub strk_token_address: String,
    /// Ethereum chain ID, passed as target on Starknet-sourced locks
    pub eth_chain_id: u64,
    /// Starknet chain ID felt, passed as target on Ethereum-sourced locks
    pub strk_chain_id: U256,
    /// Bound on waiting for approval finality
    pub approval_timeout: Duration,
    /// Bound on waiting for lock finality after broadcast
    pub relay_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            eth_vault_address: "0x547D7eA0270A66bc5411F35785Ed5e33674AA354".to_string(),
            strk_vault_address:
                "0x28c63d834c9aa17e391f7b463fe4d71e54b24e00e2896fd6b96b18c347df20c".to_string(),
            strk_token_address:
                "0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d".to_string(),
            eth_chain_id: 11155111, // Sepolia
            // "SN_SEPOLIA" as a short string felt
            strk_chain_id: U256::from_str_radix("534e5f5345504f4c4941", 16)
                .unwrap_or_else(|_| U256::zero()),
            approval_timeout: Duration::from_secs(120),
            relay_timeout: Duration::from_secs(600),
        }
    }
}
