//! Bridge Module
//!
//! Cross-chain transfer orchestration between the Ethereum and Starknet
//! liquidity vaults: approve -> lock -> relay wait -> confirm/fail, with
//! a trusted relayer completing the target side out of band.

pub mod config;
pub mod nonce;
pub mod orchestrator;
pub mod types;

pub use config::BridgeConfig;
pub use nonce::NonceGenerator;
pub use orchestrator::BridgeOrchestrator;
pub use types::{BridgeDirection, BridgeRequest, BridgeStatus, BridgeTransaction};
