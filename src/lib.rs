//! Fluid Core
//!
//! Dual-chain wallet core spanning Ethereum and Starknet:
//!
//! - One BIP-39 mnemonic yields keys on both chains. The Starknet key is
//!   derived from the Ethereum private key scalar, and the Starknet
//!   account address is precomputed before the account contract exists.
//! - A bridge orchestrator drives transfers between the two liquidity
//!   vaults (approve -> lock -> relay wait -> confirm/fail) against
//!   injected chain clients.
//!
//! Network transport, persistence, and name resolution stay with the
//! embedder behind the `ChainClient`, `SecretStore`, and `NameResolver`
//! traits.

pub mod bridge;
pub mod chain;
pub mod curve;
pub mod error;
pub mod resolver;
pub mod store;
pub mod types;
pub mod utils;
pub mod wallet;

pub use bridge::{
    BridgeConfig, BridgeDirection, BridgeOrchestrator, BridgeRequest, BridgeStatus,
    BridgeTransaction,
};
pub use chain::{CallRequest, ChainClient, Fee, Receipt, TxHandle, ViewRequest};
pub use curve::StarknetAccountConfig;
pub use error::{ErrorCode, FluidError, FluidResult};
pub use resolver::{NameResolver, NullResolver};
pub use store::{MemorySecretStore, SecretStore};
pub use types::{ChainId, EthereumKeys, StarknetKeys, WalletIdentity};
pub use wallet::{create_wallet_from_entropy, generate_mnemonic, restore_wallet, validate_mnemonic};
