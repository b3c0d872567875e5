//! Shared types for Fluid Core
//!
//! Data structures that cross module boundaries are defined here
//! for consistent serialization.

use serde::{Deserialize, Serialize};

// =============================================================================
// Chain Types
// =============================================================================

/// The two chains this wallet spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainId {
    Ethereum,
    Starknet,
}

impl ChainId {
    /// The chain on the other side of the bridge
    pub fn counterpart(&self) -> ChainId {
        match self {
            ChainId::Ethereum => ChainId::Starknet,
            ChainId::Starknet => ChainId::Ethereum,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ChainId::Ethereum => "ETH",
            ChainId::Starknet => "STRK",
        }
    }

    /// Whether locking on this chain needs a prior ERC-20 approval.
    ///
    /// Ethereum-sourced operations move native value straight into the
    /// vault; Starknet-sourced operations spend an ERC-20 the vault must
    /// be approved for first.
    pub fn requires_approval(&self) -> bool {
        matches!(self, ChainId::Starknet)
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainId::Ethereum => write!(f, "ethereum"),
            ChainId::Starknet => write!(f, "starknet"),
        }
    }
}

// =============================================================================
// Key Material
// =============================================================================

/// Ethereum keys derived at BIP-44 m/44'/60'/0'/0/0
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthereumKeys {
    pub private_hex: String,
    pub public_uncompressed_hex: String,
    /// EIP-55 checksummed address
    pub address: String,
}

/// Starknet keys derived from the Ethereum private key scalar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarknetKeys {
    /// Scalar reduced into [1, STARK_ORDER - 1], hex, 0x-prefixed
    pub private_key: String,
    /// Stark curve public key (x coordinate), hex, 0x-prefixed
    pub public_key: String,
    /// Precomputed account-contract address, valid before deployment
    pub address: String,
}

/// One wallet, both chains. Immutable once created.
///
/// The core never retains a copy after returning this; the caller owns
/// persistence and zeroing (see `store::SecretStore`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletIdentity {
    /// First 4 bytes of SHA-256 over the normalized phrase, hex.
    /// Lets a stored identity be matched to a phrase without keeping it.
    pub mnemonic_fingerprint: String,
    pub eth_address: String,
    pub eth_private_key: String,
    pub strk_address: String,
    pub strk_public_key: String,
    pub strk_private_key: String,
}
