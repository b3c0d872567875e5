//! Wallet Module
//!
//! Deterministic dual-chain identity: one BIP-39 phrase yields an
//! Ethereum keypair and, derived from its scalar, a Starknet keypair
//! with a precomputed account address.

pub mod derivation;
pub mod keygen;

pub use derivation::{derive_identity, mnemonic_fingerprint, normalize_phrase};
pub use keygen::{
    create_wallet_from_entropy, generate_mnemonic, restore_wallet, restore_wallet_with_passphrase,
    validate_mnemonic,
};
